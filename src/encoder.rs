use indicatif::ProgressBar;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::Result;
use crate::error::Error;
use crate::signal;
use crate::types::{CueSheet, OutputFormat, TrackRecord};

/// Invocation shape for one output format, passed into the orchestrator as
/// data rather than read from module state.
#[derive(Debug, Clone)]
pub(crate) struct EncoderProfile {
    pub(crate) program: PathBuf,
    pub(crate) codec_args: &'static [&'static str],
    pub(crate) extension: &'static str,
}

impl EncoderProfile {
    pub(crate) fn for_format(format: OutputFormat, program: Option<&Path>) -> Self {
        let (codec_args, extension): (&'static [&'static str], &'static str) = match format {
            OutputFormat::Flac => (&["-c:a", "flac", "-compression_level", "12"], ".flac"),
            OutputFormat::Mp3 => (&["-c:a", "libmp3lame", "-qscale:a", "1"], ".mp3"),
        };
        Self {
            program: program
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("ffmpeg")),
            codec_args,
            extension,
        }
    }
}

/// Album folder derived from the last track's year and album tags. Either
/// one missing means no folder: tracks land in the working directory.
pub(crate) fn output_folder(sheet: &CueSheet) -> Option<PathBuf> {
    let last = sheet.last_track()?;
    let year = last.year.as_deref()?;
    let album = last.album.as_deref()?;
    Some(PathBuf::from(format!(
        "{} - {}",
        sanitize_filename(year),
        sanitize_filename(album)
    )))
}

/// The folder must not exist yet; a collision is fatal, never merged into.
pub(crate) fn create_output_folder(folder: &Path) -> Result<()> {
    if folder.exists() {
        return Err(Error::directory_create(folder, "already exists"));
    }
    fs::create_dir(folder).map_err(|err| Error::directory_create(folder, err.to_string()))
}

pub(crate) fn output_path(
    track: &TrackRecord,
    folder: Option<&Path>,
    extension: &str,
) -> PathBuf {
    let file_name = track.output_file_name(extension);
    match folder {
        Some(folder) => folder.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// Every argument after the program name, in the fixed composition order:
/// input file, one flag pair per set tag field, time range, codec selection,
/// output path. Unset fields are omitted entirely; the final track carries
/// no `-to`.
pub(crate) fn compose_args(
    profile: &EncoderProfile,
    audio_path: &Path,
    track: &TrackRecord,
    folder: Option<&Path>,
) -> Vec<String> {
    let mut args = vec!["-i".to_string(), audio_path.display().to_string()];
    let mut metadata = |key: &str, value: &str| {
        args.push("-metadata".to_string());
        args.push(format!("{}={}", key, value));
    };
    if let Some(genre) = &track.genre {
        metadata("genre", genre);
    }
    if let Some(year) = &track.year {
        metadata("date", year);
    }
    if let Some(disc_id) = &track.disc_id {
        metadata("comment", &format!("DiscID: {}", disc_id));
    }
    if let Some(performer) = &track.performer {
        metadata("artist", performer);
    }
    if let Some(album) = &track.album {
        metadata("album", album);
    }
    if let Some(title) = &track.title {
        metadata("title", title);
    }
    metadata("track", &track.number);
    if let Some(start) = &track.start {
        args.push("-ss".to_string());
        args.push(start.clone());
    }
    if let Some(stop) = &track.stop {
        args.push("-to".to_string());
        args.push(stop.clone());
    }
    args.extend(profile.codec_args.iter().map(|arg| arg.to_string()));
    args.push(output_path(track, folder, profile.extension).display().to_string());
    args
}

/// Run one encoder invocation per track, in document order, each awaited to
/// completion before the next starts. Spawn failures and exit statuses are
/// not inspected; the only condition that stops the batch is an observed
/// interrupt.
pub(crate) fn encode(
    sheet: &CueSheet,
    audio_path: &Path,
    profile: &EncoderProfile,
    folder: Option<&Path>,
    progress: Option<&ProgressBar>,
) -> Result<()> {
    for track in sheet.tracks.values() {
        if signal::interrupted() {
            return Err(Error::Interrupted);
        }
        if let Some(pb) = progress {
            pb.set_message(track.output_file_name(profile.extension));
        }

        let mut command = Command::new(&profile.program);
        command
            .args(compose_args(profile, audio_path, track, folder))
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        if let Ok(mut child) = command.spawn() {
            let _ = child.wait();
        }

        if signal::interrupted() {
            return Err(Error::Interrupted);
        }
        if let Some(pb) = progress {
            pb.inc(1);
        }
    }
    Ok(())
}

/// Path separators and NUL become underscores, other control characters are
/// dropped.
pub(crate) fn sanitize_filename(value: &str) -> String {
    let mut out = String::new();
    for ch in value.chars() {
        if ch == '/' || ch == '\\' || ch == '\0' {
            out.push('_');
            continue;
        }
        if ch.is_control() {
            continue;
        }
        out.push(ch);
    }
    out.trim().to_string()
}
