use clap::Parser;
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

use crate::Result;
use crate::cli::{Args, resolve_invocation};
use crate::cue::{parse_cue_file, resolve_encoding};
use crate::encoder::{EncoderProfile, create_output_folder, encode, output_folder};
use crate::error::Error;
use crate::signal;
use crate::ui::{confirm_encode, finish_progress, make_progress_bar, print_plan};

pub fn run() -> Result<()> {
    let args = Args::parse();
    let invocation = resolve_invocation(&args.first, args.second.as_deref())?;
    let encoding = match args.cue_encoding {
        Some(label) => Some(resolve_encoding(&label)?),
        None => None,
    };

    let (sheet, encoding_used, encoding_autodetected) =
        parse_cue_file(&invocation.cue_path, encoding)?;

    // The referenced audio file must exist before any encoding begins.
    let audio_path = resolve_audio_path(&invocation.cue_path, &sheet.audio_file)?;

    signal::install();

    let profile = EncoderProfile::for_format(invocation.format, args.encoder.as_deref());
    let folder = output_folder(&sheet);

    print_plan(
        &sheet,
        &invocation.cue_path,
        &audio_path,
        invocation.format,
        profile.extension,
        folder.as_deref(),
        encoding_used,
        encoding_autodetected,
    );

    if !confirm_encode(args.yes) {
        println!("{}", "Cancelled".yellow());
        return Ok(());
    }

    if let Some(folder) = folder.as_deref() {
        create_output_folder(folder)?;
    }

    let mut progress = Some(make_progress_bar(sheet.tracks.len() as u64));
    match encode(
        &sheet,
        &audio_path,
        &profile,
        folder.as_deref(),
        progress.as_ref(),
    ) {
        Ok(()) => {
            finish_progress(&mut progress, "done");
            Ok(())
        }
        Err(err) => {
            finish_progress(&mut progress, "aborted");
            Err(err)
        }
    }
}

/// The cue references its audio by name; relative names resolve against the
/// cue file's own directory.
fn resolve_audio_path(cue_path: &Path, referenced: &str) -> Result<PathBuf> {
    let referenced = Path::new(referenced);
    let resolved = if referenced.is_absolute() {
        referenced.to_path_buf()
    } else {
        match cue_path.parent() {
            Some(parent) => parent.join(referenced),
            None => referenced.to_path_buf(),
        }
    };
    if !resolved.is_file() {
        return Err(Error::FileNotFound(resolved));
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::resolve_audio_path;
    use crate::error::Error;
    use std::fs;
    use std::path::Path;

    #[test]
    fn resolve_audio_path_joins_cue_directory() {
        let dir = tempfile::tempdir().expect("failed to create test directory");
        let audio = dir.path().join("album.flac");
        fs::write(&audio, b"").expect("failed to write audio stub");

        let cue_path = dir.path().join("album.cue");
        let resolved = resolve_audio_path(&cue_path, "album.flac").unwrap();
        assert_eq!(resolved, audio);
    }

    #[test]
    fn resolve_audio_path_reports_missing_file() {
        let err = resolve_audio_path(Path::new("album.cue"), "missing.flac").unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
    }
}
