use dialoguer::Confirm;
use encoding_rs::Encoding;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::OwoColorize;
use std::path::Path;

use crate::types::{CueSheet, OutputFormat, TrackRecord};

pub(crate) fn print_plan(
    sheet: &CueSheet,
    cue_path: &Path,
    audio_path: &Path,
    format: OutputFormat,
    extension: &str,
    folder: Option<&Path>,
    encoding: &'static Encoding,
    encoding_autodetected: bool,
) {
    println!("{}", "Plan".bold());
    println!("  {} {}", "CUE:".cyan(), cue_path.display());
    let encoding_label = if encoding_autodetected {
        format!("{} {}", encoding.name(), "(autodetected)".dimmed())
    } else {
        encoding.name().to_string()
    };
    println!("  {} {}", "CUE encoding:".cyan(), encoding_label.green());
    println!("  {} {}", "Source:".cyan(), audio_path.display());
    println!(
        "  {} {} ({} tracks)",
        "Format:".cyan(),
        format.label(),
        sheet.tracks.len()
    );
    match folder {
        Some(folder) => println!("  {} {}", "Folder:".cyan(), folder.display()),
        None => println!("  {} {}", "Folder:".cyan(), "(working directory)".dimmed()),
    }

    print_shared_tags(sheet);

    for track in sheet.tracks.values() {
        let file_name = track.output_file_name(extension);
        let range = format_range(track);
        let tags = format_track_tags(track);
        if tags.is_empty() {
            println!("{} {}", file_name.bold(), range.dimmed());
        } else {
            println!("{} {} {}", file_name.bold(), range.dimmed(), tags);
        }
    }
}

fn print_shared_tags(sheet: &CueSheet) {
    println!("{}", "Shared tags".bold());
    let mut parts = Vec::new();
    if let Some(track) = sheet.last_track() {
        for (key, value) in [
            ("ALBUM", &track.album),
            ("DATE", &track.year),
            ("GENRE", &track.genre),
            ("DISCID", &track.disc_id),
        ] {
            if let Some(value) = value {
                parts.push(format!("{}={}", key.cyan(), value.yellow()));
            }
        }
    }
    if parts.is_empty() {
        println!("  {}", "(none)".dimmed());
    } else {
        println!("  {}", parts.join("; "));
    }
}

fn format_range(track: &TrackRecord) -> String {
    match (&track.start, &track.stop) {
        (Some(start), Some(stop)) => format!("({}-{})", start, stop),
        (Some(start), None) => format!("({}-end)", start),
        (None, _) => "(no start time)".to_string(),
    }
}

fn format_track_tags(track: &TrackRecord) -> String {
    let mut parts = Vec::new();
    if let Some(title) = &track.title {
        parts.push(format!("{}={}", "TITLE".cyan(), title.yellow()));
    }
    if let Some(performer) = &track.performer {
        parts.push(format!("{}={}", "ARTIST".cyan(), performer.yellow()));
    }
    parts.join("; ")
}

/// Prompt before touching the filesystem. A failed prompt (no tty) counts
/// as a decline.
pub(crate) fn confirm_encode(yes: bool) -> bool {
    if yes {
        return true;
    }
    Confirm::new()
        .with_prompt("Proceed?")
        .default(false)
        .interact()
        .unwrap_or(false)
}

pub(crate) fn make_progress_bar(total_tracks: u64) -> ProgressBar {
    let pb = ProgressBar::with_draw_target(
        Some(total_tracks),
        ProgressDrawTarget::stderr_with_hz(10),
    );
    let style = ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>2}/{len:<2} {msg}")
        .unwrap()
        .progress_chars("=>-");
    pb.set_style(style);
    pb.set_message("encoding");
    pb
}

pub(crate) fn finish_progress(progress: &mut Option<ProgressBar>, message: &str) {
    if let Some(pb) = progress.take() {
        pb.finish_with_message(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::format_range;
    use crate::types::TrackRecord;

    fn track(start: Option<&str>, stop: Option<&str>) -> TrackRecord {
        TrackRecord {
            number: "01".to_string(),
            title: None,
            performer: None,
            album: None,
            genre: None,
            year: None,
            disc_id: None,
            start: start.map(str::to_string),
            stop: stop.map(str::to_string),
        }
    }

    #[test]
    fn format_range_shows_open_end_for_final_track() {
        assert_eq!(
            format_range(&track(Some("00:00.00"), Some("03:30.12"))),
            "(00:00.00-03:30.12)"
        );
        assert_eq!(format_range(&track(Some("03:30.12"), None)), "(03:30.12-end)");
    }

    #[test]
    fn format_range_flags_missing_start() {
        assert_eq!(format_range(&track(None, None)), "(no start time)");
    }
}
