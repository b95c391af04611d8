use crate::cue::{normalize_time, parse_cue};
use crate::encoder::{EncoderProfile, output_folder, output_path};
use crate::types::OutputFormat;
use std::path::Path;

const TWO_TRACK_CUE: &str = r#"REM GENRE Rock
REM DATE 2000
REM DISCID 860B640B
PERFORMER "Band"
TITLE "Test"
FILE "album.flac" WAVE
  TRACK 01 AUDIO
    TITLE "Intro"
    INDEX 01 00:00:00
  TRACK 02 AUDIO
    TITLE "Song"
    PERFORMER "Guest"
    INDEX 01 03:30:12
"#;

#[test]
fn parse_cue_returns_one_record_per_marker_in_order() {
    let sheet = parse_cue(TWO_TRACK_CUE).unwrap();
    assert_eq!(sheet.audio_file, "album.flac");
    let numbers: Vec<&str> = sheet.tracks.keys().map(String::as_str).collect();
    assert_eq!(numbers, ["01", "02"]);
}

#[test]
fn each_stop_equals_the_next_start_and_the_last_is_open() {
    let sheet = parse_cue(TWO_TRACK_CUE).unwrap();
    let tracks: Vec<_> = sheet.tracks.values().collect();
    assert_eq!(tracks[0].start.as_deref(), Some("00:00.00"));
    assert_eq!(tracks[0].stop.as_deref(), Some("03:30.12"));
    assert_eq!(tracks[1].start.as_deref(), Some("03:30.12"));
    assert_eq!(tracks[1].stop, None);
}

#[test]
fn header_tags_become_defaults_without_overriding_track_fields() {
    let sheet = parse_cue(TWO_TRACK_CUE).unwrap();
    let tracks: Vec<_> = sheet.tracks.values().collect();

    assert_eq!(tracks[0].title.as_deref(), Some("Intro"));
    assert_eq!(tracks[0].performer.as_deref(), Some("Band"));
    assert_eq!(tracks[1].performer.as_deref(), Some("Guest"));

    for track in &tracks {
        assert_eq!(track.album.as_deref(), Some("Test"));
        assert_eq!(track.genre.as_deref(), Some("Rock"));
        assert_eq!(track.year.as_deref(), Some("2000"));
        assert_eq!(track.disc_id.as_deref(), Some("860B640B"));
    }
}

#[test]
fn first_header_occurrence_wins() {
    let cue = r#"REM DATE 2000
REM DATE 1999
TITLE "First"
TITLE "Second"
FILE "album.flac" WAVE
  TRACK 01 AUDIO
    INDEX 01 00:00:00
"#;
    let sheet = parse_cue(cue).unwrap();
    let track = sheet.last_track().unwrap();
    assert_eq!(track.year.as_deref(), Some("2000"));
    assert_eq!(track.album.as_deref(), Some("First"));
}

#[test]
fn header_scan_stops_at_the_first_track_marker() {
    let cue = r#"FILE "album.flac" WAVE
  TRACK 01 AUDIO
    TITLE "Not The Album"
    INDEX 01 00:00:00
"#;
    let sheet = parse_cue(cue).unwrap();
    let track = sheet.last_track().unwrap();
    assert_eq!(track.album, None);
    assert_eq!(track.title.as_deref(), Some("Not The Album"));
}

#[test]
fn normalize_time_replaces_only_the_final_separator() {
    assert_eq!(normalize_time("01:23:45"), "01:23.45");
    assert_eq!(normalize_time("00:00:00"), "00:00.00");
    assert_eq!(normalize_time("74:59"), "74:59");
    assert_eq!(normalize_time(""), "");
}

#[test]
fn zero_track_documents_fail_to_parse() {
    let cue = r#"TITLE "Test"
FILE "album.flac" WAVE
"#;
    assert!(parse_cue(cue).is_err());
}

#[test]
fn missing_or_duplicate_file_references_fail_to_parse() {
    let no_file = r#"TITLE "Test"
  TRACK 01 AUDIO
    INDEX 01 00:00:00
"#;
    assert!(parse_cue(no_file).is_err());

    let two_files = r#"FILE "a.flac" WAVE
FILE "b.flac" WAVE
  TRACK 01 AUDIO
    INDEX 01 00:00:00
"#;
    assert!(parse_cue(two_files).is_err());
}

#[test]
fn missing_index_leaves_start_unset() {
    let cue = r#"FILE "album.flac" WAVE
  TRACK 01 AUDIO
    TITLE "No Start"
  TRACK 02 AUDIO
    INDEX 01 01:00:00
"#;
    let sheet = parse_cue(cue).unwrap();
    let tracks: Vec<_> = sheet.tracks.values().collect();
    assert_eq!(tracks[0].start, None);
    assert_eq!(tracks[0].stop.as_deref(), Some("01:00.00"));
}

#[test]
fn crlf_documents_parse_like_lf_ones() {
    let crlf = TWO_TRACK_CUE.replace('\n', "\r\n");
    let sheet = parse_cue(&crlf).unwrap();
    assert_eq!(sheet.tracks.len(), 2);
    let track = sheet.last_track().unwrap();
    assert_eq!(track.start.as_deref(), Some("03:30.12"));
}

#[test]
fn two_track_album_resolves_the_documented_output_paths() {
    let sheet = parse_cue(TWO_TRACK_CUE).unwrap();
    let folder = output_folder(&sheet).unwrap();
    assert_eq!(folder, Path::new("2000 - Test"));

    let profile = EncoderProfile::for_format(OutputFormat::Flac, None);
    let tracks: Vec<_> = sheet.tracks.values().collect();
    assert_eq!(
        output_path(tracks[0], Some(&folder), profile.extension),
        Path::new("2000 - Test/01 - Intro.flac")
    );
    assert_eq!(
        output_path(tracks[1], Some(&folder), profile.extension),
        Path::new("2000 - Test/02 - Song.flac")
    );
}
