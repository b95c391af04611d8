use encoding_rs::{Encoding, UTF_8, WINDOWS_1251};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::Result;
use crate::error::Error;
use crate::types::{CueSheet, HeaderTags, TrackRecord};

/// One classified line of a cue document. Lines that match none of these
/// shapes (REM COMMENT, INDEX 00, unquoted titles, ...) are dropped during
/// classification.
#[derive(Debug, Clone, PartialEq, Eq)]
enum CueLine {
    File(String),
    Track(String),
    Title(String),
    Performer(String),
    Index01(String),
    RemGenre(String),
    RemDate(String),
    RemDiscId(String),
}

pub(crate) fn resolve_encoding(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.as_bytes())
        .ok_or_else(|| Error::Usage(format!("unsupported cue encoding: {}", label)))
}

pub(crate) fn parse_cue_file(
    path: &Path,
    encoding: Option<&'static Encoding>,
) -> Result<(CueSheet, &'static Encoding, bool)> {
    if !path.is_file() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    let contents =
        fs::read(path).map_err(|err| Error::parse(path, err.to_string()))?;
    let (encoding, autodetected) = match encoding {
        Some(enc) => (enc, false),
        None => (detect_cue_encoding(&contents), true),
    };
    let (decoded, _, _) = encoding.decode(&contents);
    let sheet = parse_cue(&decoded).map_err(|reason| Error::parse(path, reason))?;
    Ok((sheet, encoding, autodetected))
}

fn detect_cue_encoding(bytes: &[u8]) -> &'static Encoding {
    if std::str::from_utf8(bytes).is_ok() {
        UTF_8
    } else {
        WINDOWS_1251
    }
}

/// Parse a whole cue document into per-track records.
///
/// The document must reference exactly one audio file and contain at least
/// one audio track marker. Header tags before the first marker become
/// defaults for every track; a track's own TITLE/PERFORMER win over them.
pub(crate) fn parse_cue(document: &str) -> std::result::Result<CueSheet, String> {
    let lines = classify_lines(document);

    let mut files = lines.iter().filter_map(|line| match line {
        CueLine::File(name) => Some(name.as_str()),
        _ => None,
    });
    let audio_file = match (files.next(), files.next()) {
        (Some(name), None) => name.to_string(),
        (None, _) => return Err("no audio file referenced".to_string()),
        (Some(_), Some(_)) => {
            return Err("more than one audio file referenced".to_string());
        }
    };

    let markers: Vec<(usize, &str)> = lines
        .iter()
        .enumerate()
        .filter_map(|(idx, line)| match line {
            CueLine::Track(number) => Some((idx, number.as_str())),
            _ => None,
        })
        .collect();
    if markers.is_empty() {
        return Err("no tracks found".to_string());
    }

    let header = scan_header(&lines[..markers[0].0]);

    // A track's end boundary is only knowable from its successor, so the walk
    // runs in reverse, carrying the start time seen one step earlier.
    let mut tracks = BTreeMap::new();
    let mut next_start: Option<String> = None;
    for idx in (0..markers.len()).rev() {
        let (begin, number) = markers[idx];
        let end = markers
            .get(idx + 1)
            .map(|(pos, _)| *pos)
            .unwrap_or(lines.len());
        let fields = scan_track(&lines[begin + 1..end]);
        let start = fields.start.as_deref().map(normalize_time);
        let stop = next_start.take();
        next_start = start.clone();
        tracks.insert(
            number.to_string(),
            merge_track(number, &header, fields, start, stop),
        );
    }

    Ok(CueSheet { audio_file, tracks })
}

fn classify_lines(document: &str) -> Vec<CueLine> {
    document.lines().filter_map(classify_line).collect()
}

fn classify_line(raw: &str) -> Option<CueLine> {
    let line = raw.trim();
    if let Some(rest) = keyword(line, "FILE") {
        return Some(CueLine::File(quoted(rest)?));
    }
    if let Some(rest) = keyword(line, "TRACK") {
        let mut parts = rest.split_whitespace();
        let number = parts.next()?;
        let mode = parts.next()?;
        if !mode.eq_ignore_ascii_case("AUDIO") {
            return None;
        }
        return Some(CueLine::Track(number.to_string()));
    }
    if let Some(rest) = keyword(line, "TITLE") {
        return Some(CueLine::Title(quoted(rest)?));
    }
    if let Some(rest) = keyword(line, "PERFORMER") {
        return Some(CueLine::Performer(quoted(rest)?));
    }
    if let Some(rest) = keyword(line, "INDEX") {
        let time = keyword(rest, "01")?;
        return Some(CueLine::Index01(time.to_string()));
    }
    if let Some(rest) = keyword(line, "REM") {
        if let Some(value) = keyword(rest, "GENRE") {
            return Some(CueLine::RemGenre(value.to_string()));
        }
        if let Some(value) = keyword(rest, "DATE") {
            return Some(CueLine::RemDate(value.to_string()));
        }
        if let Some(value) = keyword(rest, "DISCID") {
            return Some(CueLine::RemDiscId(value.to_string()));
        }
    }
    None
}

/// Strip a leading keyword (ASCII case-insensitive) followed by whitespace,
/// returning the trimmed remainder.
fn keyword<'a>(line: &'a str, word: &str) -> Option<&'a str> {
    let head = line.get(..word.len())?;
    if !head.eq_ignore_ascii_case(word) {
        return None;
    }
    let rest = &line[word.len()..];
    if !rest.starts_with(|ch: char| ch.is_whitespace()) {
        return None;
    }
    Some(rest.trim())
}

/// Text between the first and last double quote. Unquoted or empty values
/// don't count as a match.
fn quoted(value: &str) -> Option<String> {
    let open = value.find('"')?;
    let rest = &value[open + 1..];
    let close = rest.rfind('"')?;
    if close == 0 {
        return None;
    }
    Some(rest[..close].to_string())
}

fn scan_header(lines: &[CueLine]) -> HeaderTags {
    let mut tags = HeaderTags::default();
    for line in lines {
        match line {
            CueLine::RemGenre(value) => set_if_unset(&mut tags.genre, value),
            CueLine::RemDate(value) => set_if_unset(&mut tags.year, value),
            CueLine::RemDiscId(value) => set_if_unset(&mut tags.disc_id, value),
            CueLine::Performer(value) => set_if_unset(&mut tags.performer, value),
            CueLine::Title(value) => set_if_unset(&mut tags.album, value),
            _ => {}
        }
    }
    tags
}

#[derive(Debug, Default)]
struct TrackFields {
    title: Option<String>,
    performer: Option<String>,
    start: Option<String>,
}

fn scan_track(lines: &[CueLine]) -> TrackFields {
    let mut fields = TrackFields::default();
    for line in lines {
        match line {
            CueLine::Title(value) => set_if_unset(&mut fields.title, value),
            CueLine::Performer(value) => set_if_unset(&mut fields.performer, value),
            CueLine::Index01(value) => set_if_unset(&mut fields.start, value),
            _ => {}
        }
    }
    fields
}

// First occurrence wins.
fn set_if_unset(slot: &mut Option<String>, value: &str) {
    if slot.is_none() {
        *slot = Some(value.to_string());
    }
}

/// Header defaults fill fields with no per-track source; the track's own
/// title and performer take precedence.
fn merge_track(
    number: &str,
    header: &HeaderTags,
    fields: TrackFields,
    start: Option<String>,
    stop: Option<String>,
) -> TrackRecord {
    TrackRecord {
        number: number.to_string(),
        title: fields.title,
        performer: fields.performer.or_else(|| header.performer.clone()),
        album: header.album.clone(),
        genre: header.genre.clone(),
        year: header.year.clone(),
        disc_id: header.disc_id.clone(),
        start,
        stop,
    }
}

/// `MM:SS:FF` becomes `MM:SS.FF`: only the separator after the first two
/// colon-delimited groups changes. Values not shaped like three
/// colon-delimited fields pass through untouched.
pub(crate) fn normalize_time(time: &str) -> String {
    let mut parts = time.splitn(3, ':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(minutes), Some(seconds), Some(frames)) => {
            format!("{}:{}.{}", minutes, seconds, frames)
        }
        _ => time.to_string(),
    }
}
