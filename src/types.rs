use std::collections::BTreeMap;

use crate::encoder::sanitize_filename;

/// Album-level tags scanned from the region before the first track marker.
/// Each is optional; a missing header tag simply leaves the field unset on
/// every track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct HeaderTags {
    pub(crate) genre: Option<String>,
    pub(crate) year: Option<String>,
    pub(crate) disc_id: Option<String>,
    pub(crate) performer: Option<String>,
    pub(crate) album: Option<String>,
}

/// Fully resolved tag and time data for one track.
///
/// `start` comes from the track's own INDEX 01 marker, already normalized to
/// `MM:SS.FF`. `stop` is the next track's start; the final track has none and
/// is encoded to the end of the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TrackRecord {
    pub(crate) number: String,
    pub(crate) title: Option<String>,
    pub(crate) performer: Option<String>,
    pub(crate) album: Option<String>,
    pub(crate) genre: Option<String>,
    pub(crate) year: Option<String>,
    pub(crate) disc_id: Option<String>,
    pub(crate) start: Option<String>,
    pub(crate) stop: Option<String>,
}

impl TrackRecord {
    /// Output filename for this track, e.g. `01 - Intro.flac`. Untitled
    /// tracks fall back to "Track".
    pub(crate) fn output_file_name(&self, extension: &str) -> String {
        let title = self.title.as_deref().unwrap_or("Track");
        format!(
            "{} - {}{}",
            sanitize_filename(&self.number),
            sanitize_filename(title),
            extension
        )
    }
}

/// Parse result for one cue document: the single referenced audio file and
/// the tracks keyed by their marker number, in document order.
#[derive(Debug, Clone)]
pub(crate) struct CueSheet {
    pub(crate) audio_file: String,
    pub(crate) tracks: BTreeMap<String, TrackRecord>,
}

impl CueSheet {
    pub(crate) fn last_track(&self) -> Option<&TrackRecord> {
        self.tracks.values().next_back()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    Flac,
    Mp3,
}

impl OutputFormat {
    pub(crate) fn parse_token(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("FLAC") {
            Some(Self::Flac)
        } else if token.eq_ignore_ascii_case("MP3") {
            Some(Self::Mp3)
        } else {
            None
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Flac => "FLAC",
            Self::Mp3 => "MP3",
        }
    }
}
