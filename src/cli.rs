use clap::Parser;
use std::path::PathBuf;

use crate::Result;
use crate::error::Error;
use crate::types::OutputFormat;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub(crate) struct Args {
    /// Output format (FLAC or MP3), or the cue sheet path when it is the
    /// only positional argument.
    #[arg(value_name = "FORMAT|CUEFILE")]
    pub(crate) first: String,
    /// Cue sheet path.
    #[arg(value_name = "CUEFILE")]
    pub(crate) second: Option<String>,
    /// Skip the confirmation prompt.
    #[arg(short = 'y', long)]
    pub(crate) yes: bool,
    /// Force the cue sheet text encoding instead of autodetecting it.
    #[arg(long, value_name = "ENCODING")]
    pub(crate) cue_encoding: Option<String>,
    /// Encoder program to invoke instead of ffmpeg.
    #[arg(long, value_name = "PATH")]
    pub(crate) encoder: Option<PathBuf>,
}

#[derive(Debug)]
pub(crate) struct Invocation {
    pub(crate) format: OutputFormat,
    pub(crate) cue_path: PathBuf,
}

/// With a single positional the format defaults to FLAC and the positional
/// is the cue path; with two, the first must name a known format.
pub(crate) fn resolve_invocation(first: &str, second: Option<&str>) -> Result<Invocation> {
    match second {
        None => Ok(Invocation {
            format: OutputFormat::Flac,
            cue_path: PathBuf::from(first),
        }),
        Some(cue) => {
            let format = OutputFormat::parse_token(first).ok_or_else(|| {
                Error::Usage(format!("unknown format '{}', expected FLAC or MP3", first))
            })?;
            Ok(Invocation {
                format,
                cue_path: PathBuf::from(cue),
            })
        }
    }
}
