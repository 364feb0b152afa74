// Copyright 2024 - developers of the `botgram` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Video metadata probing and frame extraction.
//!
//! Both operations shell out to the `ffprobe` and `ffmpeg` executables,
//! which must be on the `PATH`. They run once per call, with no retry; a
//! failure aborts the builder chain that requested them.

use crate::types::Attachment;
use crate::utils;
use log::debug;
use serde::Deserialize;
use std::fmt;
use std::io;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;

/// Basic characteristics of a video file, as reported by `ffprobe`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VideoMeta {
    pub duration: Duration,
    pub width: u32,
    pub height: u32,
}

/// This error occurs when probing a video or extracting a frame fails.
#[derive(Debug)]
pub enum MediaError {
    /// The external tool could not be spawned (most likely, it is not
    /// installed).
    Io(io::Error),

    /// The tool ran and reported failure.
    Tool {
        status: Option<i32>,
        stderr: String,
    },

    /// The tool succeeded but its output could not be interpreted.
    Malformed(String),
}

impl std::error::Error for MediaError {}

impl fmt::Display for MediaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "media error, could not run tool: {err}"),
            Self::Tool { status, stderr } => match status {
                Some(code) => write!(f, "media error, tool exited with {code}: {}", stderr.trim()),
                None => write!(f, "media error, tool was killed: {}", stderr.trim()),
            },
            Self::Malformed(reason) => write!(f, "media error, bad tool output: {reason}"),
        }
    }
}

impl From<io::Error> for MediaError {
    fn from(error: io::Error) -> Self {
        Self::Io(error)
    }
}

#[derive(Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    #[serde(default)]
    format: Option<ProbeFormat>,
}

#[derive(Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
    // ffprobe prints durations as decimal strings, e.g. "12.512000".
    duration: Option<String>,
}

#[derive(Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

/// Inspects the first video stream of the file at `path`.
pub async fn probe(path: &Path) -> Result<VideoMeta, MediaError> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,duration",
            "-show_entries",
            "format=duration",
            "-print_format",
            "json",
        ])
        .arg(path)
        .output()
        .await?;

    if !output.status.success() {
        return Err(MediaError::Tool {
            status: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    parse_probe_output(&output.stdout)
}

/// Extracts a single still frame at `offset` into the video, returning it
/// as a temporary attachment whose file the owning request will remove
/// from disk once it is done.
pub async fn extract_frame(path: &Path, offset: Duration) -> Result<Attachment, MediaError> {
    let target = std::env::temp_dir().join(format!("botgram-thumb-{}.jpg", utils::generate_random_id()));

    let output = Command::new("ffmpeg")
        .args(["-y", "-loglevel", "error"])
        .args(["-ss", &format!("{:.3}", offset.as_secs_f64())])
        .arg("-i")
        .arg(path)
        .args(["-frames:v", "1"])
        .arg(&target)
        .output()
        .await?;

    if !output.status.success() {
        return Err(MediaError::Tool {
            status: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    debug!("extracted frame of {:?} into {:?}", path, target);
    Ok(Attachment::temporary("thumbnail", target))
}

fn parse_probe_output(stdout: &[u8]) -> Result<VideoMeta, MediaError> {
    let parsed: ProbeOutput =
        serde_json::from_slice(stdout).map_err(|e| MediaError::Malformed(e.to_string()))?;

    let stream = parsed
        .streams
        .into_iter()
        .next()
        .ok_or_else(|| MediaError::Malformed("no video stream".to_string()))?;

    // Some containers only report the duration at the format level.
    let duration = stream
        .duration
        .or(parsed.format.and_then(|format| format.duration))
        .ok_or_else(|| MediaError::Malformed("no duration reported".to_string()))?;
    let duration = duration
        .parse::<f64>()
        .map_err(|_| MediaError::Malformed(format!("bad duration {duration:?}")))?;

    match (stream.width, stream.height) {
        (Some(width), Some(height)) => Ok(VideoMeta {
            duration: Duration::from_secs_f64(duration.max(0.0)),
            width,
            height,
        }),
        _ => Err(MediaError::Malformed("no frame dimensions".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_probe_parsing() {
        let meta = parse_probe_output(
            br#"{
                "streams": [{"width": 1280, "height": 720, "duration": "12.512000"}],
                "format": {"duration": "12.550000"}
            }"#,
        )
        .unwrap();

        assert_eq!(meta.width, 1280);
        assert_eq!(meta.height, 720);
        assert_eq!(meta.duration, Duration::from_secs_f64(12.512));
    }

    #[test]
    fn check_probe_parsing_format_fallback() {
        // Streams in e.g. webm containers carry no per-stream duration.
        let meta = parse_probe_output(
            br#"{
                "streams": [{"width": 640, "height": 360}],
                "format": {"duration": "3.000000"}
            }"#,
        )
        .unwrap();

        assert_eq!(meta.duration, Duration::from_secs(3));
    }

    #[test]
    fn check_probe_parsing_rejects_audio_only() {
        let error = parse_probe_output(br#"{"streams": [], "format": {"duration": "3.0"}}"#);
        assert!(matches!(error, Err(MediaError::Malformed(_))));
    }

    #[test]
    fn check_probe_parsing_rejects_garbage() {
        assert!(matches!(
            parse_probe_output(b"not json"),
            Err(MediaError::Malformed(_))
        ));
        assert!(matches!(
            parse_probe_output(br#"{"streams": [{"width": 1, "height": 1, "duration": "nan?"}]}"#),
            Err(MediaError::Malformed(_))
        ));
    }
}
