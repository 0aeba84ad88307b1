//! Video probe and pre-decode via ffmpeg subprocesses.
//!
//! - `ffprobe` reads metadata (dimensions, fps, duration) synchronously
//! - `ffmpeg -f rawvideo -pix_fmt rgba` decodes ALL frames to memory in one
//!   pass, giving the seek slider instant random access
//! - RAM cost: ~3.7MB per frame at 1280x720, so clips are capped at
//!   [`MAX_PREDECODE_SECS`]

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

use super::types::DecodedFrame;

/// Maximum clip duration (seconds) accepted for pre-decode.
pub const MAX_PREDECODE_SECS: f64 = 60.0;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("no video source supplied")]
    MissingSource,
    #[error("ffmpeg/ffprobe not found on PATH")]
    FfmpegUnavailable,
    #[error("probe failed: {0}")]
    Probe(String),
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("clip is {actual:.0}s long, over the {max:.0}s pre-decode cap")]
    TooLong { actual: f64, max: f64 },
    #[error("decoded zero frames")]
    NoFrames,
}

/// Check if ffmpeg/ffprobe are available on the system. Cached per process.
pub fn ffmpeg_available() -> bool {
    static AVAILABLE: OnceLock<bool> = OnceLock::new();
    *AVAILABLE.get_or_init(|| {
        Command::new("ffprobe")
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    })
}

/// Video metadata from ffprobe.
#[derive(Debug, Clone)]
pub struct VideoMeta {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub duration_secs: f64,
}

/// Probe video metadata using ffprobe.
pub fn probe(path: &Path) -> Result<VideoMeta, MediaError> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .map_err(|e| MediaError::Probe(format!("ffprobe did not run: {e}")))?;

    if !output.status.success() {
        return Err(MediaError::Probe(format!(
            "ffprobe rejected {}",
            path.display()
        )));
    }

    let json: serde_json::Value = serde_json::from_slice(&output.stdout)
        .map_err(|e| MediaError::Probe(format!("unparseable ffprobe output: {e}")))?;
    parse_probe_output(&json)
}

/// Extract the fields we need from ffprobe's JSON document.
fn parse_probe_output(json: &serde_json::Value) -> Result<VideoMeta, MediaError> {
    let streams = json["streams"]
        .as_array()
        .ok_or_else(|| MediaError::Probe("no streams".into()))?;
    let video_stream = streams
        .iter()
        .find(|s| s["codec_type"].as_str() == Some("video"))
        .ok_or_else(|| MediaError::Probe("no video stream".into()))?;

    let width = video_stream["width"]
        .as_u64()
        .ok_or_else(|| MediaError::Probe("missing width".into()))? as u32;
    let height = video_stream["height"]
        .as_u64()
        .ok_or_else(|| MediaError::Probe("missing height".into()))? as u32;

    let fps = parse_frame_rate(video_stream["r_frame_rate"].as_str().unwrap_or("30/1"));

    // Container duration is more reliable than the stream's, but fall back.
    let duration_secs = json["format"]["duration"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .or_else(|| {
            video_stream["duration"]
                .as_str()
                .and_then(|s| s.parse::<f64>().ok())
        })
        .unwrap_or(0.0);

    Ok(VideoMeta {
        width,
        height,
        fps,
        duration_secs,
    })
}

/// Parse ffprobe's rational frame rate ("30000/1001") into frames per second.
fn parse_frame_rate(rate: &str) -> f64 {
    if let Some((num, den)) = rate.split_once('/') {
        let n: f64 = num.parse().unwrap_or(30.0);
        let d: f64 = den.parse().unwrap_or(1.0);
        if d > 0.0 { n / d } else { 30.0 }
    } else {
        rate.parse().unwrap_or(30.0)
    }
}

/// Pre-decode all frames via a single ffmpeg run.
///
/// `cancel` is checked between frame reads so a detached player's in-flight
/// decode stops early instead of filling memory nobody will look at.
pub fn decode_all_frames(
    path: &Path,
    meta: &VideoMeta,
    cancel: &AtomicBool,
) -> Result<Vec<DecodedFrame>, MediaError> {
    let frame_size = (meta.width as usize) * (meta.height as usize) * 4;
    let est_frames = (meta.duration_secs * meta.fps).ceil() as usize;
    log::info!(
        "pre-decoding {}: ~{} frames, ~{}MB",
        path.display(),
        est_frames,
        (est_frames * frame_size) / (1024 * 1024),
    );

    let mut child = Command::new("ffmpeg")
        .arg("-i")
        .arg(path)
        .args([
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", meta.width, meta.height),
            "-v",
            "quiet",
            "pipe:1",
        ])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| MediaError::Decode(format!("ffmpeg did not spawn: {e}")))?;

    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| MediaError::Decode("ffmpeg gave no stdout pipe".into()))?;

    let mut frames = Vec::with_capacity(est_frames);
    let mut buf = vec![0u8; frame_size];

    loop {
        if cancel.load(Ordering::Relaxed) {
            let _ = child.kill();
            let _ = child.wait();
            return Err(MediaError::Decode("cancelled".into()));
        }
        match stdout.read_exact(&mut buf) {
            Ok(()) => frames.push(DecodedFrame {
                data: buf.clone(),
                width: meta.width,
                height: meta.height,
            }),
            Err(_) => break, // EOF
        }
    }

    let _ = child.wait();

    if frames.is_empty() {
        return Err(MediaError::NoFrames);
    }

    log::info!(
        "decoded {} frames ({}MB)",
        frames.len(),
        (frames.len() * frame_size) / (1024 * 1024),
    );

    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_rate_rational() {
        assert!((parse_frame_rate("30/1") - 30.0).abs() < 1e-9);
        assert!((parse_frame_rate("30000/1001") - 29.97).abs() < 0.01);
        assert!((parse_frame_rate("25") - 25.0).abs() < 1e-9);
    }

    #[test]
    fn frame_rate_garbage_falls_back() {
        assert!((parse_frame_rate("x/y") - 30.0).abs() < 1e-9);
        assert!((parse_frame_rate("30/0") - 30.0).abs() < 1e-9);
        assert!((parse_frame_rate("") - 30.0).abs() < 1e-9);
    }

    #[test]
    fn probe_output_picks_video_stream() {
        let json: serde_json::Value = serde_json::from_str(
            r#"{
                "streams": [
                    {"codec_type": "audio"},
                    {"codec_type": "video", "width": 1920, "height": 960,
                     "r_frame_rate": "30/1", "duration": "12.5"}
                ],
                "format": {"duration": "12.0"}
            }"#,
        )
        .unwrap();
        let meta = parse_probe_output(&json).unwrap();
        assert_eq!(meta.width, 1920);
        assert_eq!(meta.height, 960);
        assert!((meta.fps - 30.0).abs() < 1e-9);
        // Container duration wins over the stream's.
        assert!((meta.duration_secs - 12.0).abs() < 1e-9);
    }

    #[test]
    fn probe_output_without_video_stream_errors() {
        let json: serde_json::Value =
            serde_json::from_str(r#"{"streams": [{"codec_type": "audio"}]}"#).unwrap();
        assert!(matches!(
            parse_probe_output(&json),
            Err(MediaError::Probe(_))
        ));
    }
}
