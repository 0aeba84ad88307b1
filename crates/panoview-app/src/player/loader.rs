//! Background decode worker: one thread per player attach, result handed
//! back over a bounded channel.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::{Receiver, TryRecvError, bounded};

use crate::media::video::{self, MAX_PREDECODE_SECS, MediaError};
use crate::media::VideoClip;

pub enum LoadOutcome {
    Ready(VideoClip),
    Failed(MediaError),
}

pub struct ClipLoader {
    rx: Receiver<LoadOutcome>,
    cancel: Arc<AtomicBool>,
}

impl ClipLoader {
    pub fn spawn(path: PathBuf) -> Self {
        let (tx, rx) = bounded(1);
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = cancel.clone();
        let spawned = std::thread::Builder::new()
            .name("clip-decode".into())
            .spawn(move || {
                let outcome = decode_job(&path, &flag);
                if !flag.load(Ordering::Relaxed) {
                    let _ = tx.send(outcome);
                }
            });
        if let Err(e) = spawned {
            log::error!("could not spawn decode worker: {e}");
        }
        Self { rx, cancel }
    }

    /// Non-blocking: the outcome once the worker finishes, or a failure if
    /// the worker died without reporting.
    pub fn poll(&self) -> Option<LoadOutcome> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(LoadOutcome::Failed(MediaError::Decode(
                "decode worker exited without a result".into(),
            ))),
        }
    }

    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}

impl Drop for ClipLoader {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn decode_job(path: &Path, cancel: &AtomicBool) -> LoadOutcome {
    if !video::ffmpeg_available() {
        return LoadOutcome::Failed(MediaError::FfmpegUnavailable);
    }
    let meta = match video::probe(path) {
        Ok(meta) => meta,
        Err(e) => return LoadOutcome::Failed(e),
    };
    if meta.duration_secs > MAX_PREDECODE_SECS {
        return LoadOutcome::Failed(MediaError::TooLong {
            actual: meta.duration_secs,
            max: MAX_PREDECODE_SECS,
        });
    }
    if cancel.load(Ordering::Relaxed) {
        return LoadOutcome::Failed(MediaError::Decode("cancelled".into()));
    }
    match video::decode_all_frames(path, &meta, cancel) {
        Ok(frames) => LoadOutcome::Ready(VideoClip::new(&meta, frames)),
        Err(e) => LoadOutcome::Failed(e),
    }
}
