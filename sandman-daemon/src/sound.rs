//! Sound front end
//!
//! [`SoundPlayer`] implements the dispatcher's `Sound` interface by
//! queueing requests for the sound task, which plays clips one at a time
//! and runs the mixer for volume changes.

use std::path::{Path, PathBuf};

use sandman_core::traits::Sound;
use tokio::sync::mpsc;
use tracing::warn;

/// Request handled by the sound task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundRequest {
    Play(PathBuf),
    VolumeUp,
    VolumeDown,
}

/// Cloneable handle for queueing sound requests
#[derive(Debug, Clone)]
pub struct SoundPlayer {
    tx: mpsc::UnboundedSender<SoundRequest>,
}

impl SoundPlayer {
    /// Create a player and the receiver the sound task drains
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SoundRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, request: SoundRequest) {
        if self.tx.send(request).is_err() {
            warn!("Sound task is gone; request dropped");
        }
    }
}

impl Sound for SoundPlayer {
    fn enqueue_clip(&mut self, path: &Path) {
        self.send(SoundRequest::Play(path.to_path_buf()));
    }

    fn increase_volume(&mut self) {
        self.send(SoundRequest::VolumeUp);
    }

    fn decrease_volume(&mut self) {
        self.send(SoundRequest::VolumeDown);
    }
}
