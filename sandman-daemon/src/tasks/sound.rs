//! Sound task
//!
//! Plays queued clips sequentially through an external player and applies
//! volume steps through the ALSA mixer.

use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::SoundConfig;
use crate::sound::SoundRequest;

/// Mixer step per volume command
const VOLUME_STEP: &str = "10%";

/// Arguments passed to `amixer` for a volume step
pub fn mixer_args(control: &str, up: bool) -> [String; 3] {
    let sign = if up { "+" } else { "-" };
    [
        "set".to_string(),
        control.to_string(),
        format!("{}{}", VOLUME_STEP, sign),
    ]
}

/// Sound task - runs until every `SoundPlayer` is dropped
pub async fn sound_task(mut rx: mpsc::UnboundedReceiver<SoundRequest>, config: SoundConfig) {
    info!("Sound task started");

    while let Some(request) = rx.recv().await {
        let mut command = match &request {
            SoundRequest::Play(path) => {
                debug!("Playing {}", path.display());
                let mut command = Command::new(&config.player);
                command.arg(path);
                command
            }
            SoundRequest::VolumeUp | SoundRequest::VolumeDown => {
                let up = request == SoundRequest::VolumeUp;
                let mut command = Command::new("amixer");
                command.args(mixer_args(&config.mixer_control, up));
                command
            }
        };

        match command.output().await {
            Ok(output) if output.status.success() => {}
            Ok(output) => warn!("{:?} exited with {}", request, output.status),
            Err(e) => warn!("Failed to run sound command for {:?}: {}", request, e),
        }
    }

    info!("Sound task stopped");
}
