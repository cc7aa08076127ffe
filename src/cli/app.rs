//! App runners: configuration merging, controller wiring, timed recording

use std::env;
use std::process::ExitCode;
use std::time::{Duration as StdDuration, Instant};

use tokio::time::interval;

use crate::application::ports::{ConfigStore, ShareService};
use crate::application::RecordingSessionController;
use crate::domain::config::AppConfig;
use crate::domain::recording::EncodingConfig;
use crate::infrastructure::{create_share_service, DesktopAudioDevice, XdgConfigStore};

use super::args::RecordOptions;
use super::presenter::Presenter;
use super::signals::ShutdownSignal;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Environment override for the recordings directory
pub const RECORDINGS_DIR_ENV: &str = "AUDIO_MEMO_RECORDINGS_DIR";

/// Controller wired to the desktop adapters
pub type DesktopController = RecordingSessionController<DesktopAudioDevice, Box<dyn ShareService>>;

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let file_config = XdgConfigStore::new().load_or_empty().await;

    let env_config = AppConfig {
        recordings_dir: env::var(RECORDINGS_DIR_ENV).ok().filter(|s| !s.trim().is_empty()),
        ..Default::default()
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}

/// Build a controller for the merged configuration
pub fn build_controller(config: &AppConfig) -> DesktopController {
    let device = DesktopAudioDevice::new(config.recordings_dir_or_default());
    let share = create_share_service(config.share_target_or_default());
    let encoding = EncodingConfig::high_quality().with_container(config.container_or_default());

    RecordingSessionController::new(device, share, encoding)
}

/// Record for a fixed time, print the asset path, then optionally play and share
pub async fn run_record(config: AppConfig, options: RecordOptions) -> ExitCode {
    let mut presenter = Presenter::new();
    let controller = build_controller(&config);

    let shutdown = ShutdownSignal::new();
    shutdown.setup();

    let code = record_flow(&controller, &options, &shutdown, &mut presenter).await;
    controller.shutdown().await;
    ExitCode::from(code)
}

async fn record_flow(
    controller: &DesktopController,
    options: &RecordOptions,
    shutdown: &ShutdownSignal,
    presenter: &mut Presenter,
) -> u8 {
    if let Err(e) = controller.start_recording().await {
        presenter.error(&e.to_string());
        return EXIT_ERROR;
    }

    presenter.begin_recording(options.duration.as_millis());
    let start = Instant::now();
    let mut ticker = interval(StdDuration::from_millis(100));
    loop {
        ticker.tick().await;
        let elapsed = start.elapsed().as_millis() as u64;
        presenter.recording_progress(elapsed);
        if options.duration.is_reached(elapsed) || shutdown.is_shutdown() {
            break;
        }
    }

    if let Err(e) = controller.stop_recording().await {
        presenter.activity_failed(&e.to_string());
        return EXIT_ERROR;
    }
    let Some(asset) = controller.asset() else {
        presenter.activity_failed("No recording was produced");
        return EXIT_ERROR;
    };
    presenter.activity_done(&format!("Saved {}", asset.file_name()));
    presenter.output(&asset.path().display().to_string());

    if shutdown.is_shutdown() {
        return EXIT_SUCCESS;
    }

    if options.play {
        if let Err(e) = play_to_end(controller, shutdown, presenter).await {
            presenter.error(&e);
            return EXIT_ERROR;
        }
    }

    if options.share {
        match controller.share_recording().await {
            Ok(()) => presenter.success("Shared"),
            Err(e) => {
                presenter.error(&e.to_string());
                return EXIT_ERROR;
            }
        }
    }

    EXIT_SUCCESS
}

/// Play the current asset and wait for it to finish or for Ctrl-C
async fn play_to_end(
    controller: &DesktopController,
    shutdown: &ShutdownSignal,
    presenter: &mut Presenter,
) -> Result<(), String> {
    let mut updates = controller.subscribe();
    controller.play_recording().await.map_err(|e| e.to_string())?;
    presenter.begin_activity("Playing...");

    loop {
        if !updates.borrow_and_update().is_playing {
            presenter.activity_done("Playback finished");
            return Ok(());
        }

        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    presenter.clear_activity();
                    return Ok(());
                }
            }
            _ = shutdown.wait() => {
                controller.stop_playback().await.map_err(|e| e.to_string())?;
                presenter.activity_done("Playback stopped");
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::ShareTarget;
    use crate::domain::recording::Container;

    #[test]
    fn controller_uses_configured_container() {
        let config = AppConfig {
            container: Some("flac".to_string()),
            share_target: Some("none".to_string()),
            ..AppConfig::defaults()
        };
        let controller = build_controller(&config);

        assert_eq!(controller.encoding().container, Container::Flac);
        assert_eq!(controller.encoding().sample_rate, 48_000);
        assert!(!controller.state().is_recording);
        assert_eq!(config.share_target_or_default(), ShareTarget::None);
    }

    #[test]
    fn exit_codes_are_distinct() {
        assert_ne!(EXIT_SUCCESS, EXIT_ERROR);
        assert_ne!(EXIT_ERROR, EXIT_USAGE_ERROR);
    }
}
