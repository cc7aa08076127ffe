//! audio-memo CLI entry point

use std::process::ExitCode;

use clap::Parser;

use audio_memo::cli::{
    app::{load_merged_config, run_record, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{Cli, Commands, RecordOptions},
    config_cmd::handle_config_command,
    logging::init_logging,
    presenter::Presenter,
    session_app::run_session,
};
use audio_memo::domain::config::{AppConfig, ShareTarget};
use audio_memo::domain::recording::{Container, Duration};
use audio_memo::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let presenter = Presenter::new();

    // Build CLI config from args
    let cli_config = AppConfig {
        recordings_dir: cli.recordings_dir.clone(),
        container: cli.container.map(|c| Container::from(c).to_string()),
        share_target: cli.share_target.map(|t| ShareTarget::from(t).to_string()),
        duration: None,
    };

    match cli.command {
        Some(Commands::Config { action }) => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
        Some(Commands::Record {
            duration,
            play,
            share,
        }) => {
            let config = load_merged_config(AppConfig {
                duration,
                ..cli_config
            })
            .await;

            let duration = match config.duration.as_ref() {
                Some(s) => match s.parse::<Duration>() {
                    Ok(d) => d,
                    Err(e) => {
                        presenter.error(&format!("Invalid duration: {}", e));
                        return ExitCode::from(EXIT_USAGE_ERROR);
                    }
                },
                None => Duration::default_duration(),
            };

            run_record(
                config,
                RecordOptions {
                    duration,
                    play,
                    share,
                },
            )
            .await
        }
        None => {
            let config = load_merged_config(cli_config).await;
            run_session(config).await
        }
    }
}
