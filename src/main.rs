//! desk-notify CLI entry point

use std::process::ExitCode;

use clap::Parser;

use desk_notify::cli::{
    app::{load_merged_config, run_send, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
    SendOptions,
};
use desk_notify::domain::config::AppConfig;
use desk_notify::infrastructure::backend::BackendPreference;
use desk_notify::infrastructure::config::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();

    // Handle subcommands
    if let Some(Commands::Config { action }) = cli.command {
        let store = XdgConfigStore::new();
        if let Err(e) = handle_config_command(action, &store, &presenter).await {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
        return ExitCode::SUCCESS;
    }

    // Build CLI config from args
    let cli_config = AppConfig {
        app_name: cli.app_name.clone(),
        backend: cli.backend.clone(),
        default_sound: None, // Per-notification sound comes from --sound
        timeout_ms: cli.timeout,
    };

    // Merge config
    let config = load_merged_config(cli_config).await;

    // Parse backend preference
    let preference = match config.backend_or_default().parse::<BackendPreference>() {
        Ok(preference) => preference,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    let options = SendOptions {
        id: cli.id,
        title: cli.title,
        body: cli.body,
        icon: cli.icon,
        sound: cli.sound,
        reply: cli.reply,
        wait: cli.wait,
        wait_timeout: cli.wait_timeout,
    };

    run_send(options, preference, config).await
}
