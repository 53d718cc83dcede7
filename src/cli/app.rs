//! Main app runner for sending one notification

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use crate::application::ports::ConfigStore;
use crate::application::{ActivationDelegate, ActivationRegistry, NotificationCenter};
use crate::domain::config::AppConfig;
use crate::domain::notification::NotificationOptions;
use crate::infrastructure::backend::{create_backend, BackendKind, BackendPreference};
use crate::infrastructure::config::XdgConfigStore;

use super::args::SendOptions;
use super::presenter::Presenter;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Send one notification, optionally waiting for its activation.
pub async fn run_send(
    options: SendOptions,
    preference: BackendPreference,
    config: AppConfig,
) -> ExitCode {
    let mut presenter = Presenter::new();

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let backend = match create_backend(
        preference,
        config.app_name_or_default(),
        config.timeout_ms_or_default(),
        events_tx,
    )
    .await
    {
        Ok((backend, kind)) => {
            presenter.info(&format!("Using {} backend", kind));
            if options.reply && kind == BackendKind::NotifyRust {
                presenter.warn("The notify-rust backend cannot carry inline reply text");
            }
            backend
        }
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let registry = Arc::new(ActivationRegistry::new());
    let delegate = Arc::new(ActivationDelegate::new(Arc::clone(&registry)));
    let center = NotificationCenter::new(backend, registry, delegate, events_rx);

    let notification = NotificationOptions {
        id: options.id,
        title: options.title,
        body: options.body,
        icon: options.icon,
        sound: options.sound.or(config.default_sound),
        has_reply: options.reply,
    };

    let (callback, activation) = if options.wait {
        let (tx, rx) = oneshot::channel::<(bool, String)>();
        let mut tx = Some(tx);
        let callback: crate::application::ActivationCallback =
            Box::new(move |is_reply, response| {
                if let Some(tx) = tx.take() {
                    let _ = tx.send((is_reply, response));
                }
            });
        (Some(callback), Some(rx))
    } else {
        (None, None)
    };

    let handle = center.notify(notification, callback).await;

    if !handle.is_active() {
        presenter.error("Failed to display notification");
        return ExitCode::from(EXIT_ERROR);
    }

    let Some(activation) = activation else {
        presenter.success("Notification sent");
        return ExitCode::from(EXIT_SUCCESS);
    };

    presenter.start_spinner("Waiting for activation...");

    let result = match options.wait_timeout {
        Some(secs) => match tokio::time::timeout(Duration::from_secs(secs), activation).await {
            Ok(result) => result,
            Err(_) => {
                presenter.spinner_fail("No activation before timeout");
                handle.close().await;
                return ExitCode::from(EXIT_ERROR);
            }
        },
        None => activation.await,
    };

    match result {
        Ok((is_reply, response)) => {
            if is_reply {
                presenter.spinner_success("Replied");
                presenter.output(&response);
            } else {
                presenter.spinner_success("Activated");
                presenter.output("clicked");
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(_) => {
            // The callback was dropped without firing; the notification was
            // dismissed or the backend went away.
            presenter.spinner_fail("Notification closed without activation");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Load and merge configuration from file and CLI.
///
/// Merge order: defaults < file < cli. Environment overrides arrive through
/// clap's env support on the individual arguments.
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|_| AppConfig::empty());

    AppConfig::defaults().merge(file_config).merge(cli_config)
}
