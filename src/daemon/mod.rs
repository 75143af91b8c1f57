mod polling;

use crate::core::credentials::ValidatedCredentials;
use crate::core::notifications::TelegramNotifier;
use crate::core::settings::Settings;
use crate::providers::PracticumClient;
use anyhow::{Context, Result};
use std::future::Future;
use std::sync::Arc;

pub use polling::PollingLoop;

pub async fn run(settings: &Settings, credentials: ValidatedCredentials) -> Result<()> {
    tracing::info!("Starting homework-bot daemon");

    // Handlers must be in place before the first cycle blocks on the network.
    let shutdown = shutdown_signal()?;

    let source = Arc::new(PracticumClient::new(
        &settings.api,
        credentials.practicum_token,
    )?);
    let notifier = Arc::new(TelegramNotifier::new(
        &settings.telegram,
        &credentials.telegram_token,
        credentials.telegram_chat_id,
    )?);

    let mut poller = PollingLoop::new(&settings.polling, source, notifier);
    poller.run_until(shutdown).await;

    Ok(())
}

#[cfg(unix)]
fn shutdown_signal() -> Result<impl Future<Output = ()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt =
        signal(SignalKind::interrupt()).context("Failed to install SIGINT handler")?;
    let mut terminate =
        signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;

    Ok(async move {
        tokio::select! {
            _ = interrupt.recv() => tracing::info!("Received SIGINT, shutting down"),
            _ = terminate.recv() => tracing::info!("Received SIGTERM, shutting down"),
        }
    })
}

#[cfg(not(unix))]
fn shutdown_signal() -> Result<impl Future<Output = ()>> {
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = tx.send(());
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for Ctrl-C, running until killed")
            }
        }
    });

    Ok(async move {
        if rx.await.is_ok() {
            tracing::info!("Received Ctrl-C, shutting down");
        } else {
            std::future::pending::<()>().await;
        }
    })
}
