use crate::core::error::{BotError, Result};
use crate::core::models::{Cursor, StatusUpdate};
use crate::core::notifications::{deliver, Notifier};
use crate::core::settings::PollingSettings;
use crate::core::validate::{check_response, parse_status};
use crate::providers::StatusSource;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug)]
#[allow(dead_code)]
pub enum CycleOutcome {
    Notified { message: String, delivered: bool },
    NoUpdates,
    Failed(BotError),
}

pub struct PollingLoop {
    source: Arc<dyn StatusSource>,
    notifier: Arc<dyn Notifier>,
    interval: Duration,
    report_errors: bool,
    cursor: Cursor,
}

impl PollingLoop {
    pub fn new(
        settings: &PollingSettings,
        source: Arc<dyn StatusSource>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            source,
            notifier,
            interval: settings.interval(),
            report_errors: settings.report_errors,
            cursor: Cursor(settings.initial_cursor),
        }
    }

    #[allow(dead_code)]
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Runs cycles separated by the polling interval until `shutdown` resolves.
    /// A cycle in progress always completes; shutdown is observed while sleeping.
    pub async fn run_until<F>(&mut self, shutdown: F) -> u64
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut cycles = 0u64;

        tracing::info!(
            source = self.source.name(),
            interval = ?self.interval,
            from_date = self.cursor.timestamp(),
            "Polling loop started"
        );

        loop {
            self.run_cycle().await;
            cycles += 1;

            tokio::select! {
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        tracing::info!(cycles, "Polling loop stopped");
        cycles
    }

    pub async fn run_cycle(&mut self) -> CycleOutcome {
        match self.poll().await {
            Ok((update, next_cursor)) => {
                match next_cursor {
                    Some(next) => {
                        tracing::debug!(
                            from = self.cursor.timestamp(),
                            to = next.timestamp(),
                            "Advancing cursor"
                        );
                        self.cursor = next;
                    }
                    None => tracing::warn!(
                        from_date = self.cursor.timestamp(),
                        "Response has no integer current_date, keeping cursor"
                    ),
                }

                match update {
                    Some(update) => {
                        let message = update.message();
                        tracing::info!(
                            homework = %update.homework_name,
                            status = update.status.code(),
                            "Homework status received"
                        );
                        let delivered = deliver(self.notifier.as_ref(), &message).await;
                        CycleOutcome::Notified { message, delivered }
                    }
                    None => {
                        tracing::info!("No homework submissions in this period");
                        CycleOutcome::NoUpdates
                    }
                }
            }
            Err(e) => {
                tracing::error!(kind = e.kind(), error = %e, "Polling cycle failed");
                if self.report_errors {
                    deliver(self.notifier.as_ref(), &failure_message(&e)).await;
                }
                CycleOutcome::Failed(e)
            }
        }
    }

    async fn poll(&self) -> Result<(Option<StatusUpdate>, Option<Cursor>)> {
        let response = self.source.fetch(self.cursor).await?;
        let homeworks = check_response(&response)?;

        let update = match homeworks.first() {
            Some(latest) => Some(parse_status(latest)?),
            None => None,
        };

        Ok((update, Cursor::next_from(&response)))
    }
}

fn failure_message(error: &BotError) -> String {
    format!("Сбой в работе программы: {}", error)
}
