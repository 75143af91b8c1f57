use crate::core::credentials::{Credentials, PRACTICUM_TOKEN};
use crate::core::error::BotError;
use crate::core::models::{Cursor, StatusUpdate};
use crate::core::notifications::{deliver, TelegramNotifier};
use crate::core::settings::Settings;
use crate::core::validate::{check_response, parse_status};
use crate::providers::{PracticumClient, StatusSource};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
struct CheckOutput {
    from_date: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    current_date: Option<i64>,
    homeworks: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    update: Option<StatusUpdate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    delivered: Option<bool>,
    #[serde(with = "chrono::serde::ts_seconds")]
    fetched_at: DateTime<Utc>,
}

pub async fn run(settings: &Settings, json: bool, from_date: Option<i64>, send: bool) -> Result<()> {
    let credentials = Credentials::from_env();
    let cursor = Cursor(from_date.unwrap_or(settings.polling.initial_cursor));

    let token = credentials
        .practicum_token
        .clone()
        .with_context(|| format!("{} is not set", PRACTICUM_TOKEN))?;
    let source = PracticumClient::new(&settings.api, token)?;

    let mut output = match source.fetch(cursor).await {
        Ok(response) => summarize(cursor, &response),
        Err(e) => failed(cursor, &e),
    };

    if send {
        if let Some(message) = &output.message {
            let credentials = credentials.require()?;
            let notifier = TelegramNotifier::new(
                &settings.telegram,
                &credentials.telegram_token,
                credentials.telegram_chat_id,
            )?;
            output.delivered = Some(deliver(&notifier, message).await);
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_text_output(&output);
    }

    Ok(())
}

fn summarize(cursor: Cursor, response: &Value) -> CheckOutput {
    let mut output = CheckOutput {
        from_date: cursor.timestamp(),
        current_date: Cursor::next_from(response).map(|c| c.timestamp()),
        homeworks: 0,
        update: None,
        message: None,
        error: None,
        delivered: None,
        fetched_at: Utc::now(),
    };

    let result = check_response(response).and_then(|homeworks| {
        output.homeworks = homeworks.len();
        homeworks.first().map(parse_status).transpose()
    });

    match result {
        Ok(update) => {
            output.message = update.as_ref().map(StatusUpdate::message);
            output.update = update;
        }
        Err(e) => output.error = Some(e.to_string()),
    }

    output
}

fn failed(cursor: Cursor, error: &BotError) -> CheckOutput {
    CheckOutput {
        from_date: cursor.timestamp(),
        current_date: None,
        homeworks: 0,
        update: None,
        message: None,
        error: Some(error.to_string()),
        delivered: None,
        fetched_at: Utc::now(),
    }
}

fn format_timestamp(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

fn print_text_output(output: &CheckOutput) {
    println!("Homework status since {}", format_timestamp(output.from_date));

    if let Some(error) = &output.error {
        println!("  Error: {}", error);
        return;
    }

    println!("  Submissions: {}", output.homeworks);
    if let Some(current) = output.current_date {
        println!("  Next cursor: {} ({})", current, format_timestamp(current));
    }

    match &output.message {
        Some(message) => println!("  {}", message),
        None => println!("  No homework submissions in this period"),
    }

    if let Some(delivered) = output.delivered {
        println!("  Sent to Telegram: {}", if delivered { "yes" } else { "no" });
    }
}
