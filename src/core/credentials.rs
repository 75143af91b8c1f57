use anyhow::Result;

pub const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

#[derive(Clone, Default)]
pub struct Credentials {
    pub practicum_token: Option<String>,
    pub telegram_token: Option<String>,
    pub telegram_chat_id: Option<String>,
}

/// Credentials with every value known to be present.
#[derive(Clone)]
pub struct ValidatedCredentials {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
}

fn redact(value: &Option<String>) -> &'static str {
    if value.is_some() {
        "<redacted>"
    } else {
        "<missing>"
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &redact(&self.practicum_token))
            .field("telegram_token", &redact(&self.telegram_token))
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}

impl std::fmt::Debug for ValidatedCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatedCredentials")
            .field("practicum_token", &"<redacted>")
            .field("telegram_token", &"<redacted>")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}

impl Credentials {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            practicum_token: read(PRACTICUM_TOKEN),
            telegram_token: read(TELEGRAM_TOKEN),
            telegram_chat_id: read(TELEGRAM_CHAT_ID),
        }
    }

    pub fn missing(&self) -> Vec<&'static str> {
        [
            (PRACTICUM_TOKEN, &self.practicum_token),
            (TELEGRAM_TOKEN, &self.telegram_token),
            (TELEGRAM_CHAT_ID, &self.telegram_chat_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect()
    }

    /// Logs every missing variable and reports whether all three are set.
    pub fn check_tokens(&self) -> bool {
        let missing = self.missing();
        for name in &missing {
            tracing::error!(variable = *name, "Required environment variable is missing");
        }
        missing.is_empty()
    }

    pub fn require(self) -> Result<ValidatedCredentials> {
        if !self.check_tokens() {
            anyhow::bail!(
                "Missing required environment variables: {}",
                self.missing().join(", ")
            );
        }

        match (self.practicum_token, self.telegram_token, self.telegram_chat_id) {
            (Some(practicum_token), Some(telegram_token), Some(telegram_chat_id)) => {
                Ok(ValidatedCredentials {
                    practicum_token,
                    telegram_token,
                    telegram_chat_id,
                })
            }
            _ => anyhow::bail!("Credentials changed during validation"),
        }
    }
}
