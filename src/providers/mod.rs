mod practicum;

use crate::core::error::Result;
use crate::core::models::Cursor;
use async_trait::async_trait;
use serde_json::Value;

pub use practicum::PracticumClient;

/// Source of raw homework status responses.
#[async_trait]
pub trait StatusSource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn fetch(&self, cursor: Cursor) -> Result<Value>;
}
