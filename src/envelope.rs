//! Single-line JSON status envelopes.
//!
//! Every invocation writes exactly one of:
//!
//! ```text
//! {"status":"OK","content":<payload>}
//! {"status":"ERROR","content":{"exception":"<kind>","message":"<text>"}}
//! ```

use serde::Serialize;

use crate::error::{ExtractError, Result};

/// The outcome of one operation, as written to standard output.
#[derive(Debug, Serialize)]
#[serde(tag = "status", content = "content")]
pub enum Envelope<'a, T> {
    #[serde(rename = "OK")]
    Ok(&'a T),
    #[serde(rename = "ERROR")]
    Error(ErrorContent),
}

/// Payload of an error envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorContent {
    pub exception: &'static str,
    pub message: String,
}

impl From<&ExtractError> for ErrorContent {
    fn from(err: &ExtractError) -> Self {
        Self {
            exception: err.kind().name(),
            message: err.to_string(),
        }
    }
}

/// Encode a successful payload, or fail with a `SerializationError` naming
/// the payload type.
pub fn render_ok<T: Serialize>(content: &T) -> Result<String> {
    serde_json::to_string(&Envelope::Ok(content)).map_err(|e| {
        ExtractError::serialization(format!(
            "Data type {} is not JSON serializable: {}",
            std::any::type_name::<T>(),
            e
        ))
    })
}

/// Encode an error envelope.
pub fn render_error(err: &ExtractError) -> String {
    let content = ErrorContent::from(err);
    match serde_json::to_string(&Envelope::<'_, ()>::Error(content.clone())) {
        Ok(line) => line,
        Err(_) => serde_json::json!({
            "status": "ERROR",
            "content": { "exception": content.exception, "message": content.message },
        })
        .to_string(),
    }
}

/// Encode either outcome. A payload that fails to serialize produces an
/// error envelope instead of partial output.
pub fn render<T: Serialize>(result: &Result<T>) -> String {
    match result {
        Ok(content) => render_ok(content).unwrap_or_else(|err| render_error(&err)),
        Err(err) => render_error(err),
    }
}
