//! Request DTOs for the recorder API
//!
//! Defines the structure of incoming request bodies and query strings.

use serde::Deserialize;
use serde_json::Value;

use crate::recorder::Payload;

/// Request body for POST /store
///
/// `data` may be a string, an integer, a float, or an array of bytes.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreRequest {
    pub data: Value,
}

impl StoreRequest {
    /// Converts the JSON value into a storable payload.
    ///
    /// Returns an error message for unsupported shapes.
    pub fn into_payload(self) -> Result<Payload, String> {
        match self.data {
            Value::String(s) => Ok(Payload::Text(s)),
            Value::Number(n) => n
                .as_i64()
                .map(Payload::Int)
                .or_else(|| n.as_f64().map(Payload::Float))
                .ok_or_else(|| format!("unsupported number {}", n)),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_u64()
                        .and_then(|b| u8::try_from(b).ok())
                        .ok_or_else(|| "byte arrays may only contain values 0-255".to_string())
                })
                .collect::<Result<Vec<u8>, String>>()
                .map(Payload::Bytes),
            other => Err(format!(
                "data must be a string, number, or byte array, got {}",
                other
            )),
        }
    }
}

/// How GET /get/:key decodes the stored value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadAs {
    #[default]
    Raw,
    Str,
    Int,
    Float,
}

/// Query string for GET /get/:key
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetQuery {
    #[serde(default, rename = "as")]
    pub read_as: ReadAs,
}

/// Query string for GET /page
#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    pub url: String,
}

impl PageQuery {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.url.trim().is_empty() {
            return Some("url cannot be empty".to_string());
        }
        None
    }
}
