//! JSON bridge between the shell's native values and engine JSON.

use crate::error::Result;
use serde_json::Value;

/// Converts between an embedding's native structured values and JSON.
///
/// `Input` is what the shell hands to the client (for example a request
/// body written as a script map); `Output` is what the client hands back.
/// Executors build responses as [`serde_json::Value`] and convert them once
/// through [`JsonSerializer::value_to_json`].
pub trait JsonSerializer: Send + Sync {
    /// Native value received from the shell.
    type Input;
    /// Native value returned to the shell.
    type Output;

    /// Render a native value as JSON text.
    fn json_to_string(&self, json: &Self::Input, pretty: bool) -> Result<String>;

    /// Parse JSON text into a native value.
    fn string_to_json(&self, text: &str) -> Result<Self::Output>;

    /// Convert an already-built JSON value into a native value.
    fn value_to_json(&self, value: &Value) -> Result<Self::Output> {
        self.string_to_json(&serde_json::to_string(value)?)
    }
}

/// Serializer whose native representation is [`serde_json::Value`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueSerializer;

impl JsonSerializer for ValueSerializer {
    type Input = Value;
    type Output = Value;

    fn json_to_string(&self, json: &Value, pretty: bool) -> Result<String> {
        let text = if pretty {
            serde_json::to_string_pretty(json)?
        } else {
            serde_json::to_string(json)?
        };
        Ok(text)
    }

    fn string_to_json(&self, text: &str) -> Result<Value> {
        Ok(serde_json::from_str(text)?)
    }

    fn value_to_json(&self, value: &Value) -> Result<Value> {
        Ok(value.clone())
    }
}
