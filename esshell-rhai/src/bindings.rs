//! Rhai bindings for JSON values and shell utilities.

use crate::error::to_eval_error;
use esshell_client::{ClientError, JsonSerializer};
use rhai::{Dynamic, Engine, EvalAltResult, Map};
use serde_json::Value as JsonValue;

/// JSON bridge whose native values are Rhai [`Dynamic`]s.
///
/// Objects become object maps, arrays become arrays, `null` becomes unit.
#[derive(Debug, Clone, Copy, Default)]
pub struct RhaiJsonSerializer;

impl JsonSerializer for RhaiJsonSerializer {
    type Input = Dynamic;
    type Output = Dynamic;

    fn json_to_string(&self, json: &Dynamic, pretty: bool) -> esshell_client::Result<String> {
        let value =
            dynamic_to_json(json.clone()).map_err(|e| ClientError::validation(e.to_string()))?;
        let text = if pretty {
            serde_json::to_string_pretty(&value)?
        } else {
            serde_json::to_string(&value)?
        };
        Ok(text)
    }

    fn string_to_json(&self, text: &str) -> esshell_client::Result<Dynamic> {
        let value: JsonValue = serde_json::from_str(text)?;
        self.value_to_json(&value)
    }

    fn value_to_json(&self, value: &JsonValue) -> esshell_client::Result<Dynamic> {
        json_to_dynamic(value.clone()).map_err(|e| ClientError::validation(e.to_string()))
    }
}

/// Register the JSON and logging helpers.
pub fn register_utility_functions(engine: &mut Engine) {
    // JSON helpers
    engine.register_fn(
        "to_json",
        |data: Dynamic| -> Result<String, Box<EvalAltResult>> {
            let value = dynamic_to_json(data)?;
            serde_json::to_string(&value).map_err(to_eval_error)
        },
    );

    engine.register_fn(
        "to_json_pretty",
        |data: Dynamic| -> Result<String, Box<EvalAltResult>> {
            let value = dynamic_to_json(data)?;
            serde_json::to_string_pretty(&value).map_err(to_eval_error)
        },
    );

    engine.register_fn(
        "from_json",
        |text: &str| -> Result<Dynamic, Box<EvalAltResult>> {
            let value: JsonValue = serde_json::from_str(text).map_err(to_eval_error)?;
            json_to_dynamic(value)
        },
    );

    // Logging helpers
    engine.register_fn("log_info", |msg: &str| {
        tracing::info!("[script] {}", msg);
    });

    engine.register_fn("log_warn", |msg: &str| {
        tracing::warn!("[script] {}", msg);
    });

    engine.register_fn("log_error", |msg: &str| {
        tracing::error!("[script] {}", msg);
    });

    engine.register_fn("log_debug", |msg: &str| {
        tracing::debug!("[script] {}", msg);
    });
}

/// Convert a JSON value to a Rhai value.
pub fn json_to_dynamic(value: JsonValue) -> Result<Dynamic, Box<EvalAltResult>> {
    match value {
        JsonValue::Null => Ok(Dynamic::UNIT),
        JsonValue::Bool(b) => Ok(Dynamic::from(b)),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Dynamic::from(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Dynamic::from(f))
            } else {
                Err(to_eval_error("Invalid number"))
            }
        }
        JsonValue::String(s) => Ok(Dynamic::from(s)),
        JsonValue::Array(arr) => {
            let mut rhai_arr = rhai::Array::new();
            for item in arr {
                rhai_arr.push(json_to_dynamic(item)?);
            }
            Ok(Dynamic::from(rhai_arr))
        }
        JsonValue::Object(obj) => {
            let mut map = Map::new();
            for (key, val) in obj {
                map.insert(key.into(), json_to_dynamic(val)?);
            }
            Ok(Dynamic::from(map))
        }
    }
}

/// Convert a Rhai value to a JSON value.
pub fn dynamic_to_json(value: Dynamic) -> Result<JsonValue, Box<EvalAltResult>> {
    if value.is_unit() {
        return Ok(JsonValue::Null);
    }
    if let Ok(b) = value.as_bool() {
        return Ok(JsonValue::Bool(b));
    }
    if let Ok(i) = value.as_int() {
        return Ok(JsonValue::Number(i.into()));
    }
    if let Ok(f) = value.as_float() {
        return serde_json::Number::from_f64(f)
            .map(JsonValue::Number)
            .ok_or_else(|| to_eval_error("Invalid float"));
    }
    if let Ok(c) = value.as_char() {
        return Ok(JsonValue::String(c.to_string()));
    }
    if value.is_string() {
        return value
            .into_string()
            .map(JsonValue::String)
            .map_err(to_eval_error);
    }
    if value.is_array() {
        let arr = value.into_array().map_err(to_eval_error)?;
        let mut json_arr = Vec::with_capacity(arr.len());
        for item in arr {
            json_arr.push(dynamic_to_json(item)?);
        }
        return Ok(JsonValue::Array(json_arr));
    }
    if value.is_map() {
        let map = value
            .try_cast::<Map>()
            .ok_or_else(|| to_eval_error("Invalid object map"))?;
        let mut json_obj = serde_json::Map::new();
        for (key, val) in map {
            json_obj.insert(key.to_string(), dynamic_to_json(val)?);
        }
        return Ok(JsonValue::Object(json_obj));
    }

    // Anything else goes through its debug rendering
    Ok(JsonValue::String(format!("{:?}", value)))
}
