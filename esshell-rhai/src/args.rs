//! Decoding script arguments into requests.
//!
//! No argument targets every index; strings and string arrays name
//! indices; a single object map is read as a complete request.

use crate::error::to_eval_error;
use esshell_client::{CloseIndexRequest, DeleteIndexRequest, Indices, OpenIndexRequest};
use rhai::{Dynamic, EvalAltResult};
use serde::de::DeserializeOwned;

type EvalResult<T> = Result<T, Box<EvalAltResult>>;

/// Index names from string and array arguments.
pub(crate) fn index_names(args: &[Dynamic]) -> EvalResult<Vec<String>> {
    let mut names = Vec::new();
    for arg in args {
        if arg.is_string() {
            names.push(arg.to_string());
        } else if arg.is_array() {
            let items = arg.clone().into_array().map_err(to_eval_error)?;
            for item in items {
                if !item.is_string() {
                    return Err(to_eval_error(format!(
                        "Expected an index name, got {}",
                        item.type_name()
                    )));
                }
                names.push(item.to_string());
            }
        } else {
            return Err(to_eval_error(format!(
                "Expected index names, got {}",
                arg.type_name()
            )));
        }
    }
    Ok(names)
}

/// A request passed as a single object map, if that is what the script did.
pub(crate) fn request_map<T: DeserializeOwned>(args: &[Dynamic]) -> Option<EvalResult<T>> {
    match args {
        [single] if single.is_map() => Some(rhai::serde::from_dynamic(single)),
        _ => None,
    }
}

/// A request from either form; names go through `build`.
pub(crate) fn targets<T, F>(args: &[Dynamic], build: F) -> EvalResult<T>
where
    T: DeserializeOwned,
    F: FnOnce(Indices) -> T,
{
    if let Some(request) = request_map(args) {
        return request;
    }
    Ok(build(Indices::of(index_names(args)?)))
}

/// Requests that name their target indices.
pub(crate) trait Targeted {
    fn indices(&self) -> &Indices;
}

macro_rules! targeted {
    ($($request:ty),* $(,)?) => {
        $(
            impl Targeted for $request {
                fn indices(&self) -> &Indices {
                    &self.indices
                }
            }
        )*
    };
}

targeted!(DeleteIndexRequest, OpenIndexRequest, CloseIndexRequest);

/// Like [`targets`], but at least one index must be named, in either form.
pub(crate) fn required_targets<T, F>(command: &str, args: &[Dynamic], build: F) -> EvalResult<T>
where
    T: DeserializeOwned + Targeted,
    F: FnOnce(Indices) -> T,
{
    let request = targets(args, build)?;
    if request.indices().names().is_empty() {
        return Err(to_eval_error(format!(
            "{} requires at least one index name",
            command
        )));
    }
    Ok(request)
}
