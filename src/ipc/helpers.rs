use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::StoreResult;
use crate::ipc::error::{err, ok, store_err};
use crate::ipc::types::{AppState, Request};

/// Handler outcome: the error side is already a complete response.
pub type Reply<T> = Result<T, Value>;

pub fn db_conn<'a>(state: &'a AppState, req: &Request) -> Reply<&'a Connection> {
    state
        .db
        .as_ref()
        .ok_or_else(|| err(&req.id, "no_workspace", "select a workspace first", None))
}

/// Deserializes `params` into a record. A missing required field is a
/// constraint violation; any other shape problem is `bad_params`.
pub fn parse_params<T: DeserializeOwned>(req: &Request, params: Value) -> Reply<T> {
    serde_json::from_value(params).map_err(|e| {
        let message = e.to_string();
        let code = if message.starts_with("missing field") {
            "constraint_violation"
        } else {
            "bad_params"
        };
        err(&req.id, code, message, None)
    })
}

/// Keys are matched verbatim, the same way they were stored.
pub fn str_param(req: &Request, key: &str) -> Reply<String> {
    match req.params.get(key).and_then(|v| v.as_str()) {
        Some(v) if !v.trim().is_empty() => Ok(v.to_string()),
        _ => Err(err(&req.id, "bad_params", format!("missing {key}"), None)),
    }
}

/// A string param that may be explicitly `null` to clear a reference.
pub fn nullable_str_param(req: &Request, key: &str) -> Reply<Option<String>> {
    match req.params.get(key) {
        None => Err(err(&req.id, "bad_params", format!("missing {key}"), None)),
        Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(Some(s.clone())),
        Some(_) => Err(err(
            &req.id,
            "bad_params",
            format!("{key} must be a non-empty string or null"),
            None,
        )),
    }
}

pub fn i64_param(req: &Request, key: &str) -> Reply<i64> {
    req.params
        .get(key)
        .and_then(|v| v.as_i64())
        .ok_or_else(|| err(&req.id, "bad_params", format!("missing {key}"), None))
}

/// Params without `key`, for records whose sequence key travels alongside
/// the writable fields.
pub fn params_without(req: &Request, key: &str) -> Value {
    let mut params = req.params.clone();
    if let Some(obj) = params.as_object_mut() {
        obj.remove(key);
    }
    params
}

/// Params with a fresh UUID under `key` when the caller did not supply one.
pub fn params_with_minted_id(req: &Request, key: &str) -> Value {
    let mut params = req.params.clone();
    if let Some(obj) = params.as_object_mut() {
        let missing = obj
            .get(key)
            .map(|v| v.is_null() || v.as_str().is_some_and(|s| s.trim().is_empty()))
            .unwrap_or(true);
        if missing {
            obj.insert(key.to_string(), json!(Uuid::new_v4().to_string()));
        }
    }
    params
}

/// Wraps a store result as `{ key: value }`, or the store error response.
pub fn reply<T: Serialize>(req: &Request, key: &str, result: StoreResult<T>) -> Value {
    match result {
        Ok(v) => match serde_json::to_value(v) {
            Ok(v) => {
                let mut body = serde_json::Map::new();
                body.insert(key.to_string(), v);
                ok(&req.id, Value::Object(body))
            }
            Err(e) => err(&req.id, "serialize_failed", e.to_string(), None),
        },
        Err(e) => {
            log::debug!("[{}] {}: {e}", req.method, e.kind().code());
            store_err(&req.id, &e)
        }
    }
}

pub fn flatten(r: Reply<Value>) -> Value {
    r.unwrap_or_else(|e| e)
}
