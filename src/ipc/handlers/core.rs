use crate::db;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{db_conn, flatten, Reply};
use crate::ipc::types::{AppState, Request};
use serde_json::{json, Map, Value};
use std::path::PathBuf;

fn handle_health(state: &mut AppState, req: &Request) -> Reply<Value> {
    let counts = match state.db.as_ref() {
        Some(conn) => {
            let counts = db::table_counts(conn)
                .map_err(|e| err(&req.id, "db_error", e.to_string(), None))?;
            let mut m = Map::new();
            for (table, n) in counts {
                m.insert(table.to_string(), json!(n));
            }
            Value::Object(m)
        }
        None => Value::Null,
    };
    Ok(ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string()),
            "tableCounts": counts,
        }),
    ))
}

fn handle_workspace_select(state: &mut AppState, req: &Request) -> Reply<Value> {
    let Some(path) = req
        .params
        .get("path")
        .and_then(|v| v.as_str())
        .map(PathBuf::from)
    else {
        return Err(err(&req.id, "bad_params", "missing params.path", None));
    };

    state.open_workspace(path.clone()).map_err(|e| {
        log::error!("[workspace.select] {e:?}");
        err(&req.id, "db_open_failed", format!("{e:?}"), None)
    })?;
    Ok(ok(&req.id, json!({ "workspacePath": path.to_string_lossy() })))
}

fn handle_schema(state: &mut AppState, req: &Request, action: &str) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let result = match action {
        "init" => db::init_schema(conn),
        "drop" => db::drop_schema(conn),
        _ => db::reset_schema(conn),
    };
    result.map_err(|e| err(&req.id, "db_error", e.to_string(), None))?;
    log::info!("[schema.{action}] done");
    Ok(ok(&req.id, json!({ "schema": action })))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    let r = match req.method.as_str() {
        "health" => handle_health(state, req),
        "workspace.select" => handle_workspace_select(state, req),
        "schema.init" => handle_schema(state, req, "init"),
        "schema.drop" => handle_schema(state, req, "drop"),
        "schema.reset" => handle_schema(state, req, "reset"),
        _ => return None,
    };
    Some(flatten(r))
}
