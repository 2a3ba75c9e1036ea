use crate::ipc::helpers::{
    db_conn, flatten, params_with_minted_id, parse_params, reply, str_param, Reply,
};
use crate::ipc::types::{AppState, Request};
use crate::models::UserLogin;
use crate::store;
use serde_json::Value;

fn handle_users_create(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let user: UserLogin = parse_params(req, params_with_minted_id(req, "userId"))?;
    Ok(reply(req, "user", store::users::insert(conn, &user)))
}

fn handle_users_get(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    if let Some(email) = req.params.get("emailId").and_then(|v| v.as_str()) {
        return Ok(reply(req, "user", store::users::find_by_email(conn, email)));
    }
    let user_id = str_param(req, "userId")?;
    Ok(reply(req, "user", store::users::get(conn, &user_id)))
}

fn handle_users_list(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    Ok(reply(req, "users", store::users::list(conn)))
}

fn handle_users_update(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let user: UserLogin = parse_params(req, req.params.clone())?;
    Ok(reply(req, "user", store::users::update(conn, &user)))
}

fn handle_users_delete(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let user_id = str_param(req, "userId")?;
    Ok(reply(req, "deleted", store::users::delete(conn, &user_id)))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    let r = match req.method.as_str() {
        "users.create" => handle_users_create(state, req),
        "users.get" => handle_users_get(state, req),
        "users.list" => handle_users_list(state, req),
        "users.update" => handle_users_update(state, req),
        "users.delete" => handle_users_delete(state, req),
        _ => return None,
    };
    Some(flatten(r))
}
