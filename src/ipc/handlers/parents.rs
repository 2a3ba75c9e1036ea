use crate::ipc::helpers::{
    db_conn, flatten, params_with_minted_id, parse_params, reply, str_param, Reply,
};
use crate::ipc::types::{AppState, Request};
use crate::models::ParentDetails;
use crate::store;
use serde_json::Value;

fn handle_parents_create(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let parent: ParentDetails = parse_params(req, params_with_minted_id(req, "parentId"))?;
    Ok(reply(req, "parent", store::parents::insert(conn, &parent)))
}

fn handle_parents_get(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let parent_id = str_param(req, "parentId")?;
    Ok(reply(req, "parent", store::parents::get(conn, &parent_id)))
}

fn handle_parents_list(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    Ok(reply(req, "parents", store::parents::list(conn)))
}

fn handle_parents_update(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let parent: ParentDetails = parse_params(req, req.params.clone())?;
    Ok(reply(req, "parent", store::parents::update(conn, &parent)))
}

fn handle_parents_delete(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let parent_id = str_param(req, "parentId")?;
    Ok(reply(req, "deleted", store::parents::delete(conn, &parent_id)))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    let r = match req.method.as_str() {
        "parents.create" => handle_parents_create(state, req),
        "parents.get" => handle_parents_get(state, req),
        "parents.list" => handle_parents_list(state, req),
        "parents.update" => handle_parents_update(state, req),
        "parents.delete" => handle_parents_delete(state, req),
        _ => return None,
    };
    Some(flatten(r))
}
