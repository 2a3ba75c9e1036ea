use crate::ipc::helpers::{
    db_conn, flatten, params_with_minted_id, parse_params, reply, str_param, Reply,
};
use crate::ipc::types::{AppState, Request};
use crate::models::Teacher;
use crate::store;
use serde_json::Value;

fn handle_teachers_create(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let teacher: Teacher = parse_params(req, params_with_minted_id(req, "teacherId"))?;
    Ok(reply(req, "teacher", store::teachers::insert(conn, &teacher)))
}

fn handle_teachers_get(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let teacher_id = str_param(req, "teacherId")?;
    Ok(reply(req, "teacher", store::teachers::get(conn, &teacher_id)))
}

fn handle_teachers_list(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    Ok(reply(req, "teachers", store::teachers::list(conn)))
}

fn handle_teachers_update(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let teacher: Teacher = parse_params(req, req.params.clone())?;
    Ok(reply(req, "teacher", store::teachers::update(conn, &teacher)))
}

fn handle_teachers_delete(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let teacher_id = str_param(req, "teacherId")?;
    Ok(reply(req, "deleted", store::teachers::delete(conn, &teacher_id)))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    let r = match req.method.as_str() {
        "teachers.create" => handle_teachers_create(state, req),
        "teachers.get" => handle_teachers_get(state, req),
        "teachers.list" => handle_teachers_list(state, req),
        "teachers.update" => handle_teachers_update(state, req),
        "teachers.delete" => handle_teachers_delete(state, req),
        _ => return None,
    };
    Some(flatten(r))
}
