use crate::ipc::helpers::{
    db_conn, flatten, i64_param, params_without, parse_params, reply, str_param, Reply,
};
use crate::ipc::types::{AppState, Request};
use crate::models::NewSubjectTutor;
use crate::store;
use serde_json::Value;

fn handle_tutors_create(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let tutor: NewSubjectTutor = parse_params(req, req.params.clone())?;
    Ok(reply(req, "tutor", store::tutors::insert(conn, &tutor)))
}

fn handle_tutors_get(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let tutor_id = i64_param(req, "tutorId")?;
    Ok(reply(req, "tutor", store::tutors::get(conn, tutor_id)))
}

fn handle_tutors_list(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    Ok(reply(req, "tutors", store::tutors::list(conn)))
}

fn handle_tutors_list_by_class(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let class_id = str_param(req, "classId")?;
    Ok(reply(req, "tutors", store::tutors::list_by_class(conn, &class_id)))
}

fn handle_tutors_update(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let tutor_id = i64_param(req, "tutorId")?;
    let tutor: NewSubjectTutor = parse_params(req, params_without(req, "tutorId"))?;
    Ok(reply(req, "tutor", store::tutors::update(conn, tutor_id, &tutor)))
}

fn handle_tutors_delete(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let tutor_id = i64_param(req, "tutorId")?;
    Ok(reply(req, "deleted", store::tutors::delete(conn, tutor_id)))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    let r = match req.method.as_str() {
        "tutors.create" => handle_tutors_create(state, req),
        "tutors.get" => handle_tutors_get(state, req),
        "tutors.list" => handle_tutors_list(state, req),
        "tutors.listByClass" => handle_tutors_list_by_class(state, req),
        "tutors.update" => handle_tutors_update(state, req),
        "tutors.delete" => handle_tutors_delete(state, req),
        _ => return None,
    };
    Some(flatten(r))
}
