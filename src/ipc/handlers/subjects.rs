use crate::ipc::helpers::{
    db_conn, flatten, nullable_str_param, params_with_minted_id, parse_params, reply, str_param,
    Reply,
};
use crate::ipc::types::{AppState, Request};
use crate::models::Subject;
use crate::store;
use serde_json::Value;

fn handle_subjects_create(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let subject: Subject = parse_params(req, params_with_minted_id(req, "subjectId"))?;
    Ok(reply(req, "subject", store::subjects::insert(conn, &subject)))
}

fn handle_subjects_get(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let subject_id = str_param(req, "subjectId")?;
    Ok(reply(req, "subject", store::subjects::get(conn, &subject_id)))
}

fn handle_subjects_list(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    Ok(reply(req, "subjects", store::subjects::list(conn)))
}

fn handle_subjects_update(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let subject: Subject = parse_params(req, req.params.clone())?;
    Ok(reply(req, "subject", store::subjects::update(conn, &subject)))
}

fn handle_subjects_assign_head(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let subject_id = str_param(req, "subjectId")?;
    let teacher_id = nullable_str_param(req, "teacherId")?;
    Ok(reply(
        req,
        "subject",
        store::subjects::assign_head(conn, &subject_id, teacher_id.as_deref()),
    ))
}

fn handle_subjects_delete(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let subject_id = str_param(req, "subjectId")?;
    Ok(reply(req, "deleted", store::subjects::delete(conn, &subject_id)))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    let r = match req.method.as_str() {
        "subjects.create" => handle_subjects_create(state, req),
        "subjects.get" => handle_subjects_get(state, req),
        "subjects.list" => handle_subjects_list(state, req),
        "subjects.update" => handle_subjects_update(state, req),
        "subjects.assignHead" => handle_subjects_assign_head(state, req),
        "subjects.delete" => handle_subjects_delete(state, req),
        _ => return None,
    };
    Some(flatten(r))
}
