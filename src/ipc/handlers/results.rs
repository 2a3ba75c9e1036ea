use crate::ipc::helpers::{
    db_conn, flatten, i64_param, params_without, parse_params, reply, str_param, Reply,
};
use crate::ipc::types::{AppState, Request};
use crate::models::NewExamResult;
use crate::store;
use serde_json::Value;

fn handle_results_create(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let result: NewExamResult = parse_params(req, req.params.clone())?;
    Ok(reply(req, "result", store::results::insert(conn, &result)))
}

fn handle_results_get(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let result_id = i64_param(req, "resultId")?;
    Ok(reply(req, "result", store::results::get(conn, result_id)))
}

fn handle_results_list(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    Ok(reply(req, "results", store::results::list(conn)))
}

fn handle_results_list_by_student(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let student_id = str_param(req, "studentId")?;
    Ok(reply(req, "results", store::results::list_by_student(conn, &student_id)))
}

fn handle_results_list_by_subject(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let subject_id = str_param(req, "subjectId")?;
    Ok(reply(req, "results", store::results::list_by_subject(conn, &subject_id)))
}

fn handle_results_update(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let result_id = i64_param(req, "resultId")?;
    let result: NewExamResult = parse_params(req, params_without(req, "resultId"))?;
    Ok(reply(req, "result", store::results::update(conn, result_id, &result)))
}

fn handle_results_delete(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let result_id = i64_param(req, "resultId")?;
    Ok(reply(req, "deleted", store::results::delete(conn, result_id)))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    let r = match req.method.as_str() {
        "results.create" => handle_results_create(state, req),
        "results.get" => handle_results_get(state, req),
        "results.list" => handle_results_list(state, req),
        "results.listByStudent" => handle_results_list_by_student(state, req),
        "results.listBySubject" => handle_results_list_by_subject(state, req),
        "results.update" => handle_results_update(state, req),
        "results.delete" => handle_results_delete(state, req),
        _ => return None,
    };
    Some(flatten(r))
}
