use crate::ipc::helpers::{
    db_conn, flatten, params_with_minted_id, parse_params, reply, str_param, Reply,
};
use crate::ipc::types::{AppState, Request};
use crate::models::StudentDetails;
use crate::store;
use serde_json::Value;

fn handle_students_create(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let student: StudentDetails = parse_params(req, params_with_minted_id(req, "studentId"))?;
    Ok(reply(req, "student", store::students::insert(conn, &student)))
}

fn handle_students_get(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let student_id = str_param(req, "studentId")?;
    Ok(reply(req, "student", store::students::get(conn, &student_id)))
}

fn handle_students_list(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    Ok(reply(req, "students", store::students::list(conn)))
}

fn handle_students_list_by_class(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let class_id = str_param(req, "classId")?;
    Ok(reply(req, "students", store::students::list_by_class(conn, &class_id)))
}

fn handle_students_list_by_parent(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let parent_id = str_param(req, "parentId")?;
    Ok(reply(req, "students", store::students::list_by_parent(conn, &parent_id)))
}

fn handle_students_update(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let student: StudentDetails = parse_params(req, req.params.clone())?;
    Ok(reply(req, "student", store::students::update(conn, &student)))
}

fn handle_students_delete(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let student_id = str_param(req, "studentId")?;
    Ok(reply(req, "deleted", store::students::delete(conn, &student_id)))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    let r = match req.method.as_str() {
        "students.create" => handle_students_create(state, req),
        "students.get" => handle_students_get(state, req),
        "students.list" => handle_students_list(state, req),
        "students.listByClass" => handle_students_list_by_class(state, req),
        "students.listByParent" => handle_students_list_by_parent(state, req),
        "students.update" => handle_students_update(state, req),
        "students.delete" => handle_students_delete(state, req),
        _ => return None,
    };
    Some(flatten(r))
}
