use crate::ipc::helpers::{
    db_conn, flatten, nullable_str_param, params_with_minted_id, parse_params, reply, str_param,
    Reply,
};
use crate::ipc::types::{AppState, Request};
use crate::models::ClassDetails;
use crate::store;
use serde_json::Value;

fn handle_classes_create(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let class: ClassDetails = parse_params(req, params_with_minted_id(req, "classId"))?;
    Ok(reply(req, "class", store::classes::insert(conn, &class)))
}

fn handle_classes_get(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let class_id = str_param(req, "classId")?;
    Ok(reply(req, "class", store::classes::get(conn, &class_id)))
}

fn handle_classes_list(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    Ok(reply(req, "classes", store::classes::list(conn)))
}

fn handle_classes_update(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let class: ClassDetails = parse_params(req, req.params.clone())?;
    Ok(reply(req, "class", store::classes::update(conn, &class)))
}

fn handle_classes_assign_teacher(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let class_id = str_param(req, "classId")?;
    let teacher_id = nullable_str_param(req, "teacherId")?;
    Ok(reply(
        req,
        "class",
        store::classes::assign_teacher(conn, &class_id, teacher_id.as_deref()),
    ))
}

fn handle_classes_delete(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let class_id = str_param(req, "classId")?;
    Ok(reply(req, "deleted", store::classes::delete(conn, &class_id)))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    let r = match req.method.as_str() {
        "classes.create" => handle_classes_create(state, req),
        "classes.get" => handle_classes_get(state, req),
        "classes.list" => handle_classes_list(state, req),
        "classes.update" => handle_classes_update(state, req),
        "classes.assignTeacher" => handle_classes_assign_teacher(state, req),
        "classes.delete" => handle_classes_delete(state, req),
        _ => return None,
    };
    Some(flatten(r))
}
