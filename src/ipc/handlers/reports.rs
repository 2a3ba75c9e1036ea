use crate::ipc::helpers::{db_conn, flatten, parse_params, reply, Reply};
use crate::ipc::types::{AppState, Request};
use crate::models::GradeReportFilter;
use crate::store;
use serde_json::Value;

fn handle_reports_student_grades(state: &AppState, req: &Request) -> Reply<Value> {
    let conn = db_conn(state, req)?;
    let filter: GradeReportFilter = if req.params.is_null() {
        GradeReportFilter::default()
    } else {
        parse_params(req, req.params.clone())?
    };
    Ok(reply(req, "rows", store::reports::student_grades(conn, &filter)))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    let r = match req.method.as_str() {
        "reports.studentGrades" => handle_reports_student_grades(state, req),
        _ => return None,
    };
    Some(flatten(r))
}
