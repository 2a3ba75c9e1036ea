use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

use crate::error::StoreResult;
use crate::models;

impl<'a> TryFrom<&'a rusqlite::Row<'a>> for models::StudentGradeRow {
    type Error = rusqlite::Error;

    fn try_from(row: &rusqlite::Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            student_id: row.get("student_id")?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            subject_name: row.get("subject_name")?,
            exam_date: row.get("exam_date")?,
            marks_obtained: row.get("marks_obtained")?,
            max_marks: row.get("max_marks")?,
            grade: row.get("grade")?,
        })
    }
}

/// Reads `student_grades_view`. The view is evaluated by a single statement,
/// so every row comes from the same snapshot of the three joined tables.
pub fn student_grades(
    conn: &Connection,
    filter: &models::GradeReportFilter,
) -> StoreResult<Vec<models::StudentGradeRow>> {
    let mut sql = String::from(
        "SELECT student_id, first_name, last_name, subject_name,
                exam_date, marks_obtained, max_marks, grade
         FROM student_grades_view",
    );
    let mut clauses: Vec<&str> = Vec::new();
    let mut bind: Vec<Value> = Vec::new();
    if let Some(student_id) = &filter.student_id {
        clauses.push("student_id = ?");
        bind.push(Value::Text(student_id.clone()));
    }
    if let Some(subject_name) = &filter.subject_name {
        clauses.push("subject_name = ?");
        bind.push(Value::Text(subject_name.clone()));
    }
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY student_id, exam_date, subject_name");

    log::trace!("[student_grades] {} filter(s)", bind.len());
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(bind), |row| {
            models::StudentGradeRow::try_from(row)
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
