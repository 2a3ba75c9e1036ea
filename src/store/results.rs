use rusqlite::{Connection, OptionalExtension};

use crate::error::{StoreError, StoreResult};
use crate::grade::Marks;
use crate::models;
use crate::store::{self, DeleteSummary};

const TABLE: &str = "exam_results";

impl<'a> TryFrom<&'a rusqlite::Row<'a>> for models::ExamResult {
    type Error = rusqlite::Error;

    fn try_from(row: &rusqlite::Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            result_id: row.get("result_id")?,
            student_id: row.get("student_id")?,
            subject_id: row.get("subject_id")?,
            exam_date: row.get("exam_date")?,
            marks_obtained: row.get("marks_obtained")?,
            max_marks: row.get("max_marks")?,
            grade: row.get("grade")?,
        })
    }
}

/// Bounds on recorded marks. Checked before anything reaches the engine, so
/// the grade expression never runs against an out-of-range value.
pub fn validate_marks(marks_obtained: Marks, max_marks: Marks) -> StoreResult<()> {
    if marks_obtained < Marks::ZERO {
        return Err(StoreError::constraint(
            TABLE,
            "marks_obtained",
            format!("marks_obtained must be >= 0, got {marks_obtained}"),
        ));
    }
    if marks_obtained > Marks::MAX {
        return Err(StoreError::constraint(
            TABLE,
            "marks_obtained",
            format!("marks_obtained must be <= {}, got {marks_obtained}", Marks::MAX),
        ));
    }
    if max_marks <= Marks::ZERO {
        return Err(StoreError::constraint(
            TABLE,
            "max_marks",
            format!("max_marks must be > 0, got {max_marks}"),
        ));
    }
    if max_marks > Marks::MAX {
        return Err(StoreError::constraint(
            TABLE,
            "max_marks",
            format!("max_marks must be <= {}, got {max_marks}", Marks::MAX),
        ));
    }
    Ok(())
}

fn require_refs(conn: &Connection, result: &models::NewExamResult) -> StoreResult<()> {
    store::require_parent(conn, TABLE, "student_id", "student_details", "student_id", &result.student_id)?;
    store::require_parent(conn, TABLE, "subject_id", "subjects", "subject_id", &result.subject_id)?;
    Ok(())
}

fn fetch(conn: &Connection, result_id: i64) -> rusqlite::Result<models::ExamResult> {
    conn.query_row(
        "SELECT * FROM exam_results WHERE result_id = ?",
        [result_id],
        |row| models::ExamResult::try_from(row),
    )
}

/// Records a result. The returned row carries the grade the engine derived.
pub fn insert(
    conn: &Connection,
    result: &models::NewExamResult,
) -> StoreResult<models::ExamResult> {
    validate_marks(result.marks_obtained, result.max_marks)
        .inspect_err(|err| log::warn!("[results::insert] rejected: {err}"))?;

    let tx = store::write_tx(conn)?;
    require_refs(&tx, result)?;
    tx.execute(
        "INSERT INTO exam_results( student_id,  subject_id,  exam_date,  marks_obtained,  max_marks)
         VALUES                 (:student_id, :subject_id, :exam_date, :marks_obtained, :max_marks)",
        rusqlite::named_params! {
            ":student_id": result.student_id,
            ":subject_id": result.subject_id,
            ":exam_date": result.exam_date,
            ":marks_obtained": result.marks_obtained,
            ":max_marks": result.max_marks,
        },
    )?;
    let stored = fetch(&tx, tx.last_insert_rowid())?;
    tx.commit()?;

    log::info!(
        "Result {} recorded: {} in {} = {}/{} ({}).",
        stored.result_id,
        stored.student_id,
        stored.subject_id,
        stored.marks_obtained,
        stored.max_marks,
        stored.grade
    );
    Ok(stored)
}

pub fn get(conn: &Connection, result_id: i64) -> StoreResult<Option<models::ExamResult>> {
    Ok(fetch(conn, result_id).optional()?)
}

pub fn list(conn: &Connection) -> StoreResult<Vec<models::ExamResult>> {
    let mut stmt = conn.prepare("SELECT * FROM exam_results ORDER BY result_id")?;
    let results = stmt
        .query_map([], |row| models::ExamResult::try_from(row))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(results)
}

pub fn list_by_student(
    conn: &Connection,
    student_id: &str,
) -> StoreResult<Vec<models::ExamResult>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM exam_results WHERE student_id = ? ORDER BY exam_date, result_id",
    )?;
    let results = stmt
        .query_map([student_id], |row| models::ExamResult::try_from(row))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(results)
}

pub fn list_by_subject(
    conn: &Connection,
    subject_id: &str,
) -> StoreResult<Vec<models::ExamResult>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM exam_results WHERE subject_id = ? ORDER BY exam_date, result_id",
    )?;
    let results = stmt
        .query_map([subject_id], |row| models::ExamResult::try_from(row))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(results)
}

/// Replaces every writable column. The grade follows the new marks in the
/// same statement.
pub fn update(
    conn: &Connection,
    result_id: i64,
    result: &models::NewExamResult,
) -> StoreResult<models::ExamResult> {
    validate_marks(result.marks_obtained, result.max_marks)
        .inspect_err(|err| log::warn!("[results::update] rejected {result_id}: {err}"))?;

    let tx = store::write_tx(conn)?;
    require_refs(&tx, result)?;
    let changed = tx.execute(
        "UPDATE exam_results SET
            student_id = :student_id,
            subject_id = :subject_id,
            exam_date = :exam_date,
            marks_obtained = :marks_obtained,
            max_marks = :max_marks
         WHERE result_id = :result_id",
        rusqlite::named_params! {
            ":result_id": result_id,
            ":student_id": result.student_id,
            ":subject_id": result.subject_id,
            ":exam_date": result.exam_date,
            ":marks_obtained": result.marks_obtained,
            ":max_marks": result.max_marks,
        },
    )?;
    if changed == 0 {
        return Err(StoreError::not_found(TABLE, result_id));
    }
    let stored = fetch(&tx, result_id)?;
    tx.commit()?;

    log::info!(
        "Result {result_id} updated: {}/{} ({}).",
        stored.marks_obtained,
        stored.max_marks,
        stored.grade
    );
    Ok(stored)
}

pub fn delete(conn: &Connection, result_id: i64) -> StoreResult<DeleteSummary> {
    let changed = conn.execute("DELETE FROM exam_results WHERE result_id = ?", [result_id])?;
    if changed == 0 {
        return Err(StoreError::not_found(TABLE, result_id));
    }
    log::info!("Result {result_id} has been deleted.");
    Ok(DeleteSummary {
        table: TABLE,
        key: result_id.to_string(),
        cascaded: Vec::new(),
    })
}
