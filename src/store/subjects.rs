use rusqlite::{Connection, OptionalExtension};

use crate::error::{StoreError, StoreResult};
use crate::models;
use crate::store::{self, DeleteSummary, DependentEdge};

const TABLE: &str = "subjects";

const DEPENDENTS: [DependentEdge; 2] = [
    DependentEdge {
        table: "subject_tutors",
        column: "subject_id",
        count_sql: "SELECT COUNT(*) FROM subject_tutors WHERE subject_id = ?",
    },
    DependentEdge {
        table: "exam_results",
        column: "subject_id",
        count_sql: "SELECT COUNT(*) FROM exam_results WHERE subject_id = ?",
    },
];

impl<'a> TryFrom<&'a rusqlite::Row<'a>> for models::Subject {
    type Error = rusqlite::Error;

    fn try_from(row: &rusqlite::Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            subject_id: row.get("subject_id")?,
            subject_name: row.get("subject_name")?,
            class_year: row.get("class_year")?,
            subject_head: row.get("subject_head")?,
        })
    }
}

fn validate(conn: &Connection, subject: &models::Subject) -> StoreResult<()> {
    store::require_key(TABLE, "subject_id", &subject.subject_id)?;
    store::require_text(TABLE, "subject_name", &subject.subject_name)?;
    store::require_text(TABLE, "class_year", &subject.class_year)?;
    if let Some(head) = &subject.subject_head {
        store::require_parent(conn, TABLE, "subject_head", "teachers", "teacher_id", head)?;
    }
    Ok(())
}

pub fn insert(conn: &Connection, subject: &models::Subject) -> StoreResult<models::Subject> {
    let tx = store::write_tx(conn)?;
    validate(&tx, subject)?;
    tx.execute(
        "INSERT INTO subjects( subject_id,  subject_name,  class_year,  subject_head)
         VALUES             (:subject_id, :subject_name, :class_year, :subject_head)",
        rusqlite::named_params! {
            ":subject_id": subject.subject_id,
            ":subject_name": subject.subject_name,
            ":class_year": subject.class_year,
            ":subject_head": subject.subject_head,
        },
    )
    .inspect_err(|err| log::warn!("[subjects::insert] rejected {}: {err}", subject.subject_id))?;
    tx.commit()?;

    log::info!("Subject {} has been added.", subject.subject_id);
    Ok(subject.clone())
}

pub fn get(conn: &Connection, subject_id: &str) -> StoreResult<Option<models::Subject>> {
    Ok(conn
        .query_row(
            "SELECT * FROM subjects WHERE subject_id = ?",
            [subject_id],
            |row| models::Subject::try_from(row),
        )
        .optional()?)
}

pub fn list(conn: &Connection) -> StoreResult<Vec<models::Subject>> {
    let mut stmt = conn.prepare("SELECT * FROM subjects ORDER BY class_year, subject_name")?;
    let subjects = stmt
        .query_map([], |row| models::Subject::try_from(row))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(subjects)
}

pub fn update(conn: &Connection, subject: &models::Subject) -> StoreResult<models::Subject> {
    let tx = store::write_tx(conn)?;
    validate(&tx, subject)?;
    let changed = tx.execute(
        "UPDATE subjects SET
            subject_name = :subject_name,
            class_year = :class_year,
            subject_head = :subject_head
         WHERE subject_id = :subject_id",
        rusqlite::named_params! {
            ":subject_id": subject.subject_id,
            ":subject_name": subject.subject_name,
            ":class_year": subject.class_year,
            ":subject_head": subject.subject_head,
        },
    )?;
    if changed == 0 {
        return Err(StoreError::not_found(TABLE, &subject.subject_id));
    }
    tx.commit()?;
    log::info!("Subject {} has been updated.", subject.subject_id);
    Ok(subject.clone())
}

/// Sets or clears the subject head.
pub fn assign_head(
    conn: &Connection,
    subject_id: &str,
    teacher_id: Option<&str>,
) -> StoreResult<models::Subject> {
    let tx = store::write_tx(conn)?;
    if let Some(teacher_id) = teacher_id {
        store::require_parent(&tx, TABLE, "subject_head", "teachers", "teacher_id", teacher_id)?;
    }
    let changed = tx.execute(
        "UPDATE subjects SET subject_head = ? WHERE subject_id = ?",
        (teacher_id, subject_id),
    )?;
    if changed == 0 {
        return Err(StoreError::not_found(TABLE, subject_id));
    }
    let subject = tx.query_row(
        "SELECT * FROM subjects WHERE subject_id = ?",
        [subject_id],
        |row| models::Subject::try_from(row),
    )?;
    tx.commit()?;

    log::info!(
        "Subject {subject_id} head set to {}.",
        teacher_id.unwrap_or("<none>")
    );
    Ok(subject)
}

/// Deleting a subject removes its tutor mappings and exam results.
pub fn delete(conn: &Connection, subject_id: &str) -> StoreResult<DeleteSummary> {
    store::delete_cascading(conn, TABLE, "subject_id", subject_id, &DEPENDENTS)
}
