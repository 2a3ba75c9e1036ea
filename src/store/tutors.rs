use rusqlite::{Connection, OptionalExtension};

use crate::error::{StoreError, StoreResult};
use crate::models;
use crate::store::{self, DeleteSummary};

const TABLE: &str = "subject_tutors";

impl<'a> TryFrom<&'a rusqlite::Row<'a>> for models::SubjectTutor {
    type Error = rusqlite::Error;

    fn try_from(row: &rusqlite::Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            tutor_id: row.get("tutor_id")?,
            subject_id: row.get("subject_id")?,
            teacher_id: row.get("teacher_id")?,
            class_id: row.get("class_id")?,
        })
    }
}

fn validate(conn: &Connection, tutor: &models::NewSubjectTutor) -> StoreResult<()> {
    store::require_parent(conn, TABLE, "subject_id", "subjects", "subject_id", &tutor.subject_id)?;
    store::require_parent(conn, TABLE, "teacher_id", "teachers", "teacher_id", &tutor.teacher_id)?;
    store::require_parent(conn, TABLE, "class_id", "class_details", "class_id", &tutor.class_id)?;
    Ok(())
}

/// Maps a teacher to a subject for a class. Repeating an existing
/// (subject, teacher, class) triple creates another mapping row.
pub fn insert(
    conn: &Connection,
    tutor: &models::NewSubjectTutor,
) -> StoreResult<models::SubjectTutor> {
    let tx = store::write_tx(conn)?;
    validate(&tx, tutor)?;
    tx.execute(
        "INSERT INTO subject_tutors(subject_id, teacher_id, class_id) VALUES(?, ?, ?)",
        (&tutor.subject_id, &tutor.teacher_id, &tutor.class_id),
    )?;
    let tutor_id = tx.last_insert_rowid();
    tx.commit()?;

    log::info!(
        "Tutor mapping {tutor_id} added: {} teaches {} to {}.",
        tutor.teacher_id,
        tutor.subject_id,
        tutor.class_id
    );
    Ok(models::SubjectTutor {
        tutor_id,
        subject_id: tutor.subject_id.clone(),
        teacher_id: tutor.teacher_id.clone(),
        class_id: tutor.class_id.clone(),
    })
}

pub fn get(conn: &Connection, tutor_id: i64) -> StoreResult<Option<models::SubjectTutor>> {
    Ok(conn
        .query_row(
            "SELECT * FROM subject_tutors WHERE tutor_id = ?",
            [tutor_id],
            |row| models::SubjectTutor::try_from(row),
        )
        .optional()?)
}

pub fn list(conn: &Connection) -> StoreResult<Vec<models::SubjectTutor>> {
    let mut stmt = conn.prepare("SELECT * FROM subject_tutors ORDER BY tutor_id")?;
    let tutors = stmt
        .query_map([], |row| models::SubjectTutor::try_from(row))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tutors)
}

pub fn list_by_class(conn: &Connection, class_id: &str) -> StoreResult<Vec<models::SubjectTutor>> {
    let mut stmt =
        conn.prepare("SELECT * FROM subject_tutors WHERE class_id = ? ORDER BY tutor_id")?;
    let tutors = stmt
        .query_map([class_id], |row| models::SubjectTutor::try_from(row))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tutors)
}

pub fn update(
    conn: &Connection,
    tutor_id: i64,
    tutor: &models::NewSubjectTutor,
) -> StoreResult<models::SubjectTutor> {
    let tx = store::write_tx(conn)?;
    validate(&tx, tutor)?;
    let changed = tx.execute(
        "UPDATE subject_tutors SET subject_id = ?, teacher_id = ?, class_id = ?
         WHERE tutor_id = ?",
        (&tutor.subject_id, &tutor.teacher_id, &tutor.class_id, tutor_id),
    )?;
    if changed == 0 {
        return Err(StoreError::not_found(TABLE, tutor_id));
    }
    tx.commit()?;
    log::info!("Tutor mapping {tutor_id} has been updated.");
    Ok(models::SubjectTutor {
        tutor_id,
        subject_id: tutor.subject_id.clone(),
        teacher_id: tutor.teacher_id.clone(),
        class_id: tutor.class_id.clone(),
    })
}

pub fn delete(conn: &Connection, tutor_id: i64) -> StoreResult<DeleteSummary> {
    let changed = conn.execute("DELETE FROM subject_tutors WHERE tutor_id = ?", [tutor_id])?;
    if changed == 0 {
        return Err(StoreError::not_found(TABLE, tutor_id));
    }
    log::info!("Tutor mapping {tutor_id} has been deleted.");
    Ok(DeleteSummary {
        table: TABLE,
        key: tutor_id.to_string(),
        cascaded: Vec::new(),
    })
}
