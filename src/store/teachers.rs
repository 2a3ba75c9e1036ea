use rusqlite::{Connection, OptionalExtension};

use crate::error::{StoreError, StoreResult};
use crate::models;
use crate::store::{self, DeleteSummary, DependentEdge};

const TABLE: &str = "teachers";

/// Edges that block a teacher delete. None of them cascade.
const REFERENCED_BY: [DependentEdge; 3] = [
    DependentEdge {
        table: "class_details",
        column: "class_teacher",
        count_sql: "SELECT COUNT(*) FROM class_details WHERE class_teacher = ?",
    },
    DependentEdge {
        table: "subjects",
        column: "subject_head",
        count_sql: "SELECT COUNT(*) FROM subjects WHERE subject_head = ?",
    },
    DependentEdge {
        table: "subject_tutors",
        column: "teacher_id",
        count_sql: "SELECT COUNT(*) FROM subject_tutors WHERE teacher_id = ?",
    },
];

impl<'a> TryFrom<&'a rusqlite::Row<'a>> for models::Teacher {
    type Error = rusqlite::Error;

    fn try_from(row: &rusqlite::Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            teacher_id: row.get("teacher_id")?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            date_of_birth: row.get("date_of_birth")?,
            email_id: row.get("email_id")?,
            contact: row.get("contact")?,
            registration_date: row.get("registration_date")?,
            registration_id: row.get("registration_id")?,
        })
    }
}

fn validate(teacher: &models::Teacher) -> StoreResult<()> {
    store::require_key(TABLE, "teacher_id", &teacher.teacher_id)?;
    store::require_text(TABLE, "email_id", &teacher.email_id)?;
    store::require_text(TABLE, "registration_id", &teacher.registration_id)?;
    Ok(())
}

pub fn insert(conn: &Connection, teacher: &models::Teacher) -> StoreResult<models::Teacher> {
    validate(teacher)?;
    log::trace!("[teachers::insert] inserting {}", teacher.teacher_id);

    conn.execute(
        "INSERT INTO teachers( teacher_id,  first_name,  last_name,  date_of_birth,  email_id,
                               contact,  registration_date,  registration_id)
         VALUES             (:teacher_id, :first_name, :last_name, :date_of_birth, :email_id,
                             :contact, :registration_date, :registration_id)",
        rusqlite::named_params! {
            ":teacher_id": teacher.teacher_id,
            ":first_name": teacher.first_name,
            ":last_name": teacher.last_name,
            ":date_of_birth": teacher.date_of_birth,
            ":email_id": teacher.email_id,
            ":contact": teacher.contact,
            ":registration_date": teacher.registration_date,
            ":registration_id": teacher.registration_id,
        },
    )
    .inspect_err(|err| log::warn!("[teachers::insert] rejected {}: {err}", teacher.teacher_id))?;

    log::info!("Teacher {} has been added.", teacher.teacher_id);
    Ok(teacher.clone())
}

pub fn get(conn: &Connection, teacher_id: &str) -> StoreResult<Option<models::Teacher>> {
    Ok(conn
        .query_row(
            "SELECT * FROM teachers WHERE teacher_id = ?",
            [teacher_id],
            |row| models::Teacher::try_from(row),
        )
        .optional()?)
}

pub fn list(conn: &Connection) -> StoreResult<Vec<models::Teacher>> {
    let mut stmt = conn.prepare("SELECT * FROM teachers ORDER BY teacher_id")?;
    let teachers = stmt
        .query_map([], |row| models::Teacher::try_from(row))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(teachers)
}

pub fn update(conn: &Connection, teacher: &models::Teacher) -> StoreResult<models::Teacher> {
    validate(teacher)?;
    let changed = conn.execute(
        "UPDATE teachers SET
            first_name = :first_name,
            last_name = :last_name,
            date_of_birth = :date_of_birth,
            email_id = :email_id,
            contact = :contact,
            registration_date = :registration_date,
            registration_id = :registration_id
         WHERE teacher_id = :teacher_id",
        rusqlite::named_params! {
            ":teacher_id": teacher.teacher_id,
            ":first_name": teacher.first_name,
            ":last_name": teacher.last_name,
            ":date_of_birth": teacher.date_of_birth,
            ":email_id": teacher.email_id,
            ":contact": teacher.contact,
            ":registration_date": teacher.registration_date,
            ":registration_id": teacher.registration_id,
        },
    )?;
    if changed == 0 {
        return Err(StoreError::not_found(TABLE, &teacher.teacher_id));
    }
    log::info!("Teacher {} has been updated.", teacher.teacher_id);
    Ok(teacher.clone())
}

/// Refuses while any class, subject or tutor mapping still points at the
/// teacher. Unset `class_teacher` / `subject_head` and remove tutor mappings
/// first.
pub fn delete(conn: &Connection, teacher_id: &str) -> StoreResult<DeleteSummary> {
    let tx = store::write_tx(conn)?;
    if !store::row_exists(&tx, TABLE, "teacher_id", teacher_id)? {
        return Err(StoreError::not_found(TABLE, teacher_id));
    }
    let dependents = store::count_dependents(&tx, teacher_id, &REFERENCED_BY)?;
    if !dependents.is_empty() {
        log::warn!(
            "[teachers::delete] refusing to delete {teacher_id}: {} dependent edge(s)",
            dependents.len()
        );
        return Err(StoreError::Restricted {
            table: TABLE,
            key: teacher_id.to_string(),
            dependents,
        });
    }
    tx.execute("DELETE FROM teachers WHERE teacher_id = ?", [teacher_id])?;
    tx.commit()?;

    log::info!("Teacher {teacher_id} has been deleted.");
    Ok(DeleteSummary {
        table: TABLE,
        key: teacher_id.to_string(),
        cascaded: Vec::new(),
    })
}
