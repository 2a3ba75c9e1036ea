use rusqlite::{Connection, OptionalExtension};

use crate::error::{StoreError, StoreResult};
use crate::models;
use crate::store::{self, DeleteSummary, DependentEdge};

const TABLE: &str = "class_details";

const DEPENDENTS: [DependentEdge; 3] = [
    DependentEdge {
        table: "student_details",
        column: "class_id",
        count_sql: "SELECT COUNT(*) FROM student_details WHERE class_id = ?",
    },
    DependentEdge {
        table: "exam_results",
        column: "student_id",
        count_sql: "SELECT COUNT(*)
                    FROM exam_results er
                    JOIN student_details s ON s.student_id = er.student_id
                    WHERE s.class_id = ?",
    },
    DependentEdge {
        table: "subject_tutors",
        column: "class_id",
        count_sql: "SELECT COUNT(*) FROM subject_tutors WHERE class_id = ?",
    },
];

impl<'a> TryFrom<&'a rusqlite::Row<'a>> for models::ClassDetails {
    type Error = rusqlite::Error;

    fn try_from(row: &rusqlite::Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            class_id: row.get("class_id")?,
            class_teacher: row.get("class_teacher")?,
            class_year: row.get("class_year")?,
        })
    }
}

fn validate(conn: &Connection, class: &models::ClassDetails) -> StoreResult<()> {
    store::require_key(TABLE, "class_id", &class.class_id)?;
    store::require_text(TABLE, "class_year", &class.class_year)?;
    if let Some(teacher_id) = &class.class_teacher {
        store::require_parent(conn, TABLE, "class_teacher", "teachers", "teacher_id", teacher_id)?;
    }
    Ok(())
}

pub fn insert(
    conn: &Connection,
    class: &models::ClassDetails,
) -> StoreResult<models::ClassDetails> {
    let tx = store::write_tx(conn)?;
    validate(&tx, class)?;
    tx.execute(
        "INSERT INTO class_details(class_id, class_teacher, class_year)
         VALUES(:class_id, :class_teacher, :class_year)",
        rusqlite::named_params! {
            ":class_id": class.class_id,
            ":class_teacher": class.class_teacher,
            ":class_year": class.class_year,
        },
    )
    .inspect_err(|err| log::warn!("[classes::insert] rejected {}: {err}", class.class_id))?;
    tx.commit()?;

    log::info!("Class {} has been added.", class.class_id);
    Ok(class.clone())
}

pub fn get(conn: &Connection, class_id: &str) -> StoreResult<Option<models::ClassDetails>> {
    Ok(conn
        .query_row(
            "SELECT * FROM class_details WHERE class_id = ?",
            [class_id],
            |row| models::ClassDetails::try_from(row),
        )
        .optional()?)
}

pub fn list(conn: &Connection) -> StoreResult<Vec<models::ClassDetails>> {
    let mut stmt = conn.prepare("SELECT * FROM class_details ORDER BY class_year, class_id")?;
    let classes = stmt
        .query_map([], |row| models::ClassDetails::try_from(row))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(classes)
}

pub fn update(
    conn: &Connection,
    class: &models::ClassDetails,
) -> StoreResult<models::ClassDetails> {
    let tx = store::write_tx(conn)?;
    validate(&tx, class)?;
    let changed = tx.execute(
        "UPDATE class_details SET class_teacher = :class_teacher, class_year = :class_year
         WHERE class_id = :class_id",
        rusqlite::named_params! {
            ":class_id": class.class_id,
            ":class_teacher": class.class_teacher,
            ":class_year": class.class_year,
        },
    )?;
    if changed == 0 {
        return Err(StoreError::not_found(TABLE, &class.class_id));
    }
    tx.commit()?;
    log::info!("Class {} has been updated.", class.class_id);
    Ok(class.clone())
}

/// Sets or clears the class teacher. Clearing is how a teacher reference is
/// released before that teacher can be deleted.
pub fn assign_teacher(
    conn: &Connection,
    class_id: &str,
    teacher_id: Option<&str>,
) -> StoreResult<models::ClassDetails> {
    let tx = store::write_tx(conn)?;
    if let Some(teacher_id) = teacher_id {
        store::require_parent(&tx, TABLE, "class_teacher", "teachers", "teacher_id", teacher_id)?;
    }
    let changed = tx.execute(
        "UPDATE class_details SET class_teacher = ? WHERE class_id = ?",
        (teacher_id, class_id),
    )?;
    if changed == 0 {
        return Err(StoreError::not_found(TABLE, class_id));
    }
    let class = tx.query_row(
        "SELECT * FROM class_details WHERE class_id = ?",
        [class_id],
        |row| models::ClassDetails::try_from(row),
    )?;
    tx.commit()?;

    log::info!(
        "Class {class_id} teacher set to {}.",
        teacher_id.unwrap_or("<none>")
    );
    Ok(class)
}

/// Deleting a class removes its students (and their exam results) and its
/// subject-tutor mappings. Nothing else is touched.
pub fn delete(conn: &Connection, class_id: &str) -> StoreResult<DeleteSummary> {
    store::delete_cascading(conn, TABLE, "class_id", class_id, &DEPENDENTS)
}
