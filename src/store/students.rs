use rusqlite::{Connection, OptionalExtension};

use crate::error::{StoreError, StoreResult};
use crate::models;
use crate::store::{self, DeleteSummary, DependentEdge};

const TABLE: &str = "student_details";

const DEPENDENTS: [DependentEdge; 1] = [DependentEdge {
    table: "exam_results",
    column: "student_id",
    count_sql: "SELECT COUNT(*) FROM exam_results WHERE student_id = ?",
}];

impl<'a> TryFrom<&'a rusqlite::Row<'a>> for models::StudentDetails {
    type Error = rusqlite::Error;

    fn try_from(row: &rusqlite::Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            student_id: row.get("student_id")?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            date_of_birth: row.get("date_of_birth")?,
            class_id: row.get("class_id")?,
            roll_no: row.get("roll_no")?,
            email_id: row.get("email_id")?,
            parent_id: row.get("parent_id")?,
            registration_date: row.get("registration_date")?,
            registration_id: row.get("registration_id")?,
        })
    }
}

fn validate(conn: &Connection, student: &models::StudentDetails) -> StoreResult<()> {
    store::require_key(TABLE, "student_id", &student.student_id)?;
    store::require_text(TABLE, "roll_no", &student.roll_no)?;
    store::require_text(TABLE, "email_id", &student.email_id)?;
    store::require_text(TABLE, "registration_id", &student.registration_id)?;
    store::require_parent(conn, TABLE, "class_id", "class_details", "class_id", &student.class_id)?;
    store::require_parent(conn, TABLE, "parent_id", "parent_details", "parent_id", &student.parent_id)?;
    Ok(())
}

pub fn insert(
    conn: &Connection,
    student: &models::StudentDetails,
) -> StoreResult<models::StudentDetails> {
    let tx = store::write_tx(conn)?;
    validate(&tx, student)?;
    log::trace!(
        "[students::insert] inserting {} (class {}, roll {})",
        student.student_id,
        student.class_id,
        student.roll_no
    );

    tx.execute(
        "INSERT INTO student_details( student_id,  first_name,  last_name,  date_of_birth,
                                      class_id,  roll_no,  email_id,  parent_id,
                                      registration_date,  registration_id)
         VALUES                    (:student_id, :first_name, :last_name, :date_of_birth,
                                    :class_id, :roll_no, :email_id, :parent_id,
                                    :registration_date, :registration_id)",
        rusqlite::named_params! {
            ":student_id": student.student_id,
            ":first_name": student.first_name,
            ":last_name": student.last_name,
            ":date_of_birth": student.date_of_birth,
            ":class_id": student.class_id,
            ":roll_no": student.roll_no,
            ":email_id": student.email_id,
            ":parent_id": student.parent_id,
            ":registration_date": student.registration_date,
            ":registration_id": student.registration_id,
        },
    )
    .inspect_err(|err| log::warn!("[students::insert] rejected {}: {err}", student.student_id))?;
    tx.commit()?;

    log::info!("Student {} has been added.", student.student_id);
    Ok(student.clone())
}

pub fn get(conn: &Connection, student_id: &str) -> StoreResult<Option<models::StudentDetails>> {
    Ok(conn
        .query_row(
            "SELECT * FROM student_details WHERE student_id = ?",
            [student_id],
            |row| models::StudentDetails::try_from(row),
        )
        .optional()?)
}

pub fn list(conn: &Connection) -> StoreResult<Vec<models::StudentDetails>> {
    let mut stmt = conn.prepare("SELECT * FROM student_details ORDER BY class_id, roll_no")?;
    let students = stmt
        .query_map([], |row| models::StudentDetails::try_from(row))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(students)
}

pub fn list_by_class(
    conn: &Connection,
    class_id: &str,
) -> StoreResult<Vec<models::StudentDetails>> {
    let mut stmt =
        conn.prepare("SELECT * FROM student_details WHERE class_id = ? ORDER BY roll_no")?;
    let students = stmt
        .query_map([class_id], |row| models::StudentDetails::try_from(row))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(students)
}

pub fn list_by_parent(
    conn: &Connection,
    parent_id: &str,
) -> StoreResult<Vec<models::StudentDetails>> {
    let mut stmt =
        conn.prepare("SELECT * FROM student_details WHERE parent_id = ? ORDER BY student_id")?;
    let students = stmt
        .query_map([parent_id], |row| models::StudentDetails::try_from(row))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(students)
}

pub fn update(
    conn: &Connection,
    student: &models::StudentDetails,
) -> StoreResult<models::StudentDetails> {
    let tx = store::write_tx(conn)?;
    validate(&tx, student)?;
    let changed = tx.execute(
        "UPDATE student_details SET
            first_name = :first_name,
            last_name = :last_name,
            date_of_birth = :date_of_birth,
            class_id = :class_id,
            roll_no = :roll_no,
            email_id = :email_id,
            parent_id = :parent_id,
            registration_date = :registration_date,
            registration_id = :registration_id
         WHERE student_id = :student_id",
        rusqlite::named_params! {
            ":student_id": student.student_id,
            ":first_name": student.first_name,
            ":last_name": student.last_name,
            ":date_of_birth": student.date_of_birth,
            ":class_id": student.class_id,
            ":roll_no": student.roll_no,
            ":email_id": student.email_id,
            ":parent_id": student.parent_id,
            ":registration_date": student.registration_date,
            ":registration_id": student.registration_id,
        },
    )?;
    if changed == 0 {
        return Err(StoreError::not_found(TABLE, &student.student_id));
    }
    tx.commit()?;
    log::info!("Student {} has been updated.", student.student_id);
    Ok(student.clone())
}

pub fn delete(conn: &Connection, student_id: &str) -> StoreResult<DeleteSummary> {
    store::delete_cascading(conn, TABLE, "student_id", student_id, &DEPENDENTS)
}
