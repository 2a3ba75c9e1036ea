use rusqlite::{Connection, OptionalExtension};

use crate::error::{StoreError, StoreResult};
use crate::models;
use crate::store::{self, DeleteSummary, DependentEdge};

const TABLE: &str = "parent_details";

const DEPENDENTS: [DependentEdge; 2] = [
    DependentEdge {
        table: "student_details",
        column: "parent_id",
        count_sql: "SELECT COUNT(*) FROM student_details WHERE parent_id = ?",
    },
    DependentEdge {
        table: "exam_results",
        column: "student_id",
        count_sql: "SELECT COUNT(*)
                    FROM exam_results er
                    JOIN student_details s ON s.student_id = er.student_id
                    WHERE s.parent_id = ?",
    },
];

impl<'a> TryFrom<&'a rusqlite::Row<'a>> for models::ParentDetails {
    type Error = rusqlite::Error;

    fn try_from(row: &rusqlite::Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            parent_id: row.get("parent_id")?,
            father_name: row.get("father_name")?,
            father_email: row.get("father_email")?,
            father_mobile: row.get("father_mobile")?,
            father_occupation: row.get("father_occupation")?,
            mother_name: row.get("mother_name")?,
            mother_email: row.get("mother_email")?,
            mother_mobile: row.get("mother_mobile")?,
            mother_occupation: row.get("mother_occupation")?,
        })
    }
}

fn validate(parent: &models::ParentDetails) -> StoreResult<()> {
    store::require_key(TABLE, "parent_id", &parent.parent_id)?;
    let named = |n: &Option<String>| n.as_deref().is_some_and(|s| !s.trim().is_empty());
    if !named(&parent.father_name) && !named(&parent.mother_name) {
        return Err(StoreError::constraint(
            TABLE,
            "father_name",
            "at least one of father_name or mother_name is required",
        ));
    }
    Ok(())
}

/// Blank guardian emails are stored as NULL so they stay out of the unique
/// constraints.
fn normalized(parent: &models::ParentDetails) -> models::ParentDetails {
    let present = |v: &Option<String>| v.as_ref().filter(|s| !s.trim().is_empty()).cloned();
    models::ParentDetails {
        father_email: present(&parent.father_email),
        mother_email: present(&parent.mother_email),
        ..parent.clone()
    }
}

pub fn insert(
    conn: &Connection,
    parent: &models::ParentDetails,
) -> StoreResult<models::ParentDetails> {
    validate(parent)?;
    let parent = &normalized(parent);
    log::trace!("[parents::insert] inserting {}", parent.parent_id);

    conn.execute(
        "INSERT INTO parent_details(
            parent_id, father_name, father_email, father_mobile, father_occupation,
            mother_name, mother_email, mother_mobile, mother_occupation)
         VALUES(
            :parent_id, :father_name, :father_email, :father_mobile, :father_occupation,
            :mother_name, :mother_email, :mother_mobile, :mother_occupation)",
        rusqlite::named_params! {
            ":parent_id": parent.parent_id,
            ":father_name": parent.father_name,
            ":father_email": parent.father_email,
            ":father_mobile": parent.father_mobile,
            ":father_occupation": parent.father_occupation,
            ":mother_name": parent.mother_name,
            ":mother_email": parent.mother_email,
            ":mother_mobile": parent.mother_mobile,
            ":mother_occupation": parent.mother_occupation,
        },
    )
    .inspect_err(|err| log::warn!("[parents::insert] rejected {}: {err}", parent.parent_id))?;

    log::info!("Parent {} has been added.", parent.parent_id);
    Ok(parent.clone())
}

pub fn get(conn: &Connection, parent_id: &str) -> StoreResult<Option<models::ParentDetails>> {
    Ok(conn
        .query_row(
            "SELECT * FROM parent_details WHERE parent_id = ?",
            [parent_id],
            |row| models::ParentDetails::try_from(row),
        )
        .optional()?)
}

pub fn list(conn: &Connection) -> StoreResult<Vec<models::ParentDetails>> {
    let mut stmt = conn.prepare("SELECT * FROM parent_details ORDER BY parent_id")?;
    let parents = stmt
        .query_map([], |row| models::ParentDetails::try_from(row))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(parents)
}

pub fn update(
    conn: &Connection,
    parent: &models::ParentDetails,
) -> StoreResult<models::ParentDetails> {
    validate(parent)?;
    let parent = &normalized(parent);
    let changed = conn.execute(
        "UPDATE parent_details SET
            father_name = :father_name,
            father_email = :father_email,
            father_mobile = :father_mobile,
            father_occupation = :father_occupation,
            mother_name = :mother_name,
            mother_email = :mother_email,
            mother_mobile = :mother_mobile,
            mother_occupation = :mother_occupation
         WHERE parent_id = :parent_id",
        rusqlite::named_params! {
            ":parent_id": parent.parent_id,
            ":father_name": parent.father_name,
            ":father_email": parent.father_email,
            ":father_mobile": parent.father_mobile,
            ":father_occupation": parent.father_occupation,
            ":mother_name": parent.mother_name,
            ":mother_email": parent.mother_email,
            ":mother_mobile": parent.mother_mobile,
            ":mother_occupation": parent.mother_occupation,
        },
    )?;
    if changed == 0 {
        return Err(StoreError::not_found(TABLE, &parent.parent_id));
    }
    log::info!("Parent {} has been updated.", parent.parent_id);
    Ok(parent.clone())
}

/// Deleting a parent removes their students, and with them the students'
/// exam results.
pub fn delete(conn: &Connection, parent_id: &str) -> StoreResult<DeleteSummary> {
    store::delete_cascading(conn, TABLE, "parent_id", parent_id, &DEPENDENTS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::store::fixtures::{self, parent};

    #[test]
    fn father_and_mother_emails_are_separate_uniqueness_domains() {
        let conn = db::open_in_memory();
        let mut p1 = parent("P1");
        p1.father_email = Some("shared@home.test".to_string());
        p1.mother_email = Some("m1@home.test".to_string());
        insert(&conn, &p1).expect("p1");

        // Same address on the mother column does not collide with a father email.
        let mut p2 = parent("P2");
        p2.father_email = Some("f2@home.test".to_string());
        p2.mother_email = Some("shared@home.test".to_string());
        insert(&conn, &p2).expect("p2");

        let mut p3 = parent("P3");
        p3.father_email = Some("shared@home.test".to_string());
        p3.mother_email = Some("m3@home.test".to_string());
        match insert(&conn, &p3).expect_err("father email reused") {
            StoreError::Uniqueness { table, columns } => {
                assert_eq!(table, "parent_details");
                assert_eq!(columns, vec!["father_email".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_emails_do_not_collide() {
        let conn = db::open_in_memory();
        for id in ["P1", "P2"] {
            let p = models::ParentDetails {
                parent_id: id.to_string(),
                mother_name: Some("Ann".to_string()),
                ..Default::default()
            };
            insert(&conn, &p).expect("insert without emails");
        }
        assert_eq!(list(&conn).expect("list").len(), 2);
    }

    #[test]
    fn blank_emails_are_stored_as_null() {
        let conn = db::open_in_memory();
        for id in ["P1", "P2"] {
            let mut p = parent(id);
            p.father_email = Some(String::new());
            p.mother_email = Some("  ".to_string());
            let stored = insert(&conn, &p).expect("blank emails");
            assert_eq!(stored.father_email, None);
        }
        let p2 = get(&conn, "P2").expect("get").expect("row");
        assert_eq!(p2.father_email, None);
        assert_eq!(p2.mother_email, None);

        let mut p1 = parent("P1");
        p1.father_email = Some(String::new());
        update(&conn, &p1).expect("update with blank father email");
        assert_eq!(get(&conn, "P1").expect("get").expect("row").father_email, None);
    }

    #[test]
    fn padded_key_is_refused() {
        let conn = db::open_in_memory();
        match insert(&conn, &parent(" P1 ")).expect_err("padded key") {
            StoreError::Constraint { column, .. } => assert_eq!(column.as_deref(), Some("parent_id")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(list(&conn).expect("list").is_empty());
    }

    #[test]
    fn at_least_one_guardian_name_is_required() {
        let conn = db::open_in_memory();
        let p = models::ParentDetails {
            parent_id: "P1".to_string(),
            ..Default::default()
        };
        assert!(matches!(insert(&conn, &p), Err(StoreError::Constraint { .. })));
        assert!(get(&conn, "P1").expect("get").is_none());
    }

    #[test]
    fn delete_cascades_to_students_and_their_results() {
        let conn = db::open_in_memory();
        fixtures::seed(&conn);
        store::results::insert(&conn, &fixtures::exam("S1", "SUB1", 72.0, 100.0))
            .expect("result");

        let summary = delete(&conn, "P1").expect("delete parent");
        assert_eq!(summary.cascaded_rows("student_details"), 1);
        assert_eq!(summary.cascaded_rows("exam_results"), 1);
        assert!(store::students::get(&conn, "S1").expect("get").is_none());
        assert!(store::results::list(&conn).expect("list").is_empty());
        // Class and subject are untouched.
        assert!(store::classes::get(&conn, "C1").expect("get").is_some());
        assert!(store::subjects::get(&conn, "SUB1").expect("get").is_some());
    }
}
