use rusqlite::{Connection, OptionalExtension};

use crate::error::{StoreError, StoreResult};
use crate::models;
use crate::store::{self, DeleteSummary};

const TABLE: &str = "user_login";

impl<'a> TryFrom<&'a rusqlite::Row<'a>> for models::UserLogin {
    type Error = rusqlite::Error;

    fn try_from(row: &rusqlite::Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            user_id: row.get("user_id")?,
            password: row.get("password")?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            sign_up_on: row.get("sign_up_on")?,
            email_id: row.get("email_id")?,
        })
    }
}

fn validate(user: &models::UserLogin) -> StoreResult<()> {
    store::require_key(TABLE, "user_id", &user.user_id)?;
    store::require_text(TABLE, "email_id", &user.email_id)?;
    Ok(())
}

pub fn insert(conn: &Connection, user: &models::UserLogin) -> StoreResult<models::UserLogin> {
    validate(user)?;
    store::require_text(TABLE, "password", &user.password)?;
    log::trace!("[users::insert] inserting {}", user.user_id);

    conn.execute(
        "INSERT INTO user_login( user_id,  password,  first_name,  last_name,  sign_up_on,  email_id)
         VALUES                (:user_id, :password, :first_name, :last_name, :sign_up_on, :email_id)",
        rusqlite::named_params! {
            ":user_id": user.user_id,
            ":password": user.password,
            ":first_name": user.first_name,
            ":last_name": user.last_name,
            ":sign_up_on": user.sign_up_on,
            ":email_id": user.email_id,
        },
    )
    .inspect_err(|err| log::warn!("[users::insert] rejected {}: {err}", user.user_id))?;

    log::info!("User {} has been added.", user.user_id);
    Ok(user.clone())
}

pub fn get(conn: &Connection, user_id: &str) -> StoreResult<Option<models::UserLogin>> {
    Ok(conn
        .query_row(
            "SELECT * FROM user_login WHERE user_id = ?",
            [user_id],
            |row| models::UserLogin::try_from(row),
        )
        .optional()?)
}

pub fn find_by_email(conn: &Connection, email_id: &str) -> StoreResult<Option<models::UserLogin>> {
    Ok(conn
        .query_row(
            "SELECT * FROM user_login WHERE email_id = ?",
            [email_id],
            |row| models::UserLogin::try_from(row),
        )
        .optional()?)
}

pub fn list(conn: &Connection) -> StoreResult<Vec<models::UserLogin>> {
    let mut stmt = conn.prepare("SELECT * FROM user_login ORDER BY user_id")?;
    let users = stmt
        .query_map([], |row| models::UserLogin::try_from(row))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(users)
}

/// A blank `password` leaves the stored credential unchanged, so a record read
/// back from `get` (which never carries it) can be written straight back.
pub fn update(conn: &Connection, user: &models::UserLogin) -> StoreResult<models::UserLogin> {
    validate(user)?;
    let changed = conn.execute(
        "UPDATE user_login SET
            password = CASE WHEN TRIM(:password) = '' THEN password ELSE :password END,
            first_name = :first_name,
            last_name = :last_name,
            sign_up_on = :sign_up_on,
            email_id = :email_id
         WHERE user_id = :user_id",
        rusqlite::named_params! {
            ":user_id": user.user_id,
            ":password": user.password,
            ":first_name": user.first_name,
            ":last_name": user.last_name,
            ":sign_up_on": user.sign_up_on,
            ":email_id": user.email_id,
        },
    )?;
    if changed == 0 {
        return Err(StoreError::not_found(TABLE, &user.user_id));
    }
    log::info!("User {} has been updated.", user.user_id);
    get(conn, &user.user_id)?.ok_or_else(|| StoreError::not_found(TABLE, &user.user_id))
}

pub fn delete(conn: &Connection, user_id: &str) -> StoreResult<DeleteSummary> {
    store::delete_cascading(conn, TABLE, "user_id", user_id, &[])
}
