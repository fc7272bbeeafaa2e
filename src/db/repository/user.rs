use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;

/// Inserts an account. Fails with `ConstraintViolation` if the e-mail exists.
pub fn insert_user(conn: &Connection, email: &str, password_hash: &str) -> Result<(), DatabaseError> {
    let result = conn.execute(
        "INSERT INTO user_accounts (email, password_hash, created_at) VALUES (?1, ?2, ?3)",
        params![email, password_hash, Utc::now()],
    );
    match result {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(DatabaseError::ConstraintViolation(format!(
                "account already exists: {email}"
            )))
        }
        Err(e) => Err(e.into()),
    }
}

/// Stored password hash for an e-mail, if the account exists.
pub fn get_password_hash(conn: &Connection, email: &str) -> Result<Option<String>, DatabaseError> {
    conn.query_row(
        "SELECT password_hash FROM user_accounts WHERE email = ?1",
        params![email],
        |row| row.get(0),
    )
    .optional()
    .map_err(DatabaseError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    #[test]
    fn insert_and_fetch_hash() {
        let conn = open_memory_database().unwrap();
        insert_user(&conn, "a@b.pl", "hash").unwrap();
        assert_eq!(get_password_hash(&conn, "a@b.pl").unwrap().as_deref(), Some("hash"));
        assert!(get_password_hash(&conn, "missing@b.pl").unwrap().is_none());
    }

    #[test]
    fn duplicate_email_is_constraint_violation() {
        let conn = open_memory_database().unwrap();
        insert_user(&conn, "a@b.pl", "hash").unwrap();
        let err = insert_user(&conn, "a@b.pl", "other").unwrap_err();
        assert!(matches!(err, DatabaseError::ConstraintViolation(_)));
    }
}
