//! Owner-scoped CRUD for process records.
//!
//! Every read and write filters on `owner_key`; a record owned by someone
//! else is reported as `NotFound`, never as a permission error.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::DatabaseError;
use crate::models::{NewProcess, ProcessRecord, ProcessUpdate};

const SELECT_COLUMNS: &str =
    "SELECT id, owner_key, title, description, ai_analysis, created_at, updated_at FROM processes";

fn row_to_process(row: &Row<'_>) -> rusqlite::Result<ProcessRecord> {
    Ok(ProcessRecord {
        id: row.get(0)?,
        owner_key: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        ai_analysis: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn not_found(id: i64) -> DatabaseError {
    DatabaseError::NotFound {
        entity_type: "Process".into(),
        id: id.to_string(),
    }
}

/// Inserts a record and returns it with its assigned id and timestamp.
pub fn insert_process(conn: &Connection, new: &NewProcess) -> Result<ProcessRecord, DatabaseError> {
    let created_at = Utc::now();
    conn.execute(
        "INSERT INTO processes (owner_key, title, description, ai_analysis, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![new.owner_key, new.title, new.description, new.ai_analysis, created_at],
    )?;

    Ok(ProcessRecord {
        id: conn.last_insert_rowid(),
        owner_key: new.owner_key.clone(),
        title: new.title.clone(),
        description: new.description.clone(),
        ai_analysis: new.ai_analysis.clone(),
        created_at,
        updated_at: None,
    })
}

/// Lists an owner's records, newest first.
pub fn list_processes_by_owner(
    conn: &Connection,
    owner_key: &str,
) -> Result<Vec<ProcessRecord>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_COLUMNS} WHERE owner_key = ?1 ORDER BY created_at DESC, id DESC"
    ))?;
    let rows = stmt.query_map(params![owner_key], row_to_process)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn get_process(
    conn: &Connection,
    id: i64,
    owner_key: &str,
) -> Result<ProcessRecord, DatabaseError> {
    conn.query_row(
        &format!("{SELECT_COLUMNS} WHERE id = ?1 AND owner_key = ?2"),
        params![id, owner_key],
        row_to_process,
    )
    .optional()?
    .ok_or_else(|| not_found(id))
}

/// Replaces the editable fields and refreshes `updated_at`.
pub fn update_process(
    conn: &Connection,
    id: i64,
    owner_key: &str,
    update: &ProcessUpdate,
) -> Result<ProcessRecord, DatabaseError> {
    let changed = conn.execute(
        "UPDATE processes SET title = ?1, description = ?2, ai_analysis = ?3, updated_at = ?4
         WHERE id = ?5 AND owner_key = ?6",
        params![
            update.title,
            update.description,
            update.ai_analysis,
            Utc::now(),
            id,
            owner_key
        ],
    )?;
    if changed == 0 {
        return Err(not_found(id));
    }
    get_process(conn, id, owner_key)
}

pub fn delete_process(conn: &Connection, id: i64, owner_key: &str) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "DELETE FROM processes WHERE id = ?1 AND owner_key = ?2",
        params![id, owner_key],
    )?;
    if changed == 0 {
        return Err(not_found(id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    const OWNER: &str = "test@smartflow.pl";
    const OTHER: &str = "someone@else.pl";

    fn new_process(owner: &str, title: &str) -> NewProcess {
        NewProcess {
            owner_key: owner.into(),
            title: title.into(),
            description: "Ręczne wystawianie faktur w Excelu co tydzień".into(),
            ai_analysis: "🔍 **ANALIZA:** automatyzacja przez Zapier".into(),
        }
    }

    #[test]
    fn insert_assigns_id_and_timestamp() {
        let conn = open_memory_database().unwrap();
        let a = insert_process(&conn, &new_process(OWNER, "A")).unwrap();
        let b = insert_process(&conn, &new_process(OWNER, "B")).unwrap();
        assert!(b.id > a.id);
        assert!(a.updated_at.is_none());

        let stored = get_process(&conn, a.id, OWNER).unwrap();
        assert_eq!(stored, a);
    }

    #[test]
    fn list_is_owner_scoped_and_newest_first() {
        let conn = open_memory_database().unwrap();
        insert_process(&conn, &new_process(OWNER, "first")).unwrap();
        insert_process(&conn, &new_process(OTHER, "foreign")).unwrap();
        insert_process(&conn, &new_process(OWNER, "second")).unwrap();

        let mine = list_processes_by_owner(&conn, OWNER).unwrap();
        let titles: Vec<_> = mine.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["second", "first"]);
        assert!(mine.iter().all(|p| p.owner_key == OWNER));
    }

    #[test]
    fn list_for_unknown_owner_is_empty() {
        let conn = open_memory_database().unwrap();
        insert_process(&conn, &new_process(OWNER, "A")).unwrap();
        assert!(list_processes_by_owner(&conn, "nobody@x.pl").unwrap().is_empty());
    }

    #[test]
    fn update_refreshes_fields_and_timestamp() {
        let conn = open_memory_database().unwrap();
        let p = insert_process(&conn, &new_process(OWNER, "A")).unwrap();
        let update = ProcessUpdate {
            title: "A2".into(),
            description: "Nowy opis procesu z wieloma krokami".into(),
            ai_analysis: "Nowa analiza".into(),
        };
        let updated = update_process(&conn, p.id, OWNER, &update).unwrap();
        assert_eq!(updated.title, "A2");
        assert_eq!(updated.ai_analysis, "Nowa analiza");
        assert_eq!(updated.created_at, p.created_at);
        assert!(updated.updated_at.is_some());
    }

    #[test]
    fn update_by_other_owner_is_not_found() {
        let conn = open_memory_database().unwrap();
        let p = insert_process(&conn, &new_process(OWNER, "A")).unwrap();
        let update = ProcessUpdate {
            title: "hijack".into(),
            description: "x".into(),
            ai_analysis: "y".into(),
        };
        let err = update_process(&conn, p.id, OTHER, &update).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
        assert_eq!(get_process(&conn, p.id, OWNER).unwrap().title, "A");
    }

    #[test]
    fn delete_requires_ownership() {
        let conn = open_memory_database().unwrap();
        let p = insert_process(&conn, &new_process(OWNER, "A")).unwrap();

        assert!(matches!(
            delete_process(&conn, p.id, OTHER),
            Err(DatabaseError::NotFound { .. })
        ));
        delete_process(&conn, p.id, OWNER).unwrap();
        assert!(matches!(
            get_process(&conn, p.id, OWNER),
            Err(DatabaseError::NotFound { .. })
        ));
    }

    #[test]
    fn delete_nonexistent_is_not_found() {
        let conn = open_memory_database().unwrap();
        assert!(matches!(
            delete_process(&conn, 999, OWNER),
            Err(DatabaseError::NotFound { .. })
        ));
    }
}
