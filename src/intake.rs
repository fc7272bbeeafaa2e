//! Process intake: validate a submission, obtain its AI recommendation,
//! persist it, and manage the owner's saved records.

use rusqlite::Connection;
use serde::Deserialize;
use thiserror::Error;

use crate::analysis::{self, AnalysisDepth, AnalysisError, CompanyContext, CompletionClient};
use crate::db::{self, DatabaseError};
use crate::models::{
    partition_renderable, NewProcess, PartitionedProcesses, ProcessRecord, ProcessUpdate,
    MIN_DESCRIPTION_CHARS,
};

#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("{0}")]
    Validation(String),

    #[error("Analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// A new process as entered in the intake form.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessSubmission {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub depth: AnalysisDepth,
    #[serde(flatten)]
    pub company: CompanyContext,
}

fn validate_submission(title: &str, description: &str) -> Result<(), IntakeError> {
    if title.trim().is_empty() || description.trim().is_empty() {
        return Err(IntakeError::Validation("Wypełnij wszystkie pola!".into()));
    }
    if description.trim().chars().count() < MIN_DESCRIPTION_CHARS {
        return Err(IntakeError::Validation(format!(
            "Opis musi mieć co najmniej {MIN_DESCRIPTION_CHARS} znaków"
        )));
    }
    Ok(())
}

fn validate_update(update: &ProcessUpdate) -> Result<(), IntakeError> {
    if update.title.trim().is_empty()
        || update.description.trim().is_empty()
        || update.ai_analysis.trim().is_empty()
    {
        return Err(IntakeError::Validation("Wszystkie pola są wymagane".into()));
    }
    Ok(())
}

/// Validate, analyse and store a submission for `owner_key`.
///
/// Nothing is stored when the analysis fails.
pub fn submit_process(
    conn: &Connection,
    client: &dyn CompletionClient,
    owner_key: &str,
    submission: &ProcessSubmission,
) -> Result<ProcessRecord, IntakeError> {
    let title = submission.title.trim();
    let description = submission.description.trim();
    validate_submission(title, description)?;

    let ai_analysis = analysis::analyze_process(
        client,
        title,
        description,
        submission.depth,
        &submission.company,
    )
    .inspect_err(|e| tracing::warn!(error = %e, "Analysis failed, submission not saved"))?;

    let record = db::insert_process(
        conn,
        &NewProcess {
            owner_key: owner_key.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            ai_analysis,
        },
    )?;
    tracing::info!(id = record.id, depth = submission.depth.as_str(), "Process saved");
    Ok(record)
}

pub fn list_processes(conn: &Connection, owner_key: &str) -> Result<PartitionedProcesses, IntakeError> {
    let records = db::list_processes_by_owner(conn, owner_key)?;
    let parts = partition_renderable(records);
    if !parts.malformed.is_empty() {
        tracing::warn!(count = parts.malformed.len(), "Malformed process records");
    }
    Ok(parts)
}

/// Replace title, description and analysis of an owned record.
///
/// Title and description are trimmed like a new submission.
pub fn edit_process(
    conn: &Connection,
    owner_key: &str,
    id: i64,
    update: &ProcessUpdate,
) -> Result<ProcessRecord, IntakeError> {
    validate_update(update)?;
    let trimmed = ProcessUpdate {
        title: update.title.trim().to_string(),
        description: update.description.trim().to_string(),
        ai_analysis: update.ai_analysis.clone(),
    };
    let record = db::update_process(conn, id, owner_key, &trimmed)?;
    tracing::info!(id, "Process updated");
    Ok(record)
}

pub fn remove_process(conn: &Connection, owner_key: &str, id: i64) -> Result<(), IntakeError> {
    db::delete_process(conn, id, owner_key)?;
    tracing::info!(id, "Process deleted");
    Ok(())
}
