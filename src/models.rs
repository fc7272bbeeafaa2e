//! Persisted process records and the shapes used to create and edit them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimum description length accepted at submission time.
pub const MIN_DESCRIPTION_CHARS: usize = 20;

/// Length of the description preview shown for malformed records.
const PREVIEW_CHARS: usize = 50;

/// A business process submitted by one owner, with its AI recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub id: i64,
    pub owner_key: String,
    pub title: String,
    pub description: String,
    pub ai_analysis: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProcessRecord {
    /// Title and description must both carry text to be rendered.
    pub fn is_renderable(&self) -> bool {
        !self.title.trim().is_empty() && !self.description.trim().is_empty()
    }

    /// `YYYY-MM-DD` creation date.
    pub fn created_date(&self) -> String {
        self.created_at.format("%Y-%m-%d").to_string()
    }
}

/// Fields needed to insert a record. `id` and `created_at` come from the store.
#[derive(Debug, Clone)]
pub struct NewProcess {
    pub owner_key: String,
    pub title: String,
    pub description: String,
    pub ai_analysis: String,
}

/// Editable fields of an existing record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessUpdate {
    pub title: String,
    pub description: String,
    pub ai_analysis: String,
}

/// Summary of a record that cannot be rendered normally.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MalformedProcess {
    pub id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub description_preview: String,
}

impl From<&ProcessRecord> for MalformedProcess {
    fn from(record: &ProcessRecord) -> Self {
        let description_preview = if record.description.is_empty() {
            "BRAK".to_string()
        } else if record.description.chars().count() > PREVIEW_CHARS {
            let head: String = record.description.chars().take(PREVIEW_CHARS).collect();
            format!("{head}...")
        } else {
            record.description.clone()
        };
        Self {
            id: record.id,
            title: record.title.clone(),
            created_at: record.created_at,
            description_preview,
        }
    }
}

/// Records split into renderable ones and malformed ones, order preserved.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PartitionedProcesses {
    pub processes: Vec<ProcessRecord>,
    pub malformed: Vec<MalformedProcess>,
}

/// Segregate records that fail [`ProcessRecord::is_renderable`].
pub fn partition_renderable(records: Vec<ProcessRecord>) -> PartitionedProcesses {
    let mut out = PartitionedProcesses::default();
    for record in records {
        if record.is_renderable() {
            out.processes.push(record);
        } else {
            out.malformed.push(MalformedProcess::from(&record));
        }
    }
    out
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{Duration, TimeZone, Utc};

    use super::ProcessRecord;

    /// Record `n` created `n` days after 2025-06-01, owned by `owner`.
    pub fn record(n: i64, owner: &str) -> ProcessRecord {
        let base = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        ProcessRecord {
            id: n,
            owner_key: owner.to_string(),
            title: format!("Proces {n}"),
            description: format!("Opis procesu numer {n}, wystawianie faktur ręcznie."),
            ai_analysis: format!("🔍 **ANALIZA:** rekomendacja {n}"),
            created_at: base + Duration::days(n),
            updated_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::record;
    use super::*;

    #[test]
    fn renderable_requires_title_and_description() {
        let mut r = record(1, "a@b.pl");
        assert!(r.is_renderable());
        r.title = "   ".into();
        assert!(!r.is_renderable());
        r.title = "ok".into();
        r.description = String::new();
        assert!(!r.is_renderable());
    }

    #[test]
    fn partition_keeps_order_and_segregates() {
        let mut broken = record(2, "a@b.pl");
        broken.title = String::new();
        let parts = partition_renderable(vec![record(3, "a@b.pl"), broken, record(1, "a@b.pl")]);
        assert_eq!(parts.processes.iter().map(|r| r.id).collect::<Vec<_>>(), vec![3, 1]);
        assert_eq!(parts.malformed.len(), 1);
        assert_eq!(parts.malformed[0].id, 2);
    }

    #[test]
    fn malformed_preview_is_capped() {
        let mut r = record(4, "a@b.pl");
        r.title = String::new();
        r.description = "x".repeat(80);
        let summary = MalformedProcess::from(&r);
        assert_eq!(summary.description_preview, format!("{}...", "x".repeat(50)));
    }

    #[test]
    fn malformed_preview_marks_missing_description() {
        let mut r = record(5, "a@b.pl");
        r.description = String::new();
        assert_eq!(MalformedProcess::from(&r).description_preview, "BRAK");
    }

    #[test]
    fn created_date_is_iso_day() {
        assert_eq!(record(1, "a@b.pl").created_date(), "2025-06-02");
    }
}
