//! Report downloads: paginated PDF and plain text.

use std::path::Path;

use axum::extract::{Query, State};
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use rusqlite::Connection;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, UserContext};
use crate::intake;
use crate::models::ProcessRecord;
use crate::report::{
    self, build_paginated_document, build_plain_text_export, ReportError, PDF_FILENAME,
    TEXT_FILENAME,
};

const PDF_MIME: &str = "application/pdf";
const TEXT_MIME: &str = "text/plain; charset=utf-8";

/// Set on a PDF request answered with the plain-text export.
pub const FALLBACK_HEADER: &str = "X-Report-Fallback";

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub header: Option<String>,
    pub footer: Option<String>,
    /// Also write the artifact into the exports directory.
    #[serde(default)]
    pub save: bool,
}

impl ReportQuery {
    fn header(&self) -> String {
        non_blank(&self.header).unwrap_or(report::DEFAULT_HEADER).to_string()
    }

    fn footer(&self) -> String {
        non_blank(&self.footer).unwrap_or(report::DEFAULT_FOOTER).to_string()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Renderable records of the owner, newest first. Empty is an error.
fn report_records(conn: &Connection, owner_key: &str) -> Result<Vec<ProcessRecord>, ApiError> {
    let records = intake::list_processes(conn, owner_key)?.processes;
    if records.is_empty() {
        return Err(ApiError::NoProcesses);
    }
    Ok(records)
}

fn attachment(bytes: Vec<u8>, mime: &'static str, filename: &str) -> Response {
    let disposition = format!("attachment; filename=\"{filename}\"");
    let mut response = ([(header::CONTENT_TYPE, mime)], bytes).into_response();
    if let Ok(val) = HeaderValue::from_str(&disposition) {
        response.headers_mut().insert(header::CONTENT_DISPOSITION, val);
    }
    response
}

fn maybe_save(save: bool, bytes: &[u8], filename: &str, dir: &Path) -> Result<(), ApiError> {
    if save {
        report::export_to_file(bytes, filename, dir)?;
    }
    Ok(())
}

/// PDF attachment from `render`, or the plain-text export with
/// [`FALLBACK_HEADER`] set when rendering fails.
fn pdf_or_fallback<F>(
    records: &[ProcessRecord],
    query: &ReportQuery,
    exports_dir: &Path,
    render: F,
) -> Result<Response, ApiError>
where
    F: FnOnce(&[ProcessRecord], &str, &str) -> Result<Vec<u8>, ReportError>,
{
    let (header, footer) = (query.header(), query.footer());

    match render(records, &header, &footer) {
        Ok(bytes) => {
            maybe_save(query.save, &bytes, PDF_FILENAME, exports_dir)?;
            Ok(attachment(bytes, PDF_MIME, PDF_FILENAME))
        }
        Err(ReportError::Rendering(detail)) => {
            tracing::warn!(detail = %detail, "PDF rendering failed, serving plain text");
            let text = build_plain_text_export(records, &header, &footer).into_bytes();
            maybe_save(query.save, &text, TEXT_FILENAME, exports_dir)?;
            let mut response = attachment(text, TEXT_MIME, TEXT_FILENAME);
            response
                .headers_mut()
                .insert(FALLBACK_HEADER, HeaderValue::from_static("text"));
            Ok(response)
        }
        Err(e) => Err(e.into()),
    }
}

/// `GET /api/reports/pdf`
pub async fn pdf(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, ApiError> {
    let exports_dir = ctx.config.exports_dir();
    ctx.blocking(move |conn, _| {
        let records = report_records(conn, &user.owner_key)?;
        pdf_or_fallback(&records, &query, &exports_dir, build_paginated_document)
    })
    .await
}

/// `GET /api/reports/text`
pub async fn text(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, ApiError> {
    let exports_dir = ctx.config.exports_dir();
    ctx.blocking(move |conn, _| {
        let records = report_records(conn, &user.owner_key)?;
        let text = build_plain_text_export(&records, &query.header(), &query.footer()).into_bytes();
        maybe_save(query.save, &text, TEXT_FILENAME, &exports_dir)?;
        Ok(attachment(text, TEXT_MIME, TEXT_FILENAME))
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    use crate::models::fixtures::record;

    fn failing_render(_: &[ProcessRecord], _: &str, _: &str) -> Result<Vec<u8>, ReportError> {
        Err(ReportError::Rendering("font table missing".into()))
    }

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn blank_query_values_use_defaults() {
        let query = ReportQuery {
            header: Some("  ".into()),
            footer: None,
            save: false,
        };
        assert_eq!(query.header(), report::DEFAULT_HEADER);
        assert_eq!(query.footer(), report::DEFAULT_FOOTER);

        let query = ReportQuery {
            header: Some("Raport Q3".into()),
            ..Default::default()
        };
        assert_eq!(query.header(), "Raport Q3");
    }

    #[test]
    fn attachment_sets_disposition() {
        let response = attachment(b"abc".to_vec(), TEXT_MIME, TEXT_FILENAME);
        assert_eq!(response.headers()[header::CONTENT_TYPE], TEXT_MIME);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Lista_przeanalizowanych_procesow.txt\""
        );
    }

    #[tokio::test]
    async fn rendering_failure_serves_full_plain_text() {
        let tmp = tempfile::tempdir().unwrap();
        let records = vec![record(1, "owner@smartflow.pl"), record(2, "owner@smartflow.pl")];
        let query = ReportQuery {
            header: Some("Raport: księgowość".into()),
            ..Default::default()
        };

        let response = pdf_or_fallback(&records, &query, tmp.path(), failing_render).unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
        assert_eq!(response.headers()[FALLBACK_HEADER], "text");
        assert_eq!(response.headers()[header::CONTENT_TYPE], TEXT_MIME);
        let body = body_text(response).await;
        assert_eq!(
            body,
            build_plain_text_export(&records, "Raport: księgowość", report::DEFAULT_FOOTER)
        );
        assert!(body.contains("faktur ręcznie"));
        assert!(body.contains("🔍 **ANALIZA:** rekomendacja 2"));
        assert!(!tmp.path().join(TEXT_FILENAME).exists());
    }

    #[tokio::test]
    async fn rendering_failure_saves_text_artifact() {
        let tmp = tempfile::tempdir().unwrap();
        let records = vec![record(1, "owner@smartflow.pl")];
        let query = ReportQuery {
            save: true,
            ..Default::default()
        };

        let response = pdf_or_fallback(&records, &query, tmp.path(), failing_render).unwrap();
        assert_eq!(response.headers()[FALLBACK_HEADER], "text");

        let saved = std::fs::read_to_string(tmp.path().join(TEXT_FILENAME)).unwrap();
        assert!(saved.contains("ANALIZA AI:"));
        assert!(saved.starts_with(report::DEFAULT_HEADER));
        assert!(!tmp.path().join(PDF_FILENAME).exists());
    }

    #[test]
    fn successful_render_has_no_fallback_header() {
        let tmp = tempfile::tempdir().unwrap();
        let records = vec![record(1, "owner@smartflow.pl")];
        let response = pdf_or_fallback(&records, &ReportQuery::default(), tmp.path(), |_, _, _| {
            Ok(b"%PDF-stub".to_vec())
        })
        .unwrap();
        assert_eq!(response.headers()[header::CONTENT_TYPE], PDF_MIME);
        assert!(response.headers().get(FALLBACK_HEADER).is_none());
    }
}
