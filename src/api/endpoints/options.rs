//! Selectable values for the intake form.

use axum::Json;
use serde::Serialize;

use crate::analysis::prompt::{industries, BUDGETS, COMPANY_SIZES};
use crate::analysis::AnalysisDepth;

#[derive(Serialize)]
pub struct DepthOption {
    pub value: AnalysisDepth,
    pub label: &'static str,
    pub default: bool,
}

#[derive(Serialize)]
pub struct OptionsResponse {
    pub depths: Vec<DepthOption>,
    pub company_sizes: &'static [&'static str],
    pub industries: Vec<&'static str>,
    pub budgets: &'static [&'static str],
}

/// `GET /api/options`
pub async fn list() -> Json<OptionsResponse> {
    let depths = AnalysisDepth::ALL
        .into_iter()
        .map(|depth| DepthOption {
            value: depth,
            label: depth.label(),
            default: depth == AnalysisDepth::default(),
        })
        .collect();

    Json(OptionsResponse {
        depths,
        company_sizes: COMPANY_SIZES,
        industries: industries().collect(),
        budgets: BUDGETS,
    })
}
