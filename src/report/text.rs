//! Plain-text report: every record in full, text kept verbatim.

use crate::models::ProcessRecord;

/// Build the plain-text export, dated by the first record in caller order.
///
/// An empty list leaves the date empty. Callers that know the report date
/// should use [`render_plain_text`] instead.
pub fn build_plain_text_export(records: &[ProcessRecord], header: &str, footer: &str) -> String {
    let generated_on = records.first().map(ProcessRecord::created_date).unwrap_or_default();
    render_plain_text(records, header, footer, &generated_on)
}

/// Render the plain-text export with an explicit date line.
pub fn render_plain_text(
    records: &[ProcessRecord],
    header: &str,
    footer: &str,
    generated_on: &str,
) -> String {
    let rule = "=".repeat(50);
    let title_rule = "=".repeat(30);
    let separator = "-".repeat(50);

    let mut out = format!("{header}\n{rule}\n\n");
    for (i, p) in records.iter().enumerate() {
        out.push_str(&format!(
            "{}. {}\n{title_rule}\nOPIS:\n{}\n\nANALIZA AI:\n{}\n\n{separator}\n\n",
            i + 1,
            p.title,
            p.description,
            p.ai_analysis,
        ));
    }
    out.push_str(&format!("\n{footer}\nWygenerowano: {generated_on}"));
    out
}
