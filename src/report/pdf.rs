//! PDF rendering of a [`DocumentLayout`] via `printpdf`.

use std::io::BufWriter;

use printpdf::{
    BuiltinFont, CustomPdfConformance, IndirectFontRef, Mm, PdfConformance, PdfDocument,
    PdfDocumentReference,
};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

use super::layout::{layout_document, DocumentLayout, FontStyle, PageGeometry};
use super::ReportError;
use crate::models::ProcessRecord;

const LAYER_NAME: &str = "Layer 1";

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

impl Fonts {
    fn load(doc: &PdfDocumentReference) -> Result<Self, ReportError> {
        let add = |font| {
            doc.add_builtin_font(font)
                .map_err(|e| ReportError::Rendering(format!("PDF font error: {e}")))
        };
        Ok(Self {
            regular: add(BuiltinFont::Helvetica)?,
            bold: add(BuiltinFont::HelveticaBold)?,
            italic: add(BuiltinFont::HelveticaOblique)?,
        })
    }

    fn get(&self, style: FontStyle) -> &IndirectFontRef {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
            FontStyle::Italic => &self.italic,
        }
    }
}

/// Build the paginated report for `records` on A4 pages. Returns PDF bytes.
///
/// Identical inputs produce byte-identical output.
pub fn build_paginated_document(
    records: &[ProcessRecord],
    header: &str,
    footer: &str,
) -> Result<Vec<u8>, ReportError> {
    let layout = layout_document(records, header, footer, &PageGeometry::a4());
    render_pdf(&layout, document_timestamp(records))
}

/// Render a finished layout. `stamp` becomes the creation/modification date.
pub fn render_pdf(layout: &DocumentLayout, stamp: OffsetDateTime) -> Result<Vec<u8>, ReportError> {
    let g = layout.geometry;
    let document_id = layout_digest(layout);

    let (doc, first_page, first_layer) =
        PdfDocument::new(&layout.title, Mm(g.width), Mm(g.height), LAYER_NAME);
    let doc = doc
        .with_document_id(document_id.clone())
        .with_conformance(PdfConformance::Custom(CustomPdfConformance {
            requires_icc_profile: false,
            requires_xmp_metadata: false,
            allows_default_fonts: true,
            ..Default::default()
        }))
        .with_creation_date(stamp)
        .with_mod_date(stamp)
        .with_metadata_date(stamp);
    let fonts = Fonts::load(&doc)?;

    for (index, page) in layout.pages.iter().enumerate() {
        let (page_idx, layer_idx) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(g.width), Mm(g.height), LAYER_NAME)
        };
        let layer = doc.get_page(page_idx).get_layer(layer_idx);

        for line in &page.lines {
            layer.use_text(
                line.text.as_str(),
                line.size,
                Mm(line.x),
                Mm(g.height - line.y),
                fonts.get(line.style),
            );
        }
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ReportError::Rendering(format!("PDF save error: {e}")))?;
    let mut bytes = buf
        .into_inner()
        .map_err(|e| ReportError::Rendering(format!("PDF buffer error: {e}")))?;

    pin_trailer_ids(&mut bytes, &document_id);
    tracing::debug!(pages = layout.pages.len(), bytes = bytes.len(), "PDF rendered");
    Ok(bytes)
}

/// Newest record's creation time, or the Unix epoch for an empty report.
fn document_timestamp(records: &[ProcessRecord]) -> OffsetDateTime {
    records
        .iter()
        .map(|r| r.created_at.timestamp())
        .max()
        .and_then(|ts| OffsetDateTime::from_unix_timestamp(ts).ok())
        .unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

/// 32 hex chars of SHA-256 over everything placed on the pages.
fn layout_digest(layout: &DocumentLayout) -> String {
    let mut hasher = Sha256::new();
    hasher.update(layout.title.as_bytes());
    for (index, page) in layout.pages.iter().enumerate() {
        hasher.update((index as u64).to_le_bytes());
        for line in &page.lines {
            hasher.update(line.text.as_bytes());
            hasher.update([line.style as u8]);
            hasher.update(line.size.to_le_bytes());
            hasher.update(line.x.to_le_bytes());
            hasher.update(line.y.to_le_bytes());
        }
    }
    hasher.finalize()[..16]
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// printpdf fills the trailer `/ID` array with two random strings. Overwrite
/// every entry with the layout digest so identical layouts give identical
/// bytes. The trailer is the last `/ID` in the file.
fn pin_trailer_ids(bytes: &mut [u8], document_id: &str) {
    let Some(pos) = rfind(bytes, b"/ID") else {
        return;
    };
    let mut cursor = skip_whitespace(bytes, pos + 3);
    if bytes.get(cursor) != Some(&b'[') {
        return;
    }
    cursor += 1;

    loop {
        cursor = skip_whitespace(bytes, cursor);
        if bytes.get(cursor) != Some(&b'(') {
            return;
        }
        let start = cursor + 1;
        let Some(len) = bytes[start..].iter().position(|&b| b == b')') else {
            return;
        };
        if len == document_id.len() {
            bytes[start..start + len].copy_from_slice(document_id.as_bytes());
        }
        cursor = start + len + 1;
    }
}

fn skip_whitespace(bytes: &[u8], mut at: usize) -> usize {
    while bytes.get(at).is_some_and(u8::is_ascii_whitespace) {
        at += 1;
    }
    at
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).rposition(|w| w == needle)
}
