//! Page layout for the PDF report.
//!
//! Pure: turns records plus header/footer into positioned text lines on
//! fixed-size pages. Coordinates are millimetres measured from the top-left
//! corner of the page; the renderer flips them for PDF space.

use serde::Serialize;

use super::sanitize::{sanitize, truncate, wrap_text};
use super::{
    ANALYSIS_MAX_CHARS, DESCRIPTION_MAX_CHARS, FOOTER_MAX_CHARS, HEADER_MAX_CHARS,
    MAX_PDF_RECORDS, TITLE_MAX_CHARS,
};
use crate::models::ProcessRecord;

const MM_PER_PT: f32 = 0.352_778;

/// Average Helvetica advance width in ems, used for wrapping and centring.
const AVG_GLYPH_EM: f32 = 0.5;

/// Baseline position inside a cell, as a fraction of the cell height.
const BASELINE_RATIO: f32 = 0.7;

const HEADER_PT: f32 = 14.0;
const TITLE_PT: f32 = 11.0;
const BODY_PT: f32 = 9.0;
const NOTE_PT: f32 = 8.0;

const HEADER_CELL_MM: f32 = 10.0;
const TITLE_CELL_MM: f32 = 8.0;
const LABEL_CELL_MM: f32 = 6.0;
const BODY_LINE_MM: f32 = 5.0;

const DESCRIPTION_LABEL: &str = "Opis:";
const ANALYSIS_LABEL: &str = "Analiza AI:";

/// Fixed page geometry, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    /// A record never starts below this line; a new page is opened instead.
    pub record_break_at: f32,
}

impl PageGeometry {
    pub const fn a4() -> Self {
        Self {
            width: 210.0,
            height: 297.0,
            margin_left: 10.0,
            margin_right: 10.0,
            margin_top: 10.0,
            margin_bottom: 15.0,
            record_break_at: 250.0,
        }
    }

    pub fn content_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    /// Lowest y a cell may reach before spilling onto a new page.
    pub fn bottom_limit(&self) -> f32 {
        self.height - self.margin_bottom
    }

    /// How many average glyphs fit on one line at `size_pt`.
    pub fn chars_per_line(&self, size_pt: f32) -> usize {
        let glyph = size_pt * AVG_GLYPH_EM * MM_PER_PT;
        ((self.content_width() / glyph).floor() as usize).max(1)
    }

    fn text_width(&self, text: &str, size_pt: f32) -> f32 {
        text.chars().count() as f32 * size_pt * AVG_GLYPH_EM * MM_PER_PT
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
}

/// One run of text at a baseline position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLine {
    pub text: String,
    pub style: FontStyle,
    pub size: f32,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayoutPage {
    pub lines: Vec<TextLine>,
}

/// Exact strings placed for one record, before wrapping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedEntry {
    pub title: String,
    pub description: String,
    pub analysis: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentLayout {
    pub geometry: PageGeometry,
    /// Sanitized header, reused as the PDF document title.
    pub title: String,
    pub pages: Vec<LayoutPage>,
    pub entries: Vec<RenderedEntry>,
    pub omitted: usize,
    pub omission_note: Option<String>,
}

impl DocumentLayout {
    pub fn lines(&self) -> impl Iterator<Item = &TextLine> {
        self.pages.iter().flat_map(|p| p.lines.iter())
    }
}

/// Vertical cursor that opens pages as content flows down.
struct Cursor<'g> {
    geometry: &'g PageGeometry,
    pages: Vec<LayoutPage>,
    y: f32,
}

impl<'g> Cursor<'g> {
    fn new(geometry: &'g PageGeometry) -> Self {
        Self {
            geometry,
            pages: vec![LayoutPage::default()],
            y: geometry.margin_top,
        }
    }

    fn new_page(&mut self) {
        self.pages.push(LayoutPage::default());
        self.y = self.geometry.margin_top;
    }

    fn gap(&mut self, height: f32) {
        self.y += height;
    }

    fn cell(&mut self, text: String, style: FontStyle, size: f32, height: f32, align: Align) {
        if self.y + height > self.geometry.bottom_limit() {
            self.new_page();
        }

        let x = match align {
            Align::Left => self.geometry.margin_left,
            Align::Center => {
                let slack = self.geometry.content_width() - self.geometry.text_width(&text, size);
                self.geometry.margin_left + (slack / 2.0).max(0.0)
            }
        };
        let y = self.y + height * BASELINE_RATIO;

        if !text.is_empty() {
            if let Some(page) = self.pages.last_mut() {
                page.lines.push(TextLine { text, style, size, x, y });
            }
        }
        self.y += height;
    }

    fn multi_cell(&mut self, text: &str, style: FontStyle, size: f32, line_height: f32) {
        for line in wrap_text(text, self.geometry.chars_per_line(size)) {
            self.cell(line, style, size, line_height, Align::Left);
        }
    }
}

/// Lay out the report for `records`, in the order given.
///
/// Only the first [`MAX_PDF_RECORDS`] records are placed; the rest are
/// summarised in a single note. Every string is truncated first and then
/// sanitized for the builtin fonts.
pub fn layout_document(
    records: &[ProcessRecord],
    header: &str,
    footer: &str,
    geometry: &PageGeometry,
) -> DocumentLayout {
    let mut cursor = Cursor::new(geometry);

    let title = sanitize(&truncate(header, HEADER_MAX_CHARS));
    cursor.cell(title.clone(), FontStyle::Bold, HEADER_PT, HEADER_CELL_MM, Align::Center);
    cursor.gap(5.0);

    let shown = &records[..records.len().min(MAX_PDF_RECORDS)];
    let mut entries = Vec::with_capacity(shown.len());

    for (i, record) in shown.iter().enumerate() {
        if cursor.y > geometry.record_break_at {
            cursor.new_page();
        }

        let entry = RenderedEntry {
            title: sanitize(&truncate(&format!("{}. {}", i + 1, record.title), TITLE_MAX_CHARS)),
            description: sanitize(&truncate(&record.description, DESCRIPTION_MAX_CHARS)),
            analysis: sanitize(&truncate(&record.ai_analysis, ANALYSIS_MAX_CHARS)),
        };

        cursor.cell(entry.title.clone(), FontStyle::Bold, TITLE_PT, TITLE_CELL_MM, Align::Left);

        cursor.cell(DESCRIPTION_LABEL.into(), FontStyle::Regular, BODY_PT, LABEL_CELL_MM, Align::Left);
        cursor.multi_cell(&entry.description, FontStyle::Regular, BODY_PT, BODY_LINE_MM);
        cursor.gap(2.0);

        cursor.cell(ANALYSIS_LABEL.into(), FontStyle::Regular, BODY_PT, LABEL_CELL_MM, Align::Left);
        cursor.multi_cell(&entry.analysis, FontStyle::Regular, BODY_PT, BODY_LINE_MM);
        cursor.gap(3.0);

        entries.push(entry);
    }

    let omitted = records.len() - shown.len();
    let omission_note = (omitted > 0).then(|| {
        sanitize(&format!(
            "Pokazano {} z {} procesów. Pominięto {}. Pełna lista dostępna w aplikacji.",
            shown.len(),
            records.len(),
            omitted
        ))
    });
    if let Some(note) = &omission_note {
        cursor.gap(5.0);
        cursor.cell(note.clone(), FontStyle::Italic, NOTE_PT, LABEL_CELL_MM, Align::Left);
    }

    cursor.gap(5.0);
    let footer = sanitize(&truncate(footer, FOOTER_MAX_CHARS));
    cursor.cell(footer, FontStyle::Regular, NOTE_PT, LABEL_CELL_MM, Align::Center);

    DocumentLayout {
        geometry: *geometry,
        title,
        pages: cursor.pages,
        entries,
        omitted,
        omission_note,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::record;
    use crate::report::{DEFAULT_FOOTER, DEFAULT_HEADER};

    fn records(n: i64) -> Vec<ProcessRecord> {
        (1..=n).map(|i| record(i, "owner@smartflow.pl")).collect()
    }

    fn layout(records: &[ProcessRecord]) -> DocumentLayout {
        layout_document(records, DEFAULT_HEADER, DEFAULT_FOOTER, &PageGeometry::a4())
    }

    fn title_lines(layout: &DocumentLayout) -> Vec<&TextLine> {
        layout
            .lines()
            .filter(|l| l.style == FontStyle::Bold && l.size == TITLE_PT)
            .collect()
    }

    #[test]
    fn caps_records_and_notes_omissions() {
        let layout = layout(&records(15));

        assert_eq!(layout.entries.len(), 10);
        assert_eq!(title_lines(&layout).len(), 10);
        assert_eq!(layout.omitted, 5);

        let note = layout.omission_note.as_deref().unwrap();
        assert!(note.contains("10 z 15"));
        assert!(note.contains("Pominieto 5."));
        let note_lines: Vec<_> = layout.lines().filter(|l| l.style == FontStyle::Italic).collect();
        assert_eq!(note_lines.len(), 1);
        assert_eq!(note_lines[0].text, note);
    }

    #[test]
    fn no_note_when_within_cap() {
        let layout = layout(&records(10));
        assert_eq!(layout.entries.len(), 10);
        assert_eq!(layout.omitted, 0);
        assert!(layout.omission_note.is_none());
        assert!(layout.lines().all(|l| l.style != FontStyle::Italic));
    }

    #[test]
    fn keeps_caller_order_and_numbers_titles() {
        let mut input = records(3);
        input.reverse();
        let layout = layout(&input);
        let titles: Vec<_> = layout.entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["1. Proces 3", "2. Proces 2", "3. Proces 1"]);
    }

    #[test]
    fn long_description_is_capped_at_limit_plus_ellipsis() {
        let mut r = record(1, "owner@smartflow.pl");
        r.description = "abcdefghi ".repeat(300);
        assert_eq!(r.description.len(), 3000);

        let layout = layout(&[r]);
        let description = &layout.entries[0].description;
        assert_eq!(description.chars().count(), DESCRIPTION_MAX_CHARS + 3);
        assert!(description.ends_with("..."));
    }

    #[test]
    fn long_analysis_and_title_are_capped() {
        let mut r = record(1, "owner@smartflow.pl");
        r.title = "T".repeat(200);
        r.ai_analysis = "z".repeat(5000);
        let layout = layout(&[r]);
        assert_eq!(layout.entries[0].title.chars().count(), TITLE_MAX_CHARS + 3);
        assert_eq!(layout.entries[0].analysis.chars().count(), ANALYSIS_MAX_CHARS + 3);
    }

    #[test]
    fn wrapped_lines_reassemble_the_description() {
        let mut r = record(1, "owner@smartflow.pl");
        r.description = "Pracownik pobiera fakture z maila i przepisuje dane do Excela. ".repeat(20);
        let layout = layout(&[r]);

        let lines: Vec<&TextLine> = layout.lines().collect();
        let start = lines.iter().position(|l| l.text == DESCRIPTION_LABEL).unwrap() + 1;
        let end = lines.iter().position(|l| l.text == ANALYSIS_LABEL).unwrap();
        assert!(end - start > 1, "description should wrap over several lines");

        let joined = lines[start..end].iter().map(|l| l.text.as_str()).collect::<Vec<_>>().join(" ");
        assert_eq!(joined, layout.entries[0].description);
    }

    #[test]
    fn header_and_footer_are_sanitized_and_centred() {
        let layout = layout(&records(1));
        let first = &layout.pages[0].lines[0];
        assert_eq!(first.text, "Zestawienie przeanalizowanych procesow SmartFlowAI");
        assert!(first.x > layout.geometry.margin_left);
        assert_eq!(layout.title, first.text);

        let last = layout.pages.last().unwrap().lines.last().unwrap();
        assert_eq!(last.text, DEFAULT_FOOTER);
    }

    #[test]
    fn all_text_is_printable_ascii() {
        let mut r = record(1, "owner@smartflow.pl");
        r.ai_analysis = "⚠️ **ZIDENTYFIKOWANE PROBLEMY** ręczne przepisywanie 🦀".into();
        let layout = layout(&[r]);
        for line in layout.lines() {
            assert!(line.text.chars().all(|c| (' '..='~').contains(&c)), "{:?}", line.text);
        }
        assert!(layout.entries[0].analysis.contains("[PROBLEMY]"));
    }

    #[test]
    fn lines_stay_inside_printable_area() {
        let mut input = records(10);
        for r in &mut input {
            r.description = "opis ".repeat(400);
            r.ai_analysis = "analiza ".repeat(300);
        }
        let layout = layout(&input);
        let g = layout.geometry;

        assert!(layout.pages.len() > 1);
        for line in layout.lines() {
            assert!(line.y >= g.margin_top);
            assert!(line.y <= g.bottom_limit());
        }
    }

    #[test]
    fn records_never_start_inside_bottom_band() {
        let mut input = records(10);
        for r in &mut input {
            r.description = "opis ".repeat(120);
        }
        let layout = layout(&input);
        let limit = layout.geometry.record_break_at + TITLE_CELL_MM;
        for line in title_lines(&layout) {
            assert!(line.y <= limit, "title {:?} starts at {}", line.text, line.y);
        }
    }

    #[test]
    fn empty_records_still_lay_out_header_and_footer() {
        let layout = layout(&[]);
        assert_eq!(layout.pages.len(), 1);
        assert!(layout.entries.is_empty());
        assert!(layout.omission_note.is_none());
        assert_eq!(layout.pages[0].lines.len(), 2);
    }

    #[test]
    fn layout_is_deterministic() {
        let input = records(12);
        assert_eq!(layout(&input), layout(&input));
    }

    #[test]
    fn chars_per_line_scales_with_font_size() {
        let g = PageGeometry::a4();
        assert!(g.chars_per_line(9.0) > g.chars_per_line(14.0));
        assert_eq!(g.chars_per_line(9.0), 119);
    }
}
