//! Font-safe text preparation for the paginated report.
//!
//! The builtin PDF fonts only cover printable ASCII. Rather than letting
//! Polish letters and the section icons used by the analysis prompts vanish,
//! they are folded to base letters and bracketed tags first, and only then is
//! everything outside the printable range dropped.

/// Polish diacritics and their ASCII base letters.
const DIACRITIC_FOLDS: &[(&str, &str)] = &[
    ("ą", "a"),
    ("ć", "c"),
    ("ę", "e"),
    ("ł", "l"),
    ("ń", "n"),
    ("ó", "o"),
    ("ś", "s"),
    ("ź", "z"),
    ("ż", "z"),
    ("Ą", "A"),
    ("Ć", "C"),
    ("Ę", "E"),
    ("Ł", "L"),
    ("Ń", "N"),
    ("Ó", "O"),
    ("Ś", "S"),
    ("Ź", "Z"),
    ("Ż", "Z"),
];

/// Icons emitted by the analysis prompts, mapped to the section they mark.
///
/// Icons written with a variation selector (U+FE0F) are listed in that form
/// first and again bare, so both spellings end up as the same tag.
const ICON_TAGS: &[(&str, &str)] = &[
    ("\u{1F50D}", " [ANALIZA] "),
    ("\u{26A0}\u{FE0F}", " [PROBLEMY] "),
    ("\u{1F6E0}\u{FE0F}", " [ROZWIAZANIE] "),
    ("\u{1F4B0}", " [INWESTYCJA] "),
    ("\u{23F1}\u{FE0F}", " [OSZCZEDNOSCI] "),
    ("\u{1F4CB}", " [PLAN] "),
    ("\u{26A1}", " [KROKI] "),
    ("\u{1F3AF}", " [REZULTATY] "),
    ("\u{1F916}", " [AI] "),
    ("\u{2705}", " [OK] "),
    ("\u{274C}", " [BLAD] "),
    ("\u{1F4C4}", " [PDF] "),
    ("\u{270F}\u{FE0F}", " [EDYTUJ] "),
    ("\u{1F5D1}\u{FE0F}", " [USUN] "),
    ("\u{1F4BE}", " [ZAPISZ] "),
    ("\u{1F680}", " [START] "),
    ("\u{1F4CA}", " [DANE] "),
    ("\u{1F527}", " [NARZEDZIA] "),
    ("\u{1F4C8}", " [WZROST] "),
    ("\u{1F4A1}", " [POMYSL] "),
    ("\u{1F389}", " [SUKCES] "),
    ("\u{26A0}", " [PROBLEMY] "),
    ("\u{1F6E0}", " [ROZWIAZANIE] "),
    ("\u{23F1}", " [OSZCZEDNOSCI] "),
    ("\u{270F}", " [EDYTUJ] "),
    ("\u{1F5D1}", " [USUN] "),
];

/// Marker appended by [`truncate`] when text is cut.
pub const ELLIPSIS: &str = "...";

/// Map arbitrary text onto printable ASCII (code points 32..=126).
///
/// Never fails. Newlines, carriage returns and tabs become single spaces;
/// any other character outside the printable range is dropped.
pub fn sanitize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut folded = text.to_string();
    for (from, to) in DIACRITIC_FOLDS.iter().chain(ICON_TAGS) {
        if folded.contains(from) {
            folded = folded.replace(from, to);
        }
    }

    folded
        .chars()
        .filter_map(|c| match c {
            ' '..='~' => Some(c),
            '\n' | '\r' | '\t' => Some(' '),
            _ => None,
        })
        .collect()
}

/// [`sanitize`] for optional input; absent text renders as an empty string.
pub fn sanitize_opt(text: Option<&str>) -> String {
    text.map(sanitize).unwrap_or_default()
}

/// Collapse whitespace runs, trim, and cut to `max_length` characters.
///
/// When cut, [`ELLIPSIS`] is appended, so the result is at most
/// `max_length + 3` characters long.
pub fn truncate(text: &str, max_length: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_length {
        return collapsed;
    }

    let mut cut: String = collapsed.chars().take(max_length).collect();
    cut.push_str(ELLIPSIS);
    cut
}

/// Greedy word wrap for fixed-width text rendering.
///
/// Words longer than a full line are hard-split. Always returns at least one
/// line (empty for empty input).
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let chars: Vec<char> = word.chars().collect();
        for piece in chars.chunks(max_chars) {
            let piece_len = piece.len();
            if current_len > 0 && current_len + 1 + piece_len > max_chars {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(piece);
            current_len += piece_len;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
