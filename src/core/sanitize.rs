// src/core/sanitize.rs
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::config::consts::MEMBERSHIP_MARKER;

/// Collapse runs of whitespace (including NBSP) into a single space and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Remove the membership marker (and the separator that follows it) from
/// raw booth text. The result never contains the marker.
pub fn strip_membership_marker(raw: &str) -> String {
    let with_sep = join!(MEMBERSHIP_MARKER, ", ");
    let mut out = raw.replace(&with_sep, "").replace(MEMBERSHIP_MARKER, "");
    // Removing one occurrence can splice two halves into a new one.
    while out.contains(MEMBERSHIP_MARKER) {
        out = out.replace(MEMBERSHIP_MARKER, "");
    }
    out.trim().trim_matches(',').trim().to_string()
}

/// Fold accented Latin text to its closest ASCII spelling
/// ("Côte d'Ivoire" → "Cote d'Ivoire", "Zürich" → "Zurich").
/// Characters with no decomposition and no known spelling are kept.
pub fn fold_diacritics(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.nfkd() {
        if is_combining_mark(ch) { continue; }
        if ch.is_ascii() { out.push(ch); continue; }
        match ascii_spelling(ch) {
            Some(rep) => out.push_str(rep),
            None => out.push(ch),
        }
    }
    out
}

/// Letters that NFKD leaves alone, plus typographic punctuation.
fn ascii_spelling(ch: char) -> Option<&'static str> {
    let rep = match ch {
        'ß' => "ss",
        'æ' => "ae", 'Æ' => "AE",
        'œ' => "oe", 'Œ' => "OE",
        'ø' => "o", 'Ø' => "O",
        'đ' => "d", 'Đ' => "D",
        'ð' => "d", 'Ð' => "D",
        'ł' => "l", 'Ł' => "L",
        'þ' => "th", 'Þ' => "Th",
        'ı' => "i",
        '‘' | '’' | '‚' | '′' => "'",
        '“' | '”' | '„' | '″' => "\"",
        '–' | '—' | '‐' | '‑' => "-",
        '…' => "...",
        '\u{a0}' => " ",
        _ => return None,
    };
    Some(rep)
}
