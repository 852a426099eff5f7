// src/csv.rs
use std::io::{self, Write};
use std::mem::take;

use crate::dataset::DataSet;

pub const SEP: char = ',';

/* ---------------- Parsing ---------------- */

/// Minimal CSV parser (quotes + CRLF tolerant).
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut field = s!();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut chars = text.trim_start_matches('\u{feff}').chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if matches!(chars.peek(), Some('"')) {
                        chars.next(); // double-quote escape
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            c if c == SEP && !in_quotes => row.push(take(&mut field)),
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) { chars.next(); }
                row.push(take(&mut field));
                if !(row.len() == 1 && row[0].is_empty()) {
                    rows.push(take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    // Flush a trailing row without newline, even if quotes were unterminated.
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

/// Rows keyed by a header line: look columns up by name, case-insensitively.
pub struct HeadedRows {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl HeadedRows {
    pub fn parse(text: &str) -> Self {
        let mut rows = parse_rows(text);
        let headers = if rows.is_empty() { Vec::new() } else { rows.remove(0) };
        Self { headers, rows }
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name))
    }

    /// Trimmed cell; empty (or a short row) counts as absent.
    pub fn cell<'a>(row: &'a [String], col: Option<usize>) -> Option<&'a str> {
        col.and_then(|c| row.get(c)).map(|s| s.trim()).filter(|s| !s.is_empty())
    }
}

/* ---------------- Writing ---------------- */

fn needs_quotes(field: &str) -> bool {
    field.contains(SEP) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV row to any writer.
pub fn write_row<W: Write, S: AsRef<str>>(mut w: W, row: &[S]) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        let cell = cell.as_ref();
        if !first { write!(w, "{}", SEP)?; } else { first = false; }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// Header line plus rows. Null cells are empty; spatial data sets get a
/// trailing WKT `geometry` column.
pub fn write_dataset<W: Write>(mut w: W, ds: &DataSet) -> io::Result<()> {
    let mut header: Vec<&str> = ds.headers.iter().map(String::as_str).collect();
    if ds.is_spatial() {
        header.push("geometry");
    }
    write_row(&mut w, &header)?;

    for (i, r) in ds.rows.iter().enumerate() {
        let mut out: Vec<String> = r.iter().map(|c| c.clone().unwrap_or_default()).collect();
        if let Some(geom) = &ds.geometry {
            out.push(geom.get(i).copied().flatten().map(|p| p.wkt()).unwrap_or_default());
        }
        write_row(&mut w, &out)?;
    }
    Ok(())
}

pub fn to_csv_string(ds: &DataSet) -> String {
    let mut buf: Vec<u8> = Vec::new();
    let _ = write_dataset(&mut buf, ds);
    match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Point;

    #[test]
    fn parses_quotes_and_crlf() {
        let rows = parse_rows("name,add\r\n\"Acme, Inc.\",\"1 \"\"Main\"\" St\"\r\n\r\nB,2\n");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], vec!["Acme, Inc.", "1 \"Main\" St"]);
        assert_eq!(rows[2], vec!["B", "2"]);
    }

    #[test]
    fn trailing_row_without_newline_is_kept() {
        let rows = parse_rows("a,b\n1,");
        assert_eq!(rows[1], vec!["1", ""]);
    }

    #[test]
    fn headed_rows_lookup_ignores_case() {
        let t = HeadedRows::parse("\u{feff}Name,ADD,country\nAcme,1 Main,\n");
        assert_eq!(t.column("name"), Some(0));
        assert_eq!(t.column("add"), Some(1));
        let row = &t.rows[0];
        assert_eq!(HeadedRows::cell(row, t.column("add")), Some("1 Main"));
        assert_eq!(HeadedRows::cell(row, t.column("country")), None);
        assert_eq!(HeadedRows::cell(row, t.column("missing")), None);
    }

    #[test]
    fn spatial_dataset_gets_wkt_column() {
        let ds = DataSet {
            headers: vec![s!("name")],
            rows: vec![vec![Some(s!("A"))], vec![None]],
            geometry: Some(vec![Some(Point::new(1.5, 2.5)), None]),
        };
        assert_eq!(to_csv_string(&ds), "name,geometry\nA,POINT (2.5 1.5)\n,\n");
    }
}
