use crate::export::record::{HEADERS, TrackRecord};
use std::mem::take;

/// Fallback file stem when the context name sanitizes to nothing
pub const DEFAULT_FILENAME: &str = "deezer_export";

/// Appended to every sanitized context name
pub const FILENAME_SUFFIX: &str = "_export_scrolled.csv";

const MAX_FILENAME_CHARS: usize = 100;

/* ---------------- Writing ---------------- */

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n')
}

/// Quote a field when it holds a comma, double quote or newline
pub fn escape_field(field: &str) -> String {
    if needs_quotes(field) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn join_row<S: AsRef<str>>(fields: &[S]) -> String {
    fields.iter().map(|f| escape_field(f.as_ref())).collect::<Vec<_>>().join(",")
}

/// Header line plus one line per record, `\n` separated, no trailing newline.
/// Records are written in the order given.
pub fn to_csv(records: &[TrackRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(join_row(&HEADERS));
    lines.extend(records.iter().map(|r| join_row(&r.fields())));
    lines.join("\n")
}

/* ---------------- File naming ---------------- */

/// Make a context name safe to use as a file stem: drop `\ / : * ? " < > |`,
/// turn whitespace runs into `_`, keep at most 100 characters.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_space = false;

    for ch in name.chars() {
        if matches!(ch, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|') {
            continue;
        }
        if ch.is_whitespace() {
            if !in_space {
                out.push('_');
                in_space = true;
            }
        } else {
            out.push(ch);
            in_space = false;
        }
    }

    let out: String = out.chars().take(MAX_FILENAME_CHARS).collect();
    if out.is_empty() || out.chars().all(|c| c == '_') { DEFAULT_FILENAME.to_string() } else { out }
}

/// Full CSV file name for a context name
pub fn export_filename(context_name: &str) -> String {
    format!("{}{}", sanitize_filename(context_name), FILENAME_SUFFIX)
}

/* ---------------- Parsing ---------------- */

/// Minimal CSV reader (quotes + CRLF tolerant), used to check payloads
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut field = String::new();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.next_if_eq(&'"').is_some() {
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => row.push(take(&mut field)),
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' {
                    chars.next_if_eq(&'\n');
                }
                row.push(take(&mut field));
                rows.push(take(&mut row));
            }
            _ => field.push(ch),
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}
