//! Whitespace normalization applied to every extracted document.

const NO_BREAK_SPACE: char = '\u{00A0}';

/// Strips carriage returns, turns tabs into spaces, collapses runs of spaces
/// and no-break spaces into one ordinary space, then trims the result.
///
/// Newlines are preserved so paragraph structure survives. Idempotent.
pub fn normalize_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_space_run = false;

    for ch in raw.chars() {
        let ch = match ch {
            '\r' => continue,
            '\t' => ' ',
            other => other,
        };

        if ch == ' ' || ch == NO_BREAK_SPACE {
            if !in_space_run {
                out.push(' ');
                in_space_run = true;
            }
            continue;
        }

        in_space_run = false;
        out.push(ch);
    }

    out.trim().to_string()
}
