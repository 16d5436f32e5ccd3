//! Character-level readers for component prop strings.
//!
//! Each reader takes a byte offset and returns the token found there together
//! with the offset just past it. Readers never fail: malformed or unterminated
//! input yields a best-effort token and an offset no greater than the input
//! length.

/// Read a double-quoted string starting at `start`.
///
/// A backslash escapes whatever character follows it. Unterminated strings
/// run to the end of input. Returns `("", start)` when `start` is not on a
/// `"`.
#[must_use]
pub fn read_quoted(input: &str, start: usize) -> (String, usize) {
    let Some(rest) = input.get(start..).and_then(|s| s.strip_prefix('"')) else {
        return (String::new(), start.min(input.len()));
    };

    let mut value = String::new();
    let mut escaped = false;

    for (i, c) in rest.char_indices() {
        if escaped {
            value.push(c);
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' => return (value, start + 1 + i + 1),
            _ => value.push(c),
        }
    }

    (value, input.len())
}

/// Read a balanced `{...}` literal starting at `start`.
///
/// Returns the text between the outer braces. Braces inside single- or
/// double-quoted strings do not count towards nesting. An unclosed literal
/// returns everything after the opening brace.
#[must_use]
pub fn read_braced(input: &str, start: usize) -> (&str, usize) {
    let Some(rest) = input.get(start..).filter(|s| s.starts_with('{')) else {
        return ("", start.min(input.len()));
    };

    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in rest.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '"' | '\'' => quote = Some(c),
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return (&rest[1..i], start + i + 1);
                }
            }
            _ => {}
        }
    }

    (&rest[1..], input.len())
}

/// Read a run of non-whitespace characters starting at `start`.
#[must_use]
pub fn read_bare(input: &str, start: usize) -> (&str, usize) {
    let Some(rest) = input.get(start..) else {
        return ("", start.min(input.len()));
    };
    let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    (&rest[..end], start + end)
}

/// Offset of the first non-whitespace character at or after `from`.
pub(crate) fn skip_whitespace(input: &str, from: usize) -> usize {
    input
        .get(from..)
        .and_then(|rest| rest.find(|c: char| !c.is_whitespace()))
        .map_or(input.len(), |offset| from + offset)
}

/// Offset just past an identifier (`[A-Za-z0-9_]*`) starting at `from`.
pub(crate) fn scan_identifier(input: &str, from: usize) -> usize {
    input
        .get(from..)
        .and_then(|rest| rest.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_')))
        .map_or(input.len(), |offset| from + offset)
}

/// Byte length of the character at `at`, or 1 past the end.
pub(crate) fn char_len_at(input: &str, at: usize) -> usize {
    input
        .get(at..)
        .and_then(|rest| rest.chars().next())
        .map_or(1, char::len_utf8)
}
