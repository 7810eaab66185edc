//! Group flattening: collect the capturing groups nested inside one
//! parenthesized group of a pattern.
//!
//! The scanner works on bytes. Every metacharacter it cares about (`(`, `)`,
//! `[`, `]`, `\`, `?`) is ASCII, so byte offsets never split a UTF-8 sequence
//! that matters.
//!
//! Group numbering follows the regex engine: a group counts when it captures
//! (`(...)`, `(?P<name>...)`, `(?<name>...)`). Non-capturing groups (`(?:...)`,
//! `(?i:...)`) and bare flag groups (`(?i)`) do not take a number but are
//! still walked, so captures inside them are found. Escaped parentheses and
//! parentheses inside character classes are literals.

use std::sync::Arc;

/// Result of flattening one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flattened {
    /// Numbers of the capturing groups found inside, in document order.
    pub sub_groups: Vec<usize>,
    /// Offset of the closing parenthesis, or the pattern length if the group
    /// never closes.
    pub close: usize,
    /// Global capturing-group counter after the last group inside.
    pub group_counter: usize,
}

/// Scan the group whose opening parenthesis sits at `open`.
///
/// `group_counter` is the global capture counter *after* the opening group
/// itself has been numbered (the caller numbers it). Every capturing group
/// found inside bumps the counter and records the new value.
///
/// An unterminated group returns with `close == pattern.len()` and whatever
/// was collected; the regex engine reports the real error at compile time.
#[must_use]
pub fn flatten(pattern: &[u8], open: usize, group_counter: usize) -> Flattened {
    let mut sub_groups = Vec::new();
    let mut counter = group_counter;
    let mut depth = 1usize;
    let mut pos = open + 1;

    while pos < pattern.len() {
        match pattern[pos] {
            b'\\' => {
                pos += 2;
                continue;
            }
            b'[' => {
                pos = skip_class(pattern, pos);
                continue;
            }
            b'(' => {
                depth += 1;
                if is_capturing(pattern, pos) {
                    counter += 1;
                    sub_groups.push(counter);
                }
            }
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Flattened {
                        sub_groups,
                        close: pos,
                        group_counter: counter,
                    };
                }
            }
            _ => {}
        }
        pos += 1;
    }

    Flattened {
        sub_groups,
        close: pattern.len(),
        group_counter: counter,
    }
}

/// Whether the `(` at `open` starts a group that takes a capture number.
#[must_use]
pub fn is_capturing(pattern: &[u8], open: usize) -> bool {
    match pattern.get(open + 1) {
        Some(b'?') => match (pattern.get(open + 2), pattern.get(open + 3)) {
            (Some(b'P'), Some(b'<')) => true,
            (Some(b'<'), Some(b'=')) | (Some(b'<'), Some(b'!')) => false,
            (Some(b'<'), _) => true,
            _ => false,
        },
        _ => true,
    }
}

/// Length of the name header (`?P<name>` or `?<name>`) after the `(` at
/// `open`, together with the name, when that group is named.
fn name_header(pattern: &[u8], open: usize) -> Option<(usize, &[u8])> {
    let start = match pattern.get(open + 1..open + 4) {
        Some([b'?', b'P', b'<']) => open + 4,
        Some([b'?', b'<', next]) if *next != b'=' && *next != b'!' => open + 3,
        _ => return None,
    };
    let len = pattern.get(start..)?.iter().position(|&b| b == b'>')?;
    Some((start + len + 1 - (open + 1), &pattern[start..start + len]))
}

/// Whether `name` is acceptable as a capture-group name: non-empty, starting
/// with a letter or `_`, then letters, digits, `_`, `.`, `[` or `]`.
#[must_use]
pub fn is_valid_group_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '[' | ']'))
}

/// Strip capture-group names from a pattern.
///
/// Returns the pattern with every validly named `(?P<name>` / `(?<name>`
/// rewritten to a plain `(`, plus the name of each capture group indexed by
/// group number (slot 0 is the whole match). Numbering is unchanged, so the
/// stripped text compiles to the same groups, but the same name may now
/// appear in more than one route. Invalid names are left in the text.
#[must_use]
pub fn strip_group_names(pattern: &str) -> (String, Vec<Option<Arc<str>>>) {
    let bytes = pattern.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut names: Vec<Option<Arc<str>>> = vec![None];
    let mut pos = 0usize;

    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => {
                let end = (pos + 2).min(bytes.len());
                out.extend_from_slice(&bytes[pos..end]);
                pos = end;
            }
            b'[' => {
                let end = skip_class(bytes, pos);
                out.extend_from_slice(&bytes[pos..end]);
                pos = end;
            }
            b'(' if is_capturing(bytes, pos) => {
                out.push(b'(');
                let named = name_header(bytes, pos).and_then(|(header_len, name)| {
                    let name = std::str::from_utf8(name).ok()?;
                    is_valid_group_name(name).then_some((header_len, name))
                });
                match named {
                    Some((header_len, name)) => {
                        names.push(Some(Arc::from(name)));
                        pos += 1 + header_len;
                    }
                    None => {
                        // Unnamed, or a name the engine will reject: leave the
                        // header in place so compiling reports it.
                        names.push(None);
                        pos += 1;
                    }
                }
            }
            b => {
                out.push(b);
                pos += 1;
            }
        }
    }

    // Only ASCII header bytes were removed, so the rest is still valid UTF-8.
    let stripped = String::from_utf8(out).unwrap_or_else(|_| pattern.to_string());
    (stripped, names)
}

/// Skip a bracketed character class starting at `open`; returns the offset
/// just past its closing `]` (or the pattern length).
pub(crate) fn skip_class(pattern: &[u8], open: usize) -> usize {
    let mut pos = open + 1;
    if pattern.get(pos) == Some(&b'^') {
        pos += 1;
    }
    // A `]` right after `[` or `[^` is a literal.
    if pattern.get(pos) == Some(&b']') {
        pos += 1;
    }
    let mut depth = 1usize;
    while pos < pattern.len() {
        match pattern[pos] {
            b'\\' => {
                pos += 2;
                continue;
            }
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return pos + 1;
                }
            }
            _ => {}
        }
        pos += 1;
    }
    pattern.len()
}
