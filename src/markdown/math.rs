//! Math span pass-through
//!
//! Math is rendered in the browser by KaTeX, so the HTML fragment has to
//! contain the original delimited text: `$…$`, `$$…$$`, `\(…\)` and `\[…\]`.
//! Left to itself, the Markdown parser would eat the backslash of `\(`, turn
//! `a_1 * b_2` into emphasis and split table cells on `|`.
//!
//! Before parsing, every math span outside code is swapped for an opaque
//! placeholder built from a pair of private-use characters that do not occur
//! in the source. After rendering, the placeholders are swapped back for the
//! original text, HTML-escaped.
//!
//! Delimiter rules for inline `$`:
//! - the opening `$` must not be followed by whitespace,
//! - the closing `$` must not be preceded by whitespace or `\`,
//!   and must not be followed by a digit,
//! - `\$` is never a delimiter.
//!
//! No span of any kind crosses a blank line, and none starts, ends or lies
//! inside a URL: link destinations, `<…>` autolinks, bare `http(s)://` and
//! `www.` runs and link reference definitions are copied as they are.

use std::ops::Range;
use std::sync::OnceLock;

use log::debug;
use regex::Regex;

use super::fence::{segments, Segment};
use crate::string_utils::{char_len_at, escape_text, is_blank};

/// Placeholders are `open`, a decimal index, `close`; both characters are
/// taken from the Private Use Area.
const PRIVATE_USE: Range<u32> = 0xE000..0xF8FF;

fn url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"\]\(\s*<[^>\n]*>",
            r"|\]\(\s*[^\s)]*",
            r"|<[A-Za-z][A-Za-z0-9+.\-]{1,31}:[^\s<>]*>",
            r"|<[^\s<>@]+@[^\s<>]+>",
            r"|(?i:\b(?:https?://|ftp://|www\.))[^\s<]*",
            r"|(?m:^[ ]{0,3}\[[^\]\^\n][^\]\n]*\]:[ \t]*\S+)",
        ))
        .expect("url pattern is valid")
    })
}

/// First pair of adjacent private-use characters absent from `source`.
fn free_marker_pair(source: &str) -> Option<(char, char)> {
    PRIVATE_USE
        .step_by(2)
        .filter_map(|cp| Some((char::from_u32(cp)?, char::from_u32(cp + 1)?)))
        .find(|&(open, close)| !source.contains(open) && !source.contains(close))
}

/// Outcome of looking at one position of the prose being scanned.
enum Scan {
    /// A math span ends at this byte offset.
    Math(usize),
    /// Not math; advance by this many bytes.
    Skip(usize),
}

/// The math spans lifted out of one source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathSpans {
    spans: Vec<String>,
    open: char,
    close: char,
}

impl Default for MathSpans {
    fn default() -> Self {
        Self {
            spans: Vec::new(),
            open: '\u{E000}',
            close: '\u{E001}',
        }
    }
}

impl MathSpans {
    /// Replace every math span in `source` with a placeholder.
    ///
    /// Returns the rewritten source together with the table needed to put the
    /// spans back.
    pub fn protect(source: &str) -> (String, Self) {
        let Some((open, close)) = free_marker_pair(source) else {
            debug!("No free placeholder characters, math left to the parser");
            return (source.to_string(), Self::default());
        };
        let mut spans = Self {
            spans: Vec::new(),
            open,
            close,
        };
        let mut out = String::with_capacity(source.len());

        for segment in segments(source) {
            match segment {
                Segment::Code(text) => out.push_str(text),
                Segment::Prose(text) => spans.protect_prose(text, &mut out),
            }
        }

        (out, spans)
    }

    /// Number of spans found.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    #[cfg(test)]
    fn spans(&self) -> &[String] {
        &self.spans
    }

    /// Put the spans back into rendered HTML, escaping them as text.
    pub fn restore(&self, html: &str) -> String {
        self.replace_placeholders(html, escape_text)
    }

    /// Put the spans back verbatim (used for plain text such as heading slugs).
    pub fn restore_plain(&self, text: &str) -> String {
        self.replace_placeholders(text, str::to_string)
    }

    fn replace_placeholders(&self, text: &str, emit: impl Fn(&str) -> String) -> String {
        if self.is_empty() || !text.contains(self.open) {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(start) = rest.find(self.open) {
            out.push_str(&rest[..start]);
            let after = &rest[start + self.open.len_utf8()..];
            let digits = after.bytes().take_while(u8::is_ascii_digit).count();
            let span = after[digits..]
                .starts_with(self.close)
                .then(|| after[..digits].parse::<usize>().ok())
                .flatten()
                .and_then(|index| self.spans.get(index));

            match span {
                Some(span) => {
                    out.push_str(&emit(span));
                    rest = &after[digits + self.close.len_utf8()..];
                }
                None => {
                    out.push(self.open);
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }

    fn push_placeholder(&mut self, span: &str, out: &mut String) {
        out.push(self.open);
        out.push_str(&self.spans.len().to_string());
        out.push(self.close);
        self.spans.push(span.to_string());
    }

    fn protect_prose(&mut self, text: &str, out: &mut String) {
        let urls: Vec<Range<usize>> = url_regex().find_iter(text).map(|m| m.range()).collect();
        let bytes = text.as_bytes();
        let mut i = 0;
        let mut flushed = 0;

        while i < bytes.len() {
            if let Some(url) = urls.iter().find(|url| url.contains(&i)) {
                i = url.end;
                continue;
            }

            let scan = match bytes[i] {
                b'`' => skip_code_span(text, i),
                b'\\' => match bytes.get(i + 1) {
                    Some(b'(') => delimited(text, i, "\\(", "\\)"),
                    Some(b'[') => delimited(text, i, "\\[", "\\]"),
                    // Escaped character, never a delimiter
                    Some(_) => Scan::Skip(1 + char_len_at(text, i + 1)),
                    None => Scan::Skip(1),
                },
                b'$' if bytes.get(i + 1) == Some(&b'$') => delimited(text, i, "$$", "$$"),
                b'$' => inline_dollar(text, i),
                _ => Scan::Skip(char_len_at(text, i)),
            };

            match scan {
                Scan::Math(end) if !urls.iter().any(|url| url.start < end && i < url.end) => {
                    out.push_str(&text[flushed..i]);
                    self.push_placeholder(&text[i..end], out);
                    i = end;
                    flushed = end;
                }
                Scan::Math(_) => i += 1,
                Scan::Skip(n) => i += n.max(1),
            }
        }

        out.push_str(&text[flushed..]);
    }
}

/// Offset of the first blank line after the line containing `from`,
/// or the end of `text`.
fn paragraph_end(text: &str, from: usize) -> usize {
    let mut offset = from;
    let mut lines = text[from..].split_inclusive('\n');
    if let Some(first) = lines.next() {
        offset += first.len();
    }
    for line in lines {
        if is_blank(line) {
            return offset;
        }
        offset += line.len();
    }
    text.len()
}

/// Step over an inline code span opened at `start`, or over the bare
/// backtick run if it is never closed.
fn skip_code_span(text: &str, start: usize) -> Scan {
    let bytes = text.as_bytes();
    let run = bytes[start..].iter().take_while(|&&b| b == b'`').count();
    let limit = paragraph_end(text, start);

    let mut j = start + run;
    while j < limit {
        if bytes[j] == b'`' {
            let closing = bytes[j..limit].iter().take_while(|&&b| b == b'`').count();
            if closing == run {
                return Scan::Skip(j + closing - start);
            }
            j += closing;
        } else {
            j += 1;
        }
    }
    Scan::Skip(run)
}

/// A span with fixed opening and closing delimiters and non-blank content.
fn delimited(text: &str, start: usize, open: &str, close: &str) -> Scan {
    let body_start = start + open.len();
    let limit = paragraph_end(text, start);
    if body_start >= limit {
        return Scan::Skip(open.len());
    }

    match text[body_start..limit].find(close) {
        Some(rel) if !text[body_start..body_start + rel].trim().is_empty() => {
            Scan::Math(body_start + rel + close.len())
        }
        _ => Scan::Skip(open.len()),
    }
}

/// An inline `$…$` span opened at `start`.
fn inline_dollar(text: &str, start: usize) -> Scan {
    let bytes = text.as_bytes();
    let body_start = start + 1;
    match text[body_start..].chars().next() {
        Some(c) if !c.is_whitespace() => {}
        _ => return Scan::Skip(1),
    }

    let limit = paragraph_end(text, start);
    let mut j = body_start;
    while j < limit {
        let Some(rel) = text[j..limit].find('$') else {
            break;
        };
        let pos = j + rel;
        let prev = bytes[pos - 1];
        let next_is_digit = bytes.get(pos + 1).is_some_and(u8::is_ascii_digit);
        if pos > body_start && !prev.is_ascii_whitespace() && prev != b'\\' && !next_is_digit {
            return Scan::Math(pos + 1);
        }
        j = pos + 1;
    }
    Scan::Skip(1)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
