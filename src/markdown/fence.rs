//! Fenced code block detection for the source preprocessors.
//!
//! The admonition and math preprocessors run on raw Markdown text before
//! comrak sees it, and must leave the contents of code fences alone. This is a
//! deliberately loose, line-based recognizer: indentation before the fence is
//! ignored so fences nested inside list items and admonition bodies are found.

/// An open code fence: its marker character and run length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fence {
    marker: char,
    len: usize,
}

impl Fence {
    /// Recognize a line that opens a fence (three or more `` ` `` or `~`).
    pub fn open(line: &str) -> Option<Self> {
        let trimmed = line.trim_start();
        let marker = trimmed.chars().next()?;
        if marker != '`' && marker != '~' {
            return None;
        }
        let len = trimmed.chars().take_while(|&c| c == marker).count();
        if len < 3 {
            return None;
        }
        // Backtick fences cannot carry backticks in their info string
        if marker == '`' && trimmed[len..].contains('`') {
            return None;
        }
        Some(Self { marker, len })
    }

    /// Whether `line` closes this fence.
    pub fn closes(&self, line: &str) -> bool {
        let trimmed = line.trim();
        let run = trimmed.chars().take_while(|&c| c == self.marker).count();
        run >= self.len && run == trimmed.len()
    }
}

/// A slice of Markdown source that is either inside a code fence or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// A fenced code block, opening and closing lines included.
    Code(&'a str),
    /// Everything else.
    Prose(&'a str),
}

/// Split `source` into alternating prose and fenced-code segments.
///
/// Concatenating the segments yields `source` again. An unterminated fence
/// runs to the end of the input, as CommonMark specifies.
pub fn segments(source: &str) -> Vec<Segment<'_>> {
    let mut result = Vec::new();
    let mut start = 0;
    let mut offset = 0;
    let mut fence: Option<Fence> = None;

    for line in source.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        let content = line.trim_end_matches(['\n', '\r']);

        match fence {
            Some(open) => {
                if open.closes(content) {
                    result.push(Segment::Code(&source[start..offset]));
                    start = offset;
                    fence = None;
                }
            }
            None => {
                if let Some(open) = Fence::open(content) {
                    if line_start > start {
                        result.push(Segment::Prose(&source[start..line_start]));
                    }
                    start = line_start;
                    fence = Some(open);
                }
            }
        }
    }

    if start < source.len() {
        let rest = &source[start..];
        result.push(if fence.is_some() {
            Segment::Code(rest)
        } else {
            Segment::Prose(rest)
        });
    }

    result
}
