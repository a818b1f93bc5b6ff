//! Heading anchors
//!
//! Every heading gets an `id` derived from its text. Slugs are lower-case,
//! with each run of non-alphanumeric characters collapsed into one hyphen.
//! Repeated slugs within a document get `-1`, `-2`, … appended.

use std::collections::HashSet;
use std::fmt::{self, Write};
use std::sync::Mutex;

use comrak::adapters::{HeadingAdapter, HeadingMeta};
use comrak::nodes::Sourcepos;

use super::math::MathSpans;

/// Slug used when a heading has no alphanumeric text at all.
const EMPTY_SLUG: &str = "heading";

/// Turn heading text into a URL-safe slug.
///
/// ```ignore
/// assert_eq!(slugify("Hello, World!"), "hello-world");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        EMPTY_SLUG.to_string()
    } else {
        slug
    }
}

/// Issues collision-free slugs for one document.
#[derive(Debug, Default)]
pub struct Slugger {
    issued: HashSet<String>,
}

impl Slugger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slug for `text`, disambiguated against every slug issued so far.
    pub fn slug(&mut self, text: &str) -> String {
        let base = slugify(text);
        if self.issued.insert(base.clone()) {
            return base;
        }

        let mut suffix = 1usize;
        loop {
            let candidate = format!("{}-{}", base, suffix);
            if self.issued.insert(candidate.clone()) {
                return candidate;
            }
            suffix += 1;
        }
    }
}

/// comrak heading adapter that writes `<hN id="slug">`.
///
/// Lives for a single render call; the slug registry is its only state.
pub struct HeadingAnchors<'a> {
    slugger: Mutex<Slugger>,
    math: &'a MathSpans,
}

impl<'a> HeadingAnchors<'a> {
    /// `math` lets slugs be computed from the heading's real text rather than
    /// from math placeholders.
    pub fn new(math: &'a MathSpans) -> Self {
        Self {
            slugger: Mutex::new(Slugger::new()),
            math,
        }
    }
}

impl HeadingAdapter for HeadingAnchors<'_> {
    fn enter(
        &self,
        output: &mut dyn Write,
        heading: &HeadingMeta,
        _sourcepos: Option<Sourcepos>,
    ) -> fmt::Result {
        let text = self.math.restore_plain(&heading.content);
        let id = self
            .slugger
            .lock()
            .map_err(|_| fmt::Error)?
            .slug(&text);
        write!(output, "<h{} id=\"{}\">", heading.level, id)
    }

    fn exit(&self, output: &mut dyn Write, heading: &HeadingMeta) -> fmt::Result {
        write!(output, "</h{}>", heading.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Introduction"), "introduction");
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Multiple   Spaces  "), "multiple-spaces");
        assert_eq!(slugify("a -- b__c"), "a-b-c");
    }

    #[test]
    fn test_slugify_unicode() {
        assert_eq!(slugify("Café Über"), "café-über");
        assert_eq!(slugify("安装 指南"), "安装-指南");
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify(""), "heading");
        assert_eq!(slugify("!!!"), "heading");
    }

    #[test]
    fn test_duplicate_slugs_get_suffix() {
        let mut slugger = Slugger::new();
        assert_eq!(slugger.slug("Setup"), "setup");
        assert_eq!(slugger.slug("Setup"), "setup-1");
        assert_eq!(slugger.slug("setup!"), "setup-2");
    }

    #[test]
    fn test_suffix_skips_existing_slug() {
        let mut slugger = Slugger::new();
        assert_eq!(slugger.slug("Intro 1"), "intro-1");
        assert_eq!(slugger.slug("Intro"), "intro");
        assert_eq!(slugger.slug("Intro"), "intro-2");
    }

    #[test]
    fn test_slugs_are_deterministic() {
        let run = || {
            let mut slugger = Slugger::new();
            ["A", "B", "A", "A"].map(|t| slugger.slug(t))
        };
        assert_eq!(run(), run());
        assert_eq!(run(), ["a", "b", "a-1", "a-2"]);
    }
}
