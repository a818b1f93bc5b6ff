//! HTML Export Generation
//!
//! Wraps a rendered fragment in a standalone page: stylesheet, CDN scripts
//! for Mermaid, ECharts and KaTeX, and a post-load script that turns the
//! `mermaid`/`echarts` code blocks into diagrams and charts and typesets math.
//!
//! The page shell is a fixed template; only `lang`, `<title>` and the
//! fragment vary.

use std::fs;
use std::path::Path;

use log::info;

use crate::error::{Error, Result};
use crate::i18n::Language;
use crate::markdown::MarkdownRenderer;
use crate::string_utils::escape_html;

// ─────────────────────────────────────────────────────────────────────────────
// Document Shell
// ─────────────────────────────────────────────────────────────────────────────

/// The parts of the page shell that change between exports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentShell {
    /// Value of the `<html lang>` attribute
    pub lang: String,
    /// Text of the `<title>` element (escaped on output)
    pub title: String,
}

impl Default for DocumentShell {
    fn default() -> Self {
        Self::for_language(Language::default())
    }
}

impl DocumentShell {
    /// Shell texts for `language`.
    pub fn for_language(language: Language) -> Self {
        let texts = language.texts();
        Self {
            lang: texts.html_lang.to_string(),
            title: texts.html_title.to_string(),
        }
    }

    /// Replace the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HTML Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Wrap `fragment` in the default page shell.
pub fn assemble(fragment: &str) -> String {
    assemble_with(fragment, &DocumentShell::default())
}

/// Wrap `fragment` in a page shell with the given language and title.
///
/// The fragment is inserted verbatim.
pub fn assemble_with(fragment: &str, shell: &DocumentShell) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="generator" content="mdforge">
    <title>{title}</title>
{scripts}
    <style>
{css}
    </style>
</head>
<body>
    <div class="markdown-body">
{body}
    </div>
    <script>
{post_load}
    </script>
</body>
</html>
"#,
        lang = escape_html(&shell.lang),
        title = escape_html(&shell.title),
        scripts = CDN_SCRIPTS,
        css = DOCUMENT_CSS,
        body = fragment,
        post_load = POST_LOAD_SCRIPT,
    )
}

/// Render `markdown` and wrap it in a page.
pub fn generate_html_document(
    renderer: &MarkdownRenderer,
    markdown: &str,
    shell: &DocumentShell,
) -> Result<String> {
    let fragment = renderer.render(markdown)?;
    Ok(assemble_with(&fragment, shell))
}

/// Render `markdown` and write the page to `output_path`.
pub fn export_to_html_file(
    renderer: &MarkdownRenderer,
    markdown: &str,
    output_path: &Path,
    shell: &DocumentShell,
) -> Result<()> {
    let html = generate_html_document(renderer, markdown, shell)?;

    fs::write(output_path, &html).map_err(|e| Error::FileWrite {
        path: output_path.to_path_buf(),
        source: e,
    })?;

    info!(
        "Exported {} bytes of HTML to {}",
        html.len(),
        output_path.display()
    );
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Page Template
// ─────────────────────────────────────────────────────────────────────────────

/// External libraries, loaded from jsDelivr.
const CDN_SCRIPTS: &str = r#"    <script src="https://cdn.jsdelivr.net/npm/mermaid@10/dist/mermaid.min.js"></script>
    <script src="https://cdn.jsdelivr.net/npm/echarts@5.4.3/dist/echarts.min.js"></script>
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/katex.min.css">
    <script defer src="https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/katex.min.js"></script>
    <script defer src="https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/contrib/auto-render.min.js"></script>"#;

/// Page stylesheet (GitHub-like light look).
const DOCUMENT_CSS: &str = r#"        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Roboto', sans-serif; line-height: 1.6; margin: 0; padding: 0; color: #24292e; background-color: #fff; }
        .markdown-body { box-sizing: border-box; min-width: 200px; max-width: 980px; margin: 0 auto; padding: 45px; }
        h1, h2, h3, h4, h5, h6 { margin-top: 24px; margin-bottom: 16px; font-weight: 600; line-height: 1.25; }
        h1 { font-size: 2em; border-bottom: 1px solid #eaecef; padding-bottom: 0.3em; }
        h2 { font-size: 1.5em; border-bottom: 1px solid #eaecef; padding-bottom: 0.3em; }
        a { color: #0366d6; text-decoration: none; }
        a:hover { text-decoration: underline; }
        img { max-width: 100%; }
        hr { height: 0.25em; padding: 0; margin: 24px 0; background-color: #e1e4e8; border: 0; }

        /* Code */
        pre { background-color: #f6f8fa; border-radius: 6px; padding: 16px; overflow: auto; }
        code { font-family: 'SFMono-Regular', Consolas, monospace; font-size: 85%; }
        :not(pre) > code { background-color: rgba(27, 31, 35, 0.05); border-radius: 3px; padding: 0.2em 0.4em; }

        blockquote { margin: 0; padding: 0 1em; color: #6a737d; border-left: 0.25em solid #dfe2e5; }
        table { border-collapse: collapse; width: 100%; margin-bottom: 16px; }
        table th { font-weight: 600; background-color: #f6f8fa; }
        table th, table td { padding: 6px 13px; border: 1px solid #dfe2e5; }

        /* Task lists */
        .contains-task-list { list-style: none; padding-left: 1.2em; }
        .task-list-item input[type="checkbox"] { margin: 0 0.4em 0.2em -1.2em; vertical-align: middle; }

        /* Diagrams and charts */
        .mermaid { text-align: center; margin: 16px 0; min-height: 100px; }
        .echarts-container { width: 100%; height: 400px; margin: 16px 0; }
        .echarts-error { color: #d9534f; margin: 0; font-family: 'SFMono-Regular', Consolas, monospace; white-space: pre-wrap; }

        /* Admonitions */
        .admonition {
            padding: 15px;
            margin-bottom: 20px;
            border: 1px solid transparent;
            border-radius: 4px;
            border-left-width: 5px;
            border-left-style: solid;
        }
        .admonition .adm-title {
            margin: 0;
            margin-bottom: 10px;
            font-weight: bold;
            text-transform: uppercase;
        }
        .admonition .adm-body > :first-child { margin-top: 0; }
        .admonition .adm-body > :last-child { margin-bottom: 0; }
        .admonition.adm-note, .admonition.adm-abstract, .admonition.adm-info, .admonition.adm-example, .admonition.adm-quote {
            border-color: #eee; border-left-color: #428bca; background-color: #f6faff;
        }
        .admonition.adm-success, .admonition.adm-tip, .admonition.adm-hint {
            border-color: #eee; border-left-color: #5cb85c; background-color: #f4fcf4;
        }
        .admonition.adm-warning, .admonition.adm-caution, .admonition.adm-attention, .admonition.adm-question {
            border-color: #eee; border-left-color: #f0ad4e; background-color: #fcf8f2;
        }
        .admonition.adm-danger, .admonition.adm-error, .admonition.adm-bug, .admonition.adm-failure {
            border-color: #eee; border-left-color: #d9534f; background-color: #fdf7f7;
        }

        /* Footnotes */
        .footnotes {
            margin-top: 30px;
            border-top: 1px solid #eaecef;
            padding-top: 20px;
            font-size: 0.85em;
            color: #6a737d;
        }"#;

/// Runs once the DOM is ready: diagrams, then charts, then math.
///
/// Each pass catches its own failures so one broken block never stops the
/// rest of the page from rendering.
const POST_LOAD_SCRIPT: &str = r#"        function codeBlocks(language) {
            var wanted = 'language-' + language;
            return Array.prototype.filter.call(document.querySelectorAll('pre > code'), function (el) {
                return el.className.toLowerCase().split(/\s+/).indexOf(wanted) !== -1;
            });
        }

        window.addEventListener('DOMContentLoaded', function () {
            // Diagrams
            try {
                codeBlocks('mermaid').forEach(function (el) {
                    var pre = el.parentElement;
                    var div = document.createElement('div');
                    div.className = 'mermaid';
                    div.textContent = el.textContent;
                    pre.parentNode.replaceChild(div, pre);
                });
                if (typeof mermaid === 'undefined') {
                    console.error('Mermaid is not available');
                } else {
                    mermaid.initialize({ startOnLoad: false, theme: 'default', securityLevel: 'loose' });
                    Promise.resolve(mermaid.run()).catch(function (e) {
                        console.error('Mermaid error', e);
                    });
                }
            } catch (e) {
                console.error('Mermaid error', e);
            }

            // Charts
            codeBlocks('echarts').forEach(function (el, index) {
                var pre = el.parentElement;
                var div = null;
                try {
                    // Evaluated as an expression so option objects may contain functions
                    var option = new Function('return ' + el.textContent)();
                    div = document.createElement('div');
                    div.className = 'echarts-container';
                    div.id = 'echarts-chart-' + index;
                    pre.parentNode.replaceChild(div, pre);

                    var chart = echarts.init(div);
                    chart.setOption(option);
                    window.addEventListener('resize', function () {
                        chart.resize();
                    });
                } catch (e) {
                    console.error('ECharts error', e);
                    var message = document.createElement('p');
                    message.className = 'echarts-error';
                    message.textContent = 'ECharts Error: ' + (e && e.message ? e.message : e);
                    var host = div && div.parentNode ? div : pre;
                    host.textContent = '';
                    host.appendChild(message);
                }
            });

            // Math
            try {
                if (typeof renderMathInElement !== 'undefined') {
                    renderMathInElement(document.body, {
                        delimiters: [
                            { left: '$$', right: '$$', display: true },
                            { left: '$', right: '$', display: false },
                            { left: '\\(', right: '\\)', display: false },
                            { left: '\\[', right: '\\]', display: true }
                        ],
                        throwOnError: false
                    });
                }
            } catch (e) {
                console.error('KaTeX error', e);
            }
        });"#;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
