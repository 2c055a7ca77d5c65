use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd, html};
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

// Initialize syntax highlighting resources once
static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const HIGHLIGHT_THEME: &str = "base16-ocean.dark";

/// Turns the raw bytes of one document into an HTML fragment.
///
/// Implementations must be pure: the same bytes always give the same
/// fragment, and there is no failure mode. Input that does not parse as
/// markup comes back as literal text.
pub trait MarkupEngine {
    fn translate(&self, raw: &[u8]) -> String;
}

/// CommonMark with the usual GitHub extensions, backed by pulldown-cmark.
#[derive(Debug, Clone)]
pub struct CmarkEngine {
    options: Options,
    highlight: bool,
}

impl Default for CmarkEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CmarkEngine {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        Self {
            options,
            highlight: true,
        }
    }

    /// Render fenced code as plain escaped `<pre><code>` blocks.
    pub fn without_highlighting(mut self) -> Self {
        self.highlight = false;
        self
    }

    fn highlight_events<'a>(&self, parser: Parser<'a>) -> Vec<Event<'a>> {
        let events: Vec<Event> = parser.collect();
        let mut processed_events = Vec::with_capacity(events.len());
        let mut i = 0;

        while i < events.len() {
            match &events[i] {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(lang))) if !lang.is_empty() => {
                    // Collect all text events until the end of the code block
                    let mut code = String::new();
                    i += 1;

                    while i < events.len() {
                        match &events[i] {
                            Event::End(TagEnd::CodeBlock) => break,
                            Event::Text(text) => code.push_str(text),
                            _ => {}
                        }
                        i += 1;
                    }

                    processed_events.push(Event::Html(highlight_code(lang, &code).into()));
                }
                event => processed_events.push(event.clone()),
            }
            i += 1;
        }

        processed_events
    }
}

impl MarkupEngine for CmarkEngine {
    fn translate(&self, raw: &[u8]) -> String {
        let content = String::from_utf8_lossy(raw);
        let parser = Parser::new_ext(&content, self.options);

        let mut out = String::with_capacity(content.len() * 3 / 2);
        if self.highlight {
            html::push_html(&mut out, self.highlight_events(parser).into_iter());
        } else {
            html::push_html(&mut out, parser);
        }

        out
    }
}

fn highlight_code(lang: &str, code: &str) -> String {
    // Info strings may carry attributes after the language token
    let token = lang.split_whitespace().next().unwrap_or_default();

    let syntax = SYNTAX_SET.find_syntax_by_token(token).or_else(|| {
        // Fallback mappings for unsupported languages
        match token {
            "nix" => SYNTAX_SET.find_syntax_by_name("JavaScript"),
            "toml" => SYNTAX_SET.find_syntax_by_name("YAML"),
            _ => None,
        }
    });

    let plain = || format!("<pre><code>{}</code></pre>\n", html_escape::encode_text(code));

    match (syntax, THEME_SET.themes.get(HIGHLIGHT_THEME)) {
        (Some(syntax), Some(theme)) => {
            highlighted_html_for_string(code, &SYNTAX_SET, syntax, theme).unwrap_or_else(|_| plain())
        }
        _ => plain(),
    }
}
