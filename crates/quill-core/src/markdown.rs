//! Markdown to HTML rendering.

use pulldown_cmark::{Options, Parser, html};

/// Renders CommonMark input to an HTML fragment.
///
/// Tables, strikethrough, footnotes and task lists are enabled on top of
/// plain CommonMark. Rendering never fails; malformed input simply comes
/// out as the literal text the parser recovered.
pub fn render_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}
