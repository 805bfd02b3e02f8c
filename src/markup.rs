//! Inline markdown rendering for catalog text.
//!
//! Detail values, intros and credits carry a small subset of markdown.
//! [`MarkdownInline`] turns that subset into HTML fragments:
//!
//! | Source | Output |
//! |--------|--------|
//! | `**strong**`, `__strong__` | `<strong>` |
//! | `*em*`, `_em_` | `<em>` |
//! | `` `code` `` | `<code>` |
//! | `[text](url)` | `<a href>` |
//! | bare `http(s)://…` | `<a href>` |
//! | newline | `<br />` |
//!
//! Everything else is HTML-escaped. Block syntax (headings, lists, quotes)
//! is not recognised. Unmatched markers are kept as literal text.

use vtuber_handbook_core::detail::InlineRenderer;

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownInline;

impl InlineRenderer for MarkdownInline {
    fn render_inline(&self, raw: &str) -> String {
        let normalized = raw.replace("\r\n", "\n");
        render(normalized.trim_end_matches('\n'))
    }
}

/// Render inline markdown in `text`.
pub fn render(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 4);
    let mut i = 0;

    while i < text.len() {
        let rest = &text[i..];

        if let Some(consumed) = escaped_char(rest, &mut out) {
            i += consumed;
            continue;
        }
        if let Some(consumed) = code_span(rest, &mut out) {
            i += consumed;
            continue;
        }
        if let Some(consumed) = strong(rest, &mut out) {
            i += consumed;
            continue;
        }
        if let Some(consumed) = emphasis(rest, prev_char(text, i), &mut out) {
            i += consumed;
            continue;
        }
        if let Some(consumed) = link(rest, &mut out) {
            i += consumed;
            continue;
        }
        if let Some(consumed) = autolink(rest, prev_char(text, i), &mut out) {
            i += consumed;
            continue;
        }

        let Some(c) = rest.chars().next() else { break };
        if c == '\n' {
            out.push_str("<br />\n");
        } else {
            push_escaped_char(&mut out, c);
        }
        i += c.len_utf8();
    }

    out
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        push_escaped_char(&mut out, c);
    }
    out
}

fn push_escaped_char(out: &mut String, c: char) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        _ => out.push(c),
    }
}

fn prev_char(text: &str, i: usize) -> Option<char> {
    text[..i].chars().next_back()
}

/// `\*` and friends.
fn escaped_char(rest: &str, out: &mut String) -> Option<usize> {
    let mut chars = rest.chars();
    if chars.next()? != '\\' {
        return None;
    }
    let next = chars.next()?;
    if !next.is_ascii_punctuation() {
        return None;
    }
    push_escaped_char(out, next);
    Some(1 + next.len_utf8())
}

fn code_span(rest: &str, out: &mut String) -> Option<usize> {
    let body = rest.strip_prefix('`')?;
    let end = body.find('`')?;
    if end == 0 {
        return None;
    }
    out.push_str("<code>");
    out.push_str(&escape_html(&body[..end]));
    out.push_str("</code>");
    Some(end + 2)
}

fn strong(rest: &str, out: &mut String) -> Option<usize> {
    let marker = if rest.starts_with("**") {
        "**"
    } else if rest.starts_with("__") {
        "__"
    } else {
        return None;
    };
    let body = &rest[2..];
    if body.starts_with(char::is_whitespace) {
        return None;
    }
    let end = body.find(marker)?;
    if end == 0 || body[..end].ends_with(char::is_whitespace) {
        return None;
    }
    out.push_str("<strong>");
    out.push_str(&render(&body[..end]));
    out.push_str("</strong>");
    Some(end + 4)
}

fn emphasis(rest: &str, prev: Option<char>, out: &mut String) -> Option<usize> {
    let marker = rest.chars().next()?;
    if marker != '*' && marker != '_' {
        return None;
    }
    // snake_case words are not emphasis.
    if marker == '_' && prev.is_some_and(char::is_alphanumeric) {
        return None;
    }
    let body = &rest[1..];
    if body.starts_with(char::is_whitespace) || body.starts_with(marker) {
        return None;
    }
    let end = body.find(marker)?;
    let inner = &body[..end];
    if inner.is_empty() || inner.ends_with(char::is_whitespace) || inner.contains('\n') {
        return None;
    }
    if marker == '_' && body[end + 1..].starts_with(char::is_alphanumeric) {
        return None;
    }
    out.push_str("<em>");
    out.push_str(&render(inner));
    out.push_str("</em>");
    Some(end + 2)
}

fn link(rest: &str, out: &mut String) -> Option<usize> {
    let body = rest.strip_prefix('[')?;
    let text_end = body.find("](")?;
    let text = &body[..text_end];
    if text.is_empty() || text.contains('\n') {
        return None;
    }
    let after = &body[text_end + 2..];
    let url_end = after.find(')')?;
    let url = after[..url_end].trim();
    if url.is_empty() || url.contains(char::is_whitespace) {
        return None;
    }
    push_anchor(out, url, &render(text));
    Some(1 + text_end + 2 + url_end + 1)
}

fn autolink(rest: &str, prev: Option<char>, out: &mut String) -> Option<usize> {
    if !(rest.starts_with("http://") || rest.starts_with("https://")) {
        return None;
    }
    if prev.is_some_and(|c| c.is_alphanumeric() || c == '/') {
        return None;
    }
    let end = rest
        .find(|c: char| c.is_whitespace() || c == '<' || c == '>')
        .unwrap_or(rest.len());
    let url = rest[..end].trim_end_matches(|c: char| ".,;:!?)'\"".contains(c));
    if url.ends_with("://") {
        return None;
    }
    push_anchor(out, url, &escape_html(url));
    Some(url.len())
}

fn push_anchor(out: &mut String, url: &str, inner_html: &str) {
    out.push_str("<a href=\"");
    out.push_str(&escape_html(url));
    out.push_str("\">");
    out.push_str(inner_html);
    out.push_str("</a>");
}
