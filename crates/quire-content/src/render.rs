//! Markdown to HTML rendering.

use pulldown_cmark::{html, Event, Options, Parser};

/// Render Markdown to HTML.
///
/// Tables, footnotes, strikethrough and task lists are enabled. Single line
/// breaks inside a paragraph are kept as `<br />` rather than folded into
/// the surrounding text.
pub fn render_markdown(content: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;

    let parser = Parser::new_ext(content, options).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        other => other,
    });

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    html_output
}

/// Plain-text preview of a Markdown body.
///
/// Strips the characters `#`, `*`, `` ` ``, `>`, `[` and `]`, collapses runs of
/// newlines into a single space and keeps at most `max_chars` characters.
pub fn excerpt(content: &str, max_chars: usize) -> String {
    let stripped: String = content
        .chars()
        .filter(|c| !matches!(c, '#' | '*' | '`' | '>' | '[' | ']'))
        .collect();

    let mut text = String::with_capacity(stripped.len());
    let mut in_newlines = false;
    for c in stripped.chars() {
        if c == '\n' {
            if !in_newlines {
                text.push(' ');
            }
            in_newlines = true;
        } else {
            text.push(c);
            in_newlines = false;
        }
    }

    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_markdown() {
        let html = render_markdown("# Hello\n\nWorld");

        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("<p>World</p>"));
    }

    #[test]
    fn keeps_single_line_breaks() {
        let html = render_markdown("line one\nline two");

        assert!(html.contains("line one<br />\nline two"));
    }

    #[test]
    fn renders_data_uri_images() {
        let html = render_markdown("![logo](data:image/png;base64,AAAA \"Logo\")");

        assert!(html.contains(r#"<img src="data:image/png;base64,AAAA" alt="logo" title="Logo" />"#));
    }

    #[test]
    fn renders_tables_code_and_quotes() {
        let md = "| a | b |\n|---|---|\n| 1 | 2 |\n\n```rust\nfn main() {}\n```\n\n> quoted\n\n- item\n\n[link](https://example.com) *em*";

        let html = render_markdown(md);

        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
        assert!(html.contains(r#"<code class="language-rust">"#));
        assert!(html.contains("<blockquote>"));
        assert!(html.contains("<li>item</li>"));
        assert!(html.contains(r#"<a href="https://example.com">link</a>"#));
        assert!(html.contains("<em>em</em>"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let md = "# T\n\ntext\nmore\n\n| x |\n|---|\n| y |";

        assert_eq!(render_markdown(md), render_markdown(md));
    }

    #[test]
    fn builds_excerpt() {
        let text = excerpt("# Title\n\n> Some *bold* `code`\n[link]", 100);

        assert_eq!(text, " Title  Some bold code link");
    }

    #[test]
    fn truncates_excerpt_by_characters() {
        assert_eq!(excerpt("日本語のテキスト", 3), "日本語");
    }
}
