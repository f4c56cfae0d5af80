//! HTML rendering for chat bubbles.
//!
//! Everything that ends up in displayed markup passes through
//! [`escape_html`] first; the only unescaped markup is what this module
//! emits itself.

use serde_json::Value;

/// Shown in place of a reply when both delivery attempts fail.
pub const SEND_FAILED_TEXT: &str = "Error: could not reach server. See console.";

/// Shown when the server answered with an empty body.
pub const NO_CONTENT_HTML: &str = "<i>(no content)</i>";

const PRE_STYLE: &str = "white-space:pre-wrap; font-family:ui-monospace, SFMono-Regular, Menlo, Monaco, 'Roboto Mono', monospace; font-size:0.9rem;";

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Markup for the local echo of what the user typed.
pub fn user_bubble(text: &str) -> String {
    format!("<div>{}</div>", escape_html(text))
}

/// Turns reply text into bubble markup.
///
/// JSON-looking text that parses is pretty-printed into a `<pre>` block.
/// Anything else is escaped with newlines turned into `<br/>`.
pub fn format_response(text: &str) -> String {
    if let Some(pretty) = pretty_json(text) {
        return format!("<pre style=\"{}\">{}</pre>", PRE_STYLE, escape_html(&pretty));
    }
    escape_html(text).replace('\n', "<br/>")
}

fn pretty_json(text: &str) -> Option<String> {
    let trimmed = text.trim_start();
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        return None;
    }
    let parsed: Value = serde_json::from_str(text).ok()?;
    serde_json::to_string_pretty(&parsed).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html(r#"<b a="1">Tom & 'Jerry'</b>"#),
            "&lt;b a=&quot;1&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape_html(""), "");
    }

    #[test]
    fn user_bubble_wraps_escaped_text() {
        assert_eq!(user_bubble("a<b"), "<div>a&lt;b</div>");
    }

    #[test]
    fn plain_text_keeps_line_breaks() {
        assert_eq!(format_response("Hi there"), "Hi there");
        assert_eq!(format_response("one\ntwo <3"), "one<br/>two &lt;3");
    }

    #[test]
    fn json_text_is_pretty_printed() {
        let html = format_response(r#"{"a":1,"b":"<x>"}"#);
        assert!(html.starts_with("<pre style="));
        assert!(html.ends_with("</pre>"));
        assert!(html.contains("{\n  &quot;a&quot;: 1,\n  &quot;b&quot;: &quot;&lt;x&gt;&quot;\n}"));
    }

    #[test]
    fn leading_whitespace_still_counts_as_json() {
        let html = format_response("  [1, 2]\n");
        assert!(html.contains("[\n  1,\n  2\n]"));
    }

    #[test]
    fn malformed_json_falls_back_to_text() {
        assert_eq!(format_response("{not json\nreally}"), "{not json<br/>really}");
        assert_eq!(format_response("[<oops>"), "[&lt;oops&gt;");
    }
}
