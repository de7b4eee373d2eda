//! Markup neutralization for free-text fields
//!
//! Values are stored and redisplayed escaped, so a name like
//! `<script>` can never reach a page as live markup.

/// Escape a string for inclusion in HTML text or attribute context.
///
/// Escapes: ampersand, angle brackets, both quotes, slash, backslash, backtick.
/// Ampersand goes first so existing entities are escaped exactly once.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
        .replace('/', "&#x2F;")
        .replace('\\', "&#x5C;")
        .replace('`', "&#96;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html_plain() {
        assert_eq!(escape_html("Ford Motor"), "Ford Motor");
    }

    #[test]
    fn test_escape_html_script_tag() {
        assert_eq!(
            escape_html("<script>alert('x')</script>"),
            "&lt;script&gt;alert(&#x27;x&#x27;)&lt;&#x2F;script&gt;"
        );
    }

    #[test]
    fn test_escape_html_ampersand_first() {
        assert_eq!(escape_html("&lt;"), "&amp;lt;");
    }

    #[test]
    fn test_escape_html_quotes_and_backtick() {
        insta::assert_snapshot!(escape_html(r#"say "hi" `now` \ ok"#), @"say &quot;hi&quot; &#96;now&#96; &#x5C; ok");
    }
}
