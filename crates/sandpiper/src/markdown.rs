use pulldown_cmark::{self as md, html};

fn options() -> md::Options {
    let mut options = md::Options::empty();
    options.insert(md::Options::ENABLE_TABLES);
    options.insert(md::Options::ENABLE_FOOTNOTES);
    options.insert(md::Options::ENABLE_STRIKETHROUGH);
    options.insert(md::Options::ENABLE_TASKLISTS);
    options.insert(md::Options::ENABLE_HEADING_ATTRIBUTES);
    options
}

/// Renders the given Markdown to HTML.
///
/// Inline HTML in the source is passed through as-is.
pub fn markdown_to_html(text: &str) -> String {
    let parser = md::Parser::new_ext(text, options());

    let mut output = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut output, parser);

    output
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_markdown() {
        let text = indoc! {"
            # Hello, world!

            Here are some items:
            - Apple
            - Banana
        "};

        assert_eq!(
            markdown_to_html(text),
            indoc! {"
                <h1>Hello, world!</h1>
                <p>Here are some items:</p>
                <ul>
                <li>Apple</li>
                <li>Banana</li>
                </ul>
            "}
        );
    }

    #[test]
    fn test_markdown_table() {
        let text = indoc! {"
            | Name | Value |
            | ---- | ----- |
            | A    | 1     |
        "};

        let html = markdown_to_html(text);

        assert!(html.contains("<table>"));
        assert!(html.contains("<td>A</td>"));
    }

    #[test]
    fn test_inline_html_is_preserved() {
        assert_eq!(
            markdown_to_html("Prices rose <strong>sharply</strong>."),
            "<p>Prices rose <strong>sharply</strong>.</p>\n"
        );
    }

    #[test]
    fn test_strikethrough() {
        assert_eq!(markdown_to_html("~~gone~~"), "<p><del>gone</del></p>\n");
    }
}
