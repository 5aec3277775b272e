use scraper::{ElementRef, Html, Selector};

/// Returns the inner markup of the first `body` element in the document.
///
/// A document without a body yields an empty string; that is a normal
/// result, not an error.
pub fn extract_body(html: &str) -> String {
    let doc = Html::parse_document(html);
    let body_selector = Selector::parse("body").unwrap();
    match doc.select(&body_selector).next() {
        Some(body) => body.inner_html(),
        None => String::new(),
    }
}

/// Reduces body markup to readable plain text.
///
/// Drops `script` and `style` elements together with everything beneath
/// them, collects the remaining text runs in document order with a newline
/// between runs, then trims each line and removes the ones that are empty
/// after trimming. Every line of the output is non-empty and carries no
/// surrounding whitespace.
pub fn clean_text(markup: &str) -> String {
    let doc = Html::parse_fragment(markup);

    let mut runs: Vec<String> = Vec::new();
    collect_text_runs(doc.root_element(), &mut runs);

    runs.join("\n")
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Walks an element's subtree collecting text nodes, skipping any
/// `script` or `style` element entirely.
fn collect_text_runs(element: ElementRef<'_>, runs: &mut Vec<String>) {
    if matches!(element.value().name(), "script" | "style") {
        return;
    }

    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            runs.push(text.to_string());
        } else if let Some(child_element) = ElementRef::wrap(child) {
            collect_text_runs(child_element, runs);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_body_inner_markup() {
        let html = "<html><head><title>t</title></head><body><p>Hello</p></body></html>";
        assert_eq!(extract_body(html), "<p>Hello</p>");
    }

    #[test]
    fn test_extract_body_empty_document() {
        assert_eq!(extract_body("<html><head></head></html>"), "");
        assert_eq!(extract_body(""), "");
    }

    #[test]
    fn test_clean_text_removes_scripts() {
        let body = "<script>alert(1)</script><p>Hello</p>";
        assert_eq!(clean_text(body), "Hello");
    }

    #[test]
    fn test_clean_text_removes_styles() {
        let body = "<style>p { color: red; }</style><p>Hello</p><style>.x{}</style>";
        assert_eq!(clean_text(body), "Hello");
    }

    #[test]
    fn test_clean_text_removes_nested_script_content() {
        let body = "<div><p>Before</p><script>var x = '<p>fake</p>';</script><p>After</p></div>";
        assert_eq!(clean_text(body), "Before\nAfter");
    }

    #[test]
    fn test_clean_text_line_hygiene() {
        let body = "<p>  Hello  \n\n\nWorld  </p>";
        assert_eq!(clean_text(body), "Hello\nWorld");
    }

    #[test]
    fn test_clean_text_block_order() {
        let body = "<h1>Title</h1><p>First</p><p>Second</p>";
        assert_eq!(clean_text(body), "Title\nFirst\nSecond");
    }

    #[test]
    fn test_clean_text_empty_input() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("<script>only()</script>"), "");
    }

    #[test]
    fn test_full_document_pipeline() {
        let html = "<html><body><script>alert(1)</script><p>Hello</p></body></html>";
        assert_eq!(clean_text(&extract_body(html)), "Hello");
    }
}
