use url::Url;

/// Checks whether a string is a usable web URL.
///
/// A URL is accepted only when it parses and carries both a scheme and a
/// host (e.g. `https://example.com`). Anything else, including strings
/// that fail to parse at all, is a normal `false` rather than an error.
pub fn is_valid_url(input: &str) -> bool {
    match Url::parse(input) {
        Ok(url) => !url.scheme().is_empty() && url.has_host(),
        Err(_) => false,
    }
}
