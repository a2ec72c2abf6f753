// src/htmldoc/reference.rs
// =============================================================================
// A Reference is one link occurrence: the href of one node in one document,
// split into the parts the checkers care about.
//
// Parsing never fails. An href the `url` crate can't make sense of keeps its
// raw text and gets an empty scheme; the router reports it as unchecked.
//
// Resolution rules:
//   "https://a.test/x"  -> scheme https
//   "//a.test/x"        -> scheme https (protocol-relative)
//   "sub/page.html"     -> scheme file, joined against the document
//   "/abs.html", "#top" -> scheme file
//   "mailto:a@b.test"   -> scheme mailto, opaque "a@b.test"
// =============================================================================

use super::{Document, Node};
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

#[derive(Debug, Clone)]
pub struct Reference {
    pub document: Arc<Document>,
    pub node: Arc<Node>,
    /// The href exactly as written in the HTML
    pub href: String,
    scheme: String,
    url: Option<Url>,
    path: String,
}

impl Reference {
    pub fn new(document: Arc<Document>, node: Arc<Node>, href: &str) -> Self {
        let (url, relative) = parse_href(&document, href);

        let scheme = url
            .as_ref()
            .map(|u| u.scheme().to_string())
            .unwrap_or_default();

        // The trailing-slash rule looks at the path as the author wrote it,
        // not at the resolved one.
        let path = if relative {
            href.split(&['?', '#'][..]).next().unwrap_or_default().to_string()
        } else {
            url.as_ref().map(|u| u.path().to_string()).unwrap_or_default()
        };

        Self {
            document,
            node,
            href: href.to_string(),
            scheme,
            url,
            path,
        }
    }

    /// Lower-case scheme, or "" when the href could not be parsed
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Payload of scheme-only URLs such as `mailto:` and `tel:`
    pub fn opaque(&self) -> &str {
        match &self.url {
            Some(url) if url.cannot_be_a_base() => url.path(),
            _ => "",
        }
    }

    pub fn query(&self) -> Option<&str> {
        self.url.as_ref().and_then(Url::query)
    }

    pub fn fragment(&self) -> Option<&str> {
        self.url.as_ref().and_then(Url::fragment)
    }

    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// The URL that gets requested for external links: everything but the
    /// fragment, which never reaches the server anyway.
    pub fn url_string(&self) -> String {
        match &self.url {
            Some(url) => {
                let mut url = url.clone();
                url.set_fragment(None);
                url.to_string()
            }
            None => self.href.clone(),
        }
    }

    /// Percent-decoded target path relative to the site root, with a
    /// leading slash, e.g. `/docs/my page.html`.
    pub fn site_path(&self) -> PathBuf {
        match &self.url {
            Some(url) => url
                .to_file_path()
                .unwrap_or_else(|_| PathBuf::from(url.path())),
            None => PathBuf::from(&self.path),
        }
    }
}

/// Removes the query string from an absolute URL string.
/// Strings that don't parse are returned unchanged.
pub fn strip_query_string(url_str: &str) -> String {
    match Url::parse(url_str) {
        Ok(mut url) => {
            url.set_query(None);
            url.to_string()
        }
        Err(_) => url_str.to_string(),
    }
}

// Returns the parsed URL (if any) and whether the href was relative
fn parse_href(document: &Document, href: &str) -> (Option<Url>, bool) {
    if href.starts_with("//") {
        return (Url::parse(&format!("https:{}", href)).ok(), false);
    }

    match Url::parse(href) {
        Ok(url) => (Some(url), false),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let url = document.base_url().and_then(|base| base.join(href).ok());
            (url, true)
        }
        Err(_) => (None, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(doc: &str, href: &str) -> Reference {
        Reference::new(
            Arc::new(Document::new(doc)),
            Arc::new(Node::new("a").with_attr("href", href)),
            href,
        )
    }

    #[test]
    fn test_https_reference() {
        let r = reference("index.html", "https://example.com/page?x=1#top");
        assert_eq!(r.scheme(), "https");
        assert_eq!(r.path(), "/page");
        assert_eq!(r.query(), Some("x=1"));
        assert_eq!(r.fragment(), Some("top"));
        assert_eq!(r.url_string(), "https://example.com/page?x=1");
    }

    #[test]
    fn test_scheme_is_lower_cased() {
        assert_eq!(reference("index.html", "HTTP://example.com/").scheme(), "http");
    }

    #[test]
    fn test_protocol_relative_is_https() {
        let r = reference("index.html", "//cdn.example.com/lib.js");
        assert_eq!(r.scheme(), "https");
        assert_eq!(r.url_string(), "https://cdn.example.com/lib.js");
    }

    #[test]
    fn test_relative_reference_is_file() {
        let r = reference("docs/intro.html", "../guide/?a=b#c");
        assert_eq!(r.scheme(), "file");
        assert_eq!(r.path(), "../guide/");
        assert_eq!(r.site_path(), PathBuf::from("/guide/"));
    }

    #[test]
    fn test_absolute_path_reference() {
        let r = reference("docs/intro.html", "/about.html");
        assert_eq!(r.scheme(), "file");
        assert_eq!(r.site_path(), PathBuf::from("/about.html"));
    }

    #[test]
    fn test_fragment_only_points_at_document() {
        let r = reference("docs/intro.html", "#section");
        assert_eq!(r.scheme(), "file");
        assert_eq!(r.path(), "");
        assert_eq!(r.site_path(), PathBuf::from("/docs/intro.html"));
    }

    #[test]
    fn test_site_path_is_percent_decoded() {
        let r = reference("index.html", "my%20page.html");
        assert_eq!(r.site_path(), PathBuf::from("/my page.html"));
    }

    #[test]
    fn test_mailto_opaque() {
        let r = reference("index.html", "mailto:someone@example.com?subject=hi");
        assert_eq!(r.scheme(), "mailto");
        assert_eq!(r.opaque(), "someone@example.com");

        let empty = reference("index.html", "mailto:");
        assert_eq!(empty.opaque(), "");
    }

    #[test]
    fn test_tel_opaque() {
        let r = reference("index.html", "tel:+1-555-0100");
        assert_eq!(r.scheme(), "tel");
        assert_eq!(r.opaque(), "+1-555-0100");
    }

    #[test]
    fn test_unparseable_href_keeps_raw_text() {
        let r = reference("index.html", "http://exa mple.com/");
        assert_eq!(r.scheme(), "");
        assert_eq!(r.href, "http://exa mple.com/");
        assert!(r.url().is_none());
    }

    #[test]
    fn test_strip_query_string() {
        assert_eq!(
            strip_query_string("https://example.com/page?utm=1"),
            "https://example.com/page"
        );
        assert_eq!(strip_query_string("not a url"), "not a url");
    }
}
