// src/htmldoc/document.rs
// =============================================================================
// Documents and the link-like nodes found inside them.
//
// We use the `scraper` crate to parse HTML and pull out every <a> and <link>
// element. Each element is copied into a small owned `Node` holding the tag
// name and an attribute map, so the checking code never touches the DOM.
//
// Rust concepts:
// - BTreeMap: A sorted map; attribute order doesn't matter to us
// - Option<T>: For attributes that may or may not be present
// =============================================================================

use scraper::{Html, Selector};
use std::collections::BTreeMap;
use url::Url;

/// One HTML file, identified by its path relative to the site root
/// (forward slashes, no leading slash), e.g. `docs/intro.html`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub path: String,
}

impl Document {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let path = path.trim_start_matches('/').to_string();
        Self { path }
    }

    /// The URL relative hrefs in this document are resolved against.
    ///
    /// `docs/intro.html` becomes `file:///docs/intro.html`, so `../a.html`
    /// resolves to `file:///a.html` and `#top` to the document itself.
    pub fn base_url(&self) -> Option<Url> {
        Url::parse("file:///").ok()?.join(&self.path).ok()
    }
}

/// An element that may carry a link, reduced to its tag and attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    pub tag: String,
    pub attrs: BTreeMap<String, String>,
}

impl Node {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attrs: BTreeMap::new(),
        }
    }

    /// Builder-style attribute setter, handy when constructing nodes by hand
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    /// <a>: a missing href is just a placeholder anchor
    pub fn is_anchor(&self) -> bool {
        self.tag == "a"
    }

    /// <link>: a resource link, where href is mandatory
    pub fn is_resource_link(&self) -> bool {
        self.tag == "link"
    }
}

// Extracts every <a> and <link> element from an HTML page, in document order
//
// Example:
//   html = "<a href='/docs'>Docs</a><link rel='stylesheet' href='s.css'>"
//   result = [Node { tag: "a", .. }, Node { tag: "link", .. }]
pub fn extract_link_nodes(html: &str) -> Vec<Node> {
    let document = Html::parse_document(html);

    // The selector is a constant and known to be valid
    let selector = Selector::parse("a, link").unwrap();

    document
        .select(&selector)
        .map(|element| {
            let value = element.value();
            let mut node = Node::new(value.name());
            for (name, attr_value) in value.attrs() {
                node = node.with_attr(name, attr_value);
            }
            node
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_for_nested_document() {
        let doc = Document::new("docs/intro.html");
        let base = doc.base_url().unwrap();
        assert_eq!(base.as_str(), "file:///docs/intro.html");
        assert_eq!(base.join("../a.html").unwrap().path(), "/a.html");
    }

    #[test]
    fn test_leading_slash_is_dropped() {
        assert_eq!(Document::new("/index.html").path, "index.html");
    }

    #[test]
    fn test_extract_anchors_and_links() {
        let html = r#"
            <html><head><link rel="stylesheet" href="style.css"></head>
            <body>
              <a href="https://www.rust-lang.org">Rust</a>
              <a name="top">no href</a>
              <img src="x.png">
            </body></html>
        "#;
        let nodes = extract_link_nodes(html);
        assert_eq!(nodes.len(), 3);
        assert!(nodes[0].is_resource_link());
        assert_eq!(nodes[0].attr("href"), Some("style.css"));
        assert!(nodes[1].is_anchor());
        assert_eq!(nodes[1].attr("href"), Some("https://www.rust-lang.org"));
        assert!(!nodes[2].has_attr("href"));
    }

    #[test]
    fn test_empty_href_is_present_but_blank() {
        let nodes = extract_link_nodes(r#"<a href="">blank</a>"#);
        assert_eq!(nodes[0].attr("href"), Some(""));
    }
}
