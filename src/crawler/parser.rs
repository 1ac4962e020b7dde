//! HTML document wrapper used by the crawler and the server
//!
//! Thin layer over `scraper::Html` exposing exactly what the traversal
//! needs: selector queries in document order, visible text, `href` lookup,
//! and finding an anchor by its exact text.

use crate::config::SelectorConfig;
use crate::crawler::fetcher::RawPage;
use crate::ConfigError;
use scraper::{ElementRef, Html, Node, Selector};

/// A link found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Visible text of the anchor, unmodified
    pub text: String,

    /// Raw `href` attribute, if present
    pub href: Option<String>,
}

impl Link {
    fn from_element(element: ElementRef<'_>) -> Self {
        Self {
            text: element_text(element),
            href: element.value().attr("href").map(str::to_string),
        }
    }
}

/// Compiles a CSS selector, reporting failures as configuration errors
pub fn compile_selector(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Selectors for each level of the traversal, compiled once per run
#[derive(Debug, Clone)]
pub struct Selectors {
    pub categories: Selector,
    pub laws: Selector,
    pub content: Selector,
    anchors: Selector,
}

impl Selectors {
    pub fn from_config(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            categories: compile_selector(&config.categories)?,
            laws: compile_selector(&config.laws)?,
            content: compile_selector(&config.content)?,
            anchors: compile_selector("a")?,
        })
    }
}

/// A parsed HTML page
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses a page; malformed markup is repaired rather than rejected
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// Parses a fetched page, decoding it with its declared charset
    pub fn from_page(page: &RawPage) -> Self {
        Self::parse(&page.text())
    }

    /// Elements matching `selector`, in document order
    pub fn select<'a>(&'a self, selector: &'a Selector) -> impl Iterator<Item = ElementRef<'a>> {
        self.html.select(selector)
    }

    /// Links matching `selector`, in document order
    pub fn links(&self, selector: &Selector) -> Vec<Link> {
        self.select(selector).map(Link::from_element).collect()
    }

    /// Visible text of every match, joined with newlines
    pub fn joined_text(&self, selector: &Selector) -> String {
        self.select(selector)
            .map(element_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Law content: the joined text of every match, or an empty string when
    /// nothing matches or every match is empty
    pub fn content_text(&self, selector: &Selector) -> String {
        if self.select(selector).all(|element| element.text().all(str::is_empty)) {
            return String::new();
        }
        self.joined_text(selector)
    }

    /// First anchor whose sole string content is exactly `text`
    ///
    /// Anchors with mixed content such as `View <b>Entire</b> Act` do not
    /// match, even when their flattened text would.
    pub fn find_link_by_text(&self, selectors: &Selectors, text: &str) -> Option<Link> {
        self.select(&selectors.anchors)
            .find(|element| single_string(*element) == Some(text))
            .map(Link::from_element)
    }

    /// Visible text of the whole page
    pub fn text(&self) -> String {
        element_text(self.html.root_element())
    }
}

/// Concatenated text nodes below an element
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// The only string inside an element, looking through single-child wrappers
/// like `<a><b>text</b></a>`
fn single_string(element: ElementRef<'_>) -> Option<&str> {
    let mut children = element.children();
    let child = children.next()?;
    if children.next().is_some() {
        return None;
    }

    match child.value() {
        Node::Text(text) => Some(&**text),
        Node::Element(_) => ElementRef::wrap(child).and_then(single_string),
        _ => None,
    }
}
