//! Navigable HTML document over the `scraper` crate

use super::types::TextNode;
use crate::error::{AppError, Result};
use scraper::{ElementRef, Html, Selector};

/// Parsed HTML document
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    /// First element with the given tag carrying the given class
    pub fn find_first(&self, tag: &str, class: &str) -> Result<Option<ElementRef<'_>>> {
        let selector = selector(&format!("{}.{}", tag, class))?;
        Ok(self.html.select(&selector).next())
    }

    /// Text of the first `tag.class` element, whitespace collapsed, if present and non-empty
    pub fn find_text(&self, tag: &str, class: &str) -> Result<Option<String>> {
        Ok(self
            .find_first(tag, class)?
            .map(collapsed_text)
            .filter(|text| !text.is_empty()))
    }
}

/// All `tag` elements inside `container`, in document order
pub fn find_all_within(
    container: ElementRef<'_>,
    tag: &str,
    recursive: bool,
) -> Result<Vec<TextNode>> {
    let nodes = if recursive {
        let selector = selector(tag)?;
        container.select(&selector).map(text_node).collect()
    } else {
        container
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.value().name().eq_ignore_ascii_case(tag))
            .map(text_node)
            .collect()
    };
    Ok(nodes)
}

/// Text content with each fragment stripped, fragments joined without separator
pub fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect()
}

/// Whole text content, runs of whitespace collapsed to one space
pub fn collapsed_text(el: ElementRef<'_>) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn element_classes(el: ElementRef<'_>) -> Vec<String> {
    el.value().classes().map(|c| c.to_string()).collect()
}

fn text_node(el: ElementRef<'_>) -> TextNode {
    TextNode {
        classes: element_classes(el),
        text: element_text(el),
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| AppError::Validation(format!("Invalid selector '{}': {:?}", css, e)))
}
