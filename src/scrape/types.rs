//! Common scrape types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Class carried by metric label paragraphs
pub const HEADING_CLASS: &str = "c-list-info__heading";
/// Class carried by metric value paragraphs
pub const VALUE_CLASS: &str = "c-list-info__value";

/// One scraped stock, ready for the warehouse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    pub label: String,        // caller-supplied symbol
    pub name: String,
    pub isin: String,
    pub div_yield: f64,
    pub pe_ratio: f64,
    pub scraped_at: DateTime<Utc>,
}

impl StockRecord {
    /// Timestamp in the form the warehouses accept (UTC, microseconds)
    pub fn scraped_at_string(&self) -> String {
        self.scraped_at.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
    }
}

/// Role of a paragraph inside the metrics container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Heading,
    Value,
    Other,
}

/// A `<p>` element of the metrics container
#[derive(Debug, Clone, PartialEq)]
pub struct TextNode {
    pub classes: Vec<String>,
    pub text: String,
}

impl TextNode {
    pub fn new(classes: &[&str], text: &str) -> Self {
        Self {
            classes: classes.iter().map(|c| c.to_string()).collect(),
            text: text.to_string(),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn kind(&self) -> NodeKind {
        if self.has_class(HEADING_CLASS) {
            NodeKind::Heading
        } else if self.has_class(VALUE_CLASS) {
            NodeKind::Value
        } else {
            NodeKind::Other
        }
    }
}

/// What the parser found on a stock page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaceplatePage {
    pub company_name: Option<String>,
    pub isin: Option<String>,
    /// `None` when the metrics container is absent
    pub metric_nodes: Option<Vec<TextNode>>,
}

/// Metrics taken from the heading/value list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    DividendYield,
    PeRatio,
}

impl Metric {
    /// Route a lower-cased heading to a metric
    pub fn from_heading(heading: &str) -> Option<Self> {
        let heading = heading.to_lowercase();
        if heading.contains("rendement") {
            Some(Metric::DividendYield)
        } else if heading.contains("per") {
            Some(Metric::PeRatio)
        } else {
            None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::DividendYield => "Dividend yield",
            Metric::PeRatio => "PE ratio",
        }
    }
}

/// Result of a successful extraction
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub record: StockRecord,
    /// Metrics that were not found or not parsable, defaulted to 0.0
    pub missing: Vec<Metric>,
}

impl Extraction {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}
