//! Faceplate page parser

use super::html::{find_all_within, HtmlDocument};
use super::types::FaceplatePage;
use super::PageParser;
use crate::error::Result;

const COMPANY_LINK: (&str, &str) = ("a", "c-faceplate__company-link");
const ISIN_HEADING: (&str, &str) = ("h2", "c-faceplate__isin");
const DATA_CONTAINER: (&str, &str) = ("div", "c-faceplate__data");

/// Parser for the Boursorama stock page layout
#[derive(Debug, Clone, Copy, Default)]
pub struct FaceplateParser;

impl FaceplateParser {
    pub fn new() -> Self {
        Self
    }
}

impl PageParser for FaceplateParser {
    fn parse(&self, html: &str) -> Result<FaceplatePage> {
        let doc = HtmlDocument::parse(html);

        let company_name = doc.find_text(COMPANY_LINK.0, COMPANY_LINK.1)?;
        let isin = doc.find_text(ISIN_HEADING.0, ISIN_HEADING.1)?;

        let metric_nodes = match doc.find_first(DATA_CONTAINER.0, DATA_CONTAINER.1)? {
            Some(container) => Some(find_all_within(container, "p", true)?),
            None => None,
        };

        Ok(FaceplatePage {
            company_name,
            isin,
            metric_nodes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrape::types::NodeKind;

    #[test]
    fn test_parse_faceplate() {
        let html = r#"
            <a class="c-faceplate__company-link">  Air Liquide </a>
            <h2 class="c-faceplate__isin">FR0000120073 - 1rPAI</h2>
            <div class="c-faceplate__data">
                <ul class="c-list-info__list">
                    <li><p class="c-list-info__heading">rendement estimé 2024</p>
                        <p class="c-list-info__value">1,83%</p></li>
                </ul>
            </div>
        "#;
        let page = FaceplateParser::new().parse(html).unwrap();
        assert_eq!(page.company_name.as_deref(), Some("Air Liquide"));
        assert_eq!(page.isin.as_deref(), Some("FR0000120073 - 1rPAI"));

        let nodes = page.metric_nodes.unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].kind(), NodeKind::Heading);
        assert_eq!(nodes[1].text, "1,83%");
    }

    #[test]
    fn test_parse_empty_document() {
        let page = FaceplateParser::new().parse("<html></html>").unwrap();
        assert_eq!(page, FaceplatePage::default());
    }
}
