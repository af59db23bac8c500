//! Clinical-significance extraction from esummary documents
//!
//! The dbSNP esummary response is a deeply nested XML document whose layout
//! NCBI has reshuffled before; the one stable fact is that a variant with
//! known clinical relevance carries a `CLINICAL_SIGNIFICANCE` element
//! somewhere in the tree. The scan below is structural rather than
//! schema-bound: it walks every event, captures the text of the first such
//! element, and keeps reading to the end so a malformation anywhere in the
//! document is still reported as a parse error.

use quick_xml::events::{BytesRef, Event};
use quick_xml::Reader;
use thiserror::Error;

/// Element carrying the clinical significance classification
const SIGNIFICANCE_TAG: &[u8] = b"CLINICAL_SIGNIFICANCE";

/// Failures while scanning an esummary document
///
/// Every variant means the document is structurally invalid; none is worth
/// a retry because the service would send the same bytes again.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// The reader rejected the document (bad syntax, mismatched tags, ...)
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),

    /// The document ended while elements were still open
    #[error("document ends inside <{0}>")]
    UnclosedElement(String),

    /// The document contains no elements at all
    #[error("no root element found")]
    NoRootElement,

    /// Content found before or after the root element
    #[error("content outside the root element")]
    TrailingContent,

    /// A general entity the esummary DTD does not define
    #[error("undefined entity &{0};")]
    UndefinedEntity(String),
}

/// Extract the text of the first `CLINICAL_SIGNIFICANCE` element.
///
/// Returns `Ok(None)` when the document is well formed but carries no such
/// element. The captured text is entity-resolved and trimmed; an element
/// without text yields an empty string, and only text before the element's
/// first child counts. The whole document is consumed either way.
pub fn clinical_significance(xml: &str) -> Result<Option<String>, SummaryError> {
    let mut reader = Reader::from_str(xml);

    // Names of the currently open elements, innermost last
    let mut open: Vec<String> = Vec::new();
    let mut seen_root = false;
    let mut root_closed = false;

    let mut found: Option<String> = None;
    // Depth at which the significance element was opened, and whether a
    // child element has already ended its text
    let mut capture_depth: Option<usize> = None;
    let mut text_done = false;
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if open.is_empty() {
                    if root_closed {
                        return Err(SummaryError::TrailingContent);
                    }
                    seen_root = true;
                }

                if capture_depth.is_some() {
                    text_done = true;
                } else if found.is_none() && e.name().as_ref() == SIGNIFICANCE_TAG {
                    capture_depth = Some(open.len());
                    text_done = false;
                }

                open.push(String::from_utf8_lossy(e.name().as_ref()).into_owned());
            },
            Event::End(_) => {
                open.pop();

                if capture_depth == Some(open.len()) {
                    found = Some(text.trim().to_string());
                    capture_depth = None;
                    text.clear();
                }

                if open.is_empty() {
                    root_closed = true;
                }
            },
            Event::Empty(e) => {
                if open.is_empty() {
                    if root_closed {
                        return Err(SummaryError::TrailingContent);
                    }
                    seen_root = true;
                }

                if capture_depth.is_some() {
                    text_done = true;
                } else if found.is_none() && e.name().as_ref() == SIGNIFICANCE_TAG {
                    found = Some(String::new());
                }

                if open.is_empty() {
                    root_closed = true;
                }
            },
            Event::Text(e) => {
                let chunk = e.decode().map_err(quick_xml::Error::from)?;

                if open.is_empty() {
                    if !chunk.trim().is_empty() {
                        return Err(SummaryError::TrailingContent);
                    }
                } else if capture_depth.is_some() && !text_done {
                    text.push_str(&chunk);
                }
            },
            Event::CData(e) => {
                if open.is_empty() {
                    return Err(SummaryError::TrailingContent);
                }
                if capture_depth.is_some() && !text_done {
                    text.push_str(&String::from_utf8_lossy(&e));
                }
            },
            Event::GeneralRef(e) => {
                // Resolved even outside the captured element: an undefined
                // entity anywhere makes the document unparsable
                let ch = resolve_reference(&e)?;

                if open.is_empty() {
                    return Err(SummaryError::TrailingContent);
                }
                if capture_depth.is_some() && !text_done {
                    text.push(ch);
                }
            },
            Event::Eof => {
                if let Some(name) = open.last() {
                    return Err(SummaryError::UnclosedElement(name.clone()));
                }
                if !seen_root {
                    return Err(SummaryError::NoRootElement);
                }
                return Ok(found);
            },
            // Declarations, doctype, comments and processing instructions
            // carry no significance text
            _ => {},
        }
    }
}

/// Resolve a general reference to its character.
///
/// Character references resolve numerically; of the named entities only the
/// five XML predefines can appear without a custom DTD.
fn resolve_reference(reference: &BytesRef<'_>) -> Result<char, SummaryError> {
    if let Some(ch) = reference.resolve_char_ref()? {
        return Ok(ch);
    }

    let name: &[u8] = reference;
    match name {
        b"amp" => Ok('&'),
        b"lt" => Ok('<'),
        b"gt" => Ok('>'),
        b"apos" => Ok('\''),
        b"quot" => Ok('"'),
        _ => Err(SummaryError::UndefinedEntity(
            String::from_utf8_lossy(name).into_owned(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_significance_present() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" ?>
        <!DOCTYPE eSummaryResult PUBLIC "-//NLM//DTD esummary snp 20160527//EN" "https://eutils.ncbi.nlm.nih.gov/eutils/dtd/20160527/esummary_snp.dtd">
        <eSummaryResult>
            <DocumentSummarySet status="OK">
                <DocumentSummary uid="4477212">
                    <SNP_ID>4477212</SNP_ID>
                    <ALLELE_ORIGIN/>
                    <GLOBAL_MAFS>
                        <MAF>
                            <STUDY>1000Genomes</STUDY>
                            <FREQ>A=0.000199/1</FREQ>
                        </MAF>
                    </GLOBAL_MAFS>
                    <CLINICAL_SIGNIFICANCE>Pathogenic</CLINICAL_SIGNIFICANCE>
                    <CHR>1</CHR>
                </DocumentSummary>
            </DocumentSummarySet>
        </eSummaryResult>
        "#;

        let result = clinical_significance(xml).unwrap();
        assert_eq!(result, Some("Pathogenic".to_string()));
    }

    #[test]
    fn test_significance_missing() {
        let xml = r#"<eSummaryResult>
            <DocumentSummarySet status="OK">
                <DocumentSummary uid="123">
                    <SNP_ID>123</SNP_ID>
                    <CHR>2</CHR>
                </DocumentSummary>
            </DocumentSummarySet>
        </eSummaryResult>"#;

        let result = clinical_significance(xml).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_empty_element_yields_empty_string() {
        let with_pair = "<r><CLINICAL_SIGNIFICANCE></CLINICAL_SIGNIFICANCE></r>";
        assert_eq!(
            clinical_significance(with_pair).unwrap(),
            Some(String::new())
        );

        let self_closing = "<r><CLINICAL_SIGNIFICANCE/></r>";
        assert_eq!(
            clinical_significance(self_closing).unwrap(),
            Some(String::new())
        );
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        let xml = "<r><CLINICAL_SIGNIFICANCE>\n    likely-benign\n  </CLINICAL_SIGNIFICANCE></r>";
        assert_eq!(
            clinical_significance(xml).unwrap(),
            Some("likely-benign".to_string())
        );
    }

    #[test]
    fn test_entities_are_resolved() {
        let xml =
            "<r><CLINICAL_SIGNIFICANCE>benign &amp; likely-benign</CLINICAL_SIGNIFICANCE></r>";
        assert_eq!(
            clinical_significance(xml).unwrap(),
            Some("benign & likely-benign".to_string())
        );
    }

    #[test]
    fn test_character_references_are_resolved() {
        // Decimal and hex forms both resolve numerically
        let xml =
            "<r><CLINICAL_SIGNIFICANCE>benign&#47;other&#x2C; rare</CLINICAL_SIGNIFICANCE></r>";
        assert_eq!(
            clinical_significance(xml).unwrap(),
            Some("benign/other, rare".to_string())
        );
    }

    #[test]
    fn test_cdata_is_accepted() {
        let xml = "<r><CLINICAL_SIGNIFICANCE><![CDATA[pathogenic]]></CLINICAL_SIGNIFICANCE></r>";
        assert_eq!(
            clinical_significance(xml).unwrap(),
            Some("pathogenic".to_string())
        );
    }

    #[test]
    fn test_first_element_wins() {
        let xml = "<r>\
            <CLINICAL_SIGNIFICANCE>pathogenic</CLINICAL_SIGNIFICANCE>\
            <CLINICAL_SIGNIFICANCE>benign</CLINICAL_SIGNIFICANCE>\
        </r>";
        assert_eq!(
            clinical_significance(xml).unwrap(),
            Some("pathogenic".to_string())
        );
    }

    #[test]
    fn test_text_stops_at_first_child_element() {
        let xml = "<r><CLINICAL_SIGNIFICANCE>patho<b>x</b>genic</CLINICAL_SIGNIFICANCE></r>";
        assert_eq!(
            clinical_significance(xml).unwrap(),
            Some("patho".to_string())
        );
    }

    #[test]
    fn test_truncated_document_is_error() {
        let xml = "<eSummaryResult><DocumentSummarySet><DocumentSummary>";
        assert!(clinical_significance(xml).is_err());
    }

    #[test]
    fn test_mismatched_tags_are_error() {
        let xml = "<eSummaryResult><DocumentSummary></eSummaryResult>";
        assert!(clinical_significance(xml).is_err());
    }

    #[test]
    fn test_plain_text_is_error() {
        let err = clinical_significance("this is not xml").unwrap_err();
        assert!(matches!(err, SummaryError::TrailingContent));
    }

    #[test]
    fn test_empty_document_is_error() {
        assert!(matches!(
            clinical_significance("").unwrap_err(),
            SummaryError::NoRootElement
        ));
        assert!(matches!(
            clinical_significance("   \n  ").unwrap_err(),
            SummaryError::NoRootElement
        ));
    }

    #[test]
    fn test_content_after_root_is_error() {
        let err = clinical_significance("<r><a>x</a></r>trailing").unwrap_err();
        assert!(matches!(err, SummaryError::TrailingContent));

        let err = clinical_significance("<r/><r/>").unwrap_err();
        assert!(matches!(err, SummaryError::TrailingContent));
    }

    #[test]
    fn test_malformation_after_match_is_still_error() {
        // The whole document is validated, not just the prefix that holds
        // the significance element
        let xml = "<r><CLINICAL_SIGNIFICANCE>pathogenic</CLINICAL_SIGNIFICANCE><broken</r>";
        assert!(clinical_significance(xml).is_err());
    }

    #[test]
    fn test_undefined_entity_is_error() {
        let xml = "<r><CLINICAL_SIGNIFICANCE>&bogus;</CLINICAL_SIGNIFICANCE></r>";
        let err = clinical_significance(xml).unwrap_err();
        assert!(matches!(err, SummaryError::UndefinedEntity(_)));
    }
}
