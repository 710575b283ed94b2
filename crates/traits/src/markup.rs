//! Validated slide-level markup fragments.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FragmentError {
    #[error("Fragment is not well-formed XML: {0}")]
    Malformed(String),

    #[error("Fragment must have exactly one root element")]
    MultipleRoots,

    #[error("Failed to build fragment: {0}")]
    Build(String),
}

/// A well-formed XML element destined for insertion into a slide.
///
/// Only constructible through [`MarkupFragment::parse`], so a value of this
/// type has always been checked before a document backend sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupFragment {
    xml: String,
    root: String,
}

impl MarkupFragment {
    /// Parses `xml` and keeps it verbatim if it is a single well-formed element.
    ///
    /// Namespace prefixes must be declared inside the fragment itself. XML
    /// declarations, comments and processing instructions outside the root
    /// are rejected, since the fragment is embedded inside another document.
    pub fn parse(xml: impl Into<String>) -> Result<Self, FragmentError> {
        let xml = xml.into();
        let root = {
            let doc = roxmltree::Document::parse(&xml)
                .map_err(|e| FragmentError::Malformed(e.to_string()))?;
            let element_children = doc.root().children().filter(|n| n.is_element()).count();
            if element_children != 1 {
                return Err(FragmentError::MultipleRoots);
            }
            let root = doc.root_element();
            let span = root.range();
            let outside = [&xml[..span.start], &xml[span.end..]];
            if outside.iter().any(|s| !s.trim().is_empty()) {
                return Err(FragmentError::Malformed(
                    "only whitespace may surround the root element".to_string(),
                ));
            }
            match root.tag_name().namespace().and_then(|ns| root.lookup_prefix(ns)) {
                Some(prefix) if !prefix.is_empty() => {
                    format!("{}:{}", prefix, root.tag_name().name())
                }
                _ => root.tag_name().name().to_string(),
            }
        };
        Ok(Self { xml, root })
    }

    pub fn as_str(&self) -> &str {
        &self.xml
    }

    /// Qualified name of the root element, e.g. `mc:AlternateContent`.
    pub fn root_name(&self) -> &str {
        &self.root
    }

    pub fn into_string(self) -> String {
        self.xml
    }
}
