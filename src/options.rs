//! Parse and query configuration

/// How element names are compared
///
/// `Prefix` accepts a candidate name that starts with the target, so `item`
/// matches `items` and `item-list`. It is the historical behavior and the
/// default for the child-path selector and the closing-tag check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameMatch {
    #[default]
    Prefix,
    Exact,
}

impl NameMatch {
    /// Check `candidate` against `target`
    #[inline]
    pub fn matches(self, candidate: &str, target: &str) -> bool {
        match self {
            NameMatch::Prefix => candidate.starts_with(target),
            NameMatch::Exact => candidate == target,
        }
    }
}

/// Options for building a [`Document`](crate::Document)
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Comparison between an opening name and its closing `</name>`
    pub close_tag_match: NameMatch,
    /// Label recorded in token positions and error locations
    pub file_label: Option<String>,
}

impl ParseOptions {
    /// Lenient options (prefix close-tag matching)
    pub fn new() -> Self {
        Self::default()
    }

    /// Closing tags must repeat the opening name exactly
    pub fn strict() -> Self {
        ParseOptions {
            close_tag_match: NameMatch::Exact,
            file_label: None,
        }
    }

    pub fn with_file_label(mut self, label: impl Into<String>) -> Self {
        self.file_label = Some(label.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_match() {
        assert!(NameMatch::Prefix.matches("items", "item"));
        assert!(NameMatch::Prefix.matches("item", "item"));
        assert!(NameMatch::Prefix.matches("item", ""));
        assert!(!NameMatch::Prefix.matches("ite", "item"));
    }

    #[test]
    fn test_exact_match() {
        assert!(NameMatch::Exact.matches("item", "item"));
        assert!(!NameMatch::Exact.matches("items", "item"));
    }

    #[test]
    fn test_strict_options() {
        let opts = ParseOptions::strict().with_file_label("a.xml");
        assert_eq!(opts.close_tag_match, NameMatch::Exact);
        assert_eq!(opts.file_label.as_deref(), Some("a.xml"));
        assert_eq!(ParseOptions::new().close_tag_match, NameMatch::Prefix);
    }
}
