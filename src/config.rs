//! Analyzer configuration.

use crate::objects::NAMESPACES;
use crate::validation::{ValidationRule, VALIDATION_RULES};

/// Fixed settings for an analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Namespace prefix to URI table
    pub namespaces: &'static [(&'static str, &'static str)],
    /// Count checks run after the main pass
    pub validation_rules: &'static [ValidationRule],
    /// Whether [`Analyzer::run`](crate::Analyzer::run) writes the JSON report
    pub write_report: bool,
}

impl AnalyzerConfig {
    /// The standard RDE configuration.
    pub const fn rde() -> Self {
        Self {
            namespaces: NAMESPACES,
            validation_rules: VALIDATION_RULES,
            write_report: true,
        }
    }

    /// Sets whether the JSON report is written.
    pub fn with_write_report(mut self, write_report: bool) -> Self {
        self.write_report = write_report;
        self
    }

    /// Looks up a namespace URI by prefix.
    pub fn namespace(&self, prefix: &str) -> Option<&'static str> {
        self.namespaces
            .iter()
            .find(|(p, _)| *p == prefix)
            .map(|(_, uri)| *uri)
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self::rde()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{XMLNS_RDE_IDN, XMLNS_SECDNS};

    #[test]
    fn test_namespace_lookup() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.namespace("rdeIDN"), Some(XMLNS_RDE_IDN));
        assert_eq!(config.namespace("secDNS"), Some(XMLNS_SECDNS));
        assert_eq!(config.namespace("unknown"), None);
    }

    #[test]
    fn test_every_rule_namespace_resolves() {
        let config = AnalyzerConfig::rde();
        for rule in config.validation_rules {
            assert!(
                config.namespace(rule.namespace_key).is_some(),
                "{}",
                rule.namespace_key
            );
        }
        assert!(config.write_report);
        assert!(!config.with_write_report(false).write_report);
    }
}
