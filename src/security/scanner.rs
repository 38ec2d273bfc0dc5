/// Text-level scan for dangerous API usage
use serde::Serialize;

use crate::analysis::findings::{Finding, Findings};
use crate::security::rules::{SecurityCategory, SecurityRule, SECURITY_RULES};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityFinding {
    pub rule_id: &'static str,
    pub category: SecurityCategory,
    pub message: String,
}

impl From<&SecurityRule> for SecurityFinding {
    fn from(rule: &SecurityRule) -> Self {
        Self {
            rule_id: rule.id,
            category: rule.category,
            message: rule.message.to_string(),
        }
    }
}

impl Finding for SecurityFinding {
    const CLEAN_MESSAGE: &'static str = "No obvious security vulnerabilities found.";

    fn message(&self) -> &str {
        &self.message
    }
}

/// Check the raw text against every rule in the table.
///
/// Works on the verbatim source, not a syntax tree, so it runs even when the
/// code does not parse. Each matching rule is reported once however often its
/// signature occurs.
pub fn scan_security(source: &str) -> Findings<SecurityFinding> {
    let findings: Vec<SecurityFinding> = SECURITY_RULES
        .iter()
        .filter(|rule| rule.trigger.matches(source))
        .map(SecurityFinding::from)
        .collect();

    for finding in &findings {
        tracing::debug!(rule = finding.rule_id, category = %finding.category, "security rule matched");
    }
    Findings::from_vec(findings)
}
