//! Pairwise drug interaction checking
//!
//! Every unordered pair of the input list is tested against every rule in
//! both orientations. All matching rules are reported, so a pair covered by
//! two rule entries appears twice. Findings are sorted by severity rank
//! with ties kept in discovery order.

use std::fmt;

use crate::pharmacy::resolver::{names_overlap, normalize};
use crate::pharmacy::types::{InteractionRule, Severity};

/// One rule matched against one pair of input medicines
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionFinding {
    /// Input strings as given by the caller
    pub first: String,
    pub second: String,
    pub severity: Severity,
    pub description: String,
}

impl InteractionFinding {
    /// "A + B"
    pub fn drugs(&self) -> String {
        format!("{} + {}", self.first, self.second)
    }
}

/// Result of an interaction check
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionReport {
    pub medicines: Vec<String>,
    pub findings: Vec<InteractionFinding>,
}

impl InteractionReport {
    pub fn is_clear(&self) -> bool {
        self.findings.is_empty()
    }

    /// Most severe finding, if any
    pub fn worst(&self) -> Option<&InteractionFinding> {
        self.findings.first()
    }
}

impl fmt::Display for InteractionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.medicines.join(", ");
        if self.findings.is_empty() {
            return write!(f, "No known interactions found between: {}", names);
        }

        write!(f, "Drug Interaction Check for: {}\n\n", names)?;
        for finding in &self.findings {
            write!(
                f,
                "[{}] {}: {}\n\n",
                finding.severity,
                finding.drugs(),
                finding.description
            )?;
        }
        Ok(())
    }
}

/// Interaction checker over a borrowed rule table
pub struct InteractionEngine<'a> {
    rules: &'a [InteractionRule],
}

impl<'a> InteractionEngine<'a> {
    pub fn new(rules: &'a [InteractionRule]) -> Self {
        Self { rules }
    }

    /// Check all pairs of `medicines` against the rule table
    pub fn check(&self, medicines: &[String]) -> InteractionReport {
        let normalized: Vec<String> = medicines.iter().map(|m| normalize(m)).collect();

        // Display names come from the first input with the same normalized form
        let display = |name: &str| -> String {
            let idx = normalized.iter().position(|n| n == name).unwrap_or(0);
            medicines[idx].clone()
        };

        let mut findings = Vec::new();
        for (i, first) in normalized.iter().enumerate() {
            for second in &normalized[i + 1..] {
                for rule in self.rules {
                    if rule_matches(rule, first, second) {
                        findings.push(InteractionFinding {
                            first: display(first),
                            second: display(second),
                            severity: rule.severity.clone(),
                            description: rule.description.clone(),
                        });
                    }
                }
            }
        }

        findings.sort_by_key(|f| f.severity.rank());

        InteractionReport {
            medicines: medicines.to_vec(),
            findings,
        }
    }
}

fn rule_matches(rule: &InteractionRule, first: &str, second: &str) -> bool {
    let drug_a = normalize(&rule.drug_a);
    let drug_b = normalize(&rule.drug_b);

    (names_overlap(&drug_a, first) && names_overlap(&drug_b, second))
        || (names_overlap(&drug_a, second) && names_overlap(&drug_b, first))
}
