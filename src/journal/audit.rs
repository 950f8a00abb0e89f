use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

use crate::config::RiskPolicy;
use crate::core::lot_calculator::compute_trade_sizing;
use crate::journal::entry::{EntryDecision, JournalEntry};

const VALUE_EPSILON: f64 = 1e-6;

/// A stored entry that no longer agrees with a fresh recomputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditFinding {
    /// The stored form no longer sizes at all.
    Unsizable { id: u64 },
    LotChanged { id: u64, stored: f64, recomputed: f64 },
    RrChanged { id: u64, stored: f64, recomputed: f64 },
    DecisionChanged {
        id: u64,
        stored: EntryDecision,
        recomputed: EntryDecision,
    },
}

impl AuditFinding {
    pub fn entry_id(&self) -> u64 {
        match self {
            AuditFinding::Unsizable { id }
            | AuditFinding::LotChanged { id, .. }
            | AuditFinding::RrChanged { id, .. }
            | AuditFinding::DecisionChanged { id, .. } => *id,
        }
    }
}

impl fmt::Display for AuditFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditFinding::Unsizable { id } => write!(f, "#{}: stored input no longer sizes", id),
            AuditFinding::LotChanged { id, stored, recomputed } => {
                write!(f, "#{}: lot {:.2} -> {:.2}", id, stored, recomputed)
            }
            AuditFinding::RrChanged { id, stored, recomputed } => {
                write!(f, "#{}: RR {:.2} -> {:.2}", id, stored, recomputed)
            }
            AuditFinding::DecisionChanged { id, stored, recomputed } => {
                write!(f, "#{}: decision {} -> {}", id, stored, recomputed)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub checked: usize,
    pub findings: Vec<AuditFinding>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Number of distinct entries with at least one finding.
    pub fn flagged_entries(&self) -> usize {
        let mut ids: Vec<u64> = self.findings.iter().map(|f| f.entry_id()).collect();
        ids.dedup();
        ids.len()
    }
}

/// Check every entry against a fresh recomputation of its stored input.
///
/// Lot and RR are recomputed under the policy stored with the entry, so a
/// mismatch there means the arithmetic drifted. The gate decision is
/// recomputed under `policy`, typically the member's current one, to show
/// which past entries the new limits would have rejected.
pub fn audit_entries(entries: &[JournalEntry], policy: &RiskPolicy) -> AuditReport {
    let mut report = AuditReport::default();

    for entry in entries {
        report.checked += 1;
        let id = entry.id;

        let (as_submitted, current) = match (
            compute_trade_sizing(&entry.input, &entry.policy),
            compute_trade_sizing(&entry.input, policy),
        ) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                report.findings.push(AuditFinding::Unsizable { id });
                continue;
            }
        };

        if (as_submitted.lot_size - entry.sizing.lot_size).abs() > VALUE_EPSILON {
            report.findings.push(AuditFinding::LotChanged {
                id,
                stored: entry.sizing.lot_size,
                recomputed: as_submitted.lot_size,
            });
        }

        if (as_submitted.risk_reward_ratio - entry.sizing.risk_reward_ratio).abs() > VALUE_EPSILON {
            report.findings.push(AuditFinding::RrChanged {
                id,
                stored: entry.sizing.risk_reward_ratio,
                recomputed: as_submitted.risk_reward_ratio,
            });
        }

        let decision = EntryDecision::from_gate(current.gate_all_ok());
        if decision != entry.decision {
            report.findings.push(AuditFinding::DecisionChanged {
                id,
                stored: entry.decision,
                recomputed: decision,
            });
        }
    }

    for finding in &report.findings {
        warn!("Audit: {}", finding);
    }
    info!(
        "Audited {} entries, {} finding(s)",
        report.checked,
        report.findings.len()
    );

    report
}
