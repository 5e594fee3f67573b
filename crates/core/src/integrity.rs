//! Data-integrity issue vocabulary and report assessment.
//!
//! The checks themselves run as queries in the repository layer; this module
//! names the issue kinds and grades a set of findings.

use serde::Serialize;

use crate::types::Timestamp;

/// A player references a team that does not exist.
pub const ISSUE_BROKEN_TEAM_REFERENCE: &str = "broken_team_reference";
/// A player's class disagrees with its latest approved class change.
pub const ISSUE_CLASS_DRIFT: &str = "class_drift";
/// An active entry's team no longer matches the player's team.
pub const ISSUE_ENTRY_TEAM_MISMATCH: &str = "entry_team_mismatch";
/// A team in a closed or running tournament fields fewer players than the
/// tournament's per-team minimum.
pub const ISSUE_TEAM_BELOW_MINIMUM: &str = "team_below_minimum";

/// No findings.
pub const HEALTH_HEALTHY: &str = "healthy";
/// Only drift-style findings that an admin can reconcile.
pub const HEALTH_WARNING: &str = "warning";
/// At least one dangling reference.
pub const HEALTH_CRITICAL: &str = "critical";

/// One integrity finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityIssue {
    pub kind: &'static str,
    pub entity: &'static str,
    pub entity_id: String,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntegrityReport {
    pub status: &'static str,
    pub issue_count: usize,
    pub issues: Vec<IntegrityIssue>,
    pub checked_at: Timestamp,
}

/// Grade a set of findings.
pub fn assess_health(issues: &[IntegrityIssue]) -> &'static str {
    if issues.is_empty() {
        HEALTH_HEALTHY
    } else if issues.iter().any(|i| i.kind == ISSUE_BROKEN_TEAM_REFERENCE) {
        HEALTH_CRITICAL
    } else {
        HEALTH_WARNING
    }
}

pub fn build_report(issues: Vec<IntegrityIssue>, checked_at: Timestamp) -> IntegrityReport {
    IntegrityReport {
        status: assess_health(&issues),
        issue_count: issues.len(),
        issues,
        checked_at,
    }
}
