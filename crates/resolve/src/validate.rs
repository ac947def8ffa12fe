//! Post-resolution integrity certification.
//!
//! Certifies, never repairs: counts are computed and handed back, callers
//! decide whether a non-zero count is fatal.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::model::{PlayerRecord, ReportRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrityStatus {
    Pass,
    Warning,
}

impl fmt::Display for IntegrityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "pass"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IntegrityReport {
    /// Player rows whose identifier repeats an earlier row's. Must be zero.
    pub duplicate_ids: usize,
    /// Distinct report references absent from the player table. Must be
    /// zero after repair.
    pub orphaned_references: usize,
    pub unique_players: usize,
    pub unique_reports: usize,
    pub status: IntegrityStatus,
}

pub fn check_integrity(players: &[PlayerRecord], reports: &[ReportRecord]) -> IntegrityReport {
    let mut ids: BTreeSet<&str> = BTreeSet::new();
    let mut duplicate_ids = 0;
    for p in players {
        if !ids.insert(p.id.as_str()) {
            duplicate_ids += 1;
        }
    }

    let orphaned: BTreeSet<&str> = reports
        .iter()
        .map(|r| r.player_id.as_str())
        .filter(|id| !id.is_empty() && !ids.contains(id))
        .collect();

    let unique_reports = reports
        .iter()
        .map(|r| r.report_id.as_str())
        .filter(|id| !id.is_empty())
        .collect::<BTreeSet<_>>()
        .len();

    let status = if duplicate_ids == 0 && orphaned.is_empty() {
        IntegrityStatus::Pass
    } else {
        IntegrityStatus::Warning
    };

    IntegrityReport {
        duplicate_ids,
        orphaned_references: orphaned.len(),
        unique_players: ids.len(),
        unique_reports,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: &str) -> PlayerRecord {
        PlayerRecord {
            id: id.into(),
            name: "X".into(),
            date_of_birth: String::new(),
            nationality: String::new(),
            current_team: String::new(),
        }
    }

    fn report(report_id: &str, player_id: &str) -> ReportRecord {
        ReportRecord {
            report_id: report_id.into(),
            player_id: player_id.into(),
            player_name: String::new(),
            nationality: String::new(),
            scout_id: String::new(),
            country: String::new(),
            report_type: String::new(),
            performance_grade: String::new(),
            potential_grade: String::new(),
            primary_position: String::new(),
            secondary_position: String::new(),
            foot: String::new(),
            created_on: String::new(),
            modified_on: String::new(),
            match_date: String::new(),
        }
    }

    #[test]
    fn clean_tables_pass() {
        let players = vec![player("PLY_1"), player("PLY_2")];
        let reports = vec![report("RPT_1", "PLY_1"), report("RPT_2", "PLY_2")];
        let r = check_integrity(&players, &reports);
        assert_eq!(r.status, IntegrityStatus::Pass);
        assert_eq!(r.duplicate_ids, 0);
        assert_eq!(r.orphaned_references, 0);
        assert_eq!(r.unique_players, 2);
        assert_eq!(r.unique_reports, 2);
    }

    #[test]
    fn duplicate_ids_warn() {
        let players = vec![player("PLY_1"), player("PLY_1")];
        let r = check_integrity(&players, &[]);
        assert_eq!(r.status, IntegrityStatus::Warning);
        assert_eq!(r.duplicate_ids, 1);
    }

    #[test]
    fn orphans_counted_distinct_and_empty_refs_ignored() {
        let players = vec![player("PLY_1")];
        let reports = vec![
            report("RPT_1", "PLY_9"),
            report("RPT_2", "PLY_9"),
            report("RPT_3", ""),
        ];
        let r = check_integrity(&players, &reports);
        assert_eq!(r.status, IntegrityStatus::Warning);
        assert_eq!(r.orphaned_references, 1);
    }
}
