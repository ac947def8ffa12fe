//! Pipeline orchestration: the fixed stage sequence plus run metrics.
//!
//! Stage order: normalize players → resolve duplicates → normalize reports
//! → apply mapping + repair references → validate. Each stage consumes the
//! previous stage's output and nothing later. Persistence is the caller's
//! concern — nothing here touches the filesystem, so a failed run can
//! never leave a half-written snapshot behind.

use serde::Serialize;

use crate::audit::{audit_players, audit_reports, PlayerAudit, ReportAudit};
use crate::model::{IdMapping, PlayerRecord, ReportRecord};
use crate::normalize::{normalize_player, normalize_report};
use crate::repair::{repair_references, RepairStats};
use crate::resolver::{resolve_duplicates, ResolveStats};
use crate::validate::{check_integrity, IntegrityReport};

#[derive(Debug, Clone, Serialize)]
pub struct RunMeta {
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerTableMetrics {
    pub before: PlayerAudit,
    pub after: PlayerAudit,
    /// Rows dropped because the name normalized to empty.
    pub nameless_dropped: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportTableMetrics {
    pub before: ReportAudit,
    pub after: ReportAudit,
}

#[derive(Debug, Clone, Serialize)]
pub struct CleanMetrics {
    pub meta: RunMeta,
    pub players: PlayerTableMetrics,
    pub reports: ReportTableMetrics,
    pub resolution: ResolveStats,
    pub repair: RepairStats,
    pub integrity: IntegrityReport,
}

/// The full output of one pipeline run.
#[derive(Debug)]
pub struct CleanRun {
    pub players: Vec<PlayerRecord>,
    pub reports: Vec<ReportRecord>,
    pub mapping: IdMapping,
    pub metrics: CleanMetrics,
}

/// Run the cleaning pipeline over in-memory snapshots of both tables.
pub fn run(players_raw: Vec<PlayerRecord>, reports_raw: Vec<ReportRecord>) -> CleanRun {
    let players_before = audit_players(&players_raw);
    let reports_before = audit_reports(&reports_raw);

    let raw_count = players_raw.len();
    let players: Vec<PlayerRecord> = players_raw.iter().filter_map(normalize_player).collect();
    let nameless_dropped = raw_count - players.len();

    let resolved = resolve_duplicates(players);

    let reports: Vec<ReportRecord> = reports_raw.iter().map(normalize_report).collect();

    let repaired = repair_references(resolved.players, reports, &resolved.mapping);

    let integrity = check_integrity(&repaired.players, &repaired.reports);

    let metrics = CleanMetrics {
        meta: RunMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        players: PlayerTableMetrics {
            before: players_before,
            after: audit_players(&repaired.players),
            nameless_dropped,
        },
        reports: ReportTableMetrics {
            before: reports_before,
            after: audit_reports(&repaired.reports),
        },
        resolution: resolved.stats,
        repair: repaired.stats,
        integrity: integrity.clone(),
    };

    CleanRun {
        players: repaired.players,
        reports: repaired.reports,
        mapping: resolved.mapping,
        metrics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::{load_players_csv, load_reports_csv};
    use crate::validate::IntegrityStatus;

    const PLAYERS_CSV: &str = "\
PlayerID,PlayerName,DateOfBirth,PlayerFirstNationality,CurrentTeam
PLY_1,John Smith,01/01/2000,England,Arsenal
PLY_2,John  Smith,2000-01-01,England,
PLY_9,Erik larsson,05/06/1998,SWEDEN,Malmo FF
PLY_9,Luka Modric,09/09/1985,Croatia,Real Madrid
PLY_3,   ,01/01/1991,Wales,
";

    const REPORTS_CSV: &str = "\
ReportID,PlayerID,PlayerName,PlayerFirstNationality,ScoutID,Country,ReportType,PerformanceGrade,PotentialGrade,ReportPrimaryPosition,ReportSecondaryPosition,ReportFoot,ReportCreatedOn,ReportModifiedOn,MatchDate
RPT_1,PLY_2,John Smith,England,SCT_1,England,Live,4,B,CM,,right,15/03/2021 18:45,16/03/2021 09:00,14/03/2021
RPT_2,PLY_9,Luka Modric,Croatia,SCT_2,Spain,Video,5,A,CM,CAM,Right,2021-03-15 10:00:00,,13/03/2021
RPT_3,PLY_77,Dario Conte,Italy,SCT_1,Italy,Live,3,C,ST,,Left,01/04/2021,,31/03/2021
";

    #[test]
    fn end_to_end_clean_run() {
        let players = load_players_csv(PLAYERS_CSV).unwrap();
        let reports = load_reports_csv(REPORTS_CSV).unwrap();
        let run = run(players, reports);

        // PLY_1/PLY_2 merged, PLY_9 split, nameless PLY_3 dropped,
        // orphaned PLY_77 synthesized.
        let ids: Vec<&str> = run.players.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["PLY_1", "PLY_9", "PLY_9_01", "PLY_77"]);

        assert_eq!(run.mapping.resolve("PLY_2"), "PLY_1");
        assert_eq!(run.mapping.resolve("PLY_9"), "PLY_9_01");

        // References follow the mapping; the orphan keeps its identifier.
        assert_eq!(run.reports[0].player_id, "PLY_1");
        assert_eq!(run.reports[1].player_id, "PLY_9_01");
        assert_eq!(run.reports[2].player_id, "PLY_77");

        // The synthesized placeholder carries modal report values.
        let placeholder = &run.players[3];
        assert_eq!(placeholder.name, "Dario Conte");
        assert_eq!(placeholder.nationality, "Italy");
        assert_eq!(placeholder.date_of_birth, "");

        // Report dates all land in one layout.
        assert_eq!(run.reports[0].created_on, "15/03/2021 18:45");
        assert_eq!(run.reports[1].created_on, "15/03/2021 10:00");
        assert_eq!(run.reports[2].match_date, "31/03/2021 00:00");
        assert_eq!(run.reports[0].foot, "Right");

        assert_eq!(run.metrics.integrity.status, IntegrityStatus::Pass);
        assert_eq!(run.metrics.integrity.duplicate_ids, 0);
        assert_eq!(run.metrics.integrity.orphaned_references, 0);
        assert_eq!(run.metrics.players.nameless_dropped, 1);
        assert_eq!(run.metrics.resolution.identifiers_reissued, 1);
        assert_eq!(run.metrics.repair.players_synthesized, 1);
        assert_eq!(run.metrics.players.before.rows, 5);
        assert_eq!(run.metrics.players.after.rows, 4);
    }

    #[test]
    fn rerun_on_clean_output_is_stable() {
        let players = load_players_csv(PLAYERS_CSV).unwrap();
        let reports = load_reports_csv(REPORTS_CSV).unwrap();
        let first = run(players, reports);

        let second = run(first.players.clone(), first.reports.clone());
        assert_eq!(second.players, first.players);
        assert_eq!(second.reports, first.reports);
        assert!(second.mapping.is_empty());
        assert_eq!(second.metrics.integrity.status, IntegrityStatus::Pass);
    }

    #[test]
    fn mapping_values_always_in_final_table() {
        let players = load_players_csv(PLAYERS_CSV).unwrap();
        let reports = load_reports_csv(REPORTS_CSV).unwrap();
        let run = run(players, reports);

        let ids: Vec<&str> = run.players.iter().map(|p| p.id.as_str()).collect();
        for (_, target) in run.mapping.iter() {
            assert!(ids.contains(&target), "mapping value {target} missing");
        }
    }
}
