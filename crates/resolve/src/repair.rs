//! Referential repair of the report table against the cleaned player table.
//!
//! Integrity is restored by construction — remap, then synthesize what is
//! still missing. Reports are never deleted.

use std::collections::{BTreeSet, HashMap};

use log::info;
use serde::Serialize;

use crate::model::{IdMapping, PlayerRecord, ReportRecord};

#[derive(Debug, Clone, Default, Serialize)]
pub struct RepairStats {
    /// Report references rewritten through the mapping.
    pub references_remapped: usize,
    /// Distinct old identifiers encountered in the report table.
    pub old_ids_seen: usize,
    /// Orphaned identifiers found after remapping.
    pub orphans_found: usize,
    /// Placeholder player records appended.
    pub players_synthesized: usize,
    /// Identifiers of the synthesized placeholders.
    pub synthesized_ids: Vec<String>,
}

#[derive(Debug)]
pub struct RepairOutcome {
    pub players: Vec<PlayerRecord>,
    pub reports: Vec<ReportRecord>,
    pub stats: RepairStats,
}

/// Apply the identifier mapping to every report reference, then synthesize
/// a minimal player record for each reference that still points nowhere.
pub fn repair_references(
    mut players: Vec<PlayerRecord>,
    mut reports: Vec<ReportRecord>,
    mapping: &IdMapping,
) -> RepairOutcome {
    let mut stats = RepairStats::default();

    // 1. Direct substitution; unmapped and empty references pass through.
    let mut old_ids = BTreeSet::new();
    for r in &mut reports {
        if r.player_id.is_empty() || !mapping.contains(&r.player_id) {
            continue;
        }
        old_ids.insert(r.player_id.clone());
        r.player_id = mapping.resolve(&r.player_id).to_string();
        stats.references_remapped += 1;
    }
    stats.old_ids_seen = old_ids.len();

    // 2. References with no matching player, in first-appearance order.
    let player_ids: BTreeSet<&str> = players.iter().map(|p| p.id.as_str()).collect();
    let mut orphaned: Vec<String> = Vec::new();
    for r in &reports {
        if r.player_id.is_empty() || player_ids.contains(r.player_id.as_str()) {
            continue;
        }
        if !orphaned.contains(&r.player_id) {
            orphaned.push(r.player_id.clone());
        }
    }
    stats.orphans_found = orphaned.len();

    // 3. Synthesize minimal records from what the reports know. Date of
    //    birth and team are not recoverable from report data.
    for id in orphaned {
        let name = modal_value(
            reports
                .iter()
                .filter(|r| r.player_id == id)
                .map(|r| r.player_name.as_str()),
        );
        let nationality = modal_value(
            reports
                .iter()
                .filter(|r| r.player_id == id)
                .map(|r| r.nationality.as_str()),
        );
        info!("synthesized placeholder player {id}");
        players.push(PlayerRecord {
            id: id.clone(),
            name,
            date_of_birth: String::new(),
            nationality,
            current_team: String::new(),
        });
        stats.players_synthesized += 1;
        stats.synthesized_ids.push(id);
    }

    RepairOutcome {
        players,
        reports,
        stats,
    }
}

/// Most frequent non-empty value. Ties (and the no-values case) fall back
/// to first occurrence in input order.
fn modal_value<'a>(values: impl Iterator<Item = &'a str>) -> String {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for v in values {
        if v.is_empty() {
            continue;
        }
        let count = counts.entry(v).or_insert(0);
        if *count == 0 {
            order.push(v);
        }
        *count += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for v in order {
        let c = counts[v];
        if best.map_or(true, |(_, bc)| c > bc) {
            best = Some((v, c));
        }
    }
    best.map(|(v, _)| v.to_string()).unwrap_or_default()
}
