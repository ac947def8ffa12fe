//! Table audits: the before/after counts reported for every run.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::model::{is_valid_player_id, PlayerRecord, ReportRecord};

#[derive(Debug, Clone, Default, Serialize)]
pub struct PlayerAudit {
    pub rows: usize,
    pub exact_duplicate_rows: usize,
    pub duplicate_ids: usize,
    pub invalid_ids: usize,
    pub missing_name: usize,
    pub missing_date_of_birth: usize,
    pub missing_nationality: usize,
    pub missing_team: usize,
}

pub fn audit_players(players: &[PlayerRecord]) -> PlayerAudit {
    let mut audit = PlayerAudit {
        rows: players.len(),
        ..PlayerAudit::default()
    };

    let mut seen_rows: BTreeSet<(&str, &str, &str, &str, &str)> = BTreeSet::new();
    let mut seen_ids: BTreeSet<&str> = BTreeSet::new();

    for p in players {
        let row = (
            p.id.as_str(),
            p.name.as_str(),
            p.date_of_birth.as_str(),
            p.nationality.as_str(),
            p.current_team.as_str(),
        );
        if !seen_rows.insert(row) {
            audit.exact_duplicate_rows += 1;
        }
        if !seen_ids.insert(p.id.as_str()) {
            audit.duplicate_ids += 1;
        }
        if !is_valid_player_id(&p.id) {
            audit.invalid_ids += 1;
        }
        if p.name.is_empty() {
            audit.missing_name += 1;
        }
        if p.date_of_birth.is_empty() {
            audit.missing_date_of_birth += 1;
        }
        if p.nationality.is_empty() {
            audit.missing_nationality += 1;
        }
        if p.current_team.is_empty() {
            audit.missing_team += 1;
        }
    }

    audit
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportAudit {
    pub rows: usize,
    pub unique_players: usize,
    pub unique_scouts: usize,
    pub unique_countries: usize,
    pub missing_player_reference: usize,
}

pub fn audit_reports(reports: &[ReportRecord]) -> ReportAudit {
    let mut players: BTreeSet<&str> = BTreeSet::new();
    let mut scouts: BTreeSet<&str> = BTreeSet::new();
    let mut countries: BTreeSet<&str> = BTreeSet::new();
    let mut missing_player_reference = 0;

    for r in reports {
        if r.player_id.is_empty() {
            missing_player_reference += 1;
        } else {
            players.insert(r.player_id.as_str());
        }
        if !r.scout_id.is_empty() {
            scouts.insert(r.scout_id.as_str());
        }
        if !r.country.is_empty() {
            countries.insert(r.country.as_str());
        }
    }

    ReportAudit {
        rows: reports.len(),
        unique_players: players.len(),
        unique_scouts: scouts.len(),
        unique_countries: countries.len(),
        missing_player_reference,
    }
}
