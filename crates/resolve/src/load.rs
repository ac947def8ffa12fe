//! CSV row codec for the two input tables.
//!
//! Parsing is header-addressed: columns are located by name, extra columns
//! are ignored, and a missing required column is a structural (fatal)
//! error. Field *values* are never fatal — blank stays blank and
//! normalization decides what survives.

use crate::error::CleanError;
use crate::model::{PlayerRecord, ReportRecord};

pub const PLAYER_COLUMNS: &[&str] = &[
    "PlayerID",
    "PlayerName",
    "DateOfBirth",
    "PlayerFirstNationality",
    "CurrentTeam",
];

pub const REPORT_COLUMNS: &[&str] = &[
    "ReportID",
    "PlayerID",
    "PlayerName",
    "PlayerFirstNationality",
    "ScoutID",
    "Country",
    "ReportType",
    "PerformanceGrade",
    "PotentialGrade",
    "ReportPrimaryPosition",
    "ReportSecondaryPosition",
    "ReportFoot",
    "ReportCreatedOn",
    "ReportModifiedOn",
    "MatchDate",
];

fn csv_err(table: &str, e: impl ToString) -> CleanError {
    CleanError::Csv {
        table: table.into(),
        message: e.to_string(),
    }
}

/// Header row with whitespace trimmed and any UTF-8 BOM stripped from the
/// first column.
fn read_headers(reader: &mut csv::Reader<&[u8]>, table: &str) -> Result<Vec<String>, CleanError> {
    let headers = reader.headers().map_err(|e| csv_err(table, e))?;
    let mut out: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();
    if let Some(first) = out.first_mut() {
        *first = first.trim_start_matches('\u{feff}').to_string();
    }
    Ok(out)
}

pub fn load_players_csv(data: &str) -> Result<Vec<PlayerRecord>, CleanError> {
    let table = "players";
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data.as_bytes());

    let headers = read_headers(&mut reader, table)?;
    let idx = |name: &str| -> Result<usize, CleanError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| CleanError::MissingColumn {
                table: table.into(),
                column: name.into(),
            })
    };

    let id_idx = idx("PlayerID")?;
    let name_idx = idx("PlayerName")?;
    let dob_idx = idx("DateOfBirth")?;
    let nationality_idx = idx("PlayerFirstNationality")?;
    let team_idx = idx("CurrentTeam")?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_err(table, e))?;
        let field = |i: usize| record.get(i).unwrap_or("").trim().to_string();
        rows.push(PlayerRecord {
            id: field(id_idx),
            name: field(name_idx),
            date_of_birth: field(dob_idx),
            nationality: field(nationality_idx),
            current_team: field(team_idx),
        });
    }
    Ok(rows)
}

pub fn load_reports_csv(data: &str) -> Result<Vec<ReportRecord>, CleanError> {
    let table = "reports";
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data.as_bytes());

    let headers = read_headers(&mut reader, table)?;
    let idx = |name: &str| -> Result<usize, CleanError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| CleanError::MissingColumn {
                table: table.into(),
                column: name.into(),
            })
    };

    let report_id_idx = idx("ReportID")?;
    let player_id_idx = idx("PlayerID")?;
    let player_name_idx = idx("PlayerName")?;
    let nationality_idx = idx("PlayerFirstNationality")?;
    let scout_id_idx = idx("ScoutID")?;
    let country_idx = idx("Country")?;
    let report_type_idx = idx("ReportType")?;
    let performance_idx = idx("PerformanceGrade")?;
    let potential_idx = idx("PotentialGrade")?;
    let primary_pos_idx = idx("ReportPrimaryPosition")?;
    let secondary_pos_idx = idx("ReportSecondaryPosition")?;
    let foot_idx = idx("ReportFoot")?;
    let created_idx = idx("ReportCreatedOn")?;
    let modified_idx = idx("ReportModifiedOn")?;
    let match_date_idx = idx("MatchDate")?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_err(table, e))?;
        let field = |i: usize| record.get(i).unwrap_or("").trim().to_string();
        rows.push(ReportRecord {
            report_id: field(report_id_idx),
            player_id: field(player_id_idx),
            player_name: field(player_name_idx),
            nationality: field(nationality_idx),
            scout_id: field(scout_id_idx),
            country: field(country_idx),
            report_type: field(report_type_idx),
            performance_grade: field(performance_idx),
            potential_grade: field(potential_idx),
            primary_position: field(primary_pos_idx),
            secondary_position: field(secondary_pos_idx),
            foot: field(foot_idx),
            created_on: field(created_idx),
            modified_on: field(modified_idx),
            match_date: field(match_date_idx),
        });
    }
    Ok(rows)
}

pub fn players_to_csv(rows: &[PlayerRecord]) -> Result<String, CleanError> {
    let table = "players";
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(PLAYER_COLUMNS)
        .map_err(|e| csv_err(table, e))?;
    for p in rows {
        writer
            .write_record([
                &p.id,
                &p.name,
                &p.date_of_birth,
                &p.nationality,
                &p.current_team,
            ])
            .map_err(|e| csv_err(table, e))?;
    }
    let bytes = writer.into_inner().map_err(|e| csv_err(table, e))?;
    String::from_utf8(bytes).map_err(|e| csv_err(table, e))
}

pub fn reports_to_csv(rows: &[ReportRecord]) -> Result<String, CleanError> {
    let table = "reports";
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(REPORT_COLUMNS)
        .map_err(|e| csv_err(table, e))?;
    for r in rows {
        writer
            .write_record([
                &r.report_id,
                &r.player_id,
                &r.player_name,
                &r.nationality,
                &r.scout_id,
                &r.country,
                &r.report_type,
                &r.performance_grade,
                &r.potential_grade,
                &r.primary_position,
                &r.secondary_position,
                &r.foot,
                &r.created_on,
                &r.modified_on,
                &r.match_date,
            ])
            .map_err(|e| csv_err(table, e))?;
    }
    let bytes = writer.into_inner().map_err(|e| csv_err(table, e))?;
    String::from_utf8(bytes).map_err(|e| csv_err(table, e))
}
