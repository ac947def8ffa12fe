//! Markdown cleaning log: the human-readable before/after record of a run.

use std::fmt::Write;

use scoutbase_resolve::CleanMetrics;

/// Render the metrics document as a Markdown cleaning log.
pub(crate) fn render_cleaning_log(metrics: &CleanMetrics) -> String {
    let mut out = String::new();
    let m = metrics;

    // Writes into a String are infallible.
    let _ = writeln!(out, "# Data Cleaning Log");
    let _ = writeln!(out);
    let _ = writeln!(out, "Generated: {}", m.meta.run_at);
    let _ = writeln!(out, "Engine: {}", m.meta.engine_version);
    let _ = writeln!(out);

    let _ = writeln!(out, "## Players");
    let _ = writeln!(out);
    let _ = writeln!(out, "| Metric | Before | After |");
    let _ = writeln!(out, "|---|---|---|");
    let b = &m.players.before;
    let a = &m.players.after;
    let _ = writeln!(out, "| Rows | {} | {} |", b.rows, a.rows);
    let _ = writeln!(
        out,
        "| Exact duplicate rows | {} | {} |",
        b.exact_duplicate_rows, a.exact_duplicate_rows
    );
    let _ = writeln!(out, "| Duplicate ids | {} | {} |", b.duplicate_ids, a.duplicate_ids);
    let _ = writeln!(out, "| Invalid ids | {} | {} |", b.invalid_ids, a.invalid_ids);
    let _ = writeln!(out, "| Missing name | {} | {} |", b.missing_name, a.missing_name);
    let _ = writeln!(
        out,
        "| Missing date of birth | {} | {} |",
        b.missing_date_of_birth, a.missing_date_of_birth
    );
    let _ = writeln!(
        out,
        "| Missing nationality | {} | {} |",
        b.missing_nationality, a.missing_nationality
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "- Nameless rows dropped: {}", m.players.nameless_dropped);
    let _ = writeln!(out, "- Identifiers reissued: {}", m.resolution.identifiers_reissued);
    let _ = writeln!(out, "- Duplicate groups merged: {}", m.resolution.duplicate_groups);
    let _ = writeln!(
        out,
        "- Duplicate rows removed: {}",
        m.resolution.duplicate_rows_removed
    );
    let _ = writeln!(out, "- Mapping entries: {}", m.resolution.mappings_created);
    let _ = writeln!(out);

    let _ = writeln!(out, "## Reports");
    let _ = writeln!(out);
    let rb = &m.reports.before;
    let ra = &m.reports.after;
    let _ = writeln!(out, "| Metric | Before | After |");
    let _ = writeln!(out, "|---|---|---|");
    let _ = writeln!(out, "| Rows | {} | {} |", rb.rows, ra.rows);
    let _ = writeln!(out, "| Unique players | {} | {} |", rb.unique_players, ra.unique_players);
    let _ = writeln!(out, "| Unique scouts | {} | {} |", rb.unique_scouts, ra.unique_scouts);
    let _ = writeln!(
        out,
        "| Unique countries | {} | {} |",
        rb.unique_countries, ra.unique_countries
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "- References remapped: {}", m.repair.references_remapped);
    let _ = writeln!(out, "- Orphaned identifiers found: {}", m.repair.orphans_found);
    let _ = writeln!(out, "- Players synthesized: {}", m.repair.players_synthesized);
    if !m.repair.synthesized_ids.is_empty() {
        let _ = writeln!(out, "- Synthesized ids: {}", m.repair.synthesized_ids.join(", "));
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "## Integrity");
    let _ = writeln!(out);
    let _ = writeln!(out, "- Status: {}", m.integrity.status);
    let _ = writeln!(out, "- Duplicate ids: {}", m.integrity.duplicate_ids);
    let _ = writeln!(out, "- Orphaned references: {}", m.integrity.orphaned_references);
    let _ = writeln!(out, "- Unique players: {}", m.integrity.unique_players);
    let _ = writeln!(out, "- Unique reports: {}", m.integrity.unique_reports);

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoutbase_resolve::load::{load_players_csv, load_reports_csv};

    #[test]
    fn log_carries_the_headline_counts() {
        let players = load_players_csv(
            "PlayerID,PlayerName,DateOfBirth,PlayerFirstNationality,CurrentTeam\n\
             PLY_1,John Smith,01/01/2000,England,Arsenal\n\
             PLY_2,John  Smith,2000-01-01,England,\n",
        )
        .unwrap();
        let reports = load_reports_csv(
            "ReportID,PlayerID,PlayerName,PlayerFirstNationality,ScoutID,Country,ReportType,PerformanceGrade,PotentialGrade,ReportPrimaryPosition,ReportSecondaryPosition,ReportFoot,ReportCreatedOn,ReportModifiedOn,MatchDate\n\
             RPT_1,PLY_2,John Smith,England,SCT_1,England,Live,4,B,CM,,Right,15/03/2021 18:45,,14/03/2021\n",
        )
        .unwrap();

        let run = scoutbase_resolve::run(players, reports);
        let log = render_cleaning_log(&run.metrics);
        assert!(log.contains("# Data Cleaning Log"));
        assert!(log.contains("| Rows | 2 | 1 |"));
        assert!(log.contains("- Status: pass"));
        assert!(log.contains("- Mapping entries: 1"));
    }
}
