// scoutbase CLI - config-driven batch cleaning of scouting datasets

mod exit_codes;
mod report;
mod util;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use scoutbase_resolve::audit::{audit_players, audit_reports};
use scoutbase_resolve::load::{
    load_players_csv, load_reports_csv, players_to_csv, reports_to_csv,
};
use scoutbase_resolve::model::{PlayerRecord, ReportRecord};
use scoutbase_resolve::validate::IntegrityStatus;
use scoutbase_resolve::JobConfig;

use exit_codes::{
    EXIT_CLEAN_INTEGRITY, EXIT_CLEAN_INVALID_CONFIG, EXIT_CLEAN_IO, EXIT_CLEAN_PARSE, EXIT_ERROR,
    EXIT_SUCCESS,
};

#[derive(Parser)]
#[command(name = "sbase")]
#[command(about = "Batch cleaning and entity resolution for scouting datasets")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a cleaning job from a TOML config file
    #[command(after_help = "\
Examples:
  sbase run job.toml
  sbase run job.toml --json
  sbase run job.toml --check")]
    Run {
        /// Path to the job config file
        config: PathBuf,

        /// Print the metrics document as JSON on stdout
        #[arg(long)]
        json: bool,

        /// Run the full pipeline but write no artifacts
        #[arg(long)]
        check: bool,
    },

    /// Validate a job config without running
    #[command(after_help = "\
Examples:
  sbase validate job.toml")]
    Validate {
        /// Path to the job config file
        config: PathBuf,
    },

    /// Audit the raw input tables without cleaning or writing
    #[command(after_help = "\
Examples:
  sbase audit job.toml
  sbase audit job.toml --json")]
    Audit {
        /// Path to the job config file
        config: PathBuf,

        /// Print the audit as JSON on stdout
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            config,
            json,
            check,
        } => cmd_run(&config, json, check),
        Commands::Validate { config } => cmd_validate(&config),
        Commands::Audit { config, json } => cmd_audit(&config, json),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError {
            code,
            message,
            hint,
        }) => {
            if !message.is_empty() {
                eprintln!("error: {message}");
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {hint}");
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    fn config(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_CLEAN_INVALID_CONFIG,
            message: msg.into(),
            hint: None,
        }
    }

    fn parse(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_CLEAN_PARSE,
            message: msg.into(),
            hint: None,
        }
    }

    fn io(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_CLEAN_IO,
            message: msg.into(),
            hint: None,
        }
    }

    fn other(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_ERROR,
            message: msg.into(),
            hint: None,
        }
    }

    /// Add a hint to an existing error.
    fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Read and validate the job config; data paths resolve relative to the
/// config file's directory.
fn load_config(path: &Path) -> Result<(JobConfig, PathBuf), CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("cannot read config: {e}")))?;
    let config = JobConfig::from_toml(&text).map_err(|e| CliError::config(e.to_string()))?;
    let base_dir = path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    Ok((config, base_dir))
}

/// Fatal on any read or structural parse failure — nothing has been
/// written yet, so an abort here leaves no partial output.
fn load_inputs(
    config: &JobConfig,
    base_dir: &Path,
) -> Result<(Vec<PlayerRecord>, Vec<ReportRecord>), CliError> {
    let players_path = base_dir.join(&config.inputs.players);
    let players_text = util::read_file_as_utf8(&players_path).map_err(|e| {
        CliError::io(format!("cannot read {}: {e}", players_path.display()))
            .with_hint("input paths resolve relative to the config file")
    })?;
    let players = load_players_csv(&players_text).map_err(|e| CliError::parse(e.to_string()))?;

    let reports_path = base_dir.join(&config.inputs.reports);
    let reports_text = util::read_file_as_utf8(&reports_path).map_err(|e| {
        CliError::io(format!("cannot read {}: {e}", reports_path.display()))
            .with_hint("input paths resolve relative to the config file")
    })?;
    let reports = load_reports_csv(&reports_text).map_err(|e| CliError::parse(e.to_string()))?;

    Ok((players, reports))
}

fn write_artifact(path: &Path, contents: &str) -> Result<(), CliError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CliError::io(format!("cannot create {}: {e}", parent.display())))?;
        }
    }
    std::fs::write(path, contents)
        .map_err(|e| CliError::io(format!("cannot write {}: {e}", path.display())))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_run(config_path: &Path, json_output: bool, check: bool) -> Result<(), CliError> {
    let (config, base_dir) = load_config(config_path)?;
    let (players, reports) = load_inputs(&config, &base_dir)?;

    let run = scoutbase_resolve::run(players, reports);

    // Render every artifact before writing any: a failed render must not
    // leave a partial snapshot behind.
    let players_csv = players_to_csv(&run.players).map_err(|e| CliError::parse(e.to_string()))?;
    let reports_csv = reports_to_csv(&run.reports).map_err(|e| CliError::parse(e.to_string()))?;
    let mapping_json = serde_json::to_string_pretty(&run.mapping)
        .map_err(|e| CliError::other(format!("JSON serialization error: {e}")))?;
    let metrics_json = serde_json::to_string_pretty(&run.metrics)
        .map_err(|e| CliError::other(format!("JSON serialization error: {e}")))?;

    if !check {
        write_artifact(&base_dir.join(&config.outputs.players), &players_csv)?;
        write_artifact(&base_dir.join(&config.outputs.reports), &reports_csv)?;
        write_artifact(&base_dir.join(&config.outputs.mapping), &mapping_json)?;
        if let Some(ref path) = config.outputs.metrics {
            write_artifact(&base_dir.join(path), &metrics_json)?;
        }
        if let Some(ref path) = config.outputs.log {
            write_artifact(&base_dir.join(path), &report::render_cleaning_log(&run.metrics))?;
        }
    }

    if json_output {
        println!("{metrics_json}");
    }

    // Human summary to stderr
    let m = &run.metrics;
    eprintln!(
        "players: {} → {} rows ({} duplicate rows removed, {} identifiers reissued, {} mapping entries)",
        m.players.before.rows,
        m.players.after.rows,
        m.resolution.duplicate_rows_removed,
        m.resolution.identifiers_reissued,
        m.resolution.mappings_created,
    );
    eprintln!(
        "reports: {} rows ({} references remapped, {} players synthesized)",
        m.reports.after.rows, m.repair.references_remapped, m.repair.players_synthesized,
    );
    eprintln!(
        "integrity: {} ({} duplicate ids, {} orphaned references)",
        m.integrity.status, m.integrity.duplicate_ids, m.integrity.orphaned_references,
    );

    if m.integrity.status != IntegrityStatus::Pass {
        return Err(CliError {
            code: EXIT_CLEAN_INTEGRITY,
            message: "integrity warnings found".into(),
            hint: None,
        });
    }

    Ok(())
}

fn cmd_validate(config_path: &Path) -> Result<(), CliError> {
    let (config, _) = load_config(config_path)?;
    let name = if config.name.is_empty() {
        "(unnamed)"
    } else {
        config.name.as_str()
    };
    eprintln!(
        "valid: job {name} — {} + {} → {}",
        config.inputs.players, config.inputs.reports, config.outputs.players,
    );
    Ok(())
}

fn cmd_audit(config_path: &Path, json_output: bool) -> Result<(), CliError> {
    let (config, base_dir) = load_config(config_path)?;
    let (players, reports) = load_inputs(&config, &base_dir)?;

    let players_audit = audit_players(&players);
    let reports_audit = audit_reports(&reports);

    if json_output {
        let doc = serde_json::json!({
            "players": players_audit,
            "reports": reports_audit,
        });
        let json = serde_json::to_string_pretty(&doc)
            .map_err(|e| CliError::other(format!("JSON serialization error: {e}")))?;
        println!("{json}");
        return Ok(());
    }

    eprintln!(
        "players: {} rows, {} duplicate ids, {} invalid ids, {} exact duplicate rows",
        players_audit.rows,
        players_audit.duplicate_ids,
        players_audit.invalid_ids,
        players_audit.exact_duplicate_rows,
    );
    eprintln!(
        "players missing: {} name, {} date of birth, {} nationality, {} team",
        players_audit.missing_name,
        players_audit.missing_date_of_birth,
        players_audit.missing_nationality,
        players_audit.missing_team,
    );
    eprintln!(
        "reports: {} rows, {} unique players, {} unique scouts, {} unique countries, {} missing references",
        reports_audit.rows,
        reports_audit.unique_players,
        reports_audit.unique_scouts,
        reports_audit.unique_countries,
        reports_audit.missing_player_reference,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYERS_CSV: &str = "\
PlayerID,PlayerName,DateOfBirth,PlayerFirstNationality,CurrentTeam
PLY_1,John Smith,01/01/2000,England,Arsenal
PLY_2,John  Smith,2000-01-01,England,
";

    const REPORTS_CSV: &str = "\
ReportID,PlayerID,PlayerName,PlayerFirstNationality,ScoutID,Country,ReportType,PerformanceGrade,PotentialGrade,ReportPrimaryPosition,ReportSecondaryPosition,ReportFoot,ReportCreatedOn,ReportModifiedOn,MatchDate
RPT_1,PLY_2,John Smith,England,SCT_1,England,Live,4,B,CM,,Right,15/03/2021 18:45,,14/03/2021
RPT_2,PLY_77,Dario Conte,Italy,SCT_2,Italy,Live,3,C,ST,,Left,01/04/2021,,31/03/2021
";

    fn write_job(dir: &Path) -> PathBuf {
        std::fs::write(dir.join("Players.csv"), PLAYERS_CSV).unwrap();
        std::fs::write(dir.join("ReportingInsight.csv"), REPORTS_CSV).unwrap();
        let config = r#"
name = "test job"

[inputs]
players = "Players.csv"
reports = "ReportingInsight.csv"

[outputs]
players = "out/players_cleaned.csv"
reports = "out/reporting_cleaned.csv"
mapping = "out/player_id_map.json"
metrics = "out/cleaning_metrics.json"
log     = "out/cleaning_log.md"
"#;
        let path = dir.join("job.toml");
        std::fs::write(&path, config).unwrap();
        path
    }

    #[test]
    fn run_writes_all_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let job = write_job(dir.path());

        cmd_run(&job, false, false).unwrap();

        let players = std::fs::read_to_string(dir.path().join("out/players_cleaned.csv")).unwrap();
        assert!(players.contains("PLY_1"));
        assert!(!players.contains("PLY_2"));
        // Orphaned reference restored as a placeholder row.
        assert!(players.contains("PLY_77"));

        let mapping = std::fs::read_to_string(dir.path().join("out/player_id_map.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&mapping).unwrap();
        assert_eq!(parsed["PLY_2"], "PLY_1");

        let reports =
            std::fs::read_to_string(dir.path().join("out/reporting_cleaned.csv")).unwrap();
        assert!(reports.contains("RPT_1,PLY_1"));

        let log = std::fs::read_to_string(dir.path().join("out/cleaning_log.md")).unwrap();
        assert!(log.contains("# Data Cleaning Log"));
    }

    #[test]
    fn check_mode_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let job = write_job(dir.path());

        cmd_run(&job, false, true).unwrap();
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn missing_input_aborts_before_output() {
        let dir = tempfile::tempdir().unwrap();
        let job = write_job(dir.path());
        std::fs::remove_file(dir.path().join("Players.csv")).unwrap();

        let err = cmd_run(&job, false, false).unwrap_err();
        assert_eq!(err.code, EXIT_CLEAN_IO);
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn validate_accepts_and_rejects() {
        let dir = tempfile::tempdir().unwrap();
        let job = write_job(dir.path());
        cmd_validate(&job).unwrap();

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "name = \"x\"").unwrap();
        let err = cmd_validate(&bad).unwrap_err();
        assert_eq!(err.code, EXIT_CLEAN_INVALID_CONFIG);
    }

    #[test]
    fn audit_runs_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let job = write_job(dir.path());
        cmd_audit(&job, false).unwrap();
        assert!(!dir.path().join("out").exists());
    }
}
