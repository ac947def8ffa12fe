use serde::Deserialize;

use crate::error::CleanError;

// ---------------------------------------------------------------------------
// Job config
// ---------------------------------------------------------------------------

/// A cleaning job: where the two raw tables live and where the cleaned
/// artifacts go. Paths are resolved relative to the config file by the
/// caller.
#[derive(Debug, Deserialize)]
pub struct JobConfig {
    #[serde(default)]
    pub name: String,
    pub inputs: InputPaths,
    pub outputs: OutputPaths,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputPaths {
    pub players: String,
    pub reports: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputPaths {
    pub players: String,
    pub reports: String,
    pub mapping: String,
    /// Metrics document (JSON). Optional.
    #[serde(default)]
    pub metrics: Option<String>,
    /// Human-readable cleaning log (Markdown). Optional.
    #[serde(default)]
    pub log: Option<String>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl JobConfig {
    pub fn from_toml(input: &str) -> Result<Self, CleanError> {
        let config: JobConfig =
            toml::from_str(input).map_err(|e| CleanError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CleanError> {
        let required = [
            ("inputs.players", &self.inputs.players),
            ("inputs.reports", &self.inputs.reports),
            ("outputs.players", &self.outputs.players),
            ("outputs.reports", &self.outputs.reports),
            ("outputs.mapping", &self.outputs.mapping),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(CleanError::ConfigValidation(format!(
                    "{key} must not be empty"
                )));
            }
        }

        if self.inputs.players == self.inputs.reports {
            return Err(CleanError::ConfigValidation(
                "inputs.players and inputs.reports must be different files".into(),
            ));
        }

        // Outputs must not collide with each other or overwrite an input.
        let mut written: Vec<&str> = vec![
            &self.outputs.players,
            &self.outputs.reports,
            &self.outputs.mapping,
        ];
        written.extend(self.outputs.metrics.as_deref());
        written.extend(self.outputs.log.as_deref());

        for (i, path) in written.iter().enumerate() {
            if written[..i].contains(path) {
                return Err(CleanError::ConfigValidation(format!(
                    "output path '{path}' is used more than once"
                )));
            }
            if *path == self.inputs.players || *path == self.inputs.reports {
                return Err(CleanError::ConfigValidation(format!(
                    "output path '{path}' would overwrite an input"
                )));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
