use std::fmt;

#[derive(Debug)]
pub enum CleanError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty path, colliding outputs, etc.).
    ConfigValidation(String),
    /// A required column is absent from an input table's header.
    MissingColumn { table: String, column: String },
    /// Structurally malformed CSV input.
    Csv { table: String, message: String },
    /// IO error (file read, etc.).
    Io(String),
}

impl fmt::Display for CleanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { table, column } => {
                write!(f, "table '{table}': missing column '{column}'")
            }
            Self::Csv { table, message } => write!(f, "table '{table}': {message}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for CleanError {}
