//! Environment contract validation
//!
//! A pre-flight gate run once at startup: every recognized variable is
//! checked against its descriptor, problems are collected into a
//! [`ValidationReport`], and the caller halts if any error was found.
//!
//! # Rules
//!
//! - Required and absent: error
//! - Present: type check by [`VarKind`]
//! - Optional and absent: warning
//! - Present but not described by the `ConfigSpec`: warning
//!
//! Validation is a pure function over the source map. Reporting and process
//! exit are left to the caller.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use tracing::{error, warn};

use crate::error::ConfigError;

/// Raw configuration values keyed by variable name
pub type EnvSource = BTreeMap<String, String>;

/// Expected type of a configuration variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    String,
    Number,
    Boolean,
}

impl std::fmt::Display for VarKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            VarKind::String => "string",
            VarKind::Number => "number",
            VarKind::Boolean => "boolean",
        })
    }
}

/// One recognized configuration variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarDescriptor {
    pub name: String,
    pub required: bool,
    pub kind: VarKind,
    pub description: String,
}

impl VarDescriptor {
    pub fn required(name: &str, kind: VarKind, description: &str) -> Self {
        Self {
            name: name.to_string(),
            required: true,
            kind,
            description: description.to_string(),
        }
    }

    pub fn optional(name: &str, kind: VarKind, description: &str) -> Self {
        Self {
            name: name.to_string(),
            required: false,
            kind,
            description: description.to_string(),
        }
    }

    /// Type-check a present value, returning the error message on mismatch
    fn check(&self, value: &str) -> Option<String> {
        match self.kind {
            VarKind::Number => {
                if is_numeric_literal(value) {
                    None
                } else {
                    Some(format!("{} must be a number", self.name))
                }
            }
            VarKind::Boolean => {
                if value == "true" || value == "false" {
                    None
                } else {
                    Some(format!("{} must be 'true' or 'false'", self.name))
                }
            }
            VarKind::String => {
                if value.trim().is_empty() {
                    Some(format!("{} must be a non-empty string", self.name))
                } else {
                    None
                }
            }
        }
    }
}

/// Accepts integer and float literals with optional surrounding whitespace.
/// `NaN` parses as an f64 but is not a number for our purposes.
fn is_numeric_literal(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return false;
    }
    match trimmed.parse::<f64>() {
        Ok(n) => !n.is_nan(),
        Err(_) => false,
    }
}

/// Named, ordered set of variable descriptors with unique names
#[derive(Debug, Clone)]
pub struct ConfigSpec {
    name: String,
    vars: Vec<VarDescriptor>,
}

impl ConfigSpec {
    /// Build a spec, rejecting duplicate variable names
    pub fn new(name: &str, vars: Vec<VarDescriptor>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for var in &vars {
            if !seen.insert(var.name.as_str()) {
                return Err(ConfigError::DuplicateDescriptor(var.name.clone()));
            }
        }
        Ok(Self {
            name: name.to_string(),
            vars,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vars(&self) -> &[VarDescriptor] {
        &self.vars
    }

    pub fn get(&self, name: &str) -> Option<&VarDescriptor> {
        self.vars.iter().find(|v| v.name == name)
    }
}

/// Outcome of a validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// True when no errors were found; warnings do not count
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Log one line per problem, errors before warnings
    pub fn log(&self) {
        for e in &self.errors {
            error!("✗ {}", e);
        }
        for w in &self.warnings {
            warn!("⚠ {}", w);
        }
    }

    /// Convert into a startup verdict, keeping the warnings on success
    pub fn into_result(self) -> Result<Vec<String>, ConfigError> {
        if self.errors.is_empty() {
            Ok(self.warnings)
        } else {
            Err(ConfigError::Invalid(self.errors))
        }
    }
}

/// Validate `source` against `spec`
///
/// Errors and warnings follow descriptor order, then unknown keys in
/// sorted key order.
pub fn validate(spec: &ConfigSpec, source: &EnvSource) -> ValidationReport {
    let mut report = ValidationReport::default();

    for var in &spec.vars {
        match source.get(&var.name) {
            None if var.required => {
                report
                    .errors
                    .push(format!("missing required variable: {}", var.name));
            }
            None => {
                report
                    .warnings
                    .push(format!("optional variable not set: {}", var.name));
            }
            Some(value) => {
                if let Some(msg) = var.check(value) {
                    report.errors.push(msg);
                }
            }
        }
    }

    for key in source.keys() {
        if spec.get(key).is_none() {
            report.warnings.push(format!("unknown variable: {}", key));
        }
    }

    report
}

/// Parse a `.env` file into an [`EnvSource`]
///
/// A missing file is reported as [`ConfigError::EnvFileNotFound`] so callers
/// can distinguish it from per-variable failures.
pub fn load_env_file(path: &Path) -> Result<EnvSource, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::EnvFileNotFound(path.to_path_buf()));
    }

    let parse_err = |message: String| ConfigError::EnvFileParse {
        path: path.to_path_buf(),
        message,
    };

    let iter = dotenvy::from_path_iter(path).map_err(|e| parse_err(e.to_string()))?;
    let mut source = EnvSource::new();
    for item in iter {
        let (key, value) = item.map_err(|e| parse_err(e.to_string()))?;
        source.insert(key, value);
    }
    Ok(source)
}

/// Snapshot process environment variables whose names start with `prefix`
pub fn env_source_with_prefix(prefix: &str) -> EnvSource {
    std::env::vars()
        .filter(|(k, _)| k.starts_with(prefix))
        .collect()
}

/// Variables consumed by the frontend build
pub fn frontend_env_spec() -> ConfigSpec {
    use VarKind::*;
    ConfigSpec {
        name: "frontend".to_string(),
        vars: vec![
            VarDescriptor::required("VITE_API_URL", String, "API base URL"),
            VarDescriptor::required("VITE_API_TIMEOUT", Number, "API request timeout in milliseconds"),
            VarDescriptor::required("VITE_MAX_RETRIES", Number, "Maximum number of API request retries"),
            VarDescriptor::required("VITE_OPENAI_API_KEY", String, "OpenAI API key"),
            VarDescriptor::optional("VITE_CSP_NONCE", String, "Content Security Policy nonce"),
            VarDescriptor::optional("VITE_API_KEY_SALT", String, "Salt for API key hashing"),
            VarDescriptor::optional("VITE_ENABLE_ERROR_REPORTING", Boolean, "Enable error reporting"),
            VarDescriptor::optional(
                "VITE_ENABLE_PERFORMANCE_MONITORING",
                Boolean,
                "Enable performance monitoring",
            ),
            VarDescriptor::optional("VITE_ENABLE_ANALYTICS", Boolean, "Enable analytics"),
            VarDescriptor::optional("VITE_SENTRY_DSN", String, "Sentry DSN for error reporting"),
            VarDescriptor::optional("VITE_GA_TRACKING_ID", String, "Google Analytics tracking ID"),
            VarDescriptor::optional("VITE_CACHE_TTL", Number, "Cache time-to-live in seconds"),
        ],
    }
}

/// Prefix shared by every variable in [`server_env_spec`]
pub const SERVER_ENV_PREFIX: &str = "BOOKBUDDY_";

/// Variables read by the feedback server process
pub fn server_env_spec() -> ConfigSpec {
    use VarKind::*;
    ConfigSpec {
        name: "server".to_string(),
        vars: vec![
            VarDescriptor::required(
                "BOOKBUDDY_ADMIN_KEY",
                String,
                "Shared secret for reading submitted feedback",
            ),
            VarDescriptor::optional("BOOKBUDDY_PORT", Number, "HTTP listen port"),
            VarDescriptor::optional("BOOKBUDDY_HOST", String, "HTTP bind address"),
            VarDescriptor::optional("BOOKBUDDY_DATA_DIR", String, "Directory holding feedback.json"),
            VarDescriptor::optional("BOOKBUDDY_CONFIG", String, "Path to TOML bootstrap config"),
        ],
    }
}
