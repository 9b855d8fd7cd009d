//! CLI runtime configuration.
//!
//! Resolved once at startup from the environment (after `.env` is loaded) and then passed to
//! the command handlers, which never read environment variables themselves.

use tracing_subscriber::filter::Directive;

/// Environment variable holding the default XML indent width.
pub const INDENT_VAR: &str = "HR_THINGS_INDENT";

/// Environment variable holding the default log filter directive.
pub const LOG_VAR: &str = "HR_THINGS_LOG";

/// Standard filter variable; when set it replaces [`LOG_VAR`] entirely.
pub const RUST_LOG_VAR: &str = "RUST_LOG";

pub const DEFAULT_INDENT: usize = 2;
pub const MAX_INDENT: usize = 8;
pub const DEFAULT_LOG_DIRECTIVE: &str = "hr=info";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("HR_THINGS_INDENT must be an integer between 0 and 8, got '{0}'")]
    InvalidIndent(String),

    #[error("HR_THINGS_LOG is not a valid filter directive: {0}")]
    InvalidLogDirective(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// CLI configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CliConfig {
    indent: usize,
    log_directive: Directive,
}

impl CliConfig {
    pub fn new(indent: usize, log_directive: Directive) -> ConfigResult<Self> {
        if indent > MAX_INDENT {
            return Err(ConfigError::InvalidIndent(indent.to_string()));
        }
        Ok(Self {
            indent,
            log_directive,
        })
    }

    /// Read [`INDENT_VAR`] and [`LOG_VAR`] from the process environment.
    pub fn from_env() -> ConfigResult<Self> {
        Self::new(
            indent_from_env_value(std::env::var(INDENT_VAR).ok())?,
            log_directive_from_env_value(std::env::var(LOG_VAR).ok())?,
        )
    }

    /// Indent width used by `roundtrip` when no `--indent` flag is given.
    pub fn indent(&self) -> usize {
        self.indent
    }

    pub fn log_directive(&self) -> &Directive {
        &self.log_directive
    }

    /// Filter string for the subscriber: a non-blank `rust_log` wins, otherwise the
    /// configured directive.
    pub fn log_filter(&self, rust_log: Option<String>) -> String {
        rust_log
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| self.log_directive.to_string())
    }
}

/// Parse the indent width from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_INDENT`].
pub fn indent_from_env_value(value: Option<String>) -> ConfigResult<usize> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let Some(value) = value else {
        return Ok(DEFAULT_INDENT);
    };
    match value.parse::<usize>() {
        Ok(indent) if indent <= MAX_INDENT => Ok(indent),
        _ => Err(ConfigError::InvalidIndent(value)),
    }
}

/// Parse the log directive from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_LOG_DIRECTIVE`].
pub fn log_directive_from_env_value(value: Option<String>) -> ConfigResult<Directive> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_DIRECTIVE.to_string());
    value
        .parse()
        .map_err(|err: tracing_subscriber::filter::ParseError| {
            ConfigError::InvalidLogDirective(err.to_string())
        })
}
