//! Tab host configuration parsed from environment variables.

use crate::error::ErrorCode;

pub const DEFAULT_PORT: u16 = 8050;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: {reason}")]
    Parse { var: &'static str, reason: String },
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "E_CONFIG_PARSE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// Maximum open tabs. `None` means unlimited.
    pub max_tabs: Option<usize>,
    /// Layout opened when no tab is open yet.
    pub initial_tab: Option<String>,
    /// Layouts recommended in the "new tab" picker. `None` shows all.
    pub displayed_layouts: Option<Vec<String>>,
    pub port: u16,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self { max_tabs: None, initial_tab: None, displayed_layouts: None, port: DEFAULT_PORT }
    }
}

impl HostConfig {
    /// Build typed host config from environment variables.
    ///
    /// Optional:
    /// - `KALEIDO_MAX_TABS`: `-1` (default) for no limit, else a positive count
    /// - `KALEIDO_INITIAL_TAB`: layout id
    /// - `KALEIDO_DISPLAYED_LAYOUTS`: comma-separated layout ids
    /// - `PORT`: default 8050
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` when a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`HostConfig::from_env`] over an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` when a variable is present but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            max_tabs: parse_max_tabs(lookup("KALEIDO_MAX_TABS").as_deref())?,
            initial_tab: lookup("KALEIDO_INITIAL_TAB")
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty()),
            displayed_layouts: lookup("KALEIDO_DISPLAYED_LAYOUTS").map(|v| parse_list(&v)),
            port: parse_port(lookup("PORT").as_deref())?,
        })
    }

    /// Builder-style override, mostly for tests and embedding.
    #[must_use]
    pub fn with_max_tabs(mut self, max_tabs: Option<usize>) -> Self {
        self.max_tabs = max_tabs;
        self
    }

    #[must_use]
    pub fn with_initial_tab(mut self, layout_id: impl Into<String>) -> Self {
        self.initial_tab = Some(layout_id.into());
        self
    }

    #[must_use]
    pub fn with_displayed_layouts<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.displayed_layouts = Some(ids.into_iter().map(Into::into).collect());
        self
    }
}

fn parse_max_tabs(raw: Option<&str>) -> Result<Option<usize>, ConfigError> {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    let value: i64 = raw.parse().map_err(|_| ConfigError::Parse {
        var: "KALEIDO_MAX_TABS",
        reason: format!("'{raw}' is not an integer"),
    })?;
    match value {
        -1 => Ok(None),
        v if v > 0 => usize::try_from(v).map(Some).map_err(|_| ConfigError::Parse {
            var: "KALEIDO_MAX_TABS",
            reason: format!("{v} is out of range"),
        }),
        v => Err(ConfigError::Parse {
            var: "KALEIDO_MAX_TABS",
            reason: format!("{v} must be -1 or a positive count"),
        }),
    }
}

fn parse_port(raw: Option<&str>) -> Result<u16, ConfigError> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(DEFAULT_PORT),
        Some(raw) => raw.parse().map_err(|_| ConfigError::Parse {
            var: "PORT",
            reason: format!("'{raw}' is not a valid port"),
        }),
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
