//! Rule configuration
//!
//! Each rule has an `enabled` flag and a `severity` under `[rules.<rule_name>]`. The
//! values shipped in `defaults/radar.default.toml` are compiled in; a [Loader] adds user
//! files and single-key overrides on top and deserializes the result into [RadarConfig].

use super::diagnostics::Severity;
use super::rules::RuleId;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/radar.default.toml");

/// Top-level configuration consumed by the linter
#[derive(Debug, Clone, Deserialize)]
pub struct RadarConfig {
    pub rules: RulesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RulesConfig {
    pub no_identical_conditions: RuleConfig,
    pub no_inverted_boolean_check: RuleConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RuleConfig {
    pub enabled: bool,
    pub severity: Severity,
}

impl RulesConfig {
    pub fn get(&self, rule: RuleId) -> &RuleConfig {
        match rule {
            RuleId::NoIdenticalConditions => &self.no_identical_conditions,
            RuleId::NoInvertedBooleanCheck => &self.no_inverted_boolean_check,
        }
    }
}

impl RadarConfig {
    /// Severity of `rule`, or `None` when it is disabled
    pub fn severity(&self, rule: RuleId) -> Option<Severity> {
        let rule = self.rules.get(rule);
        rule.enabled.then_some(rule.severity)
    }
}

/// Builds a [RadarConfig] from the embedded defaults plus any number of TOML layers.
/// Later layers win key by key, so a file that only sets one rule's severity keeps
/// every other default.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Add `path` as a layer; building fails if it does not exist
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), true)
    }

    /// Add `path` as a layer if it exists (the CLI's `.radar.toml`)
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), false)
    }

    fn layer(mut self, path: &Path, required: bool) -> Self {
        let source = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Override one dotted key, e.g. `rules.no_identical_conditions.enabled`
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<RadarConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration with no user layers
pub fn load_defaults() -> Result<RadarConfig, ConfigError> {
    Loader::new().build()
}
