//! Configuration loading and management for Export Guardian
//!
//! Architecture: Anti-Corruption Layer - Configuration translates external YAML formats
//! - Raw YAML structures are converted to rule options and severities
//! - Default configurations are embedded in the domain, not infrastructure
//! - Configuration acts as a factory for the rule set and path filters

use crate::domain::violations::{GuardianError, GuardianResult, Severity};
use crate::rules::{
    ExportLimit, ExportLimitOptions, ExportRule, FilenameMatch, FilenameOptions, RuleSet,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration files looked up in the working directory, in order
pub const DEFAULT_CONFIG_FILES: &[&str] =
    &["export_guardian.yaml", "export_guardian.yml", ".export_guardian.yaml"];

/// Per-directory ignore file name used when none is configured
pub const DEFAULT_IGNORE_FILE: &str = ".exportguardianignore";

const SUPPORTED_VERSIONS: &[&str] = &["1.0"];

/// Main configuration structure for Export Guardian
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardianConfig {
    /// Configuration format version
    pub version: String,
    /// Path filtering configuration
    #[serde(default)]
    pub paths: PathConfig,
    /// Rule switches, severities, and options
    #[serde(default)]
    pub rules: RulesConfig,
}

/// Path filtering configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathConfig {
    /// Include/exclude patterns (gitignore-style)
    #[serde(default)]
    pub patterns: Vec<String>,
    /// Per-directory ignore file name; `null` disables ignore files
    #[serde(default = "default_ignore_file")]
    pub ignore_file: Option<String>,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            patterns: vec![
                "**/node_modules/**".to_string(),
                "**/.git/**".to_string(),
                "**/dist/**".to_string(),
                "**/coverage/**".to_string(),
            ],
            ignore_file: default_ignore_file(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulesConfig {
    #[serde(default)]
    pub export_limit: ExportLimitConfig,
    #[serde(default)]
    pub filename_match: FilenameMatchConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportLimitConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_severity")]
    pub severity: Severity,
    #[serde(default)]
    pub options: ExportLimitOptions,
}

impl Default for ExportLimitConfig {
    fn default() -> Self {
        Self { enabled: true, severity: default_severity(), options: ExportLimitOptions::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilenameMatchConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_severity")]
    pub severity: Severity,
    #[serde(default)]
    pub options: FilenameOptions,
}

impl Default for FilenameMatchConfig {
    fn default() -> Self {
        Self { enabled: true, severity: default_severity(), options: FilenameOptions::default() }
    }
}

/// One configured rule as shown by `rules` and `explain`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSummary {
    pub id: &'static str,
    pub description: &'static str,
    pub enabled: bool,
    pub severity: Severity,
    /// Options rendered as compact JSON
    pub options: String,
}

impl GuardianConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> GuardianResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            GuardianError::config(format!("Failed to read config file '{}': {e}", path.display()))
        })?;

        let config: Self = serde_yaml::from_str(&contents).map_err(|e| {
            GuardianError::config(format!("Failed to parse config file '{}': {e}", path.display()))
        })?;

        config.validate()?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load configuration from string content
    pub fn load_from_str(content: &str) -> GuardianResult<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| GuardianError::config(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Load the first default config file present in `dir`, or fall back to the defaults
    pub fn discover<P: AsRef<Path>>(dir: P) -> GuardianResult<Self> {
        let dir = dir.as_ref();
        for name in DEFAULT_CONFIG_FILES {
            let candidate = dir.join(name);
            if candidate.is_file() {
                return Self::load_from_file(candidate);
            }
        }

        tracing::debug!("No configuration file in {}, using defaults", dir.display());
        Ok(Self::with_defaults())
    }

    /// Both rules enabled with their default options
    pub fn with_defaults() -> Self {
        Self {
            version: "1.0".to_string(),
            paths: PathConfig::default(),
            rules: RulesConfig::default(),
        }
    }

    /// Validate the configuration for consistency and correctness
    pub fn validate(&self) -> GuardianResult<()> {
        if !SUPPORTED_VERSIONS.contains(&self.version.as_str()) {
            return Err(GuardianError::config(format!(
                "Unsupported configuration version: {}. Supported versions: {}",
                self.version,
                SUPPORTED_VERSIONS.join(", ")
            )));
        }

        for pattern in &self.paths.patterns {
            let glob = pattern.strip_prefix('!').unwrap_or(pattern);
            if glob.trim().is_empty() {
                return Err(GuardianError::config("Empty path pattern"));
            }
            glob::Pattern::new(glob).map_err(|e| {
                GuardianError::config(format!("Invalid path pattern '{pattern}': {e}"))
            })?;
        }

        if let Some(ignore_file) = &self.paths.ignore_file {
            if ignore_file.is_empty() || ignore_file.contains(['/', '\\']) {
                return Err(GuardianError::config(format!(
                    "Ignore file must be a plain file name, got '{ignore_file}'"
                )));
            }
        }

        Ok(())
    }

    /// Build the enabled rules, in reporting order
    pub fn rule_set(&self) -> RuleSet {
        let mut rules = RuleSet::new();
        if self.rules.export_limit.enabled {
            rules.push(Box::new(ExportLimit::new(self.rules.export_limit.options)));
        }
        if self.rules.filename_match.enabled {
            rules.push(Box::new(FilenameMatch::new(self.rules.filename_match.options)));
        }
        rules
    }

    /// Configured severity for a rule id
    pub fn severity_for(&self, rule_id: &str) -> Option<Severity> {
        match rule_id {
            ExportLimit::ID => Some(self.rules.export_limit.severity),
            FilenameMatch::ID => Some(self.rules.filename_match.severity),
            _ => None,
        }
    }

    /// Every known rule with its configured state, enabled or not
    pub fn rule_summaries(&self) -> Vec<RuleSummary> {
        let limit = &self.rules.export_limit;
        let filename = &self.rules.filename_match;
        vec![
            RuleSummary {
                id: ExportLimit::ID,
                description: ExportLimit::new(limit.options).description(),
                enabled: limit.enabled,
                severity: limit.severity,
                options: serde_json::to_string(&limit.options).unwrap_or_default(),
            },
            RuleSummary {
                id: FilenameMatch::ID,
                description: FilenameMatch::new(filename.options).description(),
                enabled: filename.enabled,
                severity: filename.severity,
                options: serde_json::to_string(&filename.options).unwrap_or_default(),
            },
        ]
    }

    /// Convert to JSON for serialization
    pub fn to_json(&self) -> GuardianResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| GuardianError::config(format!("Failed to serialize config: {e}")))
    }

    /// Stable hash of everything that affects analysis results
    pub fn fingerprint(&self) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();

        self.version.hash(&mut hasher);
        self.paths.patterns.hash(&mut hasher);
        self.paths.ignore_file.hash(&mut hasher);

        let limit = &self.rules.export_limit;
        (ExportLimit::ID, limit.enabled, limit.severity, limit.options).hash(&mut hasher);
        let filename = &self.rules.filename_match;
        (FilenameMatch::ID, filename.enabled, filename.severity, filename.options).hash(&mut hasher);

        format!("{:x}", hasher.finish())
    }
}

impl Default for GuardianConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn default_ignore_file() -> Option<String> {
    Some(DEFAULT_IGNORE_FILE.to_string())
}

fn default_true() -> bool {
    true
}

fn default_severity() -> Severity {
    Severity::Error
}

/// Configuration builder for programmatic construction
pub struct ConfigBuilder {
    config: GuardianConfig,
    unknown_rules: Vec<String>,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self { config: GuardianConfig::default(), unknown_rules: Vec::new() }
    }

    /// Add a path pattern
    pub fn add_path_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.paths.patterns.push(pattern.into());
        self
    }

    /// Set the ignore file name
    pub fn ignore_file(mut self, filename: impl Into<String>) -> Self {
        self.config.paths.ignore_file = Some(filename.into());
        self
    }

    pub fn export_limit(mut self, options: ExportLimitOptions) -> Self {
        self.config.rules.export_limit.options = options;
        self
    }

    pub fn filename_match(mut self, options: FilenameOptions) -> Self {
        self.config.rules.filename_match.options = options;
        self
    }

    /// Turn a rule on or off by id; unknown ids are rejected at `build`
    pub fn enable_rule(mut self, rule_id: &str, enabled: bool) -> Self {
        match rule_id {
            ExportLimit::ID => self.config.rules.export_limit.enabled = enabled,
            FilenameMatch::ID => self.config.rules.filename_match.enabled = enabled,
            other => self.unknown_rules.push(other.to_string()),
        }
        self
    }

    pub fn severity(mut self, rule_id: &str, severity: Severity) -> Self {
        match rule_id {
            ExportLimit::ID => self.config.rules.export_limit.severity = severity,
            FilenameMatch::ID => self.config.rules.filename_match.severity = severity,
            other => self.unknown_rules.push(other.to_string()),
        }
        self
    }

    /// Build the final configuration
    pub fn build(self) -> GuardianResult<GuardianConfig> {
        if !self.unknown_rules.is_empty() {
            return Err(GuardianError::config(format!(
                "Unknown rule id(s): {}",
                self.unknown_rules.join(", ")
            )));
        }
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
