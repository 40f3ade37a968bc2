//! Semantic checks on a parsed config, reported as warnings.
use std::fmt;

use super::Config;
use super::tools::ToolsConfig;
use super::{AutoclickConfig, GenerateConfig, ToggleConfig};

/// Shortest interval that does not flood the input device.
const AUTOCLICK_MIN_INTERVAL_MS: u64 = 10;

/// Number of character classes a generated password should cover.
const PASSWORD_CLASSES: usize = 4;

/// A validation warning detected during configuration loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The configuration section (e.g., "tools", "toggle").
    pub section: String,
    /// The specific item that triggered the warning.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    /// Create a new validation warning.
    #[must_use]
    pub fn new(
        section: impl Into<String>,
        item: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            section: section.into(),
            item: item.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config [{}] {}: {}", self.section, self.item, self.message)
    }
}

/// Trait for configuration validators.
///
/// Implementations check one section for values that parse but will not
/// behave as the user expects.
pub trait ConfigValidator {
    /// Validate the section and return any warnings found.
    fn validate(&self) -> Vec<ValidationWarning>;

    /// Section name (e.g., "tools", "generate").
    fn name(&self) -> &'static str;
}

/// Validator for tool candidate overrides.
#[derive(Debug)]
pub struct ToolsValidator<'a> {
    tools: &'a ToolsConfig,
}

impl<'a> ToolsValidator<'a> {
    /// Create a validator.
    #[must_use]
    pub const fn new(tools: &'a ToolsConfig) -> Self {
        Self { tools }
    }
}

impl ConfigValidator for ToolsValidator<'_> {
    fn validate(&self) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        for (kind, candidates) in self.tools.entries() {
            if candidates.iter().any(|c| c.trim().is_empty()) {
                warnings.push(ValidationWarning::new(
                    self.name(),
                    kind.to_string(),
                    "contains an empty command",
                ));
            }
        }
        warnings
    }

    fn name(&self) -> &'static str {
        "tools"
    }
}

/// Validator for password generation settings.
#[derive(Debug)]
pub struct GenerateValidator<'a> {
    generate: &'a GenerateConfig,
}

impl<'a> GenerateValidator<'a> {
    /// Create a validator.
    #[must_use]
    pub const fn new(generate: &'a GenerateConfig) -> Self {
        Self { generate }
    }
}

impl ConfigValidator for GenerateValidator<'_> {
    fn validate(&self) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let length = self.generate.length;
        if length == 0 {
            warnings.push(ValidationWarning::new(
                self.name(),
                "length",
                "length is 0, generated passwords will be empty",
            ));
        } else if length < PASSWORD_CLASSES {
            warnings.push(ValidationWarning::new(
                self.name(),
                "length",
                format!("length {length} is too short to include every character class"),
            ));
        }
        warnings
    }

    fn name(&self) -> &'static str {
        "generate"
    }
}

/// Validator for user-defined toggle daemons.
#[derive(Debug)]
pub struct ToggleValidator<'a> {
    toggles: &'a std::collections::BTreeMap<String, ToggleConfig>,
}

impl<'a> ToggleValidator<'a> {
    /// Create a validator.
    #[must_use]
    pub const fn new(toggles: &'a std::collections::BTreeMap<String, ToggleConfig>) -> Self {
        Self { toggles }
    }
}

impl ConfigValidator for ToggleValidator<'_> {
    fn validate(&self) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        for (name, toggle) in self.toggles {
            if toggle.command.first().is_none_or(|p| p.trim().is_empty()) {
                warnings.push(ValidationWarning::new(self.name(), name, "command is empty"));
            }
            if name.contains('/') {
                warnings.push(ValidationWarning::new(
                    self.name(),
                    name,
                    "name must not contain '/'",
                ));
            }
        }
        warnings
    }

    fn name(&self) -> &'static str {
        "toggle"
    }
}

/// Validator for the auto-clicker.
#[derive(Debug)]
pub struct AutoclickValidator<'a> {
    autoclick: &'a AutoclickConfig,
}

impl<'a> AutoclickValidator<'a> {
    /// Create a validator.
    #[must_use]
    pub const fn new(autoclick: &'a AutoclickConfig) -> Self {
        Self { autoclick }
    }
}

impl ConfigValidator for AutoclickValidator<'_> {
    fn validate(&self) -> Vec<ValidationWarning> {
        let interval = self.autoclick.interval_ms;
        if interval < AUTOCLICK_MIN_INTERVAL_MS {
            vec![ValidationWarning::new(
                self.name(),
                "interval_ms",
                format!("{interval}ms is below {AUTOCLICK_MIN_INTERVAL_MS}ms"),
            )]
        } else {
            Vec::new()
        }
    }

    fn name(&self) -> &'static str {
        "autoclick"
    }
}

/// Run every validator over `config`.
#[must_use]
pub fn validate(config: &Config) -> Vec<ValidationWarning> {
    let validators: [&dyn ConfigValidator; 4] = [
        &ToolsValidator::new(&config.tools),
        &GenerateValidator::new(&config.generate),
        &ToggleValidator::new(&config.toggle),
        &AutoclickValidator::new(&config.autoclick),
    ];
    validators.iter().flat_map(|v| v.validate()).collect()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_clean() {
        assert!(validate(&Config::default()).is_empty());
    }

    #[test]
    fn tools_validator_detects_blank_candidate() {
        let tools = ToolsConfig {
            clipboard: vec!["wl-copy".to_string(), " ".to_string()],
            ..ToolsConfig::default()
        };
        let warnings = ToolsValidator::new(&tools).validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].item, "clipboard");
    }

    #[test]
    fn generate_validator_flags_short_lengths() {
        let zero = GenerateConfig {
            length: 0,
            symbols: true,
        };
        assert!(GenerateValidator::new(&zero).validate()[0]
            .message
            .contains("empty"));

        let short = GenerateConfig {
            length: 3,
            symbols: true,
        };
        assert_eq!(GenerateValidator::new(&short).validate().len(), 1);
    }

    #[test]
    fn toggle_validator_flags_empty_command_and_bad_name() {
        let mut toggles = std::collections::BTreeMap::new();
        toggles.insert("a/b".to_string(), ToggleConfig { command: Vec::new() });
        let warnings = ToggleValidator::new(&toggles).validate();
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn autoclick_validator_flags_tiny_interval() {
        let cfg = AutoclickConfig {
            interval_ms: 1,
            ..AutoclickConfig::default()
        };
        let warnings = AutoclickValidator::new(&cfg).validate();
        insta::assert_snapshot!(warnings[0].to_string(), @"config [autoclick] interval_ms: 1ms is below 10ms");
    }
}
