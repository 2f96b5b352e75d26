//! Severity configuration: `ValidatorSettings`/`FormatterSettings` and
//! their on-disk `.dockerlintrc.toml` representation.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::diagnostics::Severity;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

fn warning() -> Severity {
    Severity::Warning
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ValidatorSettings {
    #[serde(rename = "deprecatedMaintainer")]
    pub deprecated_maintainer: Severity,
    #[serde(rename = "directiveCasing")]
    pub directive_casing: Severity,
    #[serde(rename = "emptyContinuationLine")]
    pub empty_continuation_line: Severity,
    #[serde(rename = "instructionCasing")]
    pub instruction_casing: Severity,
    #[serde(rename = "instructionCmdMultiple")]
    pub instruction_cmd_multiple: Severity,
    #[serde(rename = "instructionEntrypointMultiple")]
    pub instruction_entrypoint_multiple: Severity,
    #[serde(rename = "instructionHealthcheckMultiple")]
    pub instruction_healthcheck_multiple: Severity,
    #[serde(rename = "instructionJSONInSingleQuotes")]
    pub instruction_json_in_single_quotes: Severity,
    #[serde(rename = "instructionWorkdirRelative")]
    pub instruction_workdir_relative: Severity,
}

impl Default for ValidatorSettings {
    fn default() -> Self {
        Self {
            deprecated_maintainer: warning(),
            directive_casing: warning(),
            empty_continuation_line: warning(),
            instruction_casing: warning(),
            instruction_cmd_multiple: warning(),
            instruction_entrypoint_multiple: warning(),
            instruction_healthcheck_multiple: warning(),
            instruction_json_in_single_quotes: warning(),
            instruction_workdir_relative: warning(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FormatterSettings {
    pub insert_spaces: bool,
    pub tab_size: u32,
    pub ignore_multiline_instructions: bool,
}

impl Default for FormatterSettings {
    fn default() -> Self {
        Self {
            insert_spaces: false,
            tab_size: 4,
            ignore_multiline_instructions: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub validator: ValidatorSettings,
    pub formatter: FormatterSettings,
}

impl Config {
    pub fn load(config_path: Option<&Path>, project_root: &Path) -> Result<Self, ConfigError> {
        let path = config_path.map(Path::to_path_buf).or_else(|| {
            let default = project_root.join(".dockerlintrc.toml");
            default.exists().then_some(default)
        });

        match path {
            Some(path) => {
                let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                    path: path.display().to_string(),
                    source,
                })?;
                Ok(toml::from_str(&content)?)
            }
            None => Ok(Config::default()),
        }
    }

    pub const fn default_toml() -> &'static str {
        r#"# dockerlint configuration

[validator]
# Severity for each rule: "ignore", "warning", or "error".
deprecatedMaintainer = "warning"
directiveCasing = "warning"
emptyContinuationLine = "warning"
instructionCasing = "warning"
instructionCmdMultiple = "warning"
instructionEntrypointMultiple = "warning"
instructionHealthcheckMultiple = "warning"
instructionJSONInSingleQuotes = "warning"
instructionWorkdirRelative = "warning"

[formatter]
insertSpaces = false
tabSize = 4
ignoreMultilineInstructions = false
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.validator.deprecated_maintainer, Severity::Warning);
        assert!(!config.formatter.insert_spaces);
        assert_eq!(config.formatter.tab_size, 4);
        assert!(!config.formatter.ignore_multiline_instructions);
    }

    #[test]
    fn test_parse_toml_overrides() {
        let toml_str = r#"
[validator]
instructionCasing = "error"

[formatter]
tabSize = 2
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.validator.instruction_casing, Severity::Error);
        assert_eq!(config.validator.deprecated_maintainer, Severity::Warning);
        assert_eq!(config.formatter.tab_size, 2);
    }

    #[test]
    fn test_config_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".dockerlintrc.toml");
        std::fs::write(&path, "invalid toml [[[").unwrap();

        let result = Config::load(Some(&path), dir.path());
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_config_load_nonexistent_file() {
        let result = Config::load(
            Some(Path::new("/nonexistent/config.toml")),
            Path::new("/tmp"),
        );
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_config_load_no_config_uses_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(None, dir.path()).unwrap();
        assert_eq!(config.validator.directive_casing, Severity::Warning);
    }

    #[test]
    fn test_ignore_severity_accepted() {
        let toml_str = r#"
[validator]
emptyContinuationLine = "ignore"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.validator.empty_continuation_line, Severity::Ignore);
    }

    #[test]
    fn test_default_toml_template_is_parseable() {
        let config: Config = toml::from_str(Config::default_toml()).unwrap();
        assert_eq!(config.validator.instruction_casing, Severity::Warning);
    }
}
