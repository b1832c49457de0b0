//! Serde model of the test host's configuration.
//!
//! Keys follow the host's camelCase convention:
//!
//! ```yaml
//! basePath: "."
//! autoWatch: false
//! reporters: [progress, coverage, coveralls]
//! coverageReporter:
//!   dir: coverage
//!   reporters:
//!     - type: lcov
//!       dir: coverage/
//! coverallsReporter:
//!   repoToken: "abc123"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The host configuration consumed by the reporter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostConfig {
    /// Ordered list of reporter identifiers.
    #[serde(default)]
    pub reporters: Vec<String>,

    /// Directory that relative coverage dirs are resolved against.
    #[serde(default)]
    pub base_path: Option<String>,

    /// Continuous re-run mode; uploading is meaningless there.
    #[serde(default)]
    pub auto_watch: bool,

    #[serde(default)]
    pub coverage_reporter: Option<CoverageReporterSettings>,

    #[serde(default)]
    pub coverage_istanbul_reporter: Option<IstanbulReporterSettings>,

    #[serde(default)]
    pub coveralls_reporter: Option<CoverallsReporterSettings>,
}

/// `coverageReporter` settings: either a single `{type, dir}` descriptor or a
/// list of them under `reporters`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageReporterSettings {
    #[serde(rename = "type", default)]
    pub report_type: Option<String>,

    #[serde(default)]
    pub dir: Option<String>,

    #[serde(default)]
    pub reporters: Vec<SubReporter>,
}

/// One `{type, dir}` coverage sub-reporter descriptor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubReporter {
    #[serde(rename = "type", default)]
    pub report_type: Option<String>,

    #[serde(default)]
    pub dir: Option<String>,
}

/// `coverageIstanbulReporter` settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IstanbulReporterSettings {
    #[serde(default)]
    pub dir: Option<String>,

    /// Report kinds (`html`, `lcovonly`, `text-summary`, ...).
    #[serde(default)]
    pub reports: Vec<String>,
}

/// `coverallsReporter` settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverallsReporterSettings {
    #[serde(default)]
    pub repo_token: Option<String>,
}

impl HostConfig {
    /// Parse a host configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Invalid JSON: {}", e))
    }

    /// Parse a host configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        serde_yaml::from_str(yaml).map_err(|e| format!("Invalid YAML: {}", e))
    }

    /// Load a host configuration file. `.json` files are parsed as JSON,
    /// everything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let parsed = if is_json {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        };

        parsed.map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Position of a reporter identifier in the `reporters` list.
    pub fn reporter_index(&self, id: &str) -> Option<usize> {
        self.reporters.iter().position(|r| r == id)
    }

    /// The `{type, dir}` descriptors carried by `coverageReporter`.
    ///
    /// A non-empty `reporters` list wins; otherwise the section itself is the
    /// only descriptor. Empty when the section is absent.
    pub fn coverage_sub_reporters(&self) -> Vec<SubReporter> {
        match &self.coverage_reporter {
            Some(settings) if !settings.reporters.is_empty() => settings.reporters.clone(),
            Some(settings) => vec![SubReporter {
                report_type: settings.report_type.clone(),
                dir: settings.dir.clone(),
            }],
            None => Vec::new(),
        }
    }

    /// The configured repo token, if any.
    pub fn repo_token(&self) -> Option<&str> {
        self.coveralls_reporter
            .as_ref()
            .and_then(|c| c.repo_token.as_deref())
            .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_host_config() {
        let yaml = r#"
basePath: "/project"
reporters: [progress, coverage, coveralls]
coverageReporter:
  dir: coverage
  reporters:
    - type: lcov
      dir: reports/
    - type: text-summary
coverallsReporter:
  repoToken: "abc123"
"#;
        let config = HostConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.base_path.as_deref(), Some("/project"));
        assert_eq!(config.reporter_index("coverage"), Some(1));
        assert!(!config.auto_watch);

        let subs = config.coverage_sub_reporters();
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].report_type.as_deref(), Some("lcov"));
        assert_eq!(subs[0].dir.as_deref(), Some("reports/"));
        assert!(subs[1].dir.is_none());
        assert_eq!(config.repo_token(), Some("abc123"));
    }

    #[test]
    fn test_single_descriptor_when_no_sub_reporters() {
        let config = HostConfig::from_json(
            r#"{"reporters":["coverage","coveralls"],"coverageReporter":{"type":"lcovonly","dir":"out"}}"#,
        )
        .unwrap();
        let subs = config.coverage_sub_reporters();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].report_type.as_deref(), Some("lcovonly"));
        assert_eq!(subs[0].dir.as_deref(), Some("out"));
    }

    #[test]
    fn test_empty_repo_token_is_ignored() {
        let config =
            HostConfig::from_json(r#"{"coverallsReporter":{"repoToken":""}}"#).unwrap();
        assert_eq!(config.repo_token(), None);
    }

    #[test]
    fn test_from_file_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("karma.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = HostConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
