//! Configuration management and loading for visitrank.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use visitrank_logging::LoggingConfig;
use visitrank_normalize::DEFAULT_DATE_FORMATS;
use visitrank_parse::{ColumnLayout, DEFAULT_DELIMITER, MalformedRowPolicy};
use visitrank_render::OutputFormat;

/// Default file name written by `init-config`.
pub const DEFAULT_CONFIG_FILE: &str = "visitrank.yaml";

/// Configuration format types supported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    Json,
    #[default]
    Yaml,
}

impl ConfigFormat {
    /// Format implied by a path's extension. Anything but `.json` is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Yaml,
        }
    }
}

/// Invalid settings, reported before any input is read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("top_n must be at least 1")]
    ZeroTopN,
    #[error("workers must be at least 1")]
    ZeroWorkers,
    #[error("num_shards must be at least 1")]
    ZeroShards,
    #[error("date_formats must name at least one format")]
    NoDateFormats,
    #[error("date format #{index} is empty")]
    EmptyDateFormat { index: usize },
    #[error("delimiter {0:?} cannot be a line break")]
    BadDelimiter(char),
    #[error("department and date columns are both {0}")]
    SameColumn(usize),
    #[error("min_departments ({min_departments}) exceeds top_n ({top_n}); no day could ever be emitted")]
    MinAboveTopN { min_departments: usize, top_n: usize },
}

/// Main visitrank configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitrankConfig {
    /// Visit log to read; `-` is stdin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,

    /// Output prefix; shards are named `<output>-SSSSS-of-NNNNN`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    #[serde(default = "default_header_lines")]
    pub skip_header_lines: usize,

    #[serde(default)]
    pub columns: ColumnLayout,

    /// Tried in order, first match wins
    #[serde(default = "default_date_formats")]
    pub date_formats: Vec<String>,

    #[serde(default = "default_three")]
    pub top_n: usize,

    #[serde(default = "default_three")]
    pub min_departments: usize,

    #[serde(default)]
    pub on_malformed: MalformedRowPolicy,

    #[serde(default)]
    pub output_format: OutputFormat,

    #[serde(default = "default_one")]
    pub num_shards: usize,

    /// Overrides the format's conventional suffix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shard_suffix: Option<String>,

    #[serde(default = "default_one")]
    pub workers: usize,

    /// Write `stats.json` next to the output
    #[serde(default)]
    pub write_stats: bool,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_delimiter() -> char {
    DEFAULT_DELIMITER
}

fn default_header_lines() -> usize {
    1
}

fn default_date_formats() -> Vec<String> {
    DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect()
}

fn default_three() -> usize {
    3
}

fn default_one() -> usize {
    1
}

impl Default for VisitrankConfig {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            delimiter: default_delimiter(),
            skip_header_lines: default_header_lines(),
            columns: ColumnLayout::default(),
            date_formats: default_date_formats(),
            top_n: default_three(),
            min_departments: default_three(),
            on_malformed: MalformedRowPolicy::default(),
            output_format: OutputFormat::default(),
            num_shards: default_one(),
            shard_suffix: None,
            workers: default_one(),
            write_stats: false,
            logging: LoggingConfig::default(),
        }
    }
}

impl VisitrankConfig {
    /// Check every setting that would otherwise fail mid-run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_n == 0 {
            return Err(ConfigError::ZeroTopN);
        }
        if self.min_departments > self.top_n {
            return Err(ConfigError::MinAboveTopN {
                min_departments: self.min_departments,
                top_n: self.top_n,
            });
        }
        if self.workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if self.num_shards == 0 {
            return Err(ConfigError::ZeroShards);
        }
        if self.date_formats.is_empty() {
            return Err(ConfigError::NoDateFormats);
        }
        if let Some(index) = self.date_formats.iter().position(|f| f.trim().is_empty()) {
            return Err(ConfigError::EmptyDateFormat { index });
        }
        if matches!(self.delimiter, '\n' | '\r') {
            return Err(ConfigError::BadDelimiter(self.delimiter));
        }
        if self.columns.department == self.columns.date {
            return Err(ConfigError::SameColumn(self.columns.date));
        }
        Ok(())
    }

    /// Suffix appended to shard file names.
    pub fn effective_shard_suffix(&self) -> &str {
        self.shard_suffix
            .as_deref()
            .unwrap_or_else(|| self.output_format.default_suffix())
    }

    /// Path of the stats file for the configured output prefix.
    pub fn stats_path(&self) -> Option<PathBuf> {
        let output = self.output.as_ref()?;
        let parent = output.parent().filter(|p| !p.as_os_str().is_empty());
        Some(match parent {
            Some(dir) => dir.join("stats.json"),
            None => PathBuf::from("stats.json"),
        })
    }
}

/// Parse configuration text in the given format.
pub fn parse_config(contents: &str, format: ConfigFormat) -> anyhow::Result<VisitrankConfig> {
    match format {
        ConfigFormat::Json => serde_json::from_str(contents).context("parse JSON config"),
        ConfigFormat::Yaml => serde_yaml::from_str(contents).context("parse YAML config"),
    }
}

/// Load configuration from a file
pub fn load_config<P: AsRef<Path>>(path: P) -> anyhow::Result<VisitrankConfig> {
    let path = path.as_ref();
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("read config {path:?}"))?;
    parse_config(&contents, ConfigFormat::from_path(path))
        .with_context(|| format!("load config {path:?}"))
}

/// Save configuration to a file
pub fn save_config<P: AsRef<Path>>(config: &VisitrankConfig, path: P) -> anyhow::Result<()> {
    let path = path.as_ref();
    let contents = match ConfigFormat::from_path(path) {
        ConfigFormat::Json => {
            serde_json::to_string_pretty(config).context("serialize JSON config")?
        }
        ConfigFormat::Yaml => serde_yaml::to_string(config).context("serialize YAML config")?,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("create {parent:?}"))?;
    }
    std::fs::write(path, contents).with_context(|| format!("write config {path:?}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = VisitrankConfig::default();
        assert_eq!(config.delimiter, ',');
        assert_eq!(config.skip_header_lines, 1);
        assert_eq!(config.columns, ColumnLayout { department: 3, date: 4 });
        assert_eq!(config.date_formats, vec!["%d-%m-%Y", "%d/%m/%Y"]);
        assert_eq!(config.top_n, 3);
        assert_eq!(config.min_departments, 3);
        assert_eq!(config.on_malformed, MalformedRowPolicy::Fail);
        assert_eq!(config.output_format, OutputFormat::Tuple);
        assert_eq!(config.num_shards, 1);
        assert_eq!(config.workers, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("a.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("a.JSON")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("a.yml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.conf")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("noext")), ConfigFormat::Yaml);
    }

    #[test]
    fn validate_rejects_zero_knobs() {
        let base = VisitrankConfig::default();

        let c = VisitrankConfig { top_n: 0, ..base.clone() };
        assert_eq!(c.validate(), Err(ConfigError::ZeroTopN));

        let c = VisitrankConfig { workers: 0, ..base.clone() };
        assert_eq!(c.validate(), Err(ConfigError::ZeroWorkers));

        let c = VisitrankConfig { num_shards: 0, ..base.clone() };
        assert_eq!(c.validate(), Err(ConfigError::ZeroShards));

        let c = VisitrankConfig { date_formats: vec![], ..base.clone() };
        assert_eq!(c.validate(), Err(ConfigError::NoDateFormats));

        let c = VisitrankConfig {
            date_formats: vec!["%d-%m-%Y".into(), " ".into()],
            ..base.clone()
        };
        assert_eq!(c.validate(), Err(ConfigError::EmptyDateFormat { index: 1 }));

        let c = VisitrankConfig { delimiter: '\n', ..base.clone() };
        assert_eq!(c.validate(), Err(ConfigError::BadDelimiter('\n')));

        let c = VisitrankConfig {
            columns: ColumnLayout { department: 2, date: 2 },
            ..base
        };
        assert_eq!(c.validate(), Err(ConfigError::SameColumn(2)));
    }

    #[test]
    fn min_departments_above_top_n_is_rejected() {
        let c = VisitrankConfig { top_n: 2, ..VisitrankConfig::default() };
        assert_eq!(
            c.validate(),
            Err(ConfigError::MinAboveTopN { min_departments: 3, top_n: 2 })
        );

        let c = VisitrankConfig { top_n: 2, min_departments: 2, ..VisitrankConfig::default() };
        assert!(c.validate().is_ok());
    }

    #[test]
    fn min_departments_zero_is_allowed() {
        let c = VisitrankConfig { min_departments: 0, ..VisitrankConfig::default() };
        assert!(c.validate().is_ok());
    }

    #[test]
    fn shard_suffix_follows_format_unless_set() {
        let mut c = VisitrankConfig {
            output_format: OutputFormat::Jsonl,
            ..VisitrankConfig::default()
        };
        assert_eq!(c.effective_shard_suffix(), ".jsonl");
        c.shard_suffix = Some(".txt".into());
        assert_eq!(c.effective_shard_suffix(), ".txt");
    }

    #[test]
    fn stats_path_sits_next_to_output() {
        let mut c = VisitrankConfig::default();
        assert_eq!(c.stats_path(), None);
        c.output = Some(PathBuf::from("out/top"));
        assert_eq!(c.stats_path(), Some(PathBuf::from("out/stats.json")));
        c.output = Some(PathBuf::from("top"));
        assert_eq!(c.stats_path(), Some(PathBuf::from("stats.json")));
    }

    #[test]
    fn partial_yaml_uses_defaults() {
        let yaml = "top_n: 5\non_malformed: skip\ncolumns:\n  date: 7\n";
        let config = parse_config(yaml, ConfigFormat::Yaml).unwrap();
        assert_eq!(config.top_n, 5);
        assert_eq!(config.on_malformed, MalformedRowPolicy::Skip);
        assert_eq!(config.columns, ColumnLayout { department: 3, date: 7 });
        assert_eq!(config.min_departments, 3);
        assert_eq!(config.delimiter, ',');
    }

    #[test]
    fn unknown_enum_value_is_an_error() {
        assert!(parse_config("output_format: xml\n", ConfigFormat::Yaml).is_err());
        assert!(parse_config(r#"{"on_malformed":"ignore"}"#, ConfigFormat::Json).is_err());
    }
}
