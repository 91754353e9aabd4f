use crate::core::ConfigProvider;
use crate::domain::model::ModuleMapping;
use crate::utils::error::{MigrateError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_REPORT_FILENAME: &str = "migration-report.csv";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub migration: MigrationMeta,
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub modules: Vec<ModuleMapping>,
    pub report: Option<ReportConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationMeta {
    pub name: String,
    pub description: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    pub target_root: String,
    pub legacy_root: String,
    pub source_ext: Option<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub csv_filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: TomlConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring
            .as_ref()
            .map(|m| m.enabled)
            .unwrap_or(false)
    }

    pub fn report_filename(&self) -> String {
        self.report
            .as_ref()
            .and_then(|r| r.csv_filename.clone())
            .unwrap_or_else(|| DEFAULT_REPORT_FILENAME.to_string())
    }
}

impl ConfigProvider for TomlConfig {
    fn target_root(&self) -> &str {
        &self.corpus.target_root
    }

    fn legacy_root(&self) -> &str {
        &self.corpus.legacy_root
    }

    fn source_ext(&self) -> &str {
        self.corpus.source_ext.as_deref().unwrap_or("ts")
    }

    fn exclude_globs(&self) -> &[String] {
        &self.corpus.exclude
    }

    fn module_map(&self) -> Vec<ModuleMapping> {
        if self.modules.is_empty() {
            crate::config::default_module_map()
        } else {
            self.modules.clone()
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("migration.name", &self.migration.name)?;
        validation::validate_path("corpus.target_root", &self.corpus.target_root)?;
        validation::validate_path("corpus.legacy_root", &self.corpus.legacy_root)?;
        validation::validate_source_extension("corpus.source_ext", self.source_ext())?;
        validation::validate_exclude_globs("corpus.exclude", &self.corpus.exclude)?;

        for mapping in &self.modules {
            validation::validate_module_ident("modules.legacy", &mapping.legacy)?;
            validation::validate_module_ident("modules.target", &mapping.target)?;
        }

        if self.corpus.target_root == self.corpus.legacy_root {
            return Err(MigrateError::ConfigError {
                message: "target_root and legacy_root must differ; the port pass would overwrite its own input".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[migration]
name = "clinic-migrate"
description = "Port the clinic backend"
version = "1.0"

[corpus]
target_root = "./src/modules"
legacy_root = "./legacy/src"
exclude = ["**/fixtures/**"]

[[modules]]
legacy = "customers"
target = "clients"

[monitoring]
enabled = true
"#;

    #[test]
    fn test_parse_and_validate_sample() {
        let config: TomlConfig = toml::from_str(SAMPLE).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.source_ext(), "ts");
        assert!(config.monitoring_enabled());
        assert_eq!(config.report_filename(), DEFAULT_REPORT_FILENAME);

        let modules = config.module_map();
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].target, "clients");
    }

    #[test]
    fn test_same_roots_rejected() {
        let mut config: TomlConfig = toml::from_str(SAMPLE).unwrap();
        config.corpus.legacy_root = config.corpus.target_root.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_module_table_falls_back_to_default() {
        let mut config: TomlConfig = toml::from_str(SAMPLE).unwrap();
        config.modules.clear();
        assert_eq!(config.module_map().len(), crate::config::DEFAULT_MODULE_MAP.len());
    }
}
