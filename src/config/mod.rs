pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
use crate::domain::model::ModuleMapping;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

/// Compiled-in legacy → target module-name table. A TOML config can replace it;
/// the CLI runs with this table as-is.
pub const DEFAULT_MODULE_MAP: &[(&str, &str)] = &[
    ("customers", "clients"),
    ("animals", "pets"),
    ("bookings", "appointments"),
    ("visits", "visits"),
    ("invoices", "invoices"),
    ("staff", "staff"),
    ("history", "medical-records"),
];

pub fn default_module_map() -> Vec<ModuleMapping> {
    DEFAULT_MODULE_MAP
        .iter()
        .map(|(legacy, target)| ModuleMapping::new(legacy, target))
        .collect()
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "clinic-migrate")]
#[command(about = "Batch codemod that ports the legacy clinic backend to the Nest-style layout")]
pub struct CliConfig {
    #[arg(long, default_value = "./src/modules")]
    pub target_root: String,

    #[arg(long, default_value = "./legacy/src")]
    pub legacy_root: String,

    #[arg(long, default_value = "ts")]
    pub source_ext: String,

    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Run a single pass instead of the full sequence
    #[arg(long)]
    pub pass: Option<String>,

    /// Archive the target corpus before rewriting anything
    #[arg(long)]
    pub backup: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log process stats per pass")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn target_root(&self) -> &str {
        &self.target_root
    }

    fn legacy_root(&self) -> &str {
        &self.legacy_root
    }

    fn source_ext(&self) -> &str {
        &self.source_ext
    }

    fn exclude_globs(&self) -> &[String] {
        &self.exclude
    }

    fn module_map(&self) -> Vec<ModuleMapping> {
        default_module_map()
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> crate::utils::error::Result<()> {
        validation::validate_path("target_root", &self.target_root)?;
        validation::validate_path("legacy_root", &self.legacy_root)?;
        validation::validate_source_extension("source_ext", &self.source_ext)?;
        validation::validate_exclude_globs("exclude", &self.exclude)?;

        if let Some(pass) = &self.pass {
            validation::validate_pass_name("pass", pass)?;
        }

        for mapping in self.module_map() {
            validation::validate_module_ident("module.legacy", &mapping.legacy)?;
            validation::validate_module_ident("module.target", &mapping.target)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_module_map_idents_are_valid() {
        for mapping in default_module_map() {
            assert!(crate::utils::validation::validate_module_ident("legacy", &mapping.legacy)
                .is_ok());
            assert!(crate::utils::validation::validate_module_ident("target", &mapping.target)
                .is_ok());
        }
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_config_rejects_unknown_pass() {
        let config = CliConfig {
            target_root: "./src/modules".to_string(),
            legacy_root: "./legacy/src".to_string(),
            source_ext: "ts".to_string(),
            exclude: vec![],
            pass: Some("typecheck".to_string()),
            backup: false,
            verbose: false,
            monitor: false,
        };
        assert!(config.validate().is_err());
    }
}
