pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::cli::LocalWorkspace;
pub use config::toml_config::TomlConfig;
pub use core::catalog::RuleCatalog;
pub use core::engine::{MigrateEngine, StandalonePass};
pub use core::pass_sequence::{
    ContextualPass, MigrationReport, PassContext, PassResult, PassSequence,
};
pub use core::resolver::{NamingIndex, ResolveMode};
pub use domain::model::{ArtifactKind, SourceFile};
pub use utils::error::{MigrateError, Result};
