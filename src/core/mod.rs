pub mod catalog;
pub mod engine;
pub mod pass_sequence;
pub mod resolver;

pub use crate::domain::model::{
    ArtifactKind, CorpusSnapshot, FileOutcome, ModuleMapping, RewriteResult, SourceFile,
};
pub use crate::domain::ports::{ConfigProvider, Pass, Workspace};
pub use crate::utils::error::Result;
