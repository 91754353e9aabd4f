use crate::domain::model::{ModuleMapping, RewriteResult, SourceFile};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub trait Workspace: Send + Sync {
    /// Enumerate corpus files under `root` whose names end with one of `suffixes`,
    /// skipping excluded directories. Paths come back relative to the workspace base.
    fn list_files(
        &self,
        root: &str,
        suffixes: &[String],
        exclude: &[String],
    ) -> impl std::future::Future<Output = Result<Vec<PathBuf>>> + Send;

    fn read_file(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;

    /// Full-file replace; parent directories are created as needed.
    fn write_file(
        &self,
        path: &Path,
        content: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    fn file_exists(&self, path: &Path) -> impl std::future::Future<Output = bool> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn target_root(&self) -> &str;
    fn legacy_root(&self) -> &str;
    fn source_ext(&self) -> &str;
    fn exclude_globs(&self) -> &[String];
    fn module_map(&self) -> Vec<ModuleMapping>;
}

/// One migration pass run standalone: discover the corpus, rewrite it, persist
/// the result. The full four-pass sequence uses the context-aware variant in
/// `core::pass_sequence`.
#[async_trait]
pub trait Pass: Send + Sync {
    async fn scan(&self) -> Result<Vec<SourceFile>>;
    async fn rewrite(&self, files: Vec<SourceFile>) -> Result<RewriteResult>;
    async fn commit(&self, result: RewriteResult) -> Result<String>;
}
