use crate::app::passes::reference_pass::{commit_changed, resolve_corpus, scan_target_corpus};
use crate::core::pass_sequence::{ContextualPass, PassContext};
use crate::core::resolver::ResolveMode;
use crate::core::{ConfigProvider, Workspace};
use crate::domain::model::{RewriteResult, SourceFile};
use crate::utils::error::Result;

/// Pass 4: a second, broader drift sweep. Same shape as the reference pass but
/// lenient — case-insensitive root matching, and camelCase value bindings the
/// strict pass deliberately left for this one. Tolerant of partially-fixed
/// output from pass 3.
pub struct SweepPass<W: Workspace, C: ConfigProvider> {
    workspace: W,
    config: C,
}

impl<W: Workspace, C: ConfigProvider> SweepPass<W, C> {
    pub fn new(workspace: W, config: C) -> Self {
        Self { workspace, config }
    }
}

#[async_trait::async_trait]
impl<W: Workspace, C: ConfigProvider> ContextualPass for SweepPass<W, C> {
    async fn scan_with_context(&self, context: &PassContext) -> Result<Vec<SourceFile>> {
        scan_target_corpus(&self.workspace, &self.config, context).await
    }

    async fn rewrite_with_context(
        &self,
        files: Vec<SourceFile>,
        _context: &PassContext,
    ) -> Result<RewriteResult> {
        resolve_corpus(files, self.config.source_ext(), ResolveMode::Lenient)
    }

    async fn commit_with_context(
        &self,
        result: RewriteResult,
        _context: &PassContext,
    ) -> Result<String> {
        commit_changed(&self.workspace, &self.config, result).await
    }

    fn get_name(&self) -> &str {
        "sweep"
    }
}
