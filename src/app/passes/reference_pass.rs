use crate::core::pass_sequence::{ContextualPass, PassContext};
use crate::core::resolver::{NamingIndex, ResolveMode};
use crate::core::{ConfigProvider, Workspace};
use crate::domain::model::{ArtifactKind, FileOutcome, RewriteResult, SourceFile};
use crate::utils::error::Result;
use std::collections::HashSet;

/// Pass 3: rebuild the naming index over the ported corpus, then repair
/// cross-reference drift in every Controller and AggregationModule file so
/// imports and constructor injections agree with what the sibling files
/// actually export.
pub struct ReferencePass<W: Workspace, C: ConfigProvider> {
    workspace: W,
    config: C,
}

impl<W: Workspace, C: ConfigProvider> ReferencePass<W, C> {
    pub fn new(workspace: W, config: C) -> Self {
        Self { workspace, config }
    }
}

#[async_trait::async_trait]
impl<W: Workspace, C: ConfigProvider> ContextualPass for ReferencePass<W, C> {
    async fn scan_with_context(&self, context: &PassContext) -> Result<Vec<SourceFile>> {
        scan_target_corpus(&self.workspace, &self.config, context).await
    }

    async fn rewrite_with_context(
        &self,
        files: Vec<SourceFile>,
        _context: &PassContext,
    ) -> Result<RewriteResult> {
        resolve_corpus(files, self.config.source_ext(), ResolveMode::Strict)
    }

    async fn commit_with_context(
        &self,
        result: RewriteResult,
        _context: &PassContext,
    ) -> Result<String> {
        commit_changed(&self.workspace, &self.config, result).await
    }

    fn get_name(&self) -> &str {
        "references"
    }
}

/// Loads every corpus file under the target root, preferring the previous
/// pass's snapshot over a disk read when one is available.
pub(crate) async fn scan_target_corpus<W: Workspace, C: ConfigProvider>(
    workspace: &W,
    config: &C,
    context: &PassContext,
) -> Result<Vec<SourceFile>> {
    let ext = config.source_ext();
    let suffixes: Vec<String> = ArtifactKind::ALL
        .iter()
        .map(|kind| kind.file_suffix(ext))
        .collect();

    let paths = workspace
        .list_files(config.target_root(), &suffixes, config.exclude_globs())
        .await?;

    let snapshot = context.latest_snapshot();
    let mut files = Vec::new();

    for path in paths {
        let Some(kind) = ArtifactKind::from_path(&path, ext) else {
            continue;
        };

        let key = path.to_string_lossy().to_string();
        let content = match snapshot.and_then(|s| s.get(&key)) {
            Some(cached) => cached.to_string(),
            None => workspace.read_file(&path).await?,
        };

        files.push(SourceFile {
            path,
            content,
            kind,
        });
    }

    Ok(files)
}

/// Builds the naming index from scratch over `files`, then resolves references
/// in every consumer (Controller / AggregationModule) file. Service files pass
/// through untouched — they are declaration sources, not consumers.
pub(crate) fn resolve_corpus(
    files: Vec<SourceFile>,
    source_ext: &str,
    mode: ResolveMode,
) -> Result<RewriteResult> {
    let index = NamingIndex::build(&files, source_ext)?;
    let mut result = RewriteResult::empty();

    for file in files {
        match file.kind {
            ArtifactKind::Controller | ArtifactKind::AggregationModule => {
                let (content, fixes) = index.resolve_references(&file.content, mode)?;
                result.outcomes.push(FileOutcome {
                    path: file.path.to_string_lossy().to_string(),
                    changed: content != file.content,
                    rules_hit: fixes,
                });
                result.files.push(SourceFile {
                    path: file.path,
                    content,
                    kind: file.kind,
                });
            }
            ArtifactKind::Service => {
                result.files.push(file);
            }
        }
    }

    Ok(result)
}

pub(crate) async fn commit_changed<W: Workspace, C: ConfigProvider>(
    workspace: &W,
    config: &C,
    result: RewriteResult,
) -> Result<String> {
    let changed: HashSet<&str> = result
        .outcomes
        .iter()
        .filter(|o| o.changed)
        .map(|o| o.path.as_str())
        .collect();

    for file in &result.files {
        let path_display = file.path.to_string_lossy().to_string();
        if changed.contains(path_display.as_str()) {
            workspace.write_file(&file.path, &file.content).await?;
        }
    }

    Ok(config.target_root().to_string())
}
