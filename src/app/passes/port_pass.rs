use crate::app::passes::{legacy_file_path, module_file_path};
use crate::core::catalog::RuleCatalog;
use crate::core::pass_sequence::{ContextualPass, PassContext};
use crate::core::{ConfigProvider, Workspace};
use crate::domain::model::{ArtifactKind, FileOutcome, RewriteResult, SourceFile};
use crate::utils::error::Result;
use std::collections::HashSet;

/// Pass 2: for every target file with a legacy counterpart, run the rule
/// catalog over the legacy content and store the result, overwriting the
/// scaffold. Target files without a legacy counterpart are reported skipped.
/// No file's transformation reads another file's content, so this pass could
/// be parallelized across files; the later drift passes cannot.
pub struct PortPass<W: Workspace, C: ConfigProvider> {
    workspace: W,
    config: C,
    catalog: RuleCatalog,
}

impl<W: Workspace, C: ConfigProvider> PortPass<W, C> {
    pub fn new(workspace: W, config: C, catalog: RuleCatalog) -> Self {
        Self {
            workspace,
            config,
            catalog,
        }
    }
}

#[async_trait::async_trait]
impl<W: Workspace, C: ConfigProvider> ContextualPass for PortPass<W, C> {
    async fn scan_with_context(&self, _context: &PassContext) -> Result<Vec<SourceFile>> {
        let ext = self.config.source_ext();
        let mut files = Vec::new();

        // 以模組表為鍵載入 legacy 內容，掛在 target 路徑上
        for mapping in self.config.module_map() {
            for kind in ArtifactKind::ALL {
                let legacy_path =
                    legacy_file_path(self.config.legacy_root(), &mapping.legacy, kind, ext);
                if !self.workspace.file_exists(&legacy_path).await {
                    continue;
                }

                let content = self.workspace.read_file(&legacy_path).await?;
                files.push(SourceFile {
                    path: module_file_path(self.config.target_root(), &mapping.target, kind, ext),
                    content,
                    kind,
                });
            }
        }

        Ok(files)
    }

    async fn rewrite_with_context(
        &self,
        files: Vec<SourceFile>,
        _context: &PassContext,
    ) -> Result<RewriteResult> {
        let ext = self.config.source_ext();
        let mut result = RewriteResult::empty();

        let ported: HashSet<String> = files
            .iter()
            .map(|f| f.path.to_string_lossy().to_string())
            .collect();

        // 沒有 legacy 對應檔的 target 視為 skipped
        for mapping in self.config.module_map() {
            for kind in ArtifactKind::ALL {
                let target =
                    module_file_path(self.config.target_root(), &mapping.target, kind, ext);
                let target_display = target.to_string_lossy().to_string();
                if !ported.contains(&target_display) {
                    result.skipped.push(target_display);
                }
            }
        }

        for file in files {
            let (content, rules_hit) = self.catalog.apply(&file.content, file.kind);
            let path_display = file.path.to_string_lossy().to_string();

            // 與磁碟現狀比對，讓重跑同一個 pass 可以回報 unchanged
            let changed = if self.workspace.file_exists(&file.path).await {
                self.workspace.read_file(&file.path).await? != content
            } else {
                true
            };

            result.outcomes.push(FileOutcome {
                path: path_display,
                changed,
                rules_hit,
            });
            result.files.push(SourceFile {
                path: file.path,
                content,
                kind: file.kind,
            });
        }

        Ok(result)
    }

    async fn commit_with_context(
        &self,
        result: RewriteResult,
        _context: &PassContext,
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
                self.workspace.write_file(&file.path, &file.content).await?;
            }
        }

        Ok(self.config.target_root().to_string())
    }

    fn get_name(&self) -> &str {
        "port"
    }
}
