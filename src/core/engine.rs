use crate::core::pass_sequence::{ContextualPass, PassContext};
use crate::core::Pass;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use async_trait::async_trait;

/// Runs one pass through the scan → rewrite → commit protocol. The full
/// four-pass migration goes through `PassSequence`; this is the `--pass`
/// entry point.
pub struct MigrateEngine<P: Pass> {
    pass: P,
    monitor: Option<SystemMonitor>,
}

impl<P: Pass> MigrateEngine<P> {
    pub fn new(pass: P) -> Self {
        Self {
            pass,
            monitor: None,
        }
    }

    pub fn new_with_monitoring(pass: P, enabled: bool) -> Self {
        Self {
            pass,
            monitor: enabled.then(|| SystemMonitor::new(enabled)),
        }
    }

    pub async fn run(&self) -> Result<String> {
        println!("Starting migration pass...");

        // Scan
        println!("Scanning corpus...");
        let files = self.pass.scan().await?;
        println!("Discovered {} files", files.len());

        // Rewrite
        println!("Applying rewrites...");
        let result = self.pass.rewrite(files).await?;
        println!(
            "Rewrote {} of {} files",
            result.files_modified(),
            result.files_seen()
        );

        if let Some(monitor) = &self.monitor {
            monitor.record_files(result.files_seen());
        }

        // Commit
        println!("Storing results...");
        let output_root = self.pass.commit(result).await?;
        println!("Output stored under: {}", output_root);

        if let Some(monitor) = &self.monitor {
            monitor.log_final_stats();
        }

        Ok(output_root)
    }
}

/// Adapts a context-aware pass so the engine can run it outside a sequence,
/// against an empty context.
pub struct StandalonePass<T: ContextualPass> {
    inner: T,
    context: PassContext,
}

impl<T: ContextualPass> StandalonePass<T> {
    pub fn new(inner: T, execution_id: String) -> Self {
        Self {
            inner,
            context: PassContext::new(execution_id),
        }
    }
}

#[async_trait]
impl<T: ContextualPass> Pass for StandalonePass<T> {
    async fn scan(&self) -> Result<Vec<crate::domain::model::SourceFile>> {
        self.inner.scan_with_context(&self.context).await
    }

    async fn rewrite(
        &self,
        files: Vec<crate::domain::model::SourceFile>,
    ) -> Result<crate::domain::model::RewriteResult> {
        self.inner.rewrite_with_context(files, &self.context).await
    }

    async fn commit(&self, result: crate::domain::model::RewriteResult) -> Result<String> {
        self.inner.commit_with_context(result, &self.context).await
    }
}
