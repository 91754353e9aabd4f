use crate::domain::model::{CorpusSnapshot, FileOutcome, RewriteResult, SourceFile};
use crate::utils::error::{MigrateError, Result};
use crate::utils::monitor::SystemMonitor;
use std::collections::HashMap;
use std::time::Instant;

/// Pass 執行結果
#[derive(Debug, Clone)]
pub struct PassResult {
    pub pass_name: String,
    pub outcomes: Vec<FileOutcome>,
    pub skipped: Vec<String>,
    pub output_root: String,
    pub duration: std::time::Duration,
    pub metadata: HashMap<String, serde_json::Value>,
}

impl PassResult {
    pub fn files_seen(&self) -> usize {
        self.outcomes.len() + self.skipped.len()
    }

    pub fn files_modified(&self) -> usize {
        self.outcomes.iter().filter(|o| o.changed).count()
    }
}

/// Pass 執行上下文，用於在 pass 間傳遞語料庫快照與結果
#[derive(Debug, Clone, Default)]
pub struct PassContext {
    pub previous_results: Vec<PassResult>,
    pub shared_data: HashMap<String, serde_json::Value>,
    pub execution_id: String,
    snapshots: Vec<(String, CorpusSnapshot)>,
}

impl PassContext {
    pub fn new(execution_id: String) -> Self {
        Self {
            previous_results: Vec::new(),
            shared_data: HashMap::new(),
            execution_id,
            snapshots: Vec::new(),
        }
    }

    /// 獲取上一個 pass 的結果
    pub fn get_previous_result(&self) -> Option<&PassResult> {
        self.previous_results.last()
    }

    /// 獲取指定名稱的 pass 結果
    pub fn get_result_by_name(&self, name: &str) -> Option<&PassResult> {
        self.previous_results.iter().find(|r| r.pass_name == name)
    }

    /// 指定 pass 寫出的語料庫快照
    pub fn get_snapshot(&self, pass_name: &str) -> Option<&CorpusSnapshot> {
        self.snapshots
            .iter()
            .find(|(name, _)| name == pass_name)
            .map(|(_, snapshot)| snapshot)
    }

    /// 最近一個 pass 的快照；scan 階段優先讀它，其次才回磁碟
    pub fn latest_snapshot(&self) -> Option<&CorpusSnapshot> {
        self.snapshots.last().map(|(_, snapshot)| snapshot)
    }

    pub fn add_shared_data(&mut self, key: String, value: serde_json::Value) {
        self.shared_data.insert(key, value);
    }

    pub fn get_shared_data(&self, key: &str) -> Option<&serde_json::Value> {
        self.shared_data.get(key)
    }

    /// 添加結果與對應快照到上下文
    pub fn add_result(&mut self, result: PassResult, snapshot: CorpusSnapshot) {
        self.snapshots.push((result.pass_name.clone(), snapshot));
        self.previous_results.push(result);
    }
}

/// 帶上下文的 pass 介面
#[async_trait::async_trait]
pub trait ContextualPass: Send + Sync {
    async fn scan_with_context(&self, context: &PassContext) -> Result<Vec<SourceFile>>;
    async fn rewrite_with_context(
        &self,
        files: Vec<SourceFile>,
        context: &PassContext,
    ) -> Result<RewriteResult>;
    async fn commit_with_context(
        &self,
        result: RewriteResult,
        context: &PassContext,
    ) -> Result<String>;

    /// 用於標識 pass 名稱
    fn get_name(&self) -> &str;

    /// 根據上下文決定是否執行
    fn should_execute(&self, _context: &PassContext) -> bool {
        true
    }
}

/// Pass 序列，負責按固定順序執行各 migration pass。
/// 前一個 pass 處理完整個語料庫之前，下一個不會開始。
pub struct PassSequence {
    passes: Vec<Box<dyn ContextualPass>>,
    monitor: Option<SystemMonitor>,
    monitor_enabled: bool,
    execution_id: String,
}

impl PassSequence {
    pub fn new(execution_id: String) -> Self {
        Self {
            passes: Vec::new(),
            monitor: None,
            monitor_enabled: false,
            execution_id,
        }
    }

    /// 啟用或禁用系統監控
    pub fn with_monitoring(mut self, enabled: bool) -> Self {
        self.monitor_enabled = enabled;
        if enabled {
            self.monitor = Some(SystemMonitor::new(enabled));
        }
        self
    }

    pub fn add_pass(&mut self, pass: Box<dyn ContextualPass>) {
        self.passes.push(pass);
    }

    /// 執行所有 pass
    pub async fn execute_all(&mut self) -> Result<Vec<PassResult>> {
        let mut results = Vec::new();
        let mut context = PassContext::new(self.execution_id.clone());

        if self.monitor_enabled {
            if let Some(monitor) = &self.monitor {
                monitor.log_stats("Migration started.");
            }
        }

        for pass in &self.passes {
            let start_time = Instant::now();

            if !pass.should_execute(&context) {
                tracing::info!("⏭️ Skipping pass: {} (condition not met)", pass.get_name());
                continue;
            }

            match Self::execute_pass(pass.as_ref(), &context).await {
                Ok(execution) => {
                    let duration = start_time.elapsed();

                    let result = PassResult {
                        pass_name: pass.get_name().to_string(),
                        outcomes: execution.outcomes,
                        skipped: execution.skipped,
                        output_root: execution.output_root,
                        duration,
                        metadata: HashMap::new(),
                    };

                    tracing::info!(
                        "✅ Pass executed: {} (seen: {}, modified: {}, duration: {:?})",
                        result.pass_name,
                        result.files_seen(),
                        result.files_modified(),
                        result.duration
                    );

                    if let Some(monitor) = &self.monitor {
                        monitor.record_files(result.files_seen());
                    }

                    context.add_result(result.clone(), execution.snapshot);
                    results.push(result);
                }
                Err(e) => {
                    tracing::error!("❌ Pass execution failed: {}", e);
                    return Err(MigrateError::PassError {
                        stage: pass.get_name().to_string(),
                        details: format!("Pass execution failed: {}", e),
                    });
                }
            }
        }

        if self.monitor_enabled {
            if let Some(monitor) = &self.monitor {
                monitor.log_stats("Migration completed.");
                if let Some(stats) = monitor.get_stats() {
                    tracing::info!("📊 System metrics during migration: {:?}", stats);
                }
            }
        }

        Ok(results)
    }

    async fn execute_pass(
        pass: &dyn ContextualPass,
        context: &PassContext,
    ) -> Result<PassExecution> {
        // Scan
        let files = pass.scan_with_context(context).await?;
        tracing::debug!("📥 Scanned {} files", files.len());

        // Rewrite
        let result = pass.rewrite_with_context(files, context).await?;
        tracing::debug!("🔄 Rewrote {} of {} files", result.files_modified(), result.files_seen());

        // Commit
        let snapshot = CorpusSnapshot::from_files(&result.files);
        let output_root = pass.commit_with_context(result.clone(), context).await?;
        tracing::debug!("💾 Committed under: {}", output_root);

        Ok(PassExecution {
            outcomes: result.outcomes,
            skipped: result.skipped,
            snapshot,
            output_root,
        })
    }

    /// 獲取執行摘要
    pub fn get_execution_summary(results: &[PassResult]) -> HashMap<String, serde_json::Value> {
        let mut summary = HashMap::new();

        let total_passes = results.len();
        let files_seen: usize = results.iter().map(|r| r.files_seen()).sum();
        let files_modified: usize = results.iter().map(|r| r.files_modified()).sum();
        let total_duration: std::time::Duration = results.iter().map(|r| r.duration).sum();

        summary.insert(
            "total_passes".to_string(),
            serde_json::Value::Number(total_passes.into()),
        );
        summary.insert(
            "files_seen".to_string(),
            serde_json::Value::Number(files_seen.into()),
        );
        summary.insert(
            "files_modified".to_string(),
            serde_json::Value::Number(files_modified.into()),
        );
        summary.insert(
            "total_duration_ms".to_string(),
            serde_json::Value::Number((total_duration.as_millis() as u64).into()),
        );

        let pass_names: Vec<serde_json::Value> = results
            .iter()
            .map(|r| serde_json::Value::String(r.pass_name.clone()))
            .collect();
        summary.insert(
            "executed_passes".to_string(),
            serde_json::Value::Array(pass_names),
        );

        summary
    }
}

/// Pass 執行結果內部結構
struct PassExecution {
    outcomes: Vec<FileOutcome>,
    skipped: Vec<String>,
    snapshot: CorpusSnapshot,
    output_root: String,
}

/// Renders the per-file outcome table. One row per (pass, file); this CSV plus
/// the printed summary are the run's only user-visible outputs besides the
/// rewritten files.
pub struct MigrationReport;

impl MigrationReport {
    pub fn to_csv(results: &[PassResult]) -> Result<String> {
        let mut writer = csv::Writer::from_writer(vec![]);
        writer.write_record(["pass", "path", "status", "rules_hit"])?;

        for result in results {
            for outcome in &result.outcomes {
                let status = if outcome.changed { "modified" } else { "unchanged" };
                let rules_hit = outcome.rules_hit.to_string();
                writer.write_record([
                    result.pass_name.as_str(),
                    outcome.path.as_str(),
                    status,
                    rules_hit.as_str(),
                ])?;
            }
            for path in &result.skipped {
                writer.write_record([result.pass_name.as_str(), path.as_str(), "skipped", "0"])?;
            }
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| MigrateError::ProcessingError {
                message: format!("CSV buffer error: {}", e),
            })?;
        String::from_utf8(bytes).map_err(|e| MigrateError::ProcessingError {
            message: format!("Report is not valid UTF-8: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ArtifactKind;
    use std::path::PathBuf;

    struct MockPass {
        name: String,
        should_execute: bool,
        scan_files: Vec<SourceFile>,
        use_previous_snapshot: bool,
    }

    impl MockPass {
        fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
                should_execute: true,
                scan_files: Vec::new(),
                use_previous_snapshot: false,
            }
        }

        fn with_files(mut self, files: Vec<SourceFile>) -> Self {
            self.scan_files = files;
            self
        }

        fn with_execution_condition(mut self, should_execute: bool) -> Self {
            self.should_execute = should_execute;
            self
        }

        fn with_previous_snapshot(mut self, use_previous: bool) -> Self {
            self.use_previous_snapshot = use_previous;
            self
        }
    }

    #[async_trait::async_trait]
    impl ContextualPass for MockPass {
        async fn scan_with_context(&self, context: &PassContext) -> Result<Vec<SourceFile>> {
            if self.use_previous_snapshot {
                let Some(snapshot) = context.latest_snapshot() else {
                    return Ok(Vec::new());
                };
                Ok(snapshot
                    .paths()
                    .map(|path| SourceFile {
                        path: PathBuf::from(path),
                        content: snapshot.get(path).unwrap_or_default().to_string(),
                        kind: ArtifactKind::Service,
                    })
                    .collect())
            } else {
                Ok(self.scan_files.clone())
            }
        }

        async fn rewrite_with_context(
            &self,
            files: Vec<SourceFile>,
            _context: &PassContext,
        ) -> Result<RewriteResult> {
            let outcomes = files
                .iter()
                .map(|f| FileOutcome {
                    path: f.path.to_string_lossy().to_string(),
                    changed: true,
                    rules_hit: 1,
                })
                .collect();
            Ok(RewriteResult {
                files,
                outcomes,
                skipped: Vec::new(),
            })
        }

        async fn commit_with_context(
            &self,
            _result: RewriteResult,
            _context: &PassContext,
        ) -> Result<String> {
            Ok(format!("/tmp/{}_output", self.name))
        }

        fn get_name(&self) -> &str {
            &self.name
        }

        fn should_execute(&self, _context: &PassContext) -> bool {
            self.should_execute
        }
    }

    fn test_file(path: &str, content: &str) -> SourceFile {
        SourceFile {
            path: PathBuf::from(path),
            content: content.to_string(),
            kind: ArtifactKind::Service,
        }
    }

    #[tokio::test]
    async fn test_pass_context_new() {
        let context = PassContext::new("test_execution".to_string());
        assert_eq!(context.execution_id, "test_execution");
        assert!(context.previous_results.is_empty());
        assert!(context.shared_data.is_empty());
    }

    #[tokio::test]
    async fn test_pass_context_snapshot_round_trip() {
        let mut context = PassContext::new("test".to_string());

        let files = vec![test_file("a.service.ts", "export class AService {}")];
        let snapshot = CorpusSnapshot::from_files(&files);
        let result = PassResult {
            pass_name: "port".to_string(),
            outcomes: Vec::new(),
            skipped: Vec::new(),
            output_root: "/tmp".to_string(),
            duration: std::time::Duration::from_millis(5),
            metadata: HashMap::new(),
        };

        context.add_result(result, snapshot);

        let retrieved = context.get_snapshot("port").unwrap();
        assert_eq!(
            retrieved.get("a.service.ts"),
            Some("export class AService {}")
        );
        assert!(context.get_snapshot("scaffold").is_none());
        assert_eq!(context.latest_snapshot().unwrap().len(), 1);

        assert_eq!(
            context.get_result_by_name("port").unwrap().pass_name,
            "port"
        );
        assert!(context.get_result_by_name("sweep").is_none());
        assert_eq!(context.get_previous_result().unwrap().pass_name, "port");
    }

    #[tokio::test]
    async fn test_pass_context_shared_data() {
        let mut context = PassContext::new("test".to_string());

        context.add_shared_data(
            "legacy_root".to_string(),
            serde_json::Value::String("legacy/src".to_string()),
        );

        assert_eq!(
            context.get_shared_data("legacy_root").unwrap(),
            &serde_json::Value::String("legacy/src".to_string())
        );
        assert!(context.get_shared_data("missing").is_none());
    }

    #[tokio::test]
    async fn test_pass_sequence_execution_order() {
        let mut sequence = PassSequence::new("test_sequence".to_string());

        let files = vec![test_file("pets.service.ts", "export class PetsService {}")];
        sequence.add_pass(Box::new(MockPass::new("scaffold").with_files(files)));
        sequence.add_pass(Box::new(MockPass::new("port").with_previous_snapshot(true)));

        let results = sequence.execute_all().await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].pass_name, "scaffold");
        assert_eq!(results[1].pass_name, "port");
        // 第二個 pass 透過快照看到第一個 pass 的輸出
        assert_eq!(results[1].outcomes.len(), 1);
    }

    #[tokio::test]
    async fn test_pass_sequence_conditional_execution() {
        let mut sequence = PassSequence::new("conditional_test".to_string());

        let files = vec![test_file("a.service.ts", "x")];
        sequence.add_pass(Box::new(MockPass::new("first").with_files(files.clone())));
        sequence.add_pass(Box::new(
            MockPass::new("second").with_execution_condition(false),
        ));
        sequence.add_pass(Box::new(MockPass::new("third").with_files(files)));

        let results = sequence.execute_all().await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].pass_name, "first");
        assert_eq!(results[1].pass_name, "third");
    }

    #[tokio::test]
    async fn test_execution_summary() {
        let results = vec![
            PassResult {
                pass_name: "scaffold".to_string(),
                outcomes: vec![FileOutcome {
                    path: "a.service.ts".to_string(),
                    changed: true,
                    rules_hit: 0,
                }],
                skipped: Vec::new(),
                output_root: "/tmp".to_string(),
                duration: std::time::Duration::from_millis(100),
                metadata: HashMap::new(),
            },
            PassResult {
                pass_name: "port".to_string(),
                outcomes: vec![
                    FileOutcome {
                        path: "a.service.ts".to_string(),
                        changed: true,
                        rules_hit: 4,
                    },
                    FileOutcome {
                        path: "b.service.ts".to_string(),
                        changed: false,
                        rules_hit: 0,
                    },
                ],
                skipped: vec!["c.service.ts".to_string()],
                output_root: "/tmp".to_string(),
                duration: std::time::Duration::from_millis(200),
                metadata: HashMap::new(),
            },
        ];

        let summary = PassSequence::get_execution_summary(&results);

        assert_eq!(
            summary.get("total_passes").unwrap(),
            &serde_json::Value::Number(2.into())
        );
        assert_eq!(
            summary.get("files_seen").unwrap(),
            &serde_json::Value::Number(4.into())
        );
        assert_eq!(
            summary.get("files_modified").unwrap(),
            &serde_json::Value::Number(2.into())
        );
        assert_eq!(
            summary.get("total_duration_ms").unwrap(),
            &serde_json::Value::Number(300.into())
        );

        let executed = summary.get("executed_passes").unwrap().as_array().unwrap();
        assert_eq!(executed.len(), 2);
        assert_eq!(executed[0], serde_json::Value::String("scaffold".to_string()));
    }

    #[test]
    fn test_report_csv_has_one_row_per_outcome() {
        let results = vec![PassResult {
            pass_name: "port".to_string(),
            outcomes: vec![FileOutcome {
                path: "pets/pets.service.ts".to_string(),
                changed: true,
                rules_hit: 5,
            }],
            skipped: vec!["staff/staff.service.ts".to_string()],
            output_root: "/tmp".to_string(),
            duration: std::time::Duration::from_millis(10),
            metadata: HashMap::new(),
        }];

        let csv = MigrationReport::to_csv(&results).unwrap();
        let lines: Vec<&str> = csv.trim_end().lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "pass,path,status,rules_hit");
        assert!(lines[1].contains("modified"));
        assert!(lines[2].contains("skipped"));
    }
}
