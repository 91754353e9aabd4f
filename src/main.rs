use clap::Parser;
use clinic_migrate::app::passes::{PortPass, ReferencePass, ScaffoldPass, SweepPass};
use clinic_migrate::core::{ConfigProvider, Workspace};
use clinic_migrate::utils::{backup, logger, validation::Validate};
use clinic_migrate::{
    ArtifactKind, CliConfig, ContextualPass, LocalWorkspace, MigrateEngine, MigrationReport,
    PassSequence, RuleCatalog, SourceFile, StandalonePass,
};
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting clinic-migrate CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let execution_id = format!("migrate-{}", chrono::Utc::now().format("%Y%m%d-%H%M%S"));
    let workspace = LocalWorkspace::new(".".to_string());

    let catalog = match RuleCatalog::standard() {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!("❌ Rule catalog failed to compile: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(3);
        }
    };

    // 改寫前先備份 target 語料庫
    if config.backup {
        if let Err(e) = run_backup(&workspace, &config, &execution_id).await {
            tracing::error!("❌ Backup failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            std::process::exit(2);
        }
    }

    let outcome = match config.pass.as_deref() {
        Some(pass_name) => {
            run_single_pass(pass_name, &workspace, &config, catalog, &execution_id, monitor_enabled)
                .await
        }
        None => run_full_sequence(&workspace, &config, catalog, &execution_id, monitor_enabled)
            .await,
    };

    match outcome {
        Ok(output_root) => {
            tracing::info!("✅ Migration completed successfully!");
            tracing::info!("📁 Corpus rewritten under: {}", output_root);
            println!("✅ Migration completed successfully!");
            println!("📁 Corpus rewritten under: {}", output_root);
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Migration failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            // 輸出用戶友好的錯誤信息
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                clinic_migrate::utils::error::ErrorSeverity::Low => 0,
                clinic_migrate::utils::error::ErrorSeverity::Medium => 2,
                clinic_migrate::utils::error::ErrorSeverity::High => 1,
                clinic_migrate::utils::error::ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

async fn run_backup(
    workspace: &LocalWorkspace,
    config: &CliConfig,
    execution_id: &str,
) -> clinic_migrate::Result<()> {
    let files = load_target_corpus(workspace, config).await?;
    if files.is_empty() {
        tracing::info!("Nothing to back up yet; target corpus is empty");
        return Ok(());
    }

    let archive_path = format!("migration-backup-{}.zip", execution_id);
    backup::create_backup_archive(&files, &archive_path)?;
    Ok(())
}

async fn load_target_corpus(
    workspace: &LocalWorkspace,
    config: &CliConfig,
) -> clinic_migrate::Result<Vec<SourceFile>> {
    let ext = config.source_ext();
    let suffixes: Vec<String> = ArtifactKind::ALL
        .iter()
        .map(|kind| kind.file_suffix(ext))
        .collect();

    let paths = workspace
        .list_files(config.target_root(), &suffixes, config.exclude_globs())
        .await?;

    let mut files = Vec::new();
    for path in paths {
        let Some(kind) = ArtifactKind::from_path(&path, ext) else {
            continue;
        };
        let content = workspace.read_file(&path).await?;
        files.push(SourceFile {
            path,
            content,
            kind,
        });
    }
    Ok(files)
}

async fn run_single_pass(
    pass_name: &str,
    workspace: &LocalWorkspace,
    config: &CliConfig,
    catalog: RuleCatalog,
    execution_id: &str,
    monitor: bool,
) -> clinic_migrate::Result<String> {
    tracing::info!("Running single pass: {}", pass_name);

    match pass_name {
        "scaffold" => {
            run_standalone(
                ScaffoldPass::new(workspace.clone(), config.clone()),
                execution_id,
                monitor,
            )
            .await
        }
        "port" => {
            run_standalone(
                PortPass::new(workspace.clone(), config.clone(), catalog),
                execution_id,
                monitor,
            )
            .await
        }
        "references" => {
            run_standalone(
                ReferencePass::new(workspace.clone(), config.clone()),
                execution_id,
                monitor,
            )
            .await
        }
        "sweep" => {
            run_standalone(
                SweepPass::new(workspace.clone(), config.clone()),
                execution_id,
                monitor,
            )
            .await
        }
        other => Err(clinic_migrate::MigrateError::InvalidConfigValueError {
            field: "pass".to_string(),
            value: other.to_string(),
            reason: "Known passes: scaffold, port, references, sweep".to_string(),
        }),
    }
}

async fn run_standalone<P: ContextualPass>(
    pass: P,
    execution_id: &str,
    monitor: bool,
) -> clinic_migrate::Result<String> {
    let engine = MigrateEngine::new_with_monitoring(
        StandalonePass::new(pass, execution_id.to_string()),
        monitor,
    );
    engine.run().await
}

async fn run_full_sequence(
    workspace: &LocalWorkspace,
    config: &CliConfig,
    catalog: RuleCatalog,
    execution_id: &str,
    monitor: bool,
) -> clinic_migrate::Result<String> {
    let mut sequence = PassSequence::new(execution_id.to_string()).with_monitoring(monitor);

    sequence.add_pass(Box::new(ScaffoldPass::new(
        workspace.clone(),
        config.clone(),
    )));
    sequence.add_pass(Box::new(PortPass::new(
        workspace.clone(),
        config.clone(),
        catalog,
    )));
    sequence.add_pass(Box::new(ReferencePass::new(
        workspace.clone(),
        config.clone(),
    )));
    sequence.add_pass(Box::new(SweepPass::new(workspace.clone(), config.clone())));

    let results = sequence.execute_all().await?;

    // 每個 pass 一行摘要，最後一行總計
    println!("📋 Migration Summary:");
    for result in &results {
        println!(
            "  {}: {} files seen, {} modified ({:?})",
            result.pass_name,
            result.files_seen(),
            result.files_modified(),
            result.duration
        );
    }

    let summary = PassSequence::get_execution_summary(&results);
    println!(
        "  Total: {} files seen, {} modified across {} passes",
        summary["files_seen"], summary["files_modified"], summary["total_passes"]
    );

    let report_csv = MigrationReport::to_csv(&results)?;
    let report_path = Path::new(config.target_root()).join("migration-report.csv");
    workspace.write_file(&report_path, &report_csv).await?;
    tracing::info!("📄 Report written to: {}", report_path.display());

    Ok(config.target_root().to_string())
}
