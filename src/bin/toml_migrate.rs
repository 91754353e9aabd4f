use anyhow::Context;
use clap::Parser;
use clinic_migrate::app::passes::{PortPass, ReferencePass, ScaffoldPass, SweepPass};
use clinic_migrate::config::toml_config::TomlConfig;
use clinic_migrate::core::ConfigProvider;
use clinic_migrate::core::Workspace;
use clinic_migrate::utils::{logger, validation::Validate};
use clinic_migrate::{
    ArtifactKind, LocalWorkspace, MigrationReport, PassSequence, RuleCatalog,
};
use std::path::Path;

#[derive(Parser)]
#[command(name = "toml-migrate")]
#[command(about = "Migration tool with TOML configuration support")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "migrate-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Dry run - show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting TOML-based migration tool");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入 TOML 配置
    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    let catalog = RuleCatalog::standard().context("rule catalog failed to compile")?;

    // 顯示配置摘要
    display_config_summary(&config, &catalog, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No files will be touched");
        perform_dry_run(&config, &catalog);
        return Ok(());
    }

    // 決定監控設定
    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());

    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let execution_id = format!("migrate-{}", chrono::Utc::now().format("%Y%m%d-%H%M%S"));
    let workspace = LocalWorkspace::new(".".to_string());

    let mut sequence = PassSequence::new(execution_id).with_monitoring(monitor_enabled);
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

    match sequence.execute_all().await {
        Ok(results) => {
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
            let report_path = Path::new(config.target_root()).join(config.report_filename());
            workspace.write_file(&report_path, &report_csv).await?;

            tracing::info!("✅ Migration completed successfully!");
            println!("✅ Migration completed successfully!");
            println!("📄 Report: {}", report_path.display());
        }
        Err(e) => {
            tracing::error!(
                "❌ Migration failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

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

fn display_config_summary(config: &TomlConfig, catalog: &RuleCatalog, args: &Args) {
    println!("📋 Configuration Summary:");
    println!(
        "  Migration: {} v{}",
        config.migration.name, config.migration.version
    );
    println!("  Legacy root: {}", config.legacy_root());
    println!("  Target root: {}", config.target_root());
    println!("  Source extension: .{}", config.source_ext());
    println!("  Modules: {}", config.module_map().len());

    let total_rules: usize = ArtifactKind::ALL
        .iter()
        .map(|kind| catalog.rules_for(*kind).len())
        .sum();
    println!("  Rules loaded: {}", total_rules);

    if !config.exclude_globs().is_empty() {
        println!("  Excludes: {}", config.exclude_globs().join(", "));
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig, catalog: &RuleCatalog) {
    println!("🔍 Dry Run Analysis:");
    println!();

    // 模組表分析
    println!("📦 Module Table:");
    for mapping in config.module_map() {
        println!("  {} -> {}", mapping.legacy, mapping.target);
    }

    // 規則集分析
    println!();
    println!("🛠️ Rule Sets:");
    for kind in ArtifactKind::ALL {
        let rules = catalog.rules_for(kind);
        println!("  {:?}: {} rules", kind, rules.len());
        for rule in rules {
            println!("    - {}", rule.name);
        }
    }

    // 計畫的 pass 順序
    println!();
    println!("⚙️ Pass Order:");
    println!("  1. scaffold   - ensure Service/Controller/Module triples exist");
    println!("  2. port       - rewrite legacy sources through the rule catalog");
    println!("  3. references - repair cross-reference drift (strict)");
    println!("  4. sweep      - repair remaining drift (lenient)");

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");
}
