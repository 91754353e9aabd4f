use clinic_migrate::app::passes::{PortPass, ScaffoldPass};
use clinic_migrate::config::toml_config::{CorpusConfig, MigrationMeta, TomlConfig};
use clinic_migrate::core::Workspace;
use clinic_migrate::domain::model::ModuleMapping;
use clinic_migrate::{LocalWorkspace, MigrateEngine, RuleCatalog, StandalonePass};
use std::path::Path;
use tempfile::TempDir;

fn test_config(modules: Vec<ModuleMapping>) -> TomlConfig {
    TomlConfig {
        migration: MigrationMeta {
            name: "scaffold-fixture".to_string(),
            description: "scaffold behavior".to_string(),
            version: "1.0".to_string(),
        },
        corpus: CorpusConfig {
            target_root: "src/modules".to_string(),
            legacy_root: "legacy/src".to_string(),
            source_ext: None,
            exclude: Vec::new(),
        },
        modules,
        report: None,
        monitoring: None,
    }
}

async fn run_scaffold(workspace: &LocalWorkspace, config: &TomlConfig, run: &str) {
    let pass = StandalonePass::new(
        ScaffoldPass::new(workspace.clone(), config.clone()),
        run.to_string(),
    );
    MigrateEngine::new(pass).run().await.unwrap();
}

#[tokio::test]
async fn test_scaffold_creates_module_triples() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = LocalWorkspace::new(temp_dir.path().to_string_lossy().to_string());
    let config = test_config(vec![
        ModuleMapping::new("customers", "clients"),
        ModuleMapping::new("history", "medical-records"),
    ]);

    run_scaffold(&workspace, &config, "run-1").await;

    for module in ["clients", "medical-records"] {
        for infix in ["service", "controller", "module"] {
            let path = format!("src/modules/{m}/{m}.{i}.ts", m = module, i = infix);
            assert!(
                workspace.file_exists(Path::new(&path)).await,
                "missing scaffold file: {}",
                path
            );
        }
    }

    let controller = workspace
        .read_file(Path::new(
            "src/modules/medical-records/medical-records.controller.ts",
        ))
        .await
        .unwrap();
    assert!(controller.contains("export class MedicalRecordsController"));
    assert!(controller.contains("@Controller('medical-records')"));
}

#[tokio::test]
async fn test_scaffold_never_overwrites_existing_files() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = LocalWorkspace::new(temp_dir.path().to_string_lossy().to_string());
    let config = test_config(vec![ModuleMapping::new("customers", "clients")]);

    let path = Path::new("src/modules/clients/clients.service.ts");
    let hand_written = "export class ClientsService { /* hand-ported */ }\n";
    workspace.write_file(path, hand_written).await.unwrap();

    run_scaffold(&workspace, &config, "run-1").await;

    let content = workspace.read_file(path).await.unwrap();
    assert_eq!(content, hand_written);
}

#[tokio::test]
async fn test_scaffold_rerun_preserves_ported_content() {
    let temp_dir = TempDir::new().unwrap();
    let legacy = temp_dir.path().join("legacy/src");
    std::fs::create_dir_all(&legacy).unwrap();
    std::fs::write(
        legacy.join("customers.service.ts"),
        "import { PrismaClient } from '@prisma/client';\n\nconst prisma = new PrismaClient();\n\nexport class ClientsService {\n  async findAll() {\n    return prisma.client.findMany();\n  }\n}\n",
    )
    .unwrap();

    let workspace = LocalWorkspace::new(temp_dir.path().to_string_lossy().to_string());
    let config = test_config(vec![ModuleMapping::new("customers", "clients")]);

    run_scaffold(&workspace, &config, "run-1").await;

    let port = StandalonePass::new(
        PortPass::new(
            workspace.clone(),
            config.clone(),
            RuleCatalog::standard().unwrap(),
        ),
        "run-1".to_string(),
    );
    MigrateEngine::new(port).run().await.unwrap();

    let path = Path::new("src/modules/clients/clients.service.ts");
    let ported = workspace.read_file(path).await.unwrap();
    assert!(ported.contains("this.prisma.client.findMany()"));

    // scaffold 重跑不得覆蓋已移植內容
    run_scaffold(&workspace, &config, "run-2").await;

    let after_rerun = workspace.read_file(path).await.unwrap();
    assert_eq!(ported, after_rerun);
}
