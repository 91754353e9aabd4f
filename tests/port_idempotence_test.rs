use clinic_migrate::app::passes::{PortPass, ScaffoldPass};
use clinic_migrate::config::toml_config::{CorpusConfig, MigrationMeta, TomlConfig};
use clinic_migrate::core::Workspace;
use clinic_migrate::domain::model::ModuleMapping;
use clinic_migrate::{LocalWorkspace, MigrateEngine, RuleCatalog, StandalonePass};
use std::path::Path;
use tempfile::TempDir;

const LEGACY_SERVICE: &str = "\
import { PrismaClient } from '@prisma/client';

const prisma = new PrismaClient();

export class PetsService {
  async findAll() {
    return prisma.pet.findMany({ include: { owner: true } });
  }
}
";

fn test_config() -> TomlConfig {
    TomlConfig {
        migration: MigrationMeta {
            name: "idempotence-fixture".to_string(),
            description: "port pass twice".to_string(),
            version: "1.0".to_string(),
        },
        corpus: CorpusConfig {
            target_root: "src/modules".to_string(),
            legacy_root: "legacy/src".to_string(),
            source_ext: None,
            exclude: Vec::new(),
        },
        modules: vec![ModuleMapping::new("animals", "pets")],
        report: None,
        monitoring: None,
    }
}

#[tokio::test]
async fn test_port_pass_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let legacy = temp_dir.path().join("legacy/src");
    std::fs::create_dir_all(&legacy).unwrap();
    std::fs::write(legacy.join("animals.service.ts"), LEGACY_SERVICE).unwrap();

    let workspace = LocalWorkspace::new(temp_dir.path().to_string_lossy().to_string());
    let config = test_config();
    let target = Path::new("src/modules/pets/pets.service.ts");

    // Scaffold 先鋪底，port 再覆蓋
    let scaffold = StandalonePass::new(
        ScaffoldPass::new(workspace.clone(), config.clone()),
        "run-1".to_string(),
    );
    MigrateEngine::new(scaffold).run().await.unwrap();

    let port = StandalonePass::new(
        PortPass::new(
            workspace.clone(),
            config.clone(),
            RuleCatalog::standard().unwrap(),
        ),
        "run-1".to_string(),
    );
    MigrateEngine::new(port).run().await.unwrap();

    let first = workspace.read_file(target).await.unwrap();
    assert!(first.contains("this.prisma.pet.findMany"));

    // 第二次 port：輸出必須逐位元相同
    let port_again = StandalonePass::new(
        PortPass::new(
            workspace.clone(),
            config.clone(),
            RuleCatalog::standard().unwrap(),
        ),
        "run-2".to_string(),
    );
    MigrateEngine::new(port_again).run().await.unwrap();

    let second = workspace.read_file(target).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_second_port_run_reports_unchanged() {
    let temp_dir = TempDir::new().unwrap();
    let legacy = temp_dir.path().join("legacy/src");
    std::fs::create_dir_all(&legacy).unwrap();
    std::fs::write(legacy.join("animals.service.ts"), LEGACY_SERVICE).unwrap();

    let workspace = LocalWorkspace::new(temp_dir.path().to_string_lossy().to_string());
    let config = test_config();
    let catalog = RuleCatalog::standard().unwrap();

    use clinic_migrate::core::pass_sequence::{ContextualPass, PassContext};

    let pass = PortPass::new(workspace.clone(), config.clone(), catalog);
    let context = PassContext::new("direct".to_string());

    // 第一輪：檔案是新的
    let files = pass.scan_with_context(&context).await.unwrap();
    let result = pass.rewrite_with_context(files, &context).await.unwrap();
    assert!(result.outcomes.iter().all(|o| o.changed));
    pass.commit_with_context(result, &context).await.unwrap();

    // 第二輪：磁碟內容已是移植後狀態
    let files = pass.scan_with_context(&context).await.unwrap();
    let result = pass.rewrite_with_context(files, &context).await.unwrap();
    assert!(result.outcomes.iter().all(|o| !o.changed));
}
