use crate::app::passes::module_file_path;
use crate::core::pass_sequence::{ContextualPass, PassContext};
use crate::core::{ConfigProvider, Workspace};
use crate::domain::model::{
    camel_case, pascal_case, ArtifactKind, FileOutcome, RewriteResult, SourceFile,
};
use crate::utils::error::Result;

/// Pass 1: ensure every target module has its Service/Controller/Module triple.
/// Missing files get minimal boilerplate; existing files are never overwritten.
pub struct ScaffoldPass<W: Workspace, C: ConfigProvider> {
    workspace: W,
    config: C,
}

impl<W: Workspace, C: ConfigProvider> ScaffoldPass<W, C> {
    pub fn new(workspace: W, config: C) -> Self {
        Self { workspace, config }
    }
}

#[async_trait::async_trait]
impl<W: Workspace, C: ConfigProvider> ContextualPass for ScaffoldPass<W, C> {
    async fn scan_with_context(&self, _context: &PassContext) -> Result<Vec<SourceFile>> {
        let ext = self.config.source_ext();
        let mut files = Vec::new();

        for mapping in self.config.module_map() {
            for kind in ArtifactKind::ALL {
                files.push(SourceFile {
                    path: module_file_path(self.config.target_root(), &mapping.target, kind, ext),
                    content: String::new(),
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

        for mut file in files {
            let path_display = file.path.to_string_lossy().to_string();

            // 既有檔案一律不覆蓋
            if self.workspace.file_exists(&file.path).await {
                result.skipped.push(path_display);
                continue;
            }

            let Some(module) = file.module_name(ext) else {
                result.skipped.push(path_display);
                continue;
            };

            file.content = boilerplate(&module, file.kind);
            result.outcomes.push(FileOutcome {
                path: path_display,
                changed: true,
                rules_hit: 0,
            });
            result.files.push(file);
        }

        Ok(result)
    }

    async fn commit_with_context(
        &self,
        result: RewriteResult,
        _context: &PassContext,
    ) -> Result<String> {
        for file in &result.files {
            self.workspace.write_file(&file.path, &file.content).await?;
        }
        Ok(self.config.target_root().to_string())
    }

    fn get_name(&self) -> &str {
        "scaffold"
    }
}

fn boilerplate(module: &str, kind: ArtifactKind) -> String {
    let pascal = pascal_case(module);
    match kind {
        ArtifactKind::Service => format!(
            "import {{ Injectable }} from '@nestjs/common';\n\
             import {{ PrismaService }} from '../prisma/prisma.service';\n\
             \n\
             @Injectable()\n\
             export class {pascal}Service {{\n\
             \x20 constructor(private readonly prisma: PrismaService) {{}}\n\
             \n\
             \x20 // TODO: port legacy business logic\n\
             }}\n"
        ),
        ArtifactKind::Controller => {
            let service = format!("{pascal}Service");
            let param = camel_case(&service);
            format!(
                "import {{ Controller }} from '@nestjs/common';\n\
                 import {{ {service} }} from './{module}.service';\n\
                 \n\
                 @Controller('{module}')\n\
                 export class {pascal}Controller {{\n\
                 \x20 constructor(private readonly {param}: {service}) {{}}\n\
                 }}\n"
            )
        }
        ArtifactKind::AggregationModule => format!(
            "import {{ Module }} from '@nestjs/common';\n\
             import {{ {pascal}Controller }} from './{module}.controller';\n\
             import {{ {pascal}Service }} from './{module}.service';\n\
             \n\
             @Module({{\n\
             \x20 controllers: [{pascal}Controller],\n\
             \x20 providers: [{pascal}Service],\n\
             \x20 exports: [{pascal}Service],\n\
             }})\n\
             export class {pascal}Module {{}}\n"
        ),
    }
}
