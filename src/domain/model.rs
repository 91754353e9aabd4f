use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Structural category of a corpus file. Determines which rule set and naming
/// convention apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtifactKind {
    Service,
    Controller,
    AggregationModule,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [
        ArtifactKind::Service,
        ArtifactKind::Controller,
        ArtifactKind::AggregationModule,
    ];

    /// File-name infix: `clients.service.ts`, `clients.controller.ts`, `clients.module.ts`
    pub fn file_infix(&self) -> &'static str {
        match self {
            ArtifactKind::Service => "service",
            ArtifactKind::Controller => "controller",
            ArtifactKind::AggregationModule => "module",
        }
    }

    pub fn file_suffix(&self, ext: &str) -> String {
        format!(".{}.{}", self.file_infix(), ext)
    }

    pub fn from_path(path: &Path, ext: &str) -> Option<ArtifactKind> {
        let name = path.file_name()?.to_str()?;
        ArtifactKind::ALL
            .into_iter()
            .find(|kind| name.ends_with(&kind.file_suffix(ext)))
    }
}

/// One corpus file between load and store. Content is replaced wholesale by
/// rewrite operations; there is no partial mutation.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub content: String,
    pub kind: ArtifactKind,
}

impl SourceFile {
    /// Module name from the file stem: `clients.service.ts` → `clients`
    pub fn module_name(&self, ext: &str) -> Option<String> {
        let name = self.path.file_name()?.to_str()?;
        name.strip_suffix(&self.kind.file_suffix(ext))
            .map(|stem| stem.to_string())
    }
}

/// One row of the legacy → target module-name table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleMapping {
    pub legacy: String,
    pub target: String,
}

impl ModuleMapping {
    pub fn new(legacy: &str, target: &str) -> Self {
        Self {
            legacy: legacy.to_string(),
            target: target.to_string(),
        }
    }
}

/// Per-file outcome within a single pass.
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub path: String,
    pub changed: bool,
    pub rules_hit: usize,
}

/// Result of one pass's rewrite stage, before it is committed back to disk.
#[derive(Debug, Clone)]
pub struct RewriteResult {
    pub files: Vec<SourceFile>,
    pub outcomes: Vec<FileOutcome>,
    pub skipped: Vec<String>,
}

impl RewriteResult {
    pub fn empty() -> Self {
        Self {
            files: Vec::new(),
            outcomes: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn files_seen(&self) -> usize {
        self.outcomes.len() + self.skipped.len()
    }

    pub fn files_modified(&self) -> usize {
        self.outcomes.iter().filter(|o| o.changed).count()
    }
}

/// Typed path → content map published by each pass for the next one, so the
/// stage-N+1-depends-on-stage-N contract does not live only in the filesystem.
#[derive(Debug, Clone, Default)]
pub struct CorpusSnapshot {
    files: BTreeMap<String, String>,
}

impl CorpusSnapshot {
    pub fn from_files(files: &[SourceFile]) -> Self {
        let mut map = BTreeMap::new();
        for file in files {
            map.insert(file.path.to_string_lossy().to_string(), file.content.clone());
        }
        Self { files: map }
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(|s| s.as_str())
    }
}

/// `medical-records` → `MedicalRecords`
pub fn pascal_case(module: &str) -> String {
    module
        .split(|c| c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(head) => head.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// `MedicalRecordsService` → `medicalRecordsService`
pub fn camel_case(ident: &str) -> String {
    let mut chars = ident.chars();
    match chars.next() {
        Some(head) => head.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// `MedicalRecords` → `medical-records`
pub fn kebab_case(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len() + 4);
    for (i, c) in ident.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
