use crate::domain::model::{camel_case, pascal_case, ArtifactKind, SourceFile};
use crate::utils::error::Result;
use regex::Regex;
use std::path::PathBuf;

/// Logical role a canonical identifier is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamingRole {
    ServiceClass,
    ControllerClass,
}

impl NamingRole {
    pub fn class_suffix(&self) -> &'static str {
        match self {
            NamingRole::ServiceClass => "Service",
            NamingRole::ControllerClass => "Controller",
        }
    }

    fn from_kind(kind: ArtifactKind) -> Option<NamingRole> {
        match kind {
            ArtifactKind::Service => Some(NamingRole::ServiceClass),
            ArtifactKind::Controller => Some(NamingRole::ControllerClass),
            ArtifactKind::AggregationModule => None,
        }
    }
}

/// Resolved mapping from a logical role to the identifier actually declared for
/// it. Only trustworthy once the pass that produced the declaration has
/// completed.
#[derive(Debug, Clone)]
pub struct NamingBinding {
    pub module: String,
    pub role: NamingRole,
    pub canonical: String,
    pub source_path: PathBuf,
}

/// Pass-3 uses the narrow heuristic; pass-4 widens it for what pass-3 missed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode {
    /// Case-sensitive root match, pluralization drift tolerated.
    Strict,
    /// Case-insensitive, separator-insensitive; also repairs camelCase value
    /// bindings left stale by a Strict pass.
    Lenient,
}

/// Declaration index over one corpus. Built from scratch at the start of any
/// pass that needs it — never updated incrementally.
pub struct NamingIndex {
    bindings: Vec<NamingBinding>,
    service_candidates: Regex,
    controller_candidates: Regex,
}

impl NamingIndex {
    pub fn build(corpus: &[SourceFile], source_ext: &str) -> Result<NamingIndex> {
        let class_decl = Regex::new(r"export class ([A-Za-z_][A-Za-z0-9_]*)")?;
        let mut bindings = Vec::new();

        for file in corpus {
            let Some(role) = NamingRole::from_kind(file.kind) else {
                continue;
            };
            let Some(module) = file.module_name(source_ext) else {
                continue;
            };
            // 檔案沒有匯出類別 → 此 role 無綁定（消費端 fail-open）
            let Some(caps) = class_decl.captures(&file.content) else {
                continue;
            };

            bindings.push(NamingBinding {
                module,
                role,
                canonical: caps[1].to_string(),
                source_path: file.path.clone(),
            });
        }

        Ok(NamingIndex {
            bindings,
            service_candidates: Regex::new(r"\b([A-Za-z_][A-Za-z0-9_]*)Service\b")?,
            controller_candidates: Regex::new(r"\b([A-Za-z_][A-Za-z0-9_]*)Controller\b")?,
        })
    }

    pub fn bindings(&self) -> &[NamingBinding] {
        &self.bindings
    }

    pub fn binding_for(&self, module: &str, role: NamingRole) -> Option<&NamingBinding> {
        self.bindings
            .iter()
            .find(|b| b.module == module && b.role == role)
    }

    /// Repairs near-miss spellings of indexed roles in a consumer file.
    /// Conservative on purpose: a candidate is only replaced when it shares the
    /// module's root word, and never when the canonical spelling already occurs
    /// in the file. Returns the rewritten text and the number of identifier
    /// occurrences replaced.
    pub fn resolve_references(&self, content: &str, mode: ResolveMode) -> Result<(String, usize)> {
        let mut current = content.to_string();
        let mut fixes = 0;

        for binding in &self.bindings {
            let candidates = match binding.role {
                NamingRole::ServiceClass => &self.service_candidates,
                NamingRole::ControllerClass => &self.controller_candidates,
            };

            let type_canonical = binding.canonical.clone();
            let value_canonical = camel_case(&type_canonical);

            // 先收集不重複的候選，再逐一改寫，避免邊掃邊改
            let mut seen: Vec<String> = Vec::new();
            for caps in candidates.captures_iter(&current) {
                let ident = caps[0].to_string();
                if !seen.contains(&ident) {
                    seen.push(ident);
                }
            }

            for candidate in seen {
                let is_type = candidate
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_ascii_uppercase());

                if is_type {
                    if candidate == type_canonical
                        || !root_matches(&candidate, binding, mode)
                        || contains_ident(&current, &type_canonical)?
                    {
                        continue;
                    }
                    fixes += replace_ident(&mut current, &candidate, &type_canonical)?;
                } else {
                    // camelCase 值綁定只在 Lenient 模式處理
                    if mode != ResolveMode::Lenient
                        || candidate == value_canonical
                        || !root_matches(&candidate, binding, mode)
                        || contains_ident(&current, &value_canonical)?
                    {
                        continue;
                    }
                    fixes += replace_ident(&mut current, &candidate, &value_canonical)?;
                }
            }
        }

        Ok((current, fixes))
    }
}

fn contains_ident(content: &str, ident: &str) -> Result<bool> {
    let re = Regex::new(&format!(r"\b{}\b", ident))?;
    Ok(re.is_match(content))
}

fn replace_ident(content: &mut String, from: &str, to: &str) -> Result<usize> {
    let re = Regex::new(&format!(r"\b{}\b", from))?;
    let count = re.find_iter(content).count();
    if count > 0 {
        *content = re.replace_all(content, to).into_owned();
        tracing::debug!("Resolved {} occurrence(s): {} -> {}", count, from, to);
    }
    Ok(count)
}

/// Does the candidate's root word belong to this binding's module?
fn root_matches(candidate: &str, binding: &NamingBinding, mode: ResolveMode) -> bool {
    let suffix = binding.role.class_suffix();
    let root = candidate.strip_suffix(suffix).unwrap_or(candidate);
    let module_root = pascal_case(&binding.module);

    match mode {
        ResolveMode::Strict => singular(root) == singular(&module_root),
        ResolveMode::Lenient => {
            let a = singular(&normalize(root));
            let b = singular(&normalize(&module_root));
            a == b
        }
    }
}

fn singular(word: &str) -> String {
    if let Some(stripped) = word.strip_suffix("es") {
        if !stripped.is_empty() {
            return stripped.to_string();
        }
    }
    if let Some(stripped) = word.strip_suffix('s') {
        if !stripped.is_empty() {
            return stripped.to_string();
        }
    }
    word.to_string()
}

fn normalize(word: &str) -> String {
    word.chars()
        .filter(|c| *c != '_' && *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
