use crate::core::Workspace;
use crate::utils::error::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Directories never worth scanning, regardless of configuration.
const EXCLUDED_DIRS: &[&str] = &["node_modules", "dist", "build", "coverage", ".git"];

#[derive(Debug, Clone)]
pub struct LocalWorkspace {
    base_path: String,
}

impl LocalWorkspace {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    fn full_path(&self, path: &Path) -> PathBuf {
        Path::new(&self.base_path).join(path)
    }
}

impl Workspace for LocalWorkspace {
    async fn list_files(
        &self,
        root: &str,
        suffixes: &[String],
        exclude: &[String],
    ) -> Result<Vec<PathBuf>> {
        let full_root = Path::new(&self.base_path).join(root);
        let mut found = Vec::new();

        // 根目錄還不存在時回傳空清單（scaffold pass 會建立它）
        if !full_root.is_dir() {
            return Ok(found);
        }

        let exclude_patterns = exclude
            .iter()
            .map(|glob| glob_to_regex(glob))
            .collect::<Result<Vec<_>>>()?;

        walk_dir(&full_root, suffixes, &exclude_patterns, &mut found)?;

        // 相對於 workspace base 的路徑，排序保證掃描順序穩定
        let base = Path::new(&self.base_path);
        let mut relative: Vec<PathBuf> = found
            .into_iter()
            .map(|p| p.strip_prefix(base).map(Path::to_path_buf).unwrap_or(p))
            .collect();
        relative.sort();

        Ok(relative)
    }

    async fn read_file(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(self.full_path(path))?;
        Ok(content)
    }

    async fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        let full_path = self.full_path(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, content)?;
        Ok(())
    }

    async fn file_exists(&self, path: &Path) -> bool {
        self.full_path(path).is_file()
    }
}

fn walk_dir(
    dir: &Path,
    suffixes: &[String],
    exclude: &[Regex],
    found: &mut Vec<PathBuf>,
) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().to_string();

        if path.is_dir() {
            if EXCLUDED_DIRS.contains(&name.as_str()) || is_excluded(&path, &name, exclude) {
                continue;
            }
            walk_dir(&path, suffixes, exclude, found)?;
        } else if suffixes.iter().any(|suffix| name.ends_with(suffix.as_str()))
            && !is_excluded(&path, &name, exclude)
        {
            found.push(path);
        }
    }
    Ok(())
}

fn is_excluded(path: &Path, name: &str, exclude: &[Regex]) -> bool {
    let rel = path.to_string_lossy().replace('\\', "/");
    exclude
        .iter()
        .any(|pattern| pattern.is_match(&rel) || pattern.is_match(name))
}

/// Translates a shell-style glob into an anchored regex. `**` crosses directory
/// separators, `*` does not.
pub fn glob_to_regex(glob: &str) -> Result<Regex> {
    let mut pattern = String::from("^");
    let mut chars = glob.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '*' => {
                if chars.peek() == Some(&'*') {
                    chars.next();
                    if chars.peek() == Some(&'/') {
                        chars.next();
                        pattern.push_str("(?:.*/)?");
                    } else {
                        pattern.push_str(".*");
                    }
                } else {
                    pattern.push_str("[^/]*");
                }
            }
            '?' => pattern.push('.'),
            '.' | '+' | '(' | ')' | '[' | ']' | '{' | '}' | '^' | '$' | '|' | '\\' => {
                pattern.push('\\');
                pattern.push(c);
            }
            other => pattern.push(other),
        }
    }

    pattern.push('$');
    let regex = Regex::new(&pattern)?;
    Ok(regex)
}
