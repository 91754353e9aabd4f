use crate::utils::error::{MigrateError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub const KNOWN_PASSES: &[&str] = &["scaffold", "port", "references", "sweep"];

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(MigrateError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(MigrateError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_source_extension(field_name: &str, ext: &str) -> Result<()> {
    if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(MigrateError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: ext.to_string(),
            reason: "Extension must be alphanumeric, without a leading dot".to_string(),
        });
    }
    Ok(())
}

/// 模組識別名：小寫字母開頭，其後允許小寫字母、數字與連字號
pub fn validate_module_ident(field_name: &str, ident: &str) -> Result<()> {
    let mut chars = ident.chars();
    let head_ok = chars.next().is_some_and(|c| c.is_ascii_lowercase());
    let tail_ok = chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    if !head_ok || !tail_ok {
        return Err(MigrateError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: ident.to_string(),
            reason: "Module names must match [a-z][a-z0-9-]*".to_string(),
        });
    }
    Ok(())
}

pub fn validate_pass_name(field_name: &str, pass: &str) -> Result<()> {
    if !KNOWN_PASSES.contains(&pass) {
        return Err(MigrateError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: pass.to_string(),
            reason: format!("Known passes: {}", KNOWN_PASSES.join(", ")),
        });
    }
    Ok(())
}

pub fn validate_exclude_globs(field_name: &str, globs: &[String]) -> Result<()> {
    for glob in globs {
        if glob.trim().is_empty() {
            return Err(MigrateError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: glob.clone(),
                reason: "Glob cannot be empty or whitespace-only".to_string(),
            });
        }
        crate::config::cli::glob_to_regex(glob)?;
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(MigrateError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("target_root", "./src/modules").is_ok());
        assert!(validate_path("target_root", "").is_err());
        assert!(validate_path("target_root", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_module_ident() {
        assert!(validate_module_ident("module", "clients").is_ok());
        assert!(validate_module_ident("module", "medical-records").is_ok());
        assert!(validate_module_ident("module", "Clients").is_err());
        assert!(validate_module_ident("module", "2pets").is_err());
        assert!(validate_module_ident("module", "").is_err());
    }

    #[test]
    fn test_validate_pass_name() {
        assert!(validate_pass_name("pass", "scaffold").is_ok());
        assert!(validate_pass_name("pass", "sweep").is_ok());
        assert!(validate_pass_name("pass", "compile").is_err());
    }

    #[test]
    fn test_validate_source_extension() {
        assert!(validate_source_extension("source_ext", "ts").is_ok());
        assert!(validate_source_extension("source_ext", ".ts").is_err());
        assert!(validate_source_extension("source_ext", "").is_err());
    }

    #[test]
    fn test_validate_exclude_globs() {
        let globs = vec!["**/fixtures/**".to_string(), "*.spec.ts".to_string()];
        assert!(validate_exclude_globs("exclude", &globs).is_ok());

        let empty = vec!["   ".to_string()];
        assert!(validate_exclude_globs("exclude", &empty).is_err());
    }
}
