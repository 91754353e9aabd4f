use crate::domain::model::SourceFile;
use crate::utils::error::Result;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

/// Archives the pre-migration corpus so a bad run can be inspected or restored by
/// hand. Entry names keep their corpus-relative paths.
pub fn create_backup_archive(files: &[SourceFile], archive_path: &str) -> Result<String> {
    let zip_data = {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

        for file in files {
            let entry_name = file.path.to_string_lossy().replace('\\', "/");
            zip.start_file::<_, ()>(entry_name, FileOptions::default())?;
            zip.write_all(file.content.as_bytes())?;
        }

        zip.finish()?.into_inner()
    };

    if let Some(parent) = std::path::Path::new(archive_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(archive_path, &zip_data)?;

    tracing::info!(
        "💾 Backed up {} files to {} ({} bytes)",
        files.len(),
        archive_path,
        zip_data.len()
    );

    Ok(archive_path.to_string())
}
