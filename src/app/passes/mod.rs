pub mod port_pass;
pub mod reference_pass;
pub mod scaffold_pass;
pub mod sweep_pass;

pub use port_pass::PortPass;
pub use reference_pass::ReferencePass;
pub use scaffold_pass::ScaffoldPass;
pub use sweep_pass::SweepPass;

use crate::domain::model::ArtifactKind;
use std::path::{Path, PathBuf};

/// `<target_root>/<module>/<module>.<infix>.<ext>`
pub fn module_file_path(root: &str, module: &str, kind: ArtifactKind, ext: &str) -> PathBuf {
    Path::new(root)
        .join(module)
        .join(format!("{}.{}.{}", module, kind.file_infix(), ext))
}

/// Legacy trees are flat: `<legacy_root>/<legacy>.<infix>.<ext>`
pub fn legacy_file_path(root: &str, legacy: &str, kind: ArtifactKind, ext: &str) -> PathBuf {
    Path::new(root).join(format!("{}.{}.{}", legacy, kind.file_infix(), ext))
}
