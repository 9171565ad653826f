//! Filesystem operations used when fetching components

use std::fs;
use std::path::Path;

#[derive(Debug, Default, Clone)]
pub struct CopyOptions {
    pub exclude: Vec<String>,
}

impl CopyOptions {
    /// Skip git metadata and a stale install marker from the source
    pub fn for_component() -> Self {
        Self {
            exclude: vec![
                ".git".to_string(),
                crate::component::descriptor::MARKER_FILE.to_string(),
            ],
        }
    }

    fn is_excluded(&self, name: &std::ffi::OsStr) -> bool {
        self.exclude
            .iter()
            .any(|excluded| name.to_str() == Some(excluded.as_str()))
    }
}

/// Copy a directory recursively, skipping excluded entry names at any depth
pub fn copy_dir_recursive<P1, P2>(src: P1, dst: P2, options: &CopyOptions) -> std::io::Result<()>
where
    P1: AsRef<Path>,
    P2: AsRef<Path>,
{
    let src_ref = src.as_ref();
    let dst_ref = dst.as_ref();
    fs::create_dir_all(dst_ref)?;

    for entry in fs::read_dir(src_ref)? {
        let entry = entry?;
        let file_name = entry.file_name();
        if options.is_excluded(&file_name) {
            continue;
        }

        let dst_path = dst_ref.join(&file_name);
        if entry.file_type()?.is_dir() {
            copy_dir_recursive(entry.path(), &dst_path, options)?;
        } else {
            fs::copy(entry.path(), &dst_path)?;
        }
    }

    Ok(())
}

/// Remove a directory tree if it exists
pub fn remove_dir_if_exists(path: &Path) -> std::io::Result<()> {
    match fs::remove_dir_all(path) {
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
