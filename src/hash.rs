//! BLAKE3 content hashing for fetched components
//!
//! A component's content hash covers every file below its directory except
//! the install marker and git metadata, so the hash of a source tree and of
//! its installed copy agree until one of them is edited.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use blake3::Hasher;
use walkdir::{DirEntry, WalkDir};

use crate::component::descriptor::MARKER_FILE;
use crate::error::{CinstallError, Result};

/// Hash prefix for BLAKE3 hashes
pub const HASH_PREFIX: &str = "blake3:";

fn read_failed(path: &Path, err: &std::io::Error) -> CinstallError {
    CinstallError::FileReadFailed {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

fn feed_file(hasher: &mut Hasher, path: &Path) -> Result<()> {
    let file = File::open(path).map_err(|e| read_failed(path, &e))?;
    let mut reader = BufReader::new(file);
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader.read(&mut buffer).map_err(|e| read_failed(path, &e))?;
        if bytes_read == 0 {
            return Ok(());
        }
        hasher.update(&buffer[..bytes_read]);
    }
}

fn is_hashed(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    name != ".git" && name != MARKER_FILE
}

/// Calculate BLAKE3 hash of a file
pub fn hash_file(path: &Path) -> Result<String> {
    let mut hasher = Hasher::new();
    feed_file(&mut hasher, path)?;
    Ok(format!("{}{}", HASH_PREFIX, hasher.finalize().to_hex()))
}

/// Calculate BLAKE3 hash of a component directory.
///
/// Files are visited in path order and each contributes its relative path
/// and its content, so renames change the hash too.
pub fn hash_directory(path: &Path) -> Result<String> {
    if !path.is_dir() {
        return Err(CinstallError::FileReadFailed {
            path: path.display().to_string(),
            reason: "not a directory".to_string(),
        });
    }

    let mut hasher = Hasher::new();
    let walker = WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || is_hashed(entry));

    for entry in walker {
        let entry = entry.map_err(|e| CinstallError::FileReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let file_path = entry.path();
        let relative_path = file_path
            .strip_prefix(path)
            .unwrap_or(file_path)
            .to_string_lossy()
            .replace('\\', "/");
        hasher.update(relative_path.as_bytes());
        hasher.update(b"\0");
        feed_file(&mut hasher, file_path)?;
        hasher.update(b"\0");
    }

    Ok(format!("{}{}", HASH_PREFIX, hasher.finalize().to_hex()))
}

/// Compare two hashes, tolerating a missing prefix on either side
pub fn verify_hash(expected: &str, actual: &str) -> bool {
    let strip = |h: &str| h.strip_prefix(HASH_PREFIX).unwrap_or(h).to_string();
    strip(expected) == strip(actual)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_fixtures::{create_temp_dir, create_test_files};

    #[test]
    fn test_hash_file() {
        let temp = create_temp_dir();
        let file_path = temp.path().join("lesson.md");
        std::fs::write(&file_path, "# Lesson").unwrap();

        let hash = hash_file(&file_path).unwrap();
        assert!(hash.starts_with(HASH_PREFIX));
    }

    #[test]
    fn test_hash_file_not_found() {
        let result = hash_file(Path::new("/nonexistent/lesson.md"));
        assert!(matches!(result, Err(CinstallError::FileReadFailed { .. })));
    }

    #[test]
    fn test_hash_directory_matches_copy() {
        let first = create_temp_dir();
        let second = create_temp_dir();
        let files = [("component.yaml", "name: core\n"), ("src/lib.txt", "body")];
        create_test_files(first.path(), &files);
        create_test_files(second.path(), &files);

        assert_eq!(
            hash_directory(first.path()).unwrap(),
            hash_directory(second.path()).unwrap()
        );
    }

    #[test]
    fn test_hash_directory_sees_edits_and_renames() {
        let temp = create_temp_dir();
        create_test_files(temp.path(), &[("a.txt", "aaa")]);
        let original = hash_directory(temp.path()).unwrap();

        std::fs::write(temp.path().join("a.txt"), "changed").unwrap();
        let edited = hash_directory(temp.path()).unwrap();
        assert_ne!(original, edited);

        std::fs::rename(temp.path().join("a.txt"), temp.path().join("b.txt")).unwrap();
        assert_ne!(edited, hash_directory(temp.path()).unwrap());
    }

    #[test]
    fn test_hash_directory_ignores_marker_and_git() {
        let temp = create_temp_dir();
        create_test_files(temp.path(), &[("file.txt", "content")]);
        let before = hash_directory(temp.path()).unwrap();

        create_test_files(
            temp.path(),
            &[(MARKER_FILE, "hash: x\n"), (".git/HEAD", "ref: main\n")],
        );

        assert_eq!(before, hash_directory(temp.path()).unwrap());
    }

    #[test]
    fn test_hash_directory_rejects_file() {
        let temp = create_temp_dir();
        create_test_files(temp.path(), &[("file.txt", "content")]);
        assert!(hash_directory(&temp.path().join("file.txt")).is_err());
    }

    #[test]
    fn test_verify_hash() {
        let with_prefix = format!("{HASH_PREFIX}abc123");
        assert!(verify_hash(&with_prefix, &with_prefix));
        assert!(verify_hash(&with_prefix, "abc123"));
        assert!(!verify_hash(&with_prefix, &format!("{HASH_PREFIX}def456")));
    }
}
