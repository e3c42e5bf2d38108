use crate::core::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Filesystem storage rooted at a base directory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = fs::read(full_path)?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }

    async fn list_files(&self) -> Result<Vec<String>> {
        let base = PathBuf::from(&self.base_path);
        let mut paths = Vec::new();
        walk(&base, &base, &mut paths)?;
        paths.sort();
        Ok(paths)
    }
}

fn walk(base: &Path, dir: &Path, paths: &mut Vec<String>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            walk(base, &path, paths)?;
        } else if let Ok(relative) = path.strip_prefix(base) {
            paths.push(relative.to_string_lossy().replace('\\', "/"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_list_files_recurses_and_relativizes() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("blocks/mail")).unwrap();
        fs::write(dir.path().join("blocks/mail/mail.icon.svg"), "<svg/>").unwrap();
        fs::write(dir.path().join("top.icon.png"), [1u8]).unwrap();

        let storage = LocalStorage::new(dir.path().to_str().unwrap().to_string());
        let files = storage.list_files().await.unwrap();

        assert_eq!(files, vec!["blocks/mail/mail.icon.svg", "top.icon.png"]);
    }

    #[tokio::test]
    async fn test_write_file_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path().to_str().unwrap().to_string());

        storage
            .write_file("nested/out/icons.css", b".a {}")
            .await
            .unwrap();

        let written = storage.read_file("nested/out/icons.css").await.unwrap();
        assert_eq!(written, b".a {}");
    }
}
