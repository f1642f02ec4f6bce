use crate::error::Result;
use crate::traits::KeyValueStore;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;

/// 文件存储: 每个 key 对应目录下的一个文件
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// key 中除字母数字和 `-_.` 以外的字符都替换为 `_`
    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", file_name.trim_start_matches('.')))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn read(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn write(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).await?;

        // 先写临时文件再 rename, 避免留下写了一半的快照
        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, value).await?;
        fs::rename(&tmp_path, &path).await?;

        tracing::debug!("Snapshot written to {:?}", path);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_file_flow() -> Result<()> {
        let dir = tempdir()?;
        // 目录不存在时 write 会自动创建
        let store = FileStore::new(dir.path().join("nested"));

        // 1. Initial state
        assert_eq!(store.read("results").await?, None);
        store.delete("results").await?;

        // 2. Write / overwrite
        store.write("results", "[1]").await?;
        store.write("results", "[2]").await?;
        assert_eq!(store.read("results").await?, Some("[2]".to_string()));
        assert!(dir.path().join("nested").join("results.json").exists());
        assert!(!dir.path().join("nested").join("results.json.tmp").exists());

        // 3. Delete
        store.delete("results").await?;
        assert_eq!(store.read("results").await?, None);

        Ok(())
    }

    #[test]
    fn test_key_sanitizing() {
        let store = FileStore::new(PathBuf::from("/data"));
        assert_eq!(
            store.path_for("../../etc/passwd"),
            PathBuf::from("/data/_.._etc_passwd.json")
        );
        assert_eq!(
            store.path_for("speed_test_results"),
            PathBuf::from("/data/speed_test_results.json")
        );
    }
}
