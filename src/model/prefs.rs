//! 偏好存储：按键读写字符串值，整体落盘为一个JSON文件

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::model::article::AppError;
use crate::utils::fs::{read_json_file, write_json_file};

/// 主题偏好的存储键
pub const THEME_KEY: &str = "theme";

/// 持久化键值存储。读取是同步的；写入为写穿模式，
/// 失败只记录日志，不影响内存中的值。
#[derive(Debug, Default)]
pub struct PrefStore {
    path: Option<PathBuf>,
    values: BTreeMap<String, String>,
}

impl PrefStore {
    /// 打开指定位置的存储；文件缺失或损坏时按空存储处理
    pub fn open(path: PathBuf) -> Self {
        let values = match read_json_file::<BTreeMap<String, String>>(&path) {
            Ok(values) => values,
            Err(AppError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("偏好文件不存在，使用默认值: {}", path.display());
                BTreeMap::new()
            }
            Err(e) => {
                tracing::warn!("偏好文件不可用，按空存储处理: {}", e);
                BTreeMap::new()
            }
        };
        Self {
            path: Some(path),
            values,
        }
    }

    /// 不落盘的内存存储，用于测试与找不到配置目录的环境
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// 写入键值并尽力落盘
    pub fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
        self.flush();
    }

    fn flush(&self) {
        let Some(path) = &self.path else { return };
        if let Some(dir) = path.parent() {
            let _ = fs::create_dir_all(dir);
        }
        if let Err(e) = write_json_file(path, &self.values) {
            tracing::warn!("偏好写入失败: {}", e);
        }
    }

    /// 默认存储位置：各平台的用户配置目录
    pub fn default_path() -> Option<PathBuf> {
        let base = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("APPDATA").map(PathBuf::from))
            .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
        Some(base.join("bowen_yuedu").join("prefs.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_behaves_as_empty() {
        let dir = tempfile::tempdir().expect("创建临时目录失败");
        let store = PrefStore::open(dir.path().join("prefs.json"));

        assert_eq!(store.get(THEME_KEY), None, "空存储读取应该返回None");
    }

    #[test]
    fn test_set_persists_across_reload() {
        let dir = tempfile::tempdir().expect("创建临时目录失败");
        let path = dir.path().join("prefs.json");

        let mut store = PrefStore::open(path.clone());
        store.set(THEME_KEY, "light");
        assert_eq!(store.get(THEME_KEY), Some("light"));

        // 重新打开后值仍在
        let reopened = PrefStore::open(path);
        assert_eq!(reopened.get(THEME_KEY), Some("light"), "落盘的值应该在重开后可读");
    }

    #[test]
    fn test_corrupt_file_behaves_as_empty() {
        let dir = tempfile::tempdir().expect("创建临时目录失败");
        let path = dir.path().join("prefs.json");
        let mut file = std::fs::File::create(&path).expect("创建文件失败");
        file.write_all(b"not json at all").expect("写入失败");

        let store = PrefStore::open(path);
        assert_eq!(store.get(THEME_KEY), None, "损坏的文件应该按空存储处理");
    }

    #[test]
    fn test_set_creates_parent_dirs() {
        let dir = tempfile::tempdir().expect("创建临时目录失败");
        let path = dir.path().join("nested").join("prefs.json");

        let mut store = PrefStore::open(path.clone());
        store.set("k", "v");

        assert!(path.exists(), "写入时应该自动创建父目录");
    }

    #[test]
    fn test_in_memory_store_does_not_touch_disk() {
        let mut store = PrefStore::in_memory();
        store.set(THEME_KEY, "dark");
        assert_eq!(store.get(THEME_KEY), Some("dark"));
    }

    #[test]
    fn test_overwrite_keeps_single_value() {
        let mut store = PrefStore::in_memory();
        store.set(THEME_KEY, "dark");
        store.set(THEME_KEY, "light");
        assert_eq!(store.get(THEME_KEY), Some("light"), "同键写入应该覆盖旧值");
    }
}
