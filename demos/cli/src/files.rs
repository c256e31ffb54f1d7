use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use timeline_core::{EventSource, FetchResponse, ThemeStore};

/// Đọc tài liệu sự kiện từ đĩa; đường dẫn tương đối tính từ `root`.
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl EventSource for FileSource {
    async fn fetch(&self, resource: &str) -> Result<FetchResponse, String> {
        let path = self.root.join(resource);
        match fs::read_to_string(&path) {
            Ok(body) => Ok(FetchResponse::ok(body)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(FetchResponse::status(404)),
            Err(err) => Err(format!("{}: {err}", path.display())),
        }
    }
}

/// Kho theme dạng file JSON `{ "key": "value" }`.
pub struct FileThemeStore {
    path: PathBuf,
}

impl FileThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File chưa tồn tại coi như rỗng; file hỏng trả lỗi để không bị ghi đè.
    fn entries(path: &Path) -> Result<BTreeMap<String, String>, String> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(format!("{}: {err}", path.display())),
        };
        serde_json::from_str(&raw).map_err(|err| format!("{}: {err}", path.display()))
    }
}

impl ThemeStore for FileThemeStore {
    fn read(&self, key: &str) -> Option<String> {
        Self::entries(&self.path).ok()?.remove(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), String> {
        let mut entries = Self::entries(&self.path)?;
        entries.insert(key.to_string(), value.to_string());

        let raw = serde_json::to_string_pretty(&entries).map_err(|err| err.to_string())?;
        fs::write(&self.path, raw).map_err(|err| format!("{}: {err}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use tempfile::TempDir;

    #[test]
    fn missing_file_reads_as_not_found() {
        let dir = TempDir::new().unwrap();
        let response = block_on(FileSource::new(dir.path()).fetch("data/events.json")).unwrap();

        assert_eq!(response.status, 404);
    }

    #[test]
    fn existing_file_is_served() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("events.json"), r#"{"events":[]}"#).unwrap();

        let response = block_on(FileSource::new(dir.path()).fetch("events.json")).unwrap();
        assert!(response.is_success());
        assert_eq!(response.body, r#"{"events":[]}"#);
    }

    #[test]
    fn theme_store_round_trips_and_keeps_other_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, r#"{ "other": "kept" }"#).unwrap();

        let mut store = FileThemeStore::new(&path);
        assert_eq!(store.read("timeline-theme"), None);
        store.write("timeline-theme", "dark").unwrap();

        let reopened = FileThemeStore::new(&path);
        assert_eq!(reopened.read("timeline-theme").as_deref(), Some("dark"));
        assert_eq!(reopened.read("other").as_deref(), Some("kept"));
    }

    #[test]
    fn missing_state_file_is_created_on_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");

        let mut store = FileThemeStore::new(&path);
        assert_eq!(store.read("timeline-theme"), None);
        store.write("timeline-theme", "light").unwrap();

        assert_eq!(store.read("timeline-theme").as_deref(), Some("light"));
    }

    #[test]
    fn corrupt_state_file_is_left_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        let corrupt = r#"{ "other": "kept", broken"#;
        fs::write(&path, corrupt).unwrap();

        let mut store = FileThemeStore::new(&path);
        assert_eq!(store.read("timeline-theme"), None);
        assert!(store.write("timeline-theme", "dark").is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), corrupt);
    }
}
