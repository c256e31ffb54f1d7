use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::view::View;

/// Class gắn lên `<body>` khi dùng theme tối.
pub const DARK_THEME_CLASS: &str = "dark-theme";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Giá trị lưu trữ: `"light"` hoặc `"dark"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Chỉ `"dark"` bật giao diện tối; mọi giá trị khác coi như sáng.
    pub fn from_stored(value: &str) -> Self {
        match value {
            "dark" => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Nhãn nút chuyển theme, mô tả hành động kế tiếp.
    pub fn toggle_label(self) -> &'static str {
        match self {
            Theme::Light => "🌙 Dark Theme",
            Theme::Dark => "☀️ Light Theme",
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}

/// Kho key-value bền vững (localStorage, file...).
pub trait ThemeStore {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), String>;
}

/// Kho trong bộ nhớ, dùng cho test và chế độ headless.
#[derive(Debug, Clone, Default)]
pub struct MemoryThemeStore {
    values: HashMap<String, String>,
}

impl ThemeStore for MemoryThemeStore {
    fn read(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), String> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeManager {
    theme: Theme,
    storage_key: String,
}

impl ThemeManager {
    pub fn new(storage_key: impl Into<String>) -> Self {
        Self {
            theme: Theme::default(),
            storage_key: storage_key.into(),
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Khôi phục lựa chọn đã lưu; không có giá trị thì giữ theme sáng.
    pub fn restore(&mut self, store: &dyn ThemeStore, view: &mut dyn View) -> Theme {
        if let Some(saved) = store.read(&self.storage_key) {
            self.theme = Theme::from_stored(&saved);
        }
        view.apply_theme(self.theme, self.theme.toggle_label());
        self.theme
    }

    pub fn toggle(&mut self, store: &mut dyn ThemeStore, view: &mut dyn View) -> Theme {
        self.theme = self.theme.toggled();
        view.apply_theme(self.theme, self.theme.toggle_label());

        if let Err(err) = store.write(&self.storage_key, self.theme.as_str()) {
            tracing::warn!(key = %self.storage_key, error = %err, "could not persist theme");
        }
        tracing::debug!(theme = self.theme.as_str(), "theme toggled");
        self.theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::Scene;

    struct BrokenStore;

    impl ThemeStore for BrokenStore {
        fn read(&self, _key: &str) -> Option<String> {
            None
        }

        fn write(&mut self, _key: &str, _value: &str) -> Result<(), String> {
            Err("QuotaExceededError".to_string())
        }
    }

    #[test]
    fn double_toggle_returns_to_start() {
        let mut store = MemoryThemeStore::default();
        let mut scene = Scene::default();
        let mut manager = ThemeManager::new("timeline-theme");

        assert_eq!(manager.toggle(&mut store, &mut scene), Theme::Dark);
        assert_eq!(scene.toggle_label, "☀️ Light Theme");
        assert_eq!(manager.toggle(&mut store, &mut scene), Theme::Light);
        assert_eq!(scene.toggle_label, "🌙 Dark Theme");
        assert_eq!(store.read("timeline-theme").as_deref(), Some("light"));
    }

    #[test]
    fn restore_reads_saved_choice() {
        let mut store = MemoryThemeStore::default();
        let mut scene = Scene::default();
        ThemeManager::new("timeline-theme").toggle(&mut store, &mut scene);

        let mut reloaded_scene = Scene::default();
        let mut reloaded = ThemeManager::new("timeline-theme");
        assert_eq!(reloaded.restore(&store, &mut reloaded_scene), Theme::Dark);
        assert_eq!(reloaded_scene.theme, Theme::Dark);
    }

    #[test]
    fn restore_without_saved_value_stays_light() {
        let mut scene = Scene::default();
        let mut manager = ThemeManager::new("timeline-theme");

        assert_eq!(manager.restore(&MemoryThemeStore::default(), &mut scene), Theme::Light);
        assert_eq!(Theme::from_stored("DARK"), Theme::Light);
    }

    #[test]
    fn failed_write_still_flips_theme() {
        let mut scene = Scene::default();
        let mut manager = ThemeManager::new("timeline-theme");

        assert_eq!(manager.toggle(&mut BrokenStore, &mut scene), Theme::Dark);
        assert_eq!(scene.theme, Theme::Dark);
    }
}
