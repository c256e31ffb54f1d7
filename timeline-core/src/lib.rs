//! Logic lõi của timeline: tải sự kiện, dựng thẻ, overlay chi tiết, theme và hiệu ứng cuộn.
//!
//! Crate không phụ thuộc framework giao diện. Mọi đầu ra đi qua [`View`],
//! lưu trữ theme đi qua [`ThemeStore`], đọc dữ liệu đi qua [`EventSource`].

mod animator;
mod app;
mod event;
mod interaction;
mod loader;
mod renderer;
mod text;
mod theme;
mod view;

use serde::{Deserialize, Serialize};

pub use animator::{visible_ratio, Rect, ScrollAnimator};
pub use app::TimelineApp;
pub use event::{EventCatalog, EventDocument, EventId, TimelineEvent};
pub use interaction::{Control, InteractionController, Key, OverlayState, UiEvent};
pub use loader::{load, parse_document, EventSource, FetchResponse};
pub use renderer::{
    event_card, event_detail, render, render_error, EventCard, EventDetail, ImageSource,
    EMPTY_PLACEHOLDER, ERROR_HEADING,
};
pub use text::truncate_text;
pub use theme::{MemoryThemeStore, Theme, ThemeManager, ThemeStore, DARK_THEME_CLASS};
pub use view::{CardMarker, ErrorNotice, FocusTarget, Scene, SceneBody, View};

/// Cấu hình hiển thị và các hằng số của timeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelineConfig {
    /// Đường dẫn tương đối tới tài liệu JSON chứa sự kiện.
    pub data_url: String,
    /// Ảnh thay thế khi ảnh sự kiện không tải được.
    pub placeholder_image: String,
    /// Số ký tự mô tả hiển thị trên thẻ trước khi cắt.
    pub description_limit: usize,
    /// Khóa lưu lựa chọn theme.
    pub theme_storage_key: String,
    /// Độ trễ hiệu ứng xuất hiện giữa hai thẻ liên tiếp (ms).
    pub stagger_step_ms: u64,
    /// Thời gian chờ DOM ổn định trước khi quan sát thẻ (ms).
    pub observe_delay_ms: u32,
    /// Tỉ lệ diện tích thẻ phải hiện ra để kích hoạt hiệu ứng.
    pub visibility_threshold: f64,
    /// Số pixel thu hẹp cạnh dưới vùng quan sát.
    pub bottom_margin_px: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            data_url: "data/events.json".to_string(),
            placeholder_image: "assets/placeholder.jpg".to_string(),
            description_limit: 100,
            theme_storage_key: "timeline-theme".to_string(),
            stagger_step_ms: 100,
            observe_delay_ms: 100,
            visibility_threshold: 0.1,
            bottom_margin_px: 50.0,
        }
    }
}

impl TimelineConfig {
    /// Chuỗi `rootMargin` cho `IntersectionObserver`.
    pub fn root_margin(&self) -> String {
        format!("0px 0px -{}px 0px", self.bottom_margin_px)
    }
}

/// Cấu hình một phần do phía JavaScript truyền vào; trường nào thiếu giữ mặc định.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigOverrides {
    #[serde(default)]
    pub data_url: Option<String>,
    #[serde(default)]
    pub placeholder_image: Option<String>,
    #[serde(default)]
    pub description_limit: Option<usize>,
    #[serde(default)]
    pub theme_storage_key: Option<String>,
    #[serde(default)]
    pub stagger_step_ms: Option<u64>,
    #[serde(default)]
    pub observe_delay_ms: Option<u32>,
    #[serde(default)]
    pub visibility_threshold: Option<f64>,
    #[serde(default)]
    pub bottom_margin_px: Option<f64>,
}

impl From<ConfigOverrides> for TimelineConfig {
    fn from(cfg: ConfigOverrides) -> Self {
        let mut base = TimelineConfig::default();
        if let Some(url) = cfg.data_url {
            base.data_url = url;
        }
        if let Some(image) = cfg.placeholder_image {
            base.placeholder_image = image;
        }
        if let Some(limit) = cfg.description_limit {
            base.description_limit = limit;
        }
        if let Some(key) = cfg.theme_storage_key {
            base.theme_storage_key = key;
        }
        if let Some(step) = cfg.stagger_step_ms {
            base.stagger_step_ms = step;
        }
        if let Some(delay) = cfg.observe_delay_ms {
            base.observe_delay_ms = delay;
        }
        if let Some(threshold) = cfg.visibility_threshold {
            base.visibility_threshold = threshold;
        }
        if let Some(margin) = cfg.bottom_margin_px {
            base.bottom_margin_px = margin;
        }
        base
    }
}

/// Lỗi khi tạo timeline. Chỉ có một loại lỗi được mô hình hóa: không tải được dữ liệu.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimelineError {
    #[error("Failed to load timeline events. Please check if {resource} exists.")]
    LoadFailure {
        /// Tài nguyên được yêu cầu.
        resource: String,
        /// Nguyên nhân chi tiết, chỉ dùng cho log.
        cause: String,
    },
}

impl TimelineError {
    pub fn load_failure(resource: &str, cause: impl Into<String>) -> Self {
        Self::LoadFailure {
            resource: resource.to_string(),
            cause: cause.into(),
        }
    }

    /// Nguyên nhân gốc của lỗi.
    pub fn cause(&self) -> &str {
        match self {
            Self::LoadFailure { cause, .. } => cause,
        }
    }
}
