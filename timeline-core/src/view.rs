use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::event::EventId;
use crate::renderer::{EventCard, EventDetail};
use crate::theme::Theme;

/// Đánh dấu trực quan gắn lên một thẻ.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum CardMarker {
    Hover,
    AnimateIn,
}

impl CardMarker {
    pub fn class_name(self) -> &'static str {
        match self {
            CardMarker::Hover => "hover-effect",
            CardMarker::AnimateIn => "animate-in",
        }
    }
}

/// Phần tử nhận focus bàn phím.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum FocusTarget {
    OverlayClose,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorNotice {
    pub heading: String,
    pub message: String,
}

/// Bề mặt hiển thị mà timeline điều khiển.
pub trait View {
    /// Thay toàn bộ danh sách bằng `cards`.
    fn render_cards(&mut self, cards: &[EventCard]);
    fn render_empty(&mut self, placeholder: &str);
    fn render_error(&mut self, notice: &ErrorNotice);
    fn show_overlay(&mut self, detail: &EventDetail);
    /// Ẩn overlay và xóa nội dung của nó.
    fn hide_overlay(&mut self);
    fn set_scroll_locked(&mut self, locked: bool);
    fn focus(&mut self, target: FocusTarget);
    fn set_marker(&mut self, card: EventId, marker: CardMarker, enabled: bool);
    fn apply_theme(&mut self, theme: Theme, toggle_label: &str);
}

/// Nội dung vùng danh sách.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub enum SceneBody {
    #[default]
    Blank,
    Cards(Vec<EventCard>),
    Empty(String),
    Error(ErrorNotice),
}

/// Ảnh chụp headless mọi thứ view đã được yêu cầu hiển thị.
///
/// Dùng cho test, cho CLI và làm mô hình render của component Yew.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Scene {
    pub body: SceneBody,
    pub overlay: Option<EventDetail>,
    pub scroll_locked: bool,
    pub focus: Option<FocusTarget>,
    /// Tăng mỗi lần có yêu cầu focus, kể cả khi mục tiêu không đổi.
    pub focus_requests: u32,
    pub theme: Theme,
    pub toggle_label: String,
    markers: BTreeMap<EventId, BTreeSet<CardMarker>>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            body: SceneBody::Blank,
            overlay: None,
            scroll_locked: false,
            focus: None,
            focus_requests: 0,
            theme: Theme::Light,
            toggle_label: Theme::Light.toggle_label().to_string(),
            markers: BTreeMap::new(),
        }
    }
}

impl Scene {
    pub fn cards(&self) -> &[EventCard] {
        match &self.body {
            SceneBody::Cards(cards) => cards,
            _ => &[],
        }
    }

    pub fn has_marker(&self, card: EventId, marker: CardMarker) -> bool {
        self.markers
            .get(&card)
            .is_some_and(|markers| markers.contains(&marker))
    }

    /// Danh sách class CSS của thẻ, ví dụ `event-card hover-effect`.
    pub fn card_classes(&self, card: EventId) -> String {
        let mut classes = String::from("event-card");
        if let Some(markers) = self.markers.get(&card) {
            for marker in markers {
                classes.push(' ');
                classes.push_str(marker.class_name());
            }
        }
        classes
    }
}

impl View for Scene {
    fn render_cards(&mut self, cards: &[EventCard]) {
        self.markers.clear();
        self.body = SceneBody::Cards(cards.to_vec());
    }

    fn render_empty(&mut self, placeholder: &str) {
        self.markers.clear();
        self.body = SceneBody::Empty(placeholder.to_string());
    }

    fn render_error(&mut self, notice: &ErrorNotice) {
        self.markers.clear();
        self.body = SceneBody::Error(notice.clone());
    }

    fn show_overlay(&mut self, detail: &EventDetail) {
        self.overlay = Some(detail.clone());
    }

    fn hide_overlay(&mut self) {
        self.overlay = None;
        self.focus = None;
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.scroll_locked = locked;
    }

    fn focus(&mut self, target: FocusTarget) {
        self.focus = Some(target);
        self.focus_requests = self.focus_requests.wrapping_add(1);
    }

    fn set_marker(&mut self, card: EventId, marker: CardMarker, enabled: bool) {
        if enabled {
            self.markers.entry(card).or_default().insert(marker);
        } else if let Some(markers) = self.markers.get_mut(&card) {
            markers.remove(&marker);
            if markers.is_empty() {
                self.markers.remove(&card);
            }
        }
    }

    fn apply_theme(&mut self, theme: Theme, toggle_label: &str) {
        self.theme = theme;
        self.toggle_label = toggle_label.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_render_as_classes() {
        let mut scene = Scene::default();
        scene.set_marker(4, CardMarker::AnimateIn, true);
        scene.set_marker(4, CardMarker::Hover, true);

        assert_eq!(scene.card_classes(4), "event-card hover-effect animate-in");
        assert_eq!(scene.card_classes(5), "event-card");

        scene.set_marker(4, CardMarker::Hover, false);
        assert_eq!(scene.card_classes(4), "event-card animate-in");
    }

    #[test]
    fn rerender_drops_markers() {
        let mut scene = Scene::default();
        scene.set_marker(1, CardMarker::AnimateIn, true);
        scene.render_empty("none");

        assert!(!scene.has_marker(1, CardMarker::AnimateIn));
    }
}
