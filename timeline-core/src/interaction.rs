use serde::{Deserialize, Serialize};

use crate::event::{EventCatalog, EventId};
use crate::renderer::event_detail;
use crate::view::{CardMarker, FocusTarget, View};
use crate::TimelineConfig;

/// Điều khiển người dùng có thể kích hoạt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Control {
    /// Nút "Learn More" trên thẻ.
    LearnMore(EventId),
    /// Nút `×` hoặc nút "Close" trong overlay.
    CloseButton,
    /// Vùng nền overlay, bên ngoài khung nội dung.
    OverlayBackdrop,
    /// Bên trong khung nội dung overlay.
    OverlayContent,
    ThemeToggle,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

impl Key {
    /// Ánh xạ từ `KeyboardEvent.key`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Escape" => Key::Escape,
            _ => Key::Other,
        }
    }
}

/// Sự kiện đầu vào đã được định tuyến tới một điều khiển cụ thể.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum UiEvent {
    Activate(Control),
    KeyDown(Key),
    PointerEnter(EventId),
    PointerLeave(EventId),
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub enum OverlayState {
    #[default]
    Closed,
    Open(EventId),
}

/// Máy trạng thái overlay chi tiết và hiệu ứng hover của thẻ.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionController {
    overlay: OverlayState,
}

impl InteractionController {
    pub fn overlay(&self) -> OverlayState {
        self.overlay
    }

    pub fn is_open(&self) -> bool {
        matches!(self.overlay, OverlayState::Open(_))
    }

    /// Mở overlay cho sự kiện `id`. Id không tồn tại thì bỏ qua.
    pub fn open(
        &mut self,
        catalog: &EventCatalog,
        id: EventId,
        config: &TimelineConfig,
        view: &mut dyn View,
    ) -> bool {
        let Some(event) = catalog.find(id) else {
            tracing::debug!(id, "no event for overlay");
            return false;
        };

        view.show_overlay(&event_detail(event, config));
        view.set_scroll_locked(true);
        view.focus(FocusTarget::OverlayClose);
        self.overlay = OverlayState::Open(id);
        tracing::debug!(id, "overlay opened");
        true
    }

    /// Đóng overlay, mở lại cuộn nền và xóa nội dung.
    pub fn close(&mut self, view: &mut dyn View) -> bool {
        if !self.is_open() {
            return false;
        }

        view.hide_overlay();
        view.set_scroll_locked(false);
        self.overlay = OverlayState::Closed;
        tracing::debug!("overlay closed");
        true
    }

    /// Xử lý một sự kiện đầu vào; trả `true` nếu trạng thái hiển thị thay đổi.
    ///
    /// `ThemeToggle` không thuộc bộ điều khiển này và luôn trả `false`.
    pub fn handle(
        &mut self,
        event: UiEvent,
        catalog: &EventCatalog,
        config: &TimelineConfig,
        view: &mut dyn View,
    ) -> bool {
        match event {
            UiEvent::Activate(Control::LearnMore(id)) => self.open(catalog, id, config, view),
            UiEvent::Activate(Control::CloseButton | Control::OverlayBackdrop) => self.close(view),
            UiEvent::Activate(Control::OverlayContent | Control::ThemeToggle) => false,
            UiEvent::KeyDown(Key::Escape) => self.close(view),
            UiEvent::KeyDown(Key::Other) => false,
            UiEvent::PointerEnter(id) => {
                view.set_marker(id, CardMarker::Hover, true);
                true
            }
            UiEvent::PointerLeave(id) => {
                view.set_marker(id, CardMarker::Hover, false);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::TimelineEvent;
    use crate::view::Scene;

    fn catalog() -> EventCatalog {
        EventCatalog::new(vec![TimelineEvent {
            id: 1,
            year: 1990,
            category: "Tech".to_string(),
            title: "A".to_string(),
            description: "d".repeat(140),
            image_url: "x.jpg".to_string(),
        }])
    }

    fn opened() -> (InteractionController, Scene) {
        let mut controller = InteractionController::default();
        let mut scene = Scene::default();
        assert!(controller.open(&catalog(), 1, &TimelineConfig::default(), &mut scene));
        (controller, scene)
    }

    #[test]
    fn open_shows_full_detail_and_locks_scroll() {
        let (controller, scene) = opened();

        assert_eq!(controller.overlay(), OverlayState::Open(1));
        assert_eq!(scene.overlay.as_ref().map(|d| d.description.len()), Some(140));
        assert!(scene.scroll_locked);
        assert_eq!(scene.focus, Some(FocusTarget::OverlayClose));
    }

    #[test]
    fn unknown_id_stays_closed() {
        let mut controller = InteractionController::default();
        let mut scene = Scene::default();

        assert!(!controller.open(&catalog(), 99, &TimelineConfig::default(), &mut scene));
        assert_eq!(controller.overlay(), OverlayState::Closed);
        assert!(scene.overlay.is_none());
        assert!(!scene.scroll_locked);
    }

    #[test]
    fn every_close_path_restores_scroll_and_clears_content() {
        let config = TimelineConfig::default();
        for event in [
            UiEvent::Activate(Control::CloseButton),
            UiEvent::Activate(Control::OverlayBackdrop),
            UiEvent::KeyDown(Key::Escape),
        ] {
            let (mut controller, mut scene) = opened();
            assert!(controller.handle(event, &catalog(), &config, &mut scene));
            assert!(!controller.is_open(), "{event:?}");
            assert!(scene.overlay.is_none(), "{event:?}");
            assert!(!scene.scroll_locked, "{event:?}");
            assert!(scene.focus.is_none(), "{event:?}");
        }
    }

    #[test]
    fn clicks_inside_content_keep_overlay_open() {
        let (mut controller, mut scene) = opened();
        let handled = controller.handle(
            UiEvent::Activate(Control::OverlayContent),
            &catalog(),
            &TimelineConfig::default(),
            &mut scene,
        );

        assert!(!handled);
        assert!(controller.is_open());
        assert!(scene.scroll_locked);
    }

    #[test]
    fn escape_while_closed_is_ignored() {
        let mut controller = InteractionController::default();
        let mut scene = Scene::default();

        assert!(!controller.handle(
            UiEvent::KeyDown(Key::from_name("Escape")),
            &catalog(),
            &TimelineConfig::default(),
            &mut scene,
        ));
        assert_eq!(Key::from_name("Enter"), Key::Other);
    }

    #[test]
    fn hover_marks_only_that_card() {
        let mut controller = InteractionController::default();
        let mut scene = Scene::default();
        let config = TimelineConfig::default();

        controller.handle(UiEvent::PointerEnter(1), &catalog(), &config, &mut scene);
        assert!(scene.has_marker(1, CardMarker::Hover));
        assert!(!scene.has_marker(2, CardMarker::Hover));

        controller.handle(UiEvent::PointerLeave(1), &catalog(), &config, &mut scene);
        assert!(!scene.has_marker(1, CardMarker::Hover));
    }
}
