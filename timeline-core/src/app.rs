use crate::animator::{Rect, ScrollAnimator};
use crate::event::{EventCatalog, EventId};
use crate::interaction::{Control, InteractionController, OverlayState, UiEvent};
use crate::loader::{load, EventSource};
use crate::renderer::{render, render_error};
use crate::theme::{Theme, ThemeManager, ThemeStore};
use crate::view::View;
use crate::{TimelineConfig, TimelineError};

/// Ngữ cảnh ứng dụng: sở hữu danh sách sự kiện, trạng thái overlay, theme và hiệu ứng cuộn.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineApp {
    config: TimelineConfig,
    catalog: EventCatalog,
    interaction: InteractionController,
    theme: ThemeManager,
    animator: ScrollAnimator,
    load_error: Option<TimelineError>,
}

impl TimelineApp {
    pub fn new(config: TimelineConfig) -> Self {
        Self {
            catalog: EventCatalog::empty(),
            interaction: InteractionController::default(),
            theme: ThemeManager::new(config.theme_storage_key.clone()),
            animator: ScrollAnimator::new(&config),
            load_error: None,
            config,
        }
    }

    pub fn catalog(&self) -> &EventCatalog {
        &self.catalog
    }

    pub fn overlay(&self) -> OverlayState {
        self.interaction.overlay()
    }

    pub fn theme(&self) -> Theme {
        self.theme.theme()
    }

    pub fn load_error(&self) -> Option<&TimelineError> {
        self.load_error.as_ref()
    }

    pub fn restore_theme(&mut self, store: &dyn ThemeStore, view: &mut dyn View) -> Theme {
        self.theme.restore(store, view)
    }

    /// Trình tự khởi động: khôi phục theme, tải dữ liệu, render.
    pub async fn start<S: EventSource>(
        &mut self,
        source: &S,
        store: &dyn ThemeStore,
        view: &mut dyn View,
    ) {
        self.restore_theme(store, view);
        let result = load(source, &self.config.data_url).await;
        self.apply_load(result, view);
    }

    /// Nhận kết quả tải. Lỗi thì hiển thị thông báo và giữ danh sách rỗng.
    pub fn apply_load(&mut self, result: Result<EventCatalog, TimelineError>, view: &mut dyn View) {
        match result {
            Ok(catalog) => {
                self.catalog = catalog;
                self.load_error = None;
                self.render(view);
            }
            Err(err) => {
                self.catalog = EventCatalog::empty();
                render_error(&err, view);
                self.load_error = Some(err);
            }
        }
    }

    pub fn render(&self, view: &mut dyn View) {
        render(self.catalog.events(), &self.config, view);
    }

    /// Định tuyến sự kiện đầu vào tới bộ điều khiển phù hợp.
    pub fn dispatch(
        &mut self,
        event: UiEvent,
        view: &mut dyn View,
        store: &mut dyn ThemeStore,
    ) -> bool {
        match event {
            UiEvent::Activate(Control::ThemeToggle) => {
                self.theme.toggle(store, view);
                true
            }
            other => self
                .interaction
                .handle(other, &self.catalog, &self.config, view),
        }
    }

    /// Bắt đầu quan sát mọi thẻ đang hiển thị; trả về id các thẻ được quan sát.
    pub fn begin_observing(&mut self) -> &[EventId] {
        self.animator
            .observe(self.catalog.events().iter().map(|event| event.id));
        self.animator.observed()
    }

    pub fn record_visibility(&mut self, card: EventId, ratio: f64, view: &mut dyn View) -> bool {
        self.animator.record_visibility(card, ratio, view)
    }

    pub fn scan_viewport(
        &mut self,
        layout: &[(EventId, Rect)],
        viewport: Rect,
        view: &mut dyn View,
    ) -> usize {
        self.animator.scan(layout, viewport, view)
    }

    pub fn is_animated(&self, card: EventId) -> bool {
        self.animator.is_animated(card)
    }
}
