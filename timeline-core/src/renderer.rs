use serde::Serialize;

use crate::event::{EventId, TimelineEvent};
use crate::text::truncate_text;
use crate::view::{ErrorNotice, View};
use crate::{TimelineConfig, TimelineError};

/// Nội dung hiển thị khi không có sự kiện.
pub const EMPTY_PLACEHOLDER: &str = "No events to display.";
/// Tiêu đề thông báo lỗi tải dữ liệu.
pub const ERROR_HEADING: &str = "⚠️ Error";

/// Ảnh sự kiện kèm ảnh thay thế khi tải lỗi.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ImageSource {
    pub url: String,
    pub fallback: String,
    pub alt: String,
}

impl ImageSource {
    /// URL thay thế sau khi ảnh đang hiển thị (`current`) báo lỗi.
    ///
    /// Trả `None` khi chính ảnh thay thế đã lỗi, để không lặp vô hạn.
    pub fn on_error(&self, current: &str) -> Option<&str> {
        if self.fallback.is_empty() || current.ends_with(self.fallback.as_str()) {
            None
        } else {
            Some(&self.fallback)
        }
    }
}

/// Thẻ sự kiện trong danh sách.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EventCard {
    pub id: EventId,
    pub year: i32,
    pub category: String,
    pub title: String,
    /// Mô tả đã cắt ngắn.
    pub summary: String,
    pub image: ImageSource,
    pub animation_delay_ms: u64,
}

impl EventCard {
    /// Giá trị `animation-delay` cho CSS, ví dụ `0.3s`.
    pub fn animation_delay_css(&self) -> String {
        format!("{}s", self.animation_delay_ms as f64 / 1000.0)
    }
}

/// Nội dung đầy đủ của overlay chi tiết.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EventDetail {
    pub id: EventId,
    pub year: i32,
    pub category: String,
    pub title: String,
    pub description: String,
    pub image: ImageSource,
}

fn image_for(event: &TimelineEvent, config: &TimelineConfig) -> ImageSource {
    ImageSource {
        url: event.image_url.clone(),
        fallback: config.placeholder_image.clone(),
        alt: event.title.clone(),
    }
}

/// Dựng thẻ cho sự kiện ở vị trí `index`; độ trễ hiệu ứng tăng dần theo vị trí.
pub fn event_card(event: &TimelineEvent, index: usize, config: &TimelineConfig) -> EventCard {
    EventCard {
        id: event.id,
        year: event.year,
        category: event.category.clone(),
        title: event.title.clone(),
        summary: truncate_text(&event.description, config.description_limit).into_owned(),
        image: image_for(event, config),
        animation_delay_ms: config.stagger_step_ms.saturating_mul(index as u64),
    }
}

pub fn event_detail(event: &TimelineEvent, config: &TimelineConfig) -> EventDetail {
    EventDetail {
        id: event.id,
        year: event.year,
        category: event.category.clone(),
        title: event.title.clone(),
        description: event.description.clone(),
        image: image_for(event, config),
    }
}

/// Thay toàn bộ nội dung danh sách bằng các thẻ theo đúng thứ tự `events`.
pub fn render(events: &[TimelineEvent], config: &TimelineConfig, view: &mut dyn View) {
    if events.is_empty() {
        view.render_empty(EMPTY_PLACEHOLDER);
        return;
    }

    let cards: Vec<EventCard> = events
        .iter()
        .enumerate()
        .map(|(index, event)| event_card(event, index, config))
        .collect();
    view.render_cards(&cards);
}

pub fn render_error(error: &TimelineError, view: &mut dyn View) {
    view.render_error(&ErrorNotice {
        heading: ERROR_HEADING.to_string(),
        message: error.to_string(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{Scene, SceneBody};

    fn sample(id: EventId, description: &str) -> TimelineEvent {
        TimelineEvent {
            id,
            year: 1990,
            category: "Tech".to_string(),
            title: "A".to_string(),
            description: description.to_string(),
            image_url: "x.jpg".to_string(),
        }
    }

    #[test]
    fn card_delay_grows_with_position() {
        let config = TimelineConfig::default();
        let event = sample(1, "short");

        assert_eq!(event_card(&event, 0, &config).animation_delay_css(), "0s");
        assert_eq!(event_card(&event, 3, &config).animation_delay_css(), "0.3s");
        assert_eq!(event_card(&event, 12, &config).animation_delay_css(), "1.2s");
    }

    #[test]
    fn card_truncates_but_detail_does_not() {
        let config = TimelineConfig::default();
        let long = "x".repeat(150);
        let event = sample(1, &long);

        assert_eq!(event_card(&event, 0, &config).summary.chars().count(), 103);
        assert_eq!(event_detail(&event, &config).description, long);
    }

    #[test]
    fn image_falls_back_once() {
        let image = event_card(&sample(1, ""), 0, &TimelineConfig::default()).image;

        assert_eq!(image.url, "x.jpg");
        assert_eq!(image.fallback, "assets/placeholder.jpg");
        assert_eq!(image.on_error("https://site/x.jpg"), Some("assets/placeholder.jpg"));
        assert_eq!(image.on_error("https://site/assets/placeholder.jpg"), None);
    }

    #[test]
    fn empty_list_renders_placeholder() {
        let mut scene = Scene::default();
        render(&[], &TimelineConfig::default(), &mut scene);

        assert_eq!(scene.body, SceneBody::Empty(EMPTY_PLACEHOLDER.to_string()));
        assert!(scene.cards().is_empty());
    }

    #[test]
    fn error_notice_replaces_cards() {
        let mut scene = Scene::default();
        render(&[sample(1, "a")], &TimelineConfig::default(), &mut scene);
        assert_eq!(scene.cards().len(), 1);

        render_error(
            &TimelineError::load_failure("data/events.json", "HTTP error! status: 500"),
            &mut scene,
        );
        assert!(scene.cards().is_empty());
        match &scene.body {
            SceneBody::Error(notice) => {
                assert_eq!(notice.heading, ERROR_HEADING);
                assert!(notice.message.contains("data/events.json"));
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }
}
