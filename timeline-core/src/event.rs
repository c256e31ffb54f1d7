use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Khóa tra cứu sự kiện.
pub type EventId = i64;

/// Một sự kiện trên timeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimelineEvent {
    pub id: EventId,
    pub year: i32,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "imageURL")]
    pub image_url: String,
}

/// Tài liệu JSON đầu vào: `{ "events": [...] }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventDocument {
    pub events: Vec<TimelineEvent>,
}

/// Danh sách sự kiện đã nạp, sắp xếp tăng dần theo năm và không đổi sau khi nạp.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EventCatalog {
    pub loaded_at: DateTime<Utc>,
    events: Vec<TimelineEvent>,
}

impl EventCatalog {
    /// Sắp xếp ổn định theo năm; các sự kiện cùng năm giữ thứ tự ban đầu.
    pub fn new(mut events: Vec<TimelineEvent>) -> Self {
        events.sort_by_key(|event| event.year);
        Self {
            loaded_at: Utc::now(),
            events,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Tìm tuyến tính, trả về sự kiện đầu tiên có `id` khớp.
    pub fn find(&self, id: EventId) -> Option<&TimelineEvent> {
        self.events.iter().find(|event| event.id == id)
    }
}

impl From<EventDocument> for EventCatalog {
    fn from(document: EventDocument) -> Self {
        Self::new(document.events)
    }
}
