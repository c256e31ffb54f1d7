use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::event::EventId;
use crate::view::{CardMarker, View};
use crate::TimelineConfig;

/// Hình chữ nhật theo pixel, gốc ở góc trên bên trái.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }
}

/// Tỉ lệ diện tích `card` nằm trong `viewport` sau khi kéo cạnh dưới lên `bottom_margin` pixel.
pub fn visible_ratio(card: Rect, viewport: Rect, bottom_margin: f64) -> f64 {
    let area = card.area();
    if area <= 0.0 {
        return 0.0;
    }

    let root_bottom = viewport.bottom() - bottom_margin;
    let width = (card.right().min(viewport.right()) - card.left.max(viewport.left)).max(0.0);
    let height = (card.bottom().min(root_bottom) - card.top.max(viewport.top)).max(0.0);
    (width * height / area).min(1.0)
}

/// Gắn `animate-in` một lần cho mỗi thẻ khi thẻ đủ hiện trong khung nhìn.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollAnimator {
    threshold: f64,
    bottom_margin: f64,
    observed: Vec<EventId>,
    animated: BTreeSet<EventId>,
}

impl ScrollAnimator {
    pub fn new(config: &TimelineConfig) -> Self {
        Self {
            threshold: config.visibility_threshold,
            bottom_margin: config.bottom_margin_px,
            observed: Vec::new(),
            animated: BTreeSet::new(),
        }
    }

    /// Bắt đầu quan sát tập thẻ mới, thay cho tập cũ.
    pub fn observe(&mut self, cards: impl IntoIterator<Item = EventId>) {
        self.observed = cards.into_iter().collect();
        self.animated.clear();
    }

    pub fn observed(&self) -> &[EventId] {
        &self.observed
    }

    pub fn is_animated(&self, card: EventId) -> bool {
        self.animated.contains(&card)
    }

    /// Ghi nhận tỉ lệ hiển thị của một thẻ; trả `true` khi thẻ vừa được gắn hiệu ứng.
    pub fn record_visibility(&mut self, card: EventId, ratio: f64, view: &mut dyn View) -> bool {
        if ratio < self.threshold || !self.observed.contains(&card) || !self.animated.insert(card) {
            return false;
        }
        view.set_marker(card, CardMarker::AnimateIn, true);
        true
    }

    /// Đánh giá toàn bộ bố cục thẻ so với khung nhìn; trả số thẻ vừa được gắn hiệu ứng.
    pub fn scan(&mut self, layout: &[(EventId, Rect)], viewport: Rect, view: &mut dyn View) -> usize {
        layout
            .iter()
            .filter(|(card, rect)| {
                let ratio = visible_ratio(*rect, viewport, self.bottom_margin);
                self.record_visibility(*card, ratio, view)
            })
            .count()
    }
}
