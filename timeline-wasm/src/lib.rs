//! Bridge WASM <-> JavaScript trung lập framework.

use serde::Serialize;
use serde_wasm_bindgen::{from_value, to_value};
use timeline_core::{
    event_detail, render, ConfigOverrides, EventCard, EventCatalog, EventDetail, EventDocument,
    EventId, Scene, SceneBody, TimelineConfig,
};
use wasm_bindgen::prelude::*;

#[derive(Debug, Serialize)]
struct PreparedTimeline {
    cards: Vec<EventCard>,
    placeholder: Option<String>,
}

fn read_config(config: Option<JsValue>) -> Result<TimelineConfig, JsValue> {
    match config {
        Some(js_cfg) if !js_cfg.is_undefined() && !js_cfg.is_null() => {
            let cfg: ConfigOverrides = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Không đọc được config: {err}")))?;
            Ok(TimelineConfig::from(cfg))
        }
        _ => Ok(TimelineConfig::default()),
    }
}

fn read_catalog(document: JsValue) -> Result<EventCatalog, JsValue> {
    let value = from_value::<serde_json::Value>(document)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được JSON: {err}")))?;

    catalog_from_value(value).map_err(|err| JsValue::from_str(&err))
}

fn catalog_from_value(value: serde_json::Value) -> Result<EventCatalog, String> {
    serde_json::from_value::<EventDocument>(value)
        .map(EventCatalog::from)
        .map_err(|err| format!("Không đọc được tài liệu sự kiện: {err}"))
}

/// Id từ JavaScript chỉ hợp lệ khi là số nguyên nằm trong miền `i64`.
fn event_id(id: f64) -> Option<EventId> {
    let in_range = id >= EventId::MIN as f64 && id < EventId::MAX as f64;
    (id.is_finite() && id.fract() == 0.0 && in_range).then_some(id as EventId)
}

fn prepare(catalog: &EventCatalog, config: &TimelineConfig) -> PreparedTimeline {
    let mut scene = Scene::default();
    render(catalog.events(), config, &mut scene);

    match scene.body {
        SceneBody::Empty(placeholder) => PreparedTimeline {
            cards: Vec::new(),
            placeholder: Some(placeholder),
        },
        SceneBody::Cards(cards) => PreparedTimeline {
            cards,
            placeholder: None,
        },
        SceneBody::Blank | SceneBody::Error(_) => PreparedTimeline {
            cards: Vec::new(),
            placeholder: None,
        },
    }
}

fn detail_for(catalog: &EventCatalog, id: f64, config: &TimelineConfig) -> Option<EventDetail> {
    let event = catalog.find(event_id(id)?)?;
    Some(event_detail(event, config))
}

/// Sắp xếp sự kiện và dựng mô hình thẻ để phía JavaScript tự render.
#[wasm_bindgen]
pub fn prepare_timeline(document: JsValue, config: Option<JsValue>) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let cfg = read_config(config)?;
    let catalog = read_catalog(document)?;

    to_value(&prepare(&catalog, &cfg))
        .map_err(|err| JsValue::from_str(&format!("Không serialize timeline: {err}")))
}

/// Nội dung overlay cho sự kiện `id`; `null` nếu không tìm thấy.
#[wasm_bindgen]
pub fn event_detail_for(
    document: JsValue,
    id: f64,
    config: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    let cfg = read_config(config)?;
    let catalog = read_catalog(document)?;

    match detail_for(&catalog, id, &cfg) {
        Some(detail) => to_value(&detail)
            .map_err(|err| JsValue::from_str(&format!("Không serialize chi tiết: {err}"))),
        None => Ok(JsValue::NULL),
    }
}

/// Cắt mô tả theo cùng quy tắc với thẻ.
#[wasm_bindgen]
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    timeline_core::truncate_text(text, max_chars).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use timeline_core::EMPTY_PLACEHOLDER;

    fn catalog() -> EventCatalog {
        catalog_from_value(json!({
            "events": [
                { "id": 2, "year": 1989, "category": "Tech", "title": "Web", "description": "b", "imageURL": "b.jpg" },
                { "id": 1, "year": 1903, "category": "Flight", "title": "Kitty Hawk", "description": "a", "imageURL": "a.jpg" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn only_whole_numbers_are_event_ids() {
        assert_eq!(event_id(1.0), Some(1));
        assert_eq!(event_id(-3.0), Some(-3));
        assert_eq!(event_id(1.9), None);
        assert_eq!(event_id(f64::NAN), None);
        assert_eq!(event_id(f64::INFINITY), None);
        assert_eq!(event_id(1e300), None);
    }

    #[test]
    fn detail_lookup_needs_exact_id() {
        let catalog = catalog();
        let config = TimelineConfig::default();

        let detail = detail_for(&catalog, 1.0, &config).unwrap();
        assert_eq!(detail.title, "Kitty Hawk");
        assert!(detail_for(&catalog, 1.9, &config).is_none());
        assert!(detail_for(&catalog, f64::NAN, &config).is_none());
        assert!(detail_for(&catalog, 5.0, &config).is_none());
    }

    #[test]
    fn malformed_document_reports_unreadable_json() {
        let err = catalog_from_value(json!({ "items": [] })).unwrap_err();

        assert!(err.starts_with("Không đọc được tài liệu sự kiện"));
        assert!(!err.contains("exists"));
    }

    #[test]
    fn prepared_cards_follow_renderer_order() {
        let prepared = prepare(&catalog(), &TimelineConfig::default());

        let ids: Vec<_> = prepared.cards.iter().map(|card| card.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(prepared.cards[1].animation_delay_ms, 100);
        assert_eq!(prepared.placeholder, None);
    }

    #[test]
    fn empty_document_prepares_placeholder() {
        let empty = catalog_from_value(json!({ "events": [] })).unwrap();
        let prepared = prepare(&empty, &TimelineConfig::default());

        assert!(prepared.cards.is_empty());
        assert_eq!(prepared.placeholder.as_deref(), Some(EMPTY_PLACEHOLDER));
    }
}
