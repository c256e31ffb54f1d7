use std::io::{self, Write};

use timeline_core::{CardMarker, EventDetail, EventId, Rect, Scene, SceneBody};

/// Chiều cao cố định của một thẻ khi dựng bố cục headless.
pub const CARD_HEIGHT: f64 = 320.0;
pub const CARD_GAP: f64 = 24.0;
pub const CARD_WIDTH: f64 = 640.0;

/// Xếp các thẻ thành một cột, từ trên xuống.
pub fn column_layout(scene: &Scene) -> Vec<(EventId, Rect)> {
    scene
        .cards()
        .iter()
        .enumerate()
        .map(|(index, card)| {
            let top = index as f64 * (CARD_HEIGHT + CARD_GAP);
            (card.id, Rect::new(top, 0.0, CARD_WIDTH, CARD_HEIGHT))
        })
        .collect()
}

pub fn write_scene(scene: &Scene, out: &mut impl Write) -> io::Result<()> {
    writeln!(
        out,
        "Theme: {}  [{}]",
        scene.theme.as_str(),
        scene.toggle_label
    )?;

    match &scene.body {
        SceneBody::Blank => {}
        SceneBody::Empty(placeholder) => writeln!(out, "{placeholder}")?,
        SceneBody::Error(notice) => {
            writeln!(out, "{}", notice.heading)?;
            writeln!(out, "{}", notice.message)?;
        }
        SceneBody::Cards(cards) => {
            for card in cards {
                let marker = if scene.has_marker(card.id, CardMarker::AnimateIn) {
                    " *"
                } else {
                    ""
                };
                writeln!(out)?;
                writeln!(
                    out,
                    "{:>6}  {}  #{}{marker}",
                    card.year, card.category, card.id
                )?;
                writeln!(out, "        {}", card.title)?;
                writeln!(out, "        {}", card.summary)?;
                writeln!(
                    out,
                    "        image: {} (delay {})",
                    card.image.url,
                    card.animation_delay_css()
                )?;
            }
        }
    }
    Ok(())
}

pub fn write_detail(detail: &EventDetail, out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "── {} · {} ──", detail.year, detail.category)?;
    writeln!(out, "{}", detail.title)?;
    writeln!(out, "{}", detail.description)?;
    writeln!(out, "image: {}", detail.image.url)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use timeline_core::{render, TimelineConfig, TimelineEvent, View, EMPTY_PLACEHOLDER};

    fn scene_with(events: &[TimelineEvent]) -> Scene {
        let mut scene = Scene::default();
        render(events, &TimelineConfig::default(), &mut scene);
        scene
    }

    fn event(id: i64, year: i32) -> TimelineEvent {
        TimelineEvent {
            id,
            year,
            category: "Tech".to_string(),
            title: "A".to_string(),
            description: "short".to_string(),
            image_url: "x.jpg".to_string(),
        }
    }

    #[test]
    fn layout_stacks_cards() {
        let layout = column_layout(&scene_with(&[event(1, 1990), event(2, 1991)]));

        assert_eq!(layout.len(), 2);
        assert_eq!(layout[1].1.top, CARD_HEIGHT + CARD_GAP);
    }

    #[test]
    fn report_lists_cards_with_markers() {
        let mut scene = scene_with(&[event(1, 1990)]);
        scene.set_marker(1, CardMarker::AnimateIn, true);

        let mut out = Vec::new();
        write_scene(&scene, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("  1990  Tech  #1 *"));
        assert!(text.contains("short"));
        assert!(text.contains("image: x.jpg (delay 0s)"));
    }

    #[test]
    fn report_shows_placeholder() {
        let mut out = Vec::new();
        write_scene(&scene_with(&[]), &mut out).unwrap();

        assert!(String::from_utf8(out).unwrap().contains(EMPTY_PLACEHOLDER));
    }
}
