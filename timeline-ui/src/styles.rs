#![cfg(target_arch = "wasm32")]

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Node};

const STYLE_TAG_SELECTOR: &str = "style[data-timeline-ui]";

/// Default CSS for the component along with easy-to-override design tokens.
///
/// Dark mode only swaps tokens; `body.dark-theme` is toggled by the theme control.
pub const DEFAULT_STYLES: &str = r#"
:root {
  --timeline-font-family: 'Inter', system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
  --timeline-bg: #f8fafc;
  --timeline-card-bg: #ffffff;
  --timeline-card-border: rgba(148, 163, 184, 0.28);
  --timeline-radius: 16px;
  --timeline-text: #1f2933;
  --timeline-muted: #52606d;
  --timeline-heading: #11181c;
  --timeline-accent: #2563eb;
  --timeline-accent-text: #ffffff;
  --timeline-chip-bg: rgba(37, 99, 235, 0.12);
  --timeline-chip-text: #1d4ed8;
  --timeline-shadow: 0 18px 36px rgba(15, 23, 42, 0.1);
  --timeline-shadow-hover: 0 24px 48px rgba(15, 23, 42, 0.18);
  --timeline-overlay-bg: rgba(15, 23, 42, 0.62);
  --timeline-error-bg: rgba(180, 35, 24, 0.1);
  --timeline-error-text: #b42318;
}

body.dark-theme {
  --timeline-bg: #0f172a;
  --timeline-card-bg: #1e293b;
  --timeline-card-border: rgba(148, 163, 184, 0.18);
  --timeline-text: #e2e8f0;
  --timeline-muted: #94a3b8;
  --timeline-heading: #f8fafc;
  --timeline-accent: #60a5fa;
  --timeline-accent-text: #0f172a;
  --timeline-chip-bg: rgba(96, 165, 250, 0.16);
  --timeline-chip-text: #93c5fd;
  --timeline-shadow: 0 18px 36px rgba(0, 0, 0, 0.4);
  --timeline-shadow-hover: 0 24px 48px rgba(0, 0, 0, 0.55);
  --timeline-overlay-bg: rgba(2, 6, 23, 0.78);
  --timeline-error-bg: rgba(248, 113, 113, 0.12);
  --timeline-error-text: #fca5a5;
  background: var(--timeline-bg);
}

.timeline-app {
  font-family: var(--timeline-font-family);
  background: var(--timeline-bg);
  color: var(--timeline-text);
  min-height: 100vh;
  padding: 32px 28px 64px;
  transition: background 0.3s ease, color 0.3s ease;
}

.timeline-header {
  display: flex;
  align-items: center;
  justify-content: space-between;
  gap: 16px;
  max-width: 960px;
  margin: 0 auto 28px;
}

.timeline-header h1 {
  margin: 0;
  font-size: 1.8rem;
  color: var(--timeline-heading);
}

.theme-toggle {
  border: 1px solid var(--timeline-card-border);
  background: var(--timeline-card-bg);
  color: var(--timeline-text);
  border-radius: 999px;
  padding: 8px 16px;
  font: inherit;
  cursor: pointer;
}

.theme-toggle:focus-visible,
.learn-more-btn:focus-visible,
.close-modal:focus-visible {
  outline: 2px solid var(--timeline-accent);
  outline-offset: 2px;
}

.timeline-container {
  display: grid;
  gap: 24px;
  max-width: 960px;
  margin: 0 auto;
  grid-template-columns: repeat(auto-fill, minmax(280px, 1fr));
}

.event-card {
  background: var(--timeline-card-bg);
  border: 1px solid var(--timeline-card-border);
  border-radius: var(--timeline-radius);
  box-shadow: var(--timeline-shadow);
  overflow: hidden;
  opacity: 0;
  transform: translateY(24px);
  animation: timeline-fade-in-up 0.6s ease forwards;
  transition: transform 0.25s ease, box-shadow 0.25s ease;
}

.event-card.animate-in {
  opacity: 1;
  transform: translateY(0);
}

.event-card.hover-effect {
  transform: translateY(-4px);
  box-shadow: var(--timeline-shadow-hover);
}

@keyframes timeline-fade-in-up {
  from {
    opacity: 0;
    transform: translateY(24px);
  }
  to {
    opacity: 1;
    transform: translateY(0);
  }
}

.event-header {
  display: flex;
  align-items: center;
  justify-content: space-between;
  padding: 14px 18px;
}

.event-year {
  font-size: 1.4rem;
  font-weight: 700;
  color: var(--timeline-accent);
}

.event-category {
  background: var(--timeline-chip-bg);
  color: var(--timeline-chip-text);
  border-radius: 999px;
  padding: 4px 12px;
  font-size: 0.8rem;
  font-weight: 600;
  text-transform: uppercase;
  letter-spacing: 0.04em;
}

.event-figure {
  margin: 0;
}

.event-figure img {
  display: block;
  width: 100%;
  height: 180px;
  object-fit: cover;
}

.event-caption {
  padding: 16px 18px 20px;
}

.event-caption h2 {
  margin: 0 0 8px;
  font-size: 1.1rem;
  color: var(--timeline-heading);
}

.event-caption p {
  margin: 0 0 16px;
  color: var(--timeline-muted);
  line-height: 1.5;
}

.learn-more-btn,
.modal-btn {
  border: none;
  border-radius: 10px;
  padding: 8px 16px;
  background: var(--timeline-accent);
  color: var(--timeline-accent-text);
  font: inherit;
  font-weight: 600;
  cursor: pointer;
}

.timeline-empty {
  grid-column: 1 / -1;
  text-align: center;
  color: var(--timeline-muted);
}

.error-message {
  grid-column: 1 / -1;
  background: var(--timeline-error-bg);
  color: var(--timeline-error-text);
  border-radius: var(--timeline-radius);
  padding: 20px 24px;
}

.error-message h3 {
  margin: 0 0 8px;
}

.error-message p {
  margin: 0;
}

.modal {
  position: fixed;
  inset: 0;
  z-index: 1000;
  background: var(--timeline-overlay-bg);
  overflow-y: auto;
  padding: 48px 16px;
}

.modal-content {
  position: relative;
  max-width: 640px;
  margin: 0 auto;
  background: var(--timeline-card-bg);
  color: var(--timeline-text);
  border-radius: var(--timeline-radius);
  box-shadow: var(--timeline-shadow-hover);
  padding: 28px;
}

.close-modal {
  background: transparent;
  border: none;
  color: var(--timeline-muted);
  font-size: 1.6rem;
  line-height: 1;
  cursor: pointer;
}

.modal-content > .close-modal {
  position: absolute;
  top: 14px;
  right: 16px;
}

.modal-header {
  display: flex;
  gap: 12px;
  align-items: center;
  margin-bottom: 16px;
}

.modal-year {
  font-size: 1.6rem;
  font-weight: 700;
  color: var(--timeline-accent);
}

.modal-category {
  background: var(--timeline-chip-bg);
  color: var(--timeline-chip-text);
  border-radius: 999px;
  padding: 4px 12px;
  font-size: 0.8rem;
  font-weight: 600;
}

.modal-image {
  display: block;
  width: 100%;
  max-height: 320px;
  object-fit: cover;
  border-radius: 12px;
}

.modal-title {
  color: var(--timeline-heading);
  margin: 18px 0 10px;
}

.modal-description {
  line-height: 1.6;
  margin: 0;
}

.modal-footer {
  display: flex;
  justify-content: flex-end;
  margin-top: 24px;
}

@media (max-width: 640px) {
  .timeline-app {
    padding: 20px 14px 48px;
  }

  .timeline-header {
    flex-direction: column;
    align-items: flex-start;
  }

  .modal {
    padding: 16px 8px;
  }

  .modal-content {
    padding: 20px;
  }
}
"#;

pub fn ensure_styles(document: &Document) -> Result<(), JsValue> {
    if document.query_selector(STYLE_TAG_SELECTOR)?.is_some() {
        return Ok(());
    }

    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("Document không có thẻ <head>"))?;

    let style_el = document.create_element("style")?;
    style_el.set_attribute("data-timeline-ui", "cards-v1")?;
    style_el.set_text_content(Some(DEFAULT_STYLES));
    head.append_child(&style_el.clone().dyn_into::<Node>()?)?;

    Ok(())
}
