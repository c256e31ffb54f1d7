//! Thành phần giao diện timeline dạng thẻ cho môi trường WebAssembly.

#[cfg(target_arch = "wasm32")]
mod styles;

#[cfg(target_arch = "wasm32")]
mod wasm_ui {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::styles;
    use gloo_timers::callback::Timeout;
    use serde_wasm_bindgen::from_value;
    use timeline_core::{
        load, ConfigOverrides, Control, EventCard, EventCatalog, EventDetail, EventId,
        EventSource, FetchResponse, FocusTarget, ImageSource, Key, Scene, SceneBody,
        ThemeStore, TimelineApp, TimelineConfig, TimelineError, UiEvent, DARK_THEME_CLASS,
    };
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::{spawn_local, JsFuture};
    use web_sys::{
        console, Document, Element, EventTarget, HtmlElement, HtmlImageElement,
        IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
        KeyboardEvent, Node, Response, Storage, Window,
    };
    use yew::prelude::*;
    use yew::TargetCast;

    const HEADING: &str = "Timeline";

    fn js_error(err: JsValue) -> String {
        err.as_string().unwrap_or_else(|| format!("{err:?}"))
    }

    /// Đọc tài liệu sự kiện bằng `window.fetch`.
    struct FetchSource;

    impl EventSource for FetchSource {
        async fn fetch(&self, resource: &str) -> Result<FetchResponse, String> {
            let window = web_sys::window().ok_or_else(|| "Không có window".to_string())?;
            let response: Response = JsFuture::from(window.fetch_with_str(resource))
                .await
                .map_err(js_error)?
                .dyn_into()
                .map_err(js_error)?;

            if !response.ok() {
                return Ok(FetchResponse::status(response.status()));
            }

            let text = JsFuture::from(response.text().map_err(js_error)?)
                .await
                .map_err(js_error)?;
            Ok(FetchResponse {
                status: response.status(),
                body: text.as_string().unwrap_or_default(),
            })
        }
    }

    /// Lưu theme vào `localStorage` của origin hiện tại.
    struct LocalStorageStore;

    impl LocalStorageStore {
        fn storage() -> Option<Storage> {
            web_sys::window()?.local_storage().ok().flatten()
        }
    }

    impl ThemeStore for LocalStorageStore {
        fn read(&self, key: &str) -> Option<String> {
            Self::storage()?.get_item(key).ok().flatten()
        }

        fn write(&mut self, key: &str, value: &str) -> Result<(), String> {
            let storage =
                Self::storage().ok_or_else(|| "localStorage không khả dụng".to_string())?;
            storage.set_item(key, value).map_err(js_error)
        }
    }

    #[derive(Clone, PartialEq)]
    struct TimelineState {
        app: TimelineApp,
        scene: Scene,
    }

    enum TimelineAction {
        Loaded(Result<EventCatalog, TimelineError>),
        Ui(UiEvent),
        BeginObserving,
        CardVisible(EventId, f64),
    }

    impl Reducible for TimelineState {
        type Action = TimelineAction;

        fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
            let mut next = (*self).clone();
            let TimelineState { app, scene } = &mut next;

            let changed = match action {
                TimelineAction::Loaded(result) => {
                    if let Err(err) = &result {
                        console::error_1(&JsValue::from_str(&format!(
                            "Error loading events: {}",
                            err.cause()
                        )));
                    }
                    app.apply_load(result, scene);
                    true
                }
                TimelineAction::Ui(event) => app.dispatch(event, scene, &mut LocalStorageStore),
                TimelineAction::BeginObserving => {
                    app.begin_observing();
                    true
                }
                TimelineAction::CardVisible(id, ratio) => app.record_visibility(id, ratio, scene),
            };

            if changed {
                Rc::new(next)
            } else {
                self
            }
        }
    }

    type Dispatcher = UseReducerDispatcher<TimelineState>;

    /// Listener DOM tự gỡ khi bị drop.
    struct Listener {
        target: EventTarget,
        kind: &'static str,
        capture: bool,
        closure: Closure<dyn FnMut(Event)>,
    }

    impl Listener {
        fn new(
            target: &EventTarget,
            kind: &'static str,
            capture: bool,
            handler: impl FnMut(Event) + 'static,
        ) -> Result<Self, JsValue> {
            let closure = Closure::<dyn FnMut(Event)>::new(handler);
            target.add_event_listener_with_callback_and_bool(
                kind,
                closure.as_ref().unchecked_ref(),
                capture,
            )?;
            Ok(Self {
                target: target.clone(),
                kind,
                capture,
                closure,
            })
        }
    }

    impl Drop for Listener {
        fn drop(&mut self) {
            let _ = self.target.remove_event_listener_with_callback_and_bool(
                self.kind,
                self.closure.as_ref().unchecked_ref(),
                self.capture,
            );
        }
    }

    /// `IntersectionObserver` theo dõi các thẻ; ngắt kết nối khi bị drop.
    struct CardObserver {
        observer: IntersectionObserver,
        _callback: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
    }

    impl CardObserver {
        fn start(
            container: &Element,
            config: &TimelineConfig,
            dispatcher: Dispatcher,
        ) -> Result<Self, JsValue> {
            let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
                move |entries: js_sys::Array, _: IntersectionObserver| {
                    for entry in entries.iter() {
                        let entry: IntersectionObserverEntry = entry.unchecked_into();
                        if !entry.is_intersecting() {
                            continue;
                        }
                        if let Some(id) = card_id(&entry.target()) {
                            dispatcher.dispatch(TimelineAction::CardVisible(
                                id,
                                entry.intersection_ratio(),
                            ));
                        }
                    }
                },
            );

            let options = IntersectionObserverInit::new();
            options.set_threshold(&JsValue::from_f64(config.visibility_threshold));
            options.set_root_margin(&config.root_margin());
            let observer = IntersectionObserver::new_with_options(
                callback.as_ref().unchecked_ref(),
                &options,
            )?;

            let cards = container.query_selector_all(".event-card")?;
            for index in 0..cards.length() {
                if let Some(card) = cards.item(index).and_then(|node| node.dyn_into::<Element>().ok())
                {
                    observer.observe(&card);
                }
            }

            Ok(Self {
                observer,
                _callback: callback,
            })
        }
    }

    impl Drop for CardObserver {
        fn drop(&mut self) {
            self.observer.disconnect();
        }
    }

    fn card_id(element: &Element) -> Option<EventId> {
        element.get_attribute("data-event-id")?.parse().ok()
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn body() -> Option<HtmlElement> {
        document()?.body()
    }

    #[derive(Properties, PartialEq)]
    pub struct TimelineViewProps {
        pub config: TimelineConfig,
    }

    #[function_component(TimelineView)]
    fn timeline_view(props: &TimelineViewProps) -> Html {
        let state = use_reducer({
            let config = props.config.clone();
            move || {
                let mut app = TimelineApp::new(config);
                let mut scene = Scene::default();
                app.restore_theme(&LocalStorageStore, &mut scene);
                TimelineState { app, scene }
            }
        });
        let container_ref = use_node_ref();
        let overlay_ref = use_node_ref();
        let close_ref = use_node_ref();

        {
            let dispatcher = state.dispatcher();
            let data_url = props.config.data_url.clone();
            use_effect_with((), move |_| {
                if let Some(document) = document() {
                    if let Err(err) = styles::ensure_styles(&document) {
                        console::error_1(&err);
                    }
                }
                spawn_local(async move {
                    let result = load(&FetchSource, &data_url).await;
                    dispatcher.dispatch(TimelineAction::Loaded(result));
                });
                || ()
            });
        }

        {
            let dispatcher = state.dispatcher();
            use_effect_with((), move |_| {
                let listener = document().and_then(|document| {
                    Listener::new(&document, "keydown", false, move |event: Event| {
                        let key = event
                            .dyn_ref::<KeyboardEvent>()
                            .map(|event| Key::from_name(&event.key()))
                            .unwrap_or(Key::Other);
                        if key == Key::Escape {
                            dispatcher.dispatch(TimelineAction::Ui(UiEvent::KeyDown(key)));
                        }
                    })
                    .map_err(|err| console::error_1(&err))
                    .ok()
                });
                move || drop(listener)
            });
        }

        {
            // Hover quan sát bằng listener capture trên vùng chứa, không gắn từng thẻ.
            let dispatcher = state.dispatcher();
            let container_ref = container_ref.clone();
            use_effect_with((), move |_| {
                let hover = |entered: bool| {
                    let dispatcher = dispatcher.clone();
                    move |event: Event| {
                        let Some(id) = event
                            .target()
                            .and_then(|target| target.dyn_into::<Element>().ok())
                            .and_then(|element| element.closest(".event-card").ok().flatten())
                            .and_then(|card| card_id(&card))
                        else {
                            return;
                        };
                        let ui = if entered {
                            UiEvent::PointerEnter(id)
                        } else {
                            UiEvent::PointerLeave(id)
                        };
                        dispatcher.dispatch(TimelineAction::Ui(ui));
                    }
                };

                let listeners: Vec<Listener> = match container_ref.cast::<Element>() {
                    Some(container) => [("mouseenter", true), ("mouseleave", false)]
                        .into_iter()
                        .filter_map(|(kind, entered)| {
                            Listener::new(&container, kind, true, hover(entered))
                                .map_err(|err| console::error_1(&err))
                                .ok()
                        })
                        .collect(),
                    None => Vec::new(),
                };
                move || drop(listeners)
            });
        }

        use_effect_with(state.scene.theme, |theme| {
            if let Some(body) = body() {
                if let Err(err) = body
                    .class_list()
                    .toggle_with_force(DARK_THEME_CLASS, theme.is_dark())
                {
                    console::error_1(&err);
                }
            }
            || ()
        });

        use_effect_with(state.scene.scroll_locked, |locked| {
            if let Some(body) = body() {
                let overflow = if *locked { "hidden" } else { "auto" };
                if let Err(err) = body.style().set_property("overflow", overflow) {
                    console::error_1(&err);
                }
            }
            || ()
        });

        {
            let close_ref = close_ref.clone();
            let focus = state.scene.focus;
            use_effect_with(state.scene.focus_requests, move |_| {
                if focus == Some(FocusTarget::OverlayClose) {
                    if let Some(button) = close_ref.cast::<HtmlElement>() {
                        if let Err(err) = button.focus() {
                            console::error_1(&err);
                        }
                    }
                }
                || ()
            });
        }

        {
            let dispatcher = state.dispatcher();
            let container_ref = container_ref.clone();
            let config = props.config.clone();
            let has_cards = !state.scene.cards().is_empty();
            use_effect_with(
                (state.app.catalog().loaded_at, has_cards),
                move |_| {
                    let observer: Rc<RefCell<Option<CardObserver>>> = Rc::default();
                    let timeout = has_cards.then(|| {
                        let observer = observer.clone();
                        Timeout::new(config.observe_delay_ms, move || {
                            dispatcher.dispatch(TimelineAction::BeginObserving);
                            let Some(container) = container_ref.cast::<Element>() else {
                                return;
                            };
                            match CardObserver::start(&container, &config, dispatcher.clone()) {
                                Ok(started) => *observer.borrow_mut() = Some(started),
                                Err(err) => console::error_1(&err),
                            }
                        })
                    });
                    move || {
                        drop(timeout);
                        observer.borrow_mut().take();
                    }
                },
            );
        }

        let dispatcher = state.dispatcher();
        let on_theme_toggle = {
            let dispatcher = dispatcher.clone();
            Callback::from(move |_: MouseEvent| {
                dispatcher.dispatch(TimelineAction::Ui(UiEvent::Activate(Control::ThemeToggle)));
            })
        };

        html! {
            <div class="timeline-app">
                <header class="timeline-header">
                    <h1>{ HEADING }</h1>
                    <button
                        type="button"
                        id="themeToggle"
                        class="theme-toggle"
                        onclick={on_theme_toggle}
                    >
                        { state.scene.toggle_label.clone() }
                    </button>
                </header>
                <main class="timeline-container" ref={container_ref} aria-live="polite">
                    { render_body(&state.scene, &dispatcher) }
                </main>
                {
                    state.scene.overlay.as_ref()
                        .map(|detail| render_overlay(detail, overlay_ref, close_ref, &dispatcher))
                        .unwrap_or_default()
                }
            </div>
        }
    }

    fn render_body(scene: &Scene, dispatcher: &Dispatcher) -> Html {
        match &scene.body {
            SceneBody::Blank => Html::default(),
            SceneBody::Empty(placeholder) => html! {
                <p class="timeline-empty">{ placeholder.clone() }</p>
            },
            SceneBody::Error(notice) => html! {
                <div class="error-message" role="alert">
                    <h3>{ notice.heading.clone() }</h3>
                    <p>{ notice.message.clone() }</p>
                </div>
            },
            SceneBody::Cards(cards) => html! {
                for cards.iter().map(|card| render_card(card, scene.card_classes(card.id), dispatcher))
            },
        }
    }

    fn render_card(card: &EventCard, classes: String, dispatcher: &Dispatcher) -> Html {
        let id = card.id;
        let on_learn_more = {
            let dispatcher = dispatcher.clone();
            Callback::from(move |_: MouseEvent| {
                dispatcher.dispatch(TimelineAction::Ui(UiEvent::Activate(Control::LearnMore(id))));
            })
        };

        html! {
            <article
                class={classes}
                data-event-id={id.to_string()}
                style={format!("animation-delay: {}", card.animation_delay_css())}
            >
                <header class="event-header">
                    <span class="event-year">{ card.year }</span>
                    <span class="event-category">{ card.category.clone() }</span>
                </header>
                <figure class="event-figure">
                    { render_image(&card.image, None) }
                    <figcaption class="event-caption">
                        <h2>{ card.title.clone() }</h2>
                        <p>{ card.summary.clone() }</p>
                        <button
                            type="button"
                            class="learn-more-btn"
                            data-event-id={id.to_string()}
                            onclick={on_learn_more}
                        >
                            {"Learn More"}
                        </button>
                    </figcaption>
                </figure>
            </article>
        }
    }

    fn render_image(image: &ImageSource, class: Option<&'static str>) -> Html {
        let source = image.clone();
        let onerror = Callback::from(move |event: Event| {
            let img: HtmlImageElement = event.target_unchecked_into();
            if let Some(fallback) = source.on_error(&img.src()) {
                img.set_src(fallback);
            }
        });

        html! {
            <img
                src={image.url.clone()}
                alt={image.alt.clone()}
                class={classes!(class)}
                {onerror}
            />
        }
    }

    fn render_overlay(
        detail: &EventDetail,
        overlay_ref: NodeRef,
        close_ref: NodeRef,
        dispatcher: &Dispatcher,
    ) -> Html {
        let on_backdrop = {
            let dispatcher = dispatcher.clone();
            let overlay_ref = overlay_ref.clone();
            Callback::from(move |event: MouseEvent| {
                let clicked: Option<Node> = event.target().and_then(|target| target.dyn_into().ok());
                let control = if clicked.is_some() && clicked == overlay_ref.get() {
                    Control::OverlayBackdrop
                } else {
                    Control::OverlayContent
                };
                dispatcher.dispatch(TimelineAction::Ui(UiEvent::Activate(control)));
            })
        };
        let on_close = {
            let dispatcher = dispatcher.clone();
            Callback::from(move |_: MouseEvent| {
                dispatcher.dispatch(TimelineAction::Ui(UiEvent::Activate(Control::CloseButton)));
            })
        };

        html! {
            <div
                class="modal"
                ref={overlay_ref}
                role="dialog"
                aria-modal="true"
                aria-labelledby="timeline-modal-title"
                onclick={on_backdrop}
            >
                <div class="modal-content">
                    <button
                        type="button"
                        class="close-modal"
                        aria-label="Close modal"
                        ref={close_ref}
                        onclick={on_close.clone()}
                    >
                        {"×"}
                    </button>
                    <div class="modal-header">
                        <span class="modal-year">{ detail.year }</span>
                        <span class="modal-category">{ detail.category.clone() }</span>
                    </div>
                    <div class="modal-body">
                        { render_image(&detail.image, Some("modal-image")) }
                        <h2 class="modal-title" id="timeline-modal-title">{ detail.title.clone() }</h2>
                        <p class="modal-description">{ detail.description.clone() }</p>
                    </div>
                    <div class="modal-footer">
                        <button type="button" class="close-modal modal-btn" onclick={on_close}>
                            {"Close"}
                        </button>
                    </div>
                </div>
            </div>
        }
    }

    #[wasm_bindgen]
    pub fn mount_timeline_view(selector: &str, config: Option<JsValue>) -> Result<(), JsValue> {
        console_error_panic_hook::set_once();

        let window: Window =
            web_sys::window().ok_or_else(|| JsValue::from_str("Không có window"))?;
        let document: Document = window
            .document()
            .ok_or_else(|| JsValue::from_str("Không truy cập được document"))?;

        let target: Element = document
            .query_selector(selector)
            .map_err(|err| JsValue::from_str(&format!("Selector lỗi: {err:?}")))?
            .ok_or_else(|| JsValue::from_str("Không tìm thấy element theo selector"))?;

        let config = match config {
            Some(value) if !value.is_undefined() && !value.is_null() => {
                TimelineConfig::from(from_value::<ConfigOverrides>(value)?)
            }
            _ => TimelineConfig::default(),
        };

        yew::Renderer::<TimelineView>::with_root_and_props(target, TimelineViewProps { config })
            .render();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_ui::mount_timeline_view;

#[cfg(not(target_arch = "wasm32"))]
pub fn mount_timeline_view(
    _: &str,
    _: Option<wasm_bindgen::JsValue>,
) -> Result<(), wasm_bindgen::JsValue> {
    Err(wasm_bindgen::JsValue::from_str(
        "timeline-ui chỉ hỗ trợ biên dịch target wasm32",
    ))
}
