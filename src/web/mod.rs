//! Browser binding. Wires the page's controls to a `ViewModel`, runs the
//! search debounce and settle delay on `setTimeout`, and repaints only the
//! fragments that changed between frames.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    console, Document, Element, Event, EventTarget, HtmlInputElement, HtmlSelectElement,
    KeyboardEvent, Response, Window,
};

use crate::filter::{FilterKind, SelectControl};
use crate::loader::{Directory, DEFAULT_DATA_PATH};
use crate::render::{actions, ids};
use crate::view::{Effect, Frame, Timings, UiEvent, ViewModel};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    wasm_bindgen_futures::spawn_local(async {
        if let Err(e) = boot().await {
            console::error_1(&e);
        }
    });
}

async fn boot() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let source = document
        .get_element_by_id(ids::CARDS)
        .and_then(|el| el.get_attribute("data-source"))
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string());

    let directory = match fetch_directory(&window, &source).await {
        Ok(directory) => directory,
        Err(e) => {
            console::error_2(&JsValue::from_str("Error loading data:"), &e);
            let page = Page::new(document);
            page.set_html(ids::CARDS, &Frame::load_error().cards);
            page.toggle_class(ids::LOADING, "active", false);
            return Ok(());
        }
    };
    tracing::debug!(records = directory.len(), source = %source, "loaded directory");

    let browser = Rc::new(Browser {
        window,
        page: Page::new(document),
        view: RefCell::new(ViewModel::new(directory)),
        painted: RefCell::new(None),
        timings: Timings::default(),
        debounce: RefCell::new(None),
        settle: RefCell::new(None),
    });
    browser.paint();
    Browser::bind(&browser)
}

async fn fetch_directory(window: &Window, path: &str) -> Result<Directory, JsValue> {
    let response: Response = JsFuture::from(window.fetch_with_str(path))
        .await?
        .dyn_into()?;
    if !response.ok() {
        return Err(JsValue::from_str(&format!(
            "HTTP {} for {path}",
            response.status()
        )));
    }
    let body = JsFuture::from(response.text()?).await?;
    let raw = body
        .as_string()
        .ok_or_else(|| JsValue::from_str("data response is not text"))?;
    Directory::from_json(&raw).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// A pending `setTimeout`. The callback stays owned here until the handle
/// is replaced, so a firing callback never frees itself.
struct Timeout {
    window: Window,
    handle: i32,
    done: Rc<Cell<bool>>,
    _callback: Closure<dyn FnMut()>,
}

impl Timeout {
    fn start(
        window: &Window,
        delay: Duration,
        f: impl FnOnce() + 'static,
    ) -> Result<Self, JsValue> {
        let done = Rc::new(Cell::new(false));
        let flag = Rc::clone(&done);
        let callback = Closure::once(move || {
            flag.set(true);
            f();
        });
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        let handle = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            millis,
        )?;
        Ok(Self {
            window: window.clone(),
            handle,
            done,
            _callback: callback,
        })
    }

    fn is_pending(&self) -> bool {
        !self.done.get()
    }

    fn cancel(&self) {
        if self.is_pending() {
            self.window.clear_timeout_with_handle(self.handle);
            self.done.set(true);
        }
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Element access by id. Missing elements are skipped.
struct Page {
    document: Document,
}

impl Page {
    fn new(document: Document) -> Self {
        Self { document }
    }

    fn element(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn input(&self, id: &str) -> Option<HtmlInputElement> {
        self.element(id)?.dyn_into().ok()
    }

    fn set_html(&self, id: &str, html: &str) {
        if let Some(el) = self.element(id) {
            el.set_inner_html(html);
        }
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = self.element(id) {
            el.set_text_content(Some(text));
        }
    }

    fn toggle_class(&self, id: &str, class: &str, on: bool) {
        if let Some(el) = self.element(id) {
            let _ = el.class_list().toggle_with_force(class, on);
        }
    }

    fn set_body_locked(&self, locked: bool) {
        if let Some(body) = self.document.body() {
            let _ = body.class_list().toggle_with_force("modal-open", locked);
        }
    }
}

struct Browser {
    window: Window,
    page: Page,
    view: RefCell<ViewModel>,
    painted: RefCell<Option<Frame>>,
    timings: Timings,
    debounce: RefCell<Option<Timeout>>,
    settle: RefCell<Option<Timeout>>,
}

impl Browser {
    fn dispatch(self: &Rc<Self>, event: UiEvent) {
        let focus = event.focuses_search();
        let effect = self.view.borrow_mut().handle(event);
        self.apply(effect);
        if focus {
            if let Some(search) = self.page.input(ids::SEARCH_INPUT) {
                if let Err(e) = search.focus() {
                    console::error_1(&e);
                }
            }
        }
    }

    fn apply(self: &Rc<Self>, effect: Effect) {
        match effect {
            Effect::None => return,
            Effect::Render => {}
            Effect::DebounceSearch => {
                let this = Rc::clone(self);
                let timeout = Timeout::start(&self.window, self.timings.search_debounce, move || {
                    this.apply(Effect::Recompute)
                });
                self.store(&self.debounce, timeout);
            }
            Effect::Recompute => self.schedule_recompute(),
        }
        self.paint();
    }

    fn schedule_recompute(self: &Rc<Self>) {
        if let Some(pending) = self.debounce.borrow().as_ref() {
            pending.cancel();
        }
        let idle = self
            .settle
            .borrow()
            .as_ref()
            .map_or(true, |t| !t.is_pending());
        self.view.borrow_mut().begin_recompute();
        if idle {
            let this = Rc::clone(self);
            let timeout = Timeout::start(&self.window, self.timings.settle_delay, move || {
                this.view.borrow_mut().finish_recompute();
                this.paint();
            });
            if !self.store(&self.settle, timeout) {
                self.view.borrow_mut().finish_recompute();
            }
        }
    }

    fn store(&self, slot: &RefCell<Option<Timeout>>, timeout: Result<Timeout, JsValue>) -> bool {
        match timeout {
            Ok(timeout) => {
                *slot.borrow_mut() = Some(timeout);
                true
            }
            Err(e) => {
                console::error_1(&e);
                false
            }
        }
    }

    fn paint(&self) {
        let frame = self.view.borrow().frame();
        let previous = self.painted.borrow_mut().take();
        let prev = previous.as_ref();
        let stale = |pick: fn(&Frame) -> &str| prev.map_or(true, |p| pick(p) != pick(&frame));
        let page = &self.page;

        if stale(|f| &f.cards) {
            page.set_html(ids::CARDS, &frame.cards);
        }
        if stale(|f| &f.stats) {
            page.set_text(ids::RESULT_COUNT, &frame.stats);
        }
        if stale(|f| &f.badges) {
            page.set_html(ids::ACTIVE_FILTERS, &frame.badges);
        }
        for control in SelectControl::ALL {
            let changed = prev.map_or(true, |p| p.options(control) != frame.options(control));
            if changed {
                page.set_html(control.element_id(), frame.options(control));
            }
        }

        if let Some(input) = page.input(ids::SEARCH_INPUT) {
            if input.value() != frame.search {
                input.set_value(&frame.search);
            }
        }
        if let Some(toggle) = page.input(ids::FLAGGED_TOGGLE) {
            toggle.set_checked(frame.show_flagged);
        }
        page.toggle_class(ids::CLEAR_SEARCH, "visible", frame.clear_search_visible);
        page.toggle_class(ids::LOADING, "active", frame.loading);
        page.toggle_class(ids::FILTERS, "collapsed", frame.filters_collapsed);

        if prev.map_or(true, |p| p.modal != frame.modal) {
            match frame.modal.as_ref() {
                Some(modal) => {
                    page.set_text(ids::MODAL_TITLE, &modal.title);
                    page.set_html(ids::MODAL_BODY, &modal.body);
                    page.set_html(ids::MODAL_FOOTER, &modal.footer);
                    page.toggle_class(ids::MODAL, "active", true);
                }
                None => page.toggle_class(ids::MODAL, "active", false),
            }
        }
        page.set_body_locked(frame.scroll_locked);

        *self.painted.borrow_mut() = Some(frame);
    }

    fn bind(this: &Rc<Self>) -> Result<(), JsValue> {
        let page = &this.page;

        if let Some(search) = page.input(ids::SEARCH_INPUT) {
            let b = Rc::clone(this);
            let input = search.clone();
            listen(&search, "input", move |_| {
                b.dispatch(UiEvent::SearchInput(input.value()))
            })?;
            let b = Rc::clone(this);
            listen(&search, "keydown", move |event| {
                if is_escape(&event) {
                    b.dispatch(UiEvent::SearchEscape);
                }
            })?;
        }

        bind_click(this, ids::CLEAR_SEARCH, UiEvent::ClearSearch)?;
        bind_click(this, ids::RESET_FILTERS, UiEvent::ResetFilters)?;
        bind_click(this, ids::TOGGLE_FILTERS, UiEvent::ToggleFilterPanel)?;

        for control in SelectControl::ALL {
            if let Some(select) = page.element(control.element_id()) {
                let b = Rc::clone(this);
                listen(&select, "change", move |event| {
                    if let Some(value) = target_value(&event) {
                        b.dispatch(UiEvent::Select(control, value));
                    }
                })?;
            }
        }

        if let Some(toggle) = page.input(ids::FLAGGED_TOGGLE) {
            let b = Rc::clone(this);
            let checkbox = toggle.clone();
            listen(&toggle, "change", move |_| {
                b.dispatch(UiEvent::ShowFlagged(checkbox.checked()))
            })?;
        }

        if let Some(cards) = page.element(ids::CARDS) {
            let b = Rc::clone(this);
            listen(&cards, "click", move |event| {
                let Some(el) = closest(&event, "[data-action]") else {
                    return;
                };
                let index = el
                    .get_attribute("data-index")
                    .and_then(|i| i.parse::<usize>().ok());
                let action = el.get_attribute("data-action").unwrap_or_default();
                match (action.as_str(), index) {
                    (actions::TOGGLE_OVERVIEW, Some(i)) => b.dispatch(UiEvent::ToggleOverview(i)),
                    (actions::SHOW_DETAILS, Some(i)) => b.dispatch(UiEvent::ShowDetails(i)),
                    _ => {}
                }
            })?;
        }

        if let Some(badges) = page.element(ids::ACTIVE_FILTERS) {
            let b = Rc::clone(this);
            listen(&badges, "click", move |event| {
                let kind = closest(&event, "[data-filter]")
                    .and_then(|el| el.get_attribute("data-filter"))
                    .and_then(|raw| FilterKind::parse(&raw));
                if let Some(kind) = kind {
                    b.dispatch(UiEvent::RemoveFilter(kind));
                }
            })?;
        }

        if let Some(modal) = page.element(ids::MODAL) {
            let b = Rc::clone(this);
            let overlay = modal.clone();
            listen(&modal, "click", move |event| {
                let close = format!(r#"[data-action="{}"]"#, actions::CLOSE_DETAILS);
                if closest(&event, &close).is_some() {
                    b.dispatch(UiEvent::CloseDetails);
                } else if event
                    .target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .is_some_and(|t| t == overlay)
                {
                    b.dispatch(UiEvent::BackdropClicked);
                }
            })?;
        }

        let b = Rc::clone(this);
        listen(&this.window, "keydown", move |event| {
            if is_escape(&event) {
                b.dispatch(UiEvent::EscapePressed);
            }
        })?;

        Ok(())
    }
}

fn bind_click(this: &Rc<Browser>, id: &str, event: UiEvent) -> Result<(), JsValue> {
    let Some(el) = this.page.element(id) else {
        return Ok(());
    };
    let b = Rc::clone(this);
    listen(&el, "click", move |_| b.dispatch(event.clone()))
}

/// Listeners live as long as the page.
fn listen(
    target: &EventTarget,
    kind: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn is_escape(event: &Event) -> bool {
    event
        .dyn_ref::<KeyboardEvent>()
        .is_some_and(|k| k.key() == "Escape")
}

fn closest(event: &Event, selector: &str) -> Option<Element> {
    event
        .target()?
        .dyn_into::<Element>()
        .ok()?
        .closest(selector)
        .ok()
        .flatten()
}

fn target_value(event: &Event) -> Option<String> {
    event
        .target()?
        .dyn_ref::<HtmlSelectElement>()
        .map(HtmlSelectElement::value)
}
