//! Browser entry points
//!
//! The page's LiveView hook literals construct these objects in `mounted`,
//! forward `handleEvent` payloads to `handle_event`, call `updated` on
//! server patches and `destroyed` on removal:
//!
//! ```js
//! Hooks.HipMover = {
//!   mounted() { this.arena = new ArenaHook(this.el, (n, p) => this.pushEvent(n, p)) },
//!   updated() { this.arena.updated() },
//!   destroyed() { this.arena.destroyed(); this.arena.free() },
//! }
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec2;
use js_sys::{Function, JSON};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget, HtmlElement, MouseEvent, TouchEvent};

use crate::arena::Arena;
use crate::audio::AudioManager;
use crate::hook::Hook;
use crate::platform::channel::JsChannel;
use crate::platform::dom::DomStage;
use crate::platform::storage::LocalStore;
use crate::protocol::Inbound;
use crate::scroll::ScrollPin;
use crate::session::SessionKeeper;
use crate::tuning::Tuning;

type DomArena = Arena<DomStage, JsChannel, AudioManager>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Another module on the page already installed a logger
        return;
    }
    log::info!("Roast arena loaded");
}

fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Serialize an arbitrary JS payload for [`Inbound::parse`]
fn payload_json(payload: &JsValue) -> String {
    JSON::stringify(payload)
        .ok()
        .and_then(|s| s.as_string())
        .unwrap_or_else(|| "null".to_string())
}

fn parse_event(name: &str, payload: &JsValue) -> Option<Inbound> {
    match Inbound::parse(name, &payload_json(payload)) {
        Ok(event) => Some(event),
        Err(e) => {
            log::warn!("Dropping server event: {e}");
            None
        }
    }
}

/// First touch point in client pixels
fn first_touch(event: &TouchEvent) -> Option<Vec2> {
    event
        .touches()
        .get(0)
        .map(|t| Vec2::new(t.client_x() as f32, t.client_y() as f32))
}

/// An event listener that unregisters itself when dropped
struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn new(target: &EventTarget, event: &'static str, handler: impl FnMut(Event) + 'static) -> Self {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        Self {
            target: target.clone(),
            event,
            closure,
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

/// requestAnimationFrame pump feeding the arena clock
struct FrameLoop {
    callback: FrameCallback,
    handle: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
    fn start(arena: Rc<RefCell<DomArena>>) -> Self {
        let f: FrameCallback = Rc::new(RefCell::new(None));
        let g = f.clone();
        let handle = Rc::new(Cell::new(None));
        let h = handle.clone();
        *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
            arena.borrow_mut().advance(ts);
            h.set(request_frame(&f));
        }) as Box<dyn FnMut(f64)>));
        handle.set(request_frame(&g));
        Self {
            callback: g,
            handle,
        }
    }

    fn stop(&self) {
        if let (Some(id), Some(w)) = (self.handle.take(), web_sys::window()) {
            let _ = w.cancel_animation_frame(id);
        }
        // Breaks the closure's reference to its own cell
        self.callback.borrow_mut().take();
    }
}

fn request_frame(f: &FrameCallback) -> Option<i32> {
    let w = web_sys::window()?;
    let callback = f.borrow();
    let closure = callback.as_ref()?;
    w.request_animation_frame(closure.as_ref().unchecked_ref()).ok()
}

/// The interaction surface hook
#[wasm_bindgen]
pub struct ArenaHook {
    arena: Rc<RefCell<DomArena>>,
    listeners: Vec<Listener>,
    frames: Option<FrameLoop>,
}

#[wasm_bindgen]
impl ArenaHook {
    /// Mount on `el`; `push(name, payload)` delivers events to the server
    #[wasm_bindgen(constructor)]
    pub fn new(el: HtmlElement, push: Function) -> Result<ArenaHook, JsValue> {
        let document = el
            .owner_document()
            .ok_or_else(|| JsValue::from_str("surface element has no document"))?;
        let stage = DomStage::new(document, el.clone());
        let tuning = Tuning::from_attribute(stage.tuning_attribute().as_deref());

        let mut audio = AudioManager::new(&tuning.hit_audio_src, tuning.hit_audio_volume);
        audio.preload();

        let seed = js_sys::Date::now() as u64;
        let mut arena = Arena::new(stage, JsChannel::new(push), audio, tuning, seed);
        arena.attach(performance_now());
        log::info!("Arena mounted with seed: {}", seed);

        let arena = Rc::new(RefCell::new(arena));
        let listeners = Self::listen(&el, &arena);
        let frames = Some(FrameLoop::start(arena.clone()));
        Ok(Self {
            arena,
            listeners,
            frames,
        })
    }

    fn listen(el: &HtmlElement, arena: &Rc<RefCell<DomArena>>) -> Vec<Listener> {
        let target: &EventTarget = el.as_ref();
        let mut listeners = Vec::with_capacity(6);

        {
            let arena = arena.clone();
            listeners.push(Listener::new(target, "mousemove", move |event: Event| {
                if let Some(e) = event.dyn_ref::<MouseEvent>() {
                    let client = Vec2::new(e.client_x() as f32, e.client_y() as f32);
                    arena.borrow_mut().pointer_move(client);
                }
            }));
        }
        {
            let arena = arena.clone();
            listeners.push(Listener::new(target, "mouseenter", move |_event: Event| {
                arena.borrow_mut().pointer_enter();
            }));
        }
        {
            let arena = arena.clone();
            listeners.push(Listener::new(target, "mouseleave", move |_event: Event| {
                arena.borrow_mut().pointer_leave();
            }));
        }
        {
            let arena = arena.clone();
            listeners.push(Listener::new(target, "touchstart", move |event: Event| {
                event.prevent_default();
                let touch = event.dyn_ref::<TouchEvent>().and_then(first_touch);
                arena.borrow_mut().touch_start(touch);
            }));
        }
        {
            let arena = arena.clone();
            listeners.push(Listener::new(target, "touchmove", move |event: Event| {
                event.prevent_default();
                let touch = event.dyn_ref::<TouchEvent>().and_then(first_touch);
                arena.borrow_mut().touch_move(touch);
            }));
        }
        {
            let arena = arena.clone();
            listeners.push(Listener::new(target, "touchend", move |_event: Event| {
                arena.borrow_mut().touch_end();
            }));
        }

        listeners
    }

    /// Server-pushed `hit` / `miss`
    pub fn handle_event(&self, name: &str, payload: JsValue) {
        if let Some(event) = parse_event(name, &payload) {
            self.arena.borrow_mut().on_event(event);
        }
    }

    pub fn updated(&self) {
        self.arena.borrow_mut().update();
    }

    /// Release timers, listeners and every created element. Safe to call twice.
    pub fn destroyed(&mut self) {
        if let Some(frames) = self.frames.take() {
            frames.stop();
        }
        self.listeners.clear();
        self.arena.borrow_mut().detach();
    }
}

impl Drop for ArenaHook {
    fn drop(&mut self) {
        self.destroyed();
    }
}

/// The session restore/persist hook
#[wasm_bindgen]
pub struct SessionHook {
    keeper: SessionKeeper<LocalStore, JsChannel>,
}

#[wasm_bindgen]
impl SessionHook {
    /// Mount on `el`; reads the room from `data-room-id` and pushes restore requests
    #[wasm_bindgen(constructor)]
    pub fn new(el: HtmlElement, push: Function) -> SessionHook {
        let room_id = el.get_attribute("data-room-id");
        let mut keeper = SessionKeeper::new(LocalStore, JsChannel::new(push), room_id.as_deref());
        keeper.attach(performance_now());
        Self { keeper }
    }

    /// Server-pushed `persist_session` / `persist_password`
    pub fn handle_event(&mut self, name: &str, payload: JsValue) {
        if let Some(event) = parse_event(name, &payload) {
            self.keeper.on_event(event);
        }
    }

    pub fn destroyed(&mut self) {
        self.keeper.detach();
    }
}

/// Keeps a server-rendered log scrolled to its newest entry
#[wasm_bindgen]
pub struct ScrollHook {
    pin: ScrollPin<HtmlElement>,
}

#[wasm_bindgen]
impl ScrollHook {
    #[wasm_bindgen(constructor)]
    pub fn new(el: HtmlElement) -> ScrollHook {
        let mut pin = ScrollPin::new(el);
        pin.attach(performance_now());
        Self { pin }
    }

    pub fn updated(&mut self) {
        self.pin.update();
    }

    pub fn destroyed(&mut self) {
        self.pin.detach();
    }
}
