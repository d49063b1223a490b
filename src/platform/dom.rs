//! DOM-backed stage
//!
//! Elements the server renders (target, core, blood container, pool) are
//! looked up lazily and looked up again whenever the cached handle is
//! missing or no longer connected, since the server may patch them at any
//! time. Elements the engine creates (crosshair, launcher, bullets, spurts,
//! drips) are owned here and removed on request.

use std::collections::HashMap;

use wasm_bindgen::JsCast;
use web_sys::{Document, DomRect, Element, HtmlElement, Node};

use super::{Paint, Scroller, Stage};
use crate::sim::{EffectId, ProjectileId, Rect, TargetGeometry, parse_intensity};

const TARGET_ID: &str = "the-butt";
const CHARACTER_ID: &str = "butt-character";
const BLOOD_CONTAINER_ID: &str = "blood-container";
const CORE_SELECTOR: &str = ".butt-hole";
const POOL_SELECTOR: &str = ".blood-pool";

pub struct DomStage {
    document: Document,
    /// The interaction surface (the hook's element)
    surface: HtmlElement,
    /// Positioned wrapper moved by the animator
    character: Option<HtmlElement>,
    /// Hit-testable body; also receives handprints and hit classes
    target: Option<HtmlElement>,
    core: Option<Element>,
    blood: Option<Element>,
    pool: Option<HtmlElement>,
    crosshair: Option<HtmlElement>,
    launcher: Option<HtmlElement>,
    bullets: HashMap<ProjectileId, HtmlElement>,
    effects: HashMap<EffectId, HtmlElement>,
}

impl DomStage {
    pub fn new(document: Document, surface: HtmlElement) -> Self {
        Self {
            document,
            surface,
            character: None,
            target: None,
            core: None,
            blood: None,
            pool: None,
            crosshair: None,
            launcher: None,
            bullets: HashMap::new(),
            effects: HashMap::new(),
        }
    }

    pub fn surface(&self) -> &HtmlElement {
        &self.surface
    }

    /// Raw `data-tuning` attribute of the surface
    pub fn tuning_attribute(&self) -> Option<String> {
        self.surface.get_attribute("data-tuning")
    }

    fn by_id(&self, id: &str) -> Option<HtmlElement> {
        self.document
            .get_element_by_id(id)
            .or_else(|| self.surface.query_selector(&format!("#{id}")).ok().flatten())
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }

    fn in_surface(&self, selector: &str) -> Option<Element> {
        self.surface.query_selector(selector).ok().flatten()
    }

    fn character(&mut self) -> Option<&HtmlElement> {
        if !connected(self.character.as_ref()) {
            self.character = self.by_id(CHARACTER_ID);
        }
        self.character.as_ref()
    }

    fn target(&mut self) -> Option<&HtmlElement> {
        if !connected(self.target.as_ref()) {
            self.target = self.by_id(TARGET_ID);
            if self.target.is_none() {
                log::debug!("Target element #{TARGET_ID} not found");
            }
        }
        self.target.as_ref()
    }

    fn core(&mut self) -> Option<&Element> {
        if !connected(self.core.as_ref()) {
            self.core = self.in_surface(CORE_SELECTOR);
        }
        self.core.as_ref()
    }

    fn blood(&mut self) -> Option<&Element> {
        if !connected(self.blood.as_ref()) {
            self.blood = self.document.get_element_by_id(BLOOD_CONTAINER_ID);
        }
        self.blood.as_ref()
    }

    fn pool(&mut self) -> Option<&HtmlElement> {
        if !connected(self.pool.as_ref()) {
            self.pool = self
                .in_surface(POOL_SELECTOR)
                .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        }
        self.pool.as_ref()
    }

    fn create(&self, class: &str) -> Option<HtmlElement> {
        let el = self
            .document
            .create_element("div")
            .ok()?
            .dyn_into::<HtmlElement>()
            .ok()?;
        el.set_class_name(class);
        Some(el)
    }

    fn mount_chrome(&mut self) {
        if self.crosshair.is_none() {
            self.crosshair = self.create("crosshair").inspect(|el| {
                el.set_text_content(Some("+"));
                let _ = self.surface.append_child(el);
            });
        }
        if self.launcher.is_none() {
            self.launcher = self.create("gun").inspect(|el| {
                el.set_text_content(Some("\u{1F52B}"));
                let _ = self.surface.append_child(el);
            });
        }
    }

    fn spawn_bullet(&mut self, id: ProjectileId, x: f32, y: f32) {
        let Some(el) = self.create("bullet") else {
            return;
        };
        place_px(&el, x, y);
        let _ = self.surface.append_child(&el);
        self.bullets.insert(id, el);
    }

    fn spawn_effect(&mut self, id: EffectId, el: HtmlElement) {
        let Some(blood) = self.blood() else {
            return;
        };
        let _ = blood.append_child(&el);
        self.effects.insert(id, el);
    }
}

impl Scroller for HtmlElement {
    fn scroll_height(&self) -> f64 {
        Element::scroll_height(self) as f64
    }

    fn set_scroll_top(&mut self, top: f64) {
        Element::set_scroll_top(self, top as i32);
    }
}

impl Stage for DomStage {
    fn surface_rect(&self) -> Rect {
        to_rect(&self.surface.get_bounding_client_rect())
    }

    fn target_geometry(&mut self) -> Option<TargetGeometry> {
        let body = to_rect(&self.target()?.get_bounding_client_rect());
        let core = self.core().map(|el| to_rect(&el.get_bounding_client_rect()));
        Some(TargetGeometry { body, core })
    }

    fn intensity_level(&self) -> u8 {
        parse_intensity(self.surface.get_attribute("data-damage-level").as_deref())
    }

    fn paint(&mut self, op: Paint) {
        match op {
            Paint::MoveTarget { left_pct, top_pct } => {
                if let Some(el) = self.character() {
                    set_style(el, "left", &format!("{left_pct}%"));
                    set_style(el, "top", &format!("{top_pct}%"));
                }
            }
            Paint::MountChrome => self.mount_chrome(),
            Paint::UnmountChrome => {
                for el in [self.crosshair.take(), self.launcher.take()].into_iter().flatten() {
                    el.remove();
                }
            }
            Paint::Crosshair { at } => {
                if let Some(el) = &self.crosshair {
                    place_px(el, at.x, at.y);
                }
            }
            Paint::CrosshairActive(on) => {
                if let Some(el) = &self.crosshair {
                    let _ = el.class_list().toggle_with_force("active", on);
                }
            }
            Paint::Launcher { angle_deg } => {
                if let Some(el) = &self.launcher {
                    set_style(
                        el,
                        "transform",
                        &format!("translateX(-50%) rotate({angle_deg}deg)"),
                    );
                }
            }
            Paint::SpawnBullet { id, at } => self.spawn_bullet(id, at.x, at.y),
            Paint::MoveBullet { id, at } => {
                if let Some(el) = self.bullets.get(&id) {
                    place_px(el, at.x, at.y);
                }
            }
            Paint::BulletStruck { id } => {
                if let Some(el) = self.bullets.get(&id) {
                    let _ = el.class_list().add_1("hit");
                }
            }
            Paint::RemoveBullet { id } => {
                if let Some(el) = self.bullets.remove(&id) {
                    el.remove();
                }
            }
            Paint::Spurt {
                id,
                delay_s,
                rotation_deg,
            } => {
                if let Some(el) = self.create("blood-spurt") {
                    set_style(&el, "animation-delay", &format!("{delay_s}s"));
                    set_style(
                        &el,
                        "transform",
                        &format!("translateX(-50%) rotate({rotation_deg}deg)"),
                    );
                    self.spawn_effect(id, el);
                }
            }
            Paint::Drip { id, left_pct } => {
                if let Some(el) = self.create("blood-drip") {
                    set_style(&el, "left", &format!("{left_pct}%"));
                    self.spawn_effect(id, el);
                }
            }
            Paint::RemoveEffect { id } => {
                if let Some(el) = self.effects.remove(&id) {
                    el.remove();
                }
            }
            Paint::Handprint {
                left_pct,
                top_pct,
                rotation_deg,
            } => {
                let Some(el) = self.create("handprint") else {
                    return;
                };
                set_style(&el, "left", &format!("{left_pct}%"));
                set_style(&el, "top", &format!("{top_pct}%"));
                set_style(&el, "transform", &format!("rotate({rotation_deg}deg)"));
                if let Some(target) = self.target() {
                    let _ = target.append_child(&el);
                }
            }
            Paint::TargetFlash(on) => {
                if let Some(el) = self.target() {
                    let _ = el.class_list().toggle_with_force("hit-flash", on);
                }
            }
            Paint::TargetDamage(level) => {
                if let Some(el) = self.target() {
                    let _ = el.dataset().set("damage", &level.to_string());
                }
            }
            Paint::SurfaceShake(on) => {
                let _ = self.surface.class_list().toggle_with_force("miss-shake", on);
            }
            Paint::PoolWidth(px) => {
                if let Some(el) = self.pool() {
                    set_style(el, "width", &format!("{px}px"));
                }
            }
        }
    }
}

fn connected<T: AsRef<Node>>(el: Option<&T>) -> bool {
    el.is_some_and(|el| AsRef::<Node>::as_ref(el).is_connected())
}

fn to_rect(r: &DomRect) -> Rect {
    Rect::new(r.left() as f32, r.top() as f32, r.right() as f32, r.bottom() as f32)
}

fn set_style(el: &HtmlElement, property: &str, value: &str) {
    let _ = el.style().set_property(property, value);
}

fn place_px(el: &HtmlElement, x: f32, y: f32) {
    set_style(el, "left", &format!("{x}px"));
    set_style(el, "top", &format!("{y}px"));
}
