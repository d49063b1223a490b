//! Hit sound using an HTML audio element
//!
//! Browsers refuse playback until a user gesture has started some audio, so
//! the element is primed (played, paused and rewound) when the pointer first
//! arms the launcher. Every playback failure is logged and dropped.

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlAudioElement;

use crate::platform::Sound;

pub struct AudioManager {
    src: String,
    volume: f64,
    /// Created lazily on the first gesture
    element: Option<HtmlAudioElement>,
    /// Set once a priming playback has actually succeeded
    unlocked: Rc<Cell<bool>>,
}

impl AudioManager {
    pub fn new(src: &str, volume: f64) -> Self {
        Self {
            src: src.to_string(),
            volume: volume.clamp(0.0, 1.0),
            element: None,
            unlocked: Rc::new(Cell::new(false)),
        }
    }

    /// Create the element ahead of the first gesture so the file starts loading
    pub fn preload(&mut self) {
        self.element();
    }

    fn element(&mut self) -> Option<&HtmlAudioElement> {
        if self.element.is_none() {
            match HtmlAudioElement::new_with_src(&self.src) {
                Ok(audio) => {
                    audio.set_volume(self.volume);
                    audio.set_preload("auto");
                    log::info!("Loaded hit sound from {}", self.src);
                    self.element = Some(audio);
                }
                Err(e) => {
                    log::warn!("Failed to create audio element: {:?}", e);
                    return None;
                }
            }
        }
        self.element.as_ref()
    }
}

impl Sound for AudioManager {
    fn unlock(&mut self) {
        if self.unlocked.get() {
            return;
        }
        let Some(audio) = self.element().cloned() else {
            return;
        };
        let unlocked = Rc::clone(&self.unlocked);

        let promise = match audio.play() {
            Ok(p) => p,
            Err(e) => {
                log::warn!("Audio unlock rejected: {:?}", e);
                return;
            }
        };
        wasm_bindgen_futures::spawn_local(async move {
            match JsFuture::from(promise).await {
                Ok(_) => {
                    let _ = audio.pause();
                    audio.set_current_time(0.0);
                    unlocked.set(true);
                    log::debug!("Audio unlocked");
                }
                Err(e) => log::warn!("Audio unlock rejected: {:?}", e),
            }
        });
    }

    fn play_hit(&mut self) {
        let Some(audio) = self.element() else {
            return;
        };
        audio.set_current_time(0.0);
        match audio.play() {
            Ok(promise) => wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = JsFuture::from(promise).await {
                    log::warn!("Hit sound failed: {:?}", e);
                }
            }),
            Err(e) => log::warn!("Hit sound failed: {:?}", e),
        }
    }
}
