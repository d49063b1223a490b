//! Push channel backed by a page-supplied JS callback

use js_sys::{Function, JSON};
use wasm_bindgen::JsValue;

use super::Channel;
use crate::protocol::Outbound;

/// Calls `push(name, payload)` for every outbound event
pub struct JsChannel {
    push: Function,
}

impl JsChannel {
    pub fn new(push: Function) -> Self {
        Self { push }
    }
}

impl Channel for JsChannel {
    fn push(&mut self, event: Outbound) {
        let name = event.name();
        let payload = match JSON::parse(&event.payload().to_string()) {
            Ok(value) => value,
            Err(e) => {
                log::error!("Failed to encode `{name}` payload: {:?}", e);
                return;
            }
        };
        if let Err(e) = self.push.call2(&JsValue::NULL, &JsValue::from_str(name), &payload) {
            log::warn!("Push of `{name}` failed: {:?}", e);
        }
    }
}
