/// Process-wide read view of the strand store for legacy/embedded scripts.
///
/// The store writes here after every operation and never reads back. In the
/// browser the global instance is also published as
/// `window.dynamo.state.strands` and `window.dynamo.state.vars`.

use crate::strand::{Strand, StrandValue};
use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Snapshot of what legacy consumers can see
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MirrorState {
    /// Strand name to raw value, rebuilt on every update
    pub strands: BTreeMap<String, StrandValue>,
    /// Free-form variables; strand entries are merged over existing keys
    pub vars: BTreeMap<String, serde_json::Value>,
}

impl MirrorState {
    fn apply(&mut self, strands: &[Strand]) {
        self.strands = strands
            .iter()
            .map(|s| (s.name.clone(), s.value.clone()))
            .collect();

        for (name, value) in &self.strands {
            let json = match value {
                StrandValue::One(label) => serde_json::Value::from(label.as_str()),
                StrandValue::Many(labels) => serde_json::Value::from(labels.clone()),
                StrandValue::Other(raw) => raw.clone(),
            };
            self.vars.insert(name.clone(), json);
        }
    }
}

#[derive(Debug, Default)]
struct MirrorInner {
    state: MirrorState,
    publish_to_window: bool,
}

/// Handle to a mirror. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct Mirror {
    inner: Rc<RefCell<MirrorInner>>,
}

thread_local! {
    static GLOBAL_MIRROR: Mirror = Mirror {
        inner: Rc::new(RefCell::new(MirrorInner {
            state: MirrorState::default(),
            publish_to_window: true,
        })),
    };
}

impl Mirror {
    /// The per-tab mirror, published to the window in the browser.
    pub fn global() -> Mirror {
        GLOBAL_MIRROR.with(Mirror::clone)
    }

    /// A private mirror that is never published.
    pub fn detached() -> Mirror {
        Mirror::default()
    }

    /// Replace the strand mapping with `strands` and merge it into `vars`.
    pub fn update(&self, strands: &[Strand]) {
        let mut inner = self.inner.borrow_mut();
        inner.state.apply(strands);
        if inner.publish_to_window {
            publish(&inner.state);
        }
    }

    /// Seed a variable that is not a strand (embedding page configuration).
    pub fn set_var(&self, name: &str, value: serde_json::Value) {
        let mut inner = self.inner.borrow_mut();
        inner.state.vars.insert(name.to_string(), value);
        if inner.publish_to_window {
            publish(&inner.state);
        }
    }

    /// Reset to the empty state and publish it.
    pub fn reset(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.state = MirrorState::default();
        if inner.publish_to_window {
            publish(&inner.state);
        }
    }

    pub fn snapshot(&self) -> MirrorState {
        self.inner.borrow().state.clone()
    }
}

#[cfg(target_arch = "wasm32")]
fn publish(state: &MirrorState) {
    if let Err(e) = window::publish(state) {
        log::warn!("Failed to publish strand mirror: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn publish(_state: &MirrorState) {}

#[cfg(target_arch = "wasm32")]
mod window {
    use super::MirrorState;
    use js_sys::{Object, Reflect};
    use serde::Serialize;
    use wasm_bindgen::prelude::*;

    pub(super) fn publish(state: &MirrorState) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let dynamo = child_object(&window, "dynamo")?;
        let js_state = child_object(&dynamo, "state")?;

        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        let strands = state.strands.serialize(&serializer)?;
        Reflect::set(&js_state, &JsValue::from_str("strands"), &strands)?;

        // Merge into whatever legacy code already put in vars.
        let vars = child_object(&js_state, "vars")?;
        let ours = state.vars.serialize(&serializer)?;
        Object::assign(vars.unchecked_ref(), ours.unchecked_ref());
        Ok(())
    }

    fn child_object(parent: &JsValue, key: &str) -> Result<JsValue, JsValue> {
        let key = JsValue::from_str(key);
        let existing = Reflect::get(parent, &key)?;
        if existing.is_object() {
            return Ok(existing);
        }
        let created: JsValue = Object::new().into();
        Reflect::set(parent, &key, &created)?;
        Ok(created)
    }
}
