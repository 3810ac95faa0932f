/// JavaScript surface for legacy/embedded course scripts.
///
/// Mirrors the old `dynamo.state` service: every function is total, bad
/// input is logged and answered with `false`, `undefined` or an empty list.

use crate::config::StrandingConfig;
use crate::course::{self, Page, Topic};
use crate::mirror::Mirror;
use crate::store::StrandStore;
use crate::strand::{Strand, StrandValue};
use crate::visibility;
use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

fn store() -> StrandStore {
    StrandStore::local(&StrandingConfig::active().storage_key)
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    match value.serialize(&serde_wasm_bindgen::Serializer::json_compatible()) {
        Ok(js) => js,
        Err(e) => {
            log::warn!("Failed to convert result for JavaScript: {}", e);
            JsValue::UNDEFINED
        }
    }
}

fn from_js<T: DeserializeOwned>(value: JsValue, operation: &str) -> Option<T> {
    match serde_wasm_bindgen::from_value(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            log::warn!("Ignoring {} call with invalid input: {}", operation, e);
            None
        }
    }
}

#[wasm_bindgen(js_name = getStrands)]
pub fn get_strands() -> JsValue {
    to_js(&store().get_strands())
}

#[wasm_bindgen(js_name = getStrand)]
pub fn get_strand(name: &str) -> JsValue {
    store()
        .get_strand(name)
        .map(|strand| to_js(&strand))
        .unwrap_or(JsValue::UNDEFINED)
}

/// `value` is a label string or an array of label strings. Any other JSON
/// value is stored as given but never matches a page audience.
#[wasm_bindgen(js_name = setStrand)]
pub fn set_strand(name: &str, value: JsValue) -> bool {
    from_js::<StrandValue>(value, "setStrand")
        .map(|value| store().set_strand(name, value))
        .unwrap_or(false)
}

#[wasm_bindgen(js_name = setStrands)]
pub fn set_strands(strands: JsValue) -> bool {
    from_js::<Vec<Strand>>(strands, "setStrands")
        .map(|strands| store().set_strands(strands))
        .unwrap_or(false)
}

#[wasm_bindgen(js_name = clearStrands)]
pub fn clear_strands() -> bool {
    store().clear_strands()
}

#[wasm_bindgen(js_name = removeStrand)]
pub fn remove_strand(name: &str) -> bool {
    store().remove_strand(name)
}

#[wasm_bindgen(js_name = isPageVisible)]
pub fn is_page_visible(page: JsValue, active: JsValue) -> bool {
    let Some(page) = from_js::<Page>(page, "isPageVisible") else {
        return false;
    };
    let active = from_js::<Vec<String>>(active, "isPageVisible").unwrap_or_default();
    visibility::is_page_visible(&page, &active)
}

#[wasm_bindgen(js_name = filterTopics)]
pub fn filter_topics(topics: JsValue, active: JsValue) -> JsValue {
    let topics = from_js::<Vec<Topic>>(topics, "filterTopics").unwrap_or_default();
    let active = from_js::<Vec<String>>(active, "filterTopics").unwrap_or_default();
    to_js(&visibility::filter_topics(&topics, &active))
}

/// Visible pages for `active`, flattened in navigation order as
/// `{ id, content, label }`.
#[wasm_bindgen(js_name = previewPages)]
pub fn preview_pages(topics: JsValue, active: JsValue) -> JsValue {
    let topics = from_js::<Vec<Topic>>(topics, "previewPages").unwrap_or_default();
    let active = from_js::<Vec<String>>(active, "previewPages").unwrap_or_default();
    to_js(&course::preview_pages(&visibility::filter_topics(&topics, &active)))
}

/// Seed `window.dynamo.state.vars[name]`. A later strand write with the
/// same name overwrites it.
#[wasm_bindgen(js_name = setVar)]
pub fn set_var(name: &str, value: JsValue) -> bool {
    from_js::<serde_json::Value>(value, "setVar")
        .map(|value| Mirror::global().set_var(name, value))
        .is_some()
}

/// Current contents of the strand mirror (`{ strands, vars }`).
#[wasm_bindgen(js_name = strandState)]
pub fn strand_state() -> JsValue {
    to_js(&Mirror::global().snapshot())
}
