/// Course Stranding - strand-gated course preview
/// Built with Rust + WASM + Yew

pub mod bindings;
pub mod config;
pub mod course;
pub mod error;
pub mod mirror;
pub mod selection;
pub mod storage;
pub mod store;
pub mod strand;
pub mod ui;
pub mod visibility;

use config::StrandingConfig;
use course::CourseStructure;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

// Set up panic hook and logging, and publish the empty strand mirror
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    mirror::Mirror::global().reset();
}

fn parse_config(config: JsValue) -> StrandingConfig {
    if config.is_undefined() || config.is_null() {
        return StrandingConfig::default();
    }
    serde_wasm_bindgen::from_value(config).unwrap_or_else(|e| {
        log::warn!("Invalid stranding config, using defaults: {}", e);
        StrandingConfig::default()
    })
}

// Start the Yew app for the course preview
#[wasm_bindgen(js_name = startPreview)]
pub fn start_preview(course: JsValue, config: JsValue) -> Result<(), JsValue> {
    let course: CourseStructure = serde_wasm_bindgen::from_value(course)?;
    let config = parse_config(config);
    config.clone().install();

    let props = ui::preview::PreviewProps {
        course: Rc::new(course),
        config: Rc::new(config),
    };
    yew::Renderer::<ui::preview::PreviewApp>::with_props(props).render();
    Ok(())
}
