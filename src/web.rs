//! Browser entry points
//!
//! The page scripts load the level file themselves and hand the JSON over;
//! queues come back as JSON arrays.

use wasm_bindgen::prelude::*;

use crate::catalog::LevelCatalog;
use crate::queue::generate_queue;

/// Install the panic hook and console logger. Safe to call more than once.
#[wasm_bindgen]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_ok() {
        log::info!("School Journey core ready");
    }
}

/// Build a play queue from level data (`{ levels: [...] }` or `[...]`)
#[wasm_bindgen(js_name = generateGameQueue)]
pub fn generate_game_queue(levels_json: &str) -> Result<String, JsValue> {
    let catalog =
        LevelCatalog::from_json_str(levels_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let queue = generate_queue(catalog.levels());
    serde_json::to_string(&queue).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Web app manifest as JSON
#[wasm_bindgen(js_name = appManifest)]
pub fn app_manifest() -> Result<String, JsValue> {
    crate::manifest::AppManifest::default()
        .to_json_pretty()
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
