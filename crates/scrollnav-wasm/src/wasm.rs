#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for the NavRunner.
//!
//! This module wraps [`super::runner_core::RunnerCore`] with JS-friendly types.
//! Only compiled on `wasm32` targets.

use js_sys::{Array, Object, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::runner_core::{LinkState, RunnerCore, RunnerError};
use scrollnav_web::HostCommand;

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

fn set_js(obj: &Object, key: &str, value: JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(key), &value);
}

fn to_js_error(err: RunnerError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

fn command_to_js(command: &HostCommand) -> JsValue {
    let obj = Object::new();
    match command {
        HostCommand::Observe {
            observer,
            node,
            thresholds,
            root_margin,
        } => {
            set_js(&obj, "op", JsValue::from_str("observe"));
            set_js(&obj, "observer", JsValue::from_f64(f64::from(*observer)));
            set_js(&obj, "node", JsValue::from_f64(*node as f64));
            let list = Array::new();
            for t in thresholds {
                list.push(&JsValue::from_f64(*t));
            }
            set_js(&obj, "thresholds", list.into());
            set_js(&obj, "root_margin", JsValue::from_str(root_margin));
        }
        HostCommand::Unobserve { observer, node } => {
            set_js(&obj, "op", JsValue::from_str("unobserve"));
            set_js(&obj, "observer", JsValue::from_f64(f64::from(*observer)));
            set_js(&obj, "node", JsValue::from_f64(*node as f64));
        }
        HostCommand::Listen {
            id,
            passive,
            resize,
        } => {
            set_js(&obj, "op", JsValue::from_str("listen"));
            set_js(&obj, "id", JsValue::from_f64(*id as f64));
            set_js(&obj, "passive", JsValue::from_bool(*passive));
            set_js(&obj, "resize", JsValue::from_bool(*resize));
        }
        HostCommand::Unlisten { id } => {
            set_js(&obj, "op", JsValue::from_str("unlisten"));
            set_js(&obj, "id", JsValue::from_f64(*id as f64));
        }
    }
    obj.into()
}

fn links_to_js(links: Vec<LinkState>) -> Array {
    let out = Array::new();
    for link in links {
        let obj = Object::new();
        set_js(&obj, "text", JsValue::from_str(link.text));
        set_js(&obj, "href", JsValue::from_str(&link.href));
        set_js(&obj, "active", JsValue::from_bool(link.active));
        out.push(&obj);
    }
    out
}

/// Scroll navigation runner exported to JavaScript.
///
/// The host mirrors element geometry into the runner, applies the commands
/// it drains after every call, and forwards observer entries and scroll
/// ticks back in.
#[wasm_bindgen]
pub struct NavRunner {
    inner: RunnerCore,
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
}

#[wasm_bindgen]
impl NavRunner {
    /// Create a runner. `config_json` is an optional navigation policy.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<NavRunner, JsValue> {
        install_panic_hook();
        let inner = RunnerCore::new(config_json.as_deref()).map_err(to_js_error)?;
        Ok(Self { inner })
    }

    /// Insert or move an element of the page mirror.
    #[wasm_bindgen(js_name = setElement)]
    pub fn set_element(
        &mut self,
        id: &str,
        node: u32,
        doc_top: f64,
        height: f64,
    ) -> Result<(), JsValue> {
        self.inner
            .set_element(id, u64::from(node), doc_top, height)
            .map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = removeElement)]
    pub fn remove_element(&mut self, node: u32) -> bool {
        self.inner.remove_element(u64::from(node))
    }

    /// Track the home sections named in `ids` (an array of strings).
    #[wasm_bindgen(js_name = registerNav)]
    pub fn register_nav(&mut self, ids: Array) -> u32 {
        let ids: Vec<String> = ids.iter().filter_map(|v| v.as_string()).collect();
        self.inner.register_nav(&ids) as u32
    }

    #[wasm_bindgen(js_name = registerProducts)]
    pub fn register_products(&mut self) -> u32 {
        self.inner.register_products() as u32
    }

    /// Forward a batch from observer 1. Returns the active anchor.
    #[wasm_bindgen(js_name = pushNavEntries)]
    pub fn push_nav_entries(&mut self, json: &str) -> Result<String, JsValue> {
        self.inner.push_nav_entries(json).map_err(to_js_error)
    }

    /// Forward a batch from observer 2. Returns the product label.
    #[wasm_bindgen(js_name = pushProductEntries)]
    pub fn push_product_entries(&mut self, json: &str) -> Result<String, JsValue> {
        self.inner.push_product_entries(json).map_err(to_js_error)
    }

    /// One scroll or resize tick.
    ///
    /// Returns `{ show_secondary_nav, style_changed }`.
    pub fn scroll(&mut self, scroll_y: f64, width: f64, height: f64) -> JsValue {
        let outcome = self.inner.scroll(scroll_y, width, height);
        let obj = Object::new();
        set_js(
            &obj,
            "show_secondary_nav",
            outcome.show_secondary_nav.into(),
        );
        set_js(&obj, "style_changed", outcome.style_changed.into());
        obj.into()
    }

    /// Scroll offset for a product link, or `undefined`.
    #[wasm_bindgen(js_name = scrollTarget)]
    pub fn scroll_target(&self, product: &str) -> Option<f64> {
        self.inner.scroll_target(product)
    }

    /// Drain queued DOM operations as an array of `{ op, .. }` objects.
    #[wasm_bindgen(js_name = takeCommands)]
    pub fn take_commands(&mut self) -> Array {
        let out = Array::new();
        for command in self.inner.take_commands() {
            out.push(&command_to_js(&command));
        }
        out
    }

    #[wasm_bindgen(js_name = activeAnchor)]
    pub fn active_anchor(&self) -> String {
        self.inner.active_anchor()
    }

    #[wasm_bindgen(js_name = currentLabel)]
    pub fn current_label(&self) -> String {
        self.inner.current_label()
    }

    #[wasm_bindgen(js_name = showSecondaryNav)]
    pub fn show_secondary_nav(&self) -> bool {
        self.inner.show_secondary_nav()
    }

    /// Primary menu links as `{ text, href, active }` objects.
    #[wasm_bindgen(js_name = navLinks)]
    pub fn nav_links(&self) -> Array {
        links_to_js(self.inner.nav_links())
    }

    /// Product sub-navigation links as `{ text, href, active }` objects.
    #[wasm_bindgen(js_name = productLinks)]
    pub fn product_links(&self) -> Array {
        links_to_js(self.inner.product_links())
    }

    /// Current style frame as `{ "selector.property": value }`.
    #[wasm_bindgen(js_name = styleProperties)]
    pub fn style_properties(&self) -> JsValue {
        let obj = Object::new();
        for (key, value) in self.inner.style_properties() {
            set_js(&obj, key, JsValue::from_str(&value));
        }
        obj.into()
    }

    /// Release every observer and listener.
    pub fn destroy(&mut self) {
        self.inner.destroy();
    }
}
