use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn selector_for_template(template: &str) -> Result<String, JsValue> {
    crate::specs::lookup(template)
        .map(|entry| entry.selector.to_string())
        .ok_or_else(|| {
            let err = crate::specs::UnknownSpecError {
                spec: template.to_string(),
            };
            JsValue::from_str(&err.to_string())
        })
}

#[wasm_bindgen]
pub fn block_spec_catalog_json() -> String {
    crate::catalog_value().to_string()
}
