use js_sys::{Array, Function, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use inkboard_shared::{InkError, StrokeSource};

/// Strokes read straight from a GeoGebra applet object
/// (`getObjectNumber`, `getObjectName`, `getCommandString`).
pub struct GgbApplet {
    inner: JsValue,
}

impl GgbApplet {
    pub fn new(inner: JsValue) -> Self {
        Self { inner }
    }

    fn call(&self, method: &str, args: &[JsValue]) -> Result<JsValue, JsValue> {
        let function = Reflect::get(&self.inner, &JsValue::from_str(method))?
            .dyn_into::<Function>()
            .map_err(|_| JsValue::from_str(&format!("Missing applet method: {method}")))?;
        let args = args.iter().collect::<Array>();
        function.apply(&self.inner, &args)
    }
}

impl StrokeSource for GgbApplet {
    fn stroke_count(&self) -> Result<usize, InkError> {
        let value = self
            .call("getObjectNumber", &[])
            .map_err(|error| InkError::Enumerate {
                message: describe(&error),
            })?;
        let count = value.as_f64().ok_or_else(|| InkError::Enumerate {
            message: format!("object count is not a number: {}", describe(&value)),
        })?;
        object_count(count).ok_or_else(|| InkError::Enumerate {
            message: format!("object count is not a whole number: {count}"),
        })
    }

    fn stroke_command(&self, index: usize) -> Result<String, InkError> {
        let name = self
            .call("getObjectName", &[JsValue::from_f64(index as f64)])
            .map_err(|error| source_error(index, &error))?;
        let command = self
            .call("getCommandString", &[name])
            .map_err(|error| source_error(index, &error))?;
        command.as_string().ok_or_else(|| InkError::Source {
            index,
            message: "command string is not text".to_string(),
        })
    }
}

fn source_error(index: usize, error: &JsValue) -> InkError {
    InkError::Source {
        index,
        message: describe(error),
    }
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn object_count(count: f64) -> Option<usize> {
    if count.is_finite() && count >= 0.0 && count.fract() == 0.0 {
        Some(count as usize)
    } else {
        None
    }
}
