mod applet;

use wasm_bindgen::prelude::*;

use inkboard_shared::{convert, Conversion, ConversionOptions, StrokeSource};

pub use applet::GgbApplet;

#[wasm_bindgen(start)]
pub fn run() {
    console_error_panic_hook::set_once();
    if let Err(error) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("Console logger unavailable: {error}").into());
    }
}

/// Converts every object on a GeoGebra applet into an InkML document.
/// Resolves to `undefined` when the applet holds no usable strokes.
#[wasm_bindgen(js_name = convertApplet)]
pub fn convert_applet(
    applet: JsValue,
    equation: &str,
    options: Option<String>,
) -> Result<Option<String>, JsValue> {
    let options = parse_options(options.as_deref()).map_err(|error| JsValue::from_str(&error))?;
    let applet = GgbApplet::new(applet);
    report(convert_source(&applet, equation, &options))
}

/// Same as `convertApplet`, for a JSON array of polyline command strings.
#[wasm_bindgen(js_name = convertCommands)]
pub fn convert_commands(
    commands_json: &str,
    equation: &str,
    options: Option<String>,
) -> Result<Option<String>, JsValue> {
    report(convert_command_list(
        commands_json,
        equation,
        options.as_deref(),
    ))
}

fn report(result: Result<Option<Conversion>, String>) -> Result<Option<String>, JsValue> {
    match result {
        Ok(Some(conversion)) => {
            for skipped in &conversion.skipped {
                web_sys::console::warn_1(
                    &format!("Skipped stroke {}: {}", skipped.index, skipped.error).into(),
                );
            }
            Ok(Some(conversion.inkml))
        }
        Ok(None) => Ok(None),
        Err(error) => {
            web_sys::console::error_1(&format!("InkML conversion failed: {error}").into());
            Err(JsValue::from_str(&error))
        }
    }
}

fn convert_command_list(
    commands_json: &str,
    equation: &str,
    options: Option<&str>,
) -> Result<Option<Conversion>, String> {
    let options = parse_options(options)?;
    let commands = serde_json::from_str::<Vec<String>>(commands_json)
        .map_err(|error| format!("Invalid command list: {error}"))?;
    convert_source(&commands, equation, &options)
}

fn convert_source<S: StrokeSource + ?Sized>(
    source: &S,
    equation: &str,
    options: &ConversionOptions,
) -> Result<Option<Conversion>, String> {
    convert(source, equation, options).map_err(|error| error.to_string())
}

fn parse_options(text: Option<&str>) -> Result<ConversionOptions, String> {
    match text.map(str::trim) {
        None | Some("") => Ok(ConversionOptions::default()),
        Some(text) => serde_json::from_str(text).map_err(|error| format!("Invalid options: {error}")),
    }
}
