// filepath: src/widget/interface.rs
//! Widget interface definitions
//!
//! This file defines the trait every widget implements, plus the helpers
//! widgets use to read their settings table.

use crate::draw::Canvas;
use crate::font::Font;

/// Core widget trait that all widgets must implement
pub trait Widget {
    /// Get the unique identifier for this widget
    fn id(&self) -> &str;

    /// Get the human-readable name of this widget
    fn name(&self) -> &str;

    /// Initialize the widget with configuration
    fn init(&mut self, _config: &toml::Table) -> Result<(), Box<dyn std::error::Error>> {
        // Default implementation: no configuration needed
        Ok(())
    }

    /// Fetch a fresh snapshot and draw it onto the canvas
    ///
    /// An error means nothing was drawn; the caller skips the widget for
    /// this cycle.
    fn draw(&mut self, canvas: &mut Canvas) -> Result<(), Box<dyn std::error::Error>>;

    /// True when `draw` blocks long enough to pace the render loop by itself
    fn paces_cycle(&self) -> bool {
        false
    }
}

pub(crate) fn get_i32(
    config: &toml::Table,
    key: &str,
) -> Result<Option<i32>, Box<dyn std::error::Error>> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => {
            let n = value
                .as_integer()
                .ok_or_else(|| format!("`{}` must be an integer", key))?;
            Ok(Some(i32::try_from(n).map_err(|_| format!("`{}` is out of range", key))?))
        }
    }
}

pub(crate) fn get_bool(
    config: &toml::Table,
    key: &str,
) -> Result<Option<bool>, Box<dyn std::error::Error>> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => Ok(Some(
            value
                .as_bool()
                .ok_or_else(|| format!("`{}` must be true or false", key))?,
        )),
    }
}

pub(crate) fn get_str<'a>(
    config: &'a toml::Table,
    key: &str,
) -> Result<Option<&'a str>, Box<dyn std::error::Error>> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => Ok(Some(
            value
                .as_str()
                .ok_or_else(|| format!("`{}` must be a string", key))?,
        )),
    }
}

/// Read the `x`/`y` anchor, keeping the current values for missing keys
pub(crate) fn read_anchor(
    config: &toml::Table,
    x: &mut i32,
    y: &mut i32,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(v) = get_i32(config, "x")? {
        *x = v;
    }
    if let Some(v) = get_i32(config, "y")? {
        *y = v;
    }
    Ok(())
}

/// Read an optional `font` (built-in name or file path) and `font_size`
pub(crate) fn read_font(config: &toml::Table) -> Result<Option<Font>, Box<dyn std::error::Error>> {
    let Some(setting) = get_str(config, "font")? else {
        return Ok(None);
    };
    let size = match config.get("font_size") {
        None => 12.0,
        Some(value) => value
            .as_float()
            .or_else(|| value.as_integer().map(|n| n as f64))
            .ok_or("`font_size` must be a number")? as f32,
    };
    Ok(Some(Font::resolve(setting, size)?))
}
