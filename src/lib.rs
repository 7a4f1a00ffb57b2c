pub mod app;
pub mod config;
pub mod device;
pub mod draw;
pub mod font;
pub mod metrics;
pub mod widget;
pub mod widgets;

pub use crate::app::{DisplayController, LoopState, RenderLoop};
pub use crate::device::{DeviceError, DisplayDevice, HeadlessDevice, Ssd1306Device};
pub use crate::draw::Canvas;
pub use crate::widget::{Widget, WidgetRegistry};
