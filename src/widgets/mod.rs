// filepath: src/widgets/mod.rs
//! Built-in widgets for oled-status

pub mod clock;
pub mod cpu;
pub mod services;
pub mod uptime;

pub use clock::ClockWidget;
pub use cpu::{CpuBarsWidget, Orientation};
pub use services::ServiceStatusWidget;
pub use uptime::UptimeWidget;
