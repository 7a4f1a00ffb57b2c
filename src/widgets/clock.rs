// filepath: src/widgets/clock.rs
//! Local wall-clock time.

use crate::draw::Canvas;
use crate::font::Font;
use crate::widget::interface::{read_anchor, read_font};
use crate::widget::Widget;
use chrono::{Local, Timelike};

pub struct ClockWidget {
    x: i32,
    y: i32,
    font: Option<Font>,
}

/// `HH:MM:SS`, every field zero-padded
pub fn format_clock(time: &impl Timelike) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        time.hour(),
        time.minute(),
        time.second()
    )
}

impl ClockWidget {
    pub fn new() -> Self {
        Self {
            x: 2,
            y: 2,
            font: None,
        }
    }
}

impl Default for ClockWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for ClockWidget {
    fn id(&self) -> &str {
        "clock"
    }

    fn name(&self) -> &str {
        "Clock"
    }

    fn init(&mut self, config: &toml::Table) -> Result<(), Box<dyn std::error::Error>> {
        read_anchor(config, &mut self.x, &mut self.y)?;
        self.font = read_font(config)?;
        Ok(())
    }

    fn draw(&mut self, canvas: &mut Canvas) -> Result<(), Box<dyn std::error::Error>> {
        let time_str = format_clock(&Local::now());
        canvas.draw_text(self.x, self.y, &time_str, self.font.as_ref(), true);
        Ok(())
    }
}
