// filepath: src/widgets/uptime.rs
//! System uptime as `H:MM:SS`

use crate::draw::Canvas;
use crate::font::Font;
use crate::metrics::{ProcUptime, UptimeSource};
use crate::widget::interface::{read_anchor, read_font};
use crate::widget::Widget;
use std::time::Duration;

/// Format uptime with unpadded hours; days roll into the hour count
pub fn format_uptime(uptime: Duration) -> String {
    let total = uptime.as_secs();
    format!("{}:{:02}:{:02}", total / 3600, (total / 60) % 60, total % 60)
}

pub struct UptimeWidget {
    x: i32,
    y: i32,
    font: Option<Font>,
    source: Box<dyn UptimeSource>,
}

impl UptimeWidget {
    pub fn new(source: Box<dyn UptimeSource>) -> Self {
        Self {
            x: 2,
            y: 2,
            font: None,
            source,
        }
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }
}

impl Default for UptimeWidget {
    fn default() -> Self {
        Self::new(Box::new(ProcUptime::default()))
    }
}

impl Widget for UptimeWidget {
    fn id(&self) -> &str {
        "uptime"
    }

    fn name(&self) -> &str {
        "Uptime"
    }

    fn init(&mut self, config: &toml::Table) -> Result<(), Box<dyn std::error::Error>> {
        read_anchor(config, &mut self.x, &mut self.y)?;
        self.font = read_font(config)?;
        Ok(())
    }

    fn draw(&mut self, canvas: &mut Canvas) -> Result<(), Box<dyn std::error::Error>> {
        let text = format_uptime(self.source.uptime()?);
        canvas.draw_text(self.x, self.y, &text, self.font.as_ref(), true);
        Ok(())
    }
}
