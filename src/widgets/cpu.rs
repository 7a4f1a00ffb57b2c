// filepath: src/widgets/cpu.rs
//! CPU load bars
//!
//! One filled bar per sampled value. The bar's length along the load
//! axis is proportional to the load; bars stack along the other axis.

use crate::draw::Canvas;
use crate::metrics::{CpuSampler, SysinfoCpu};
use crate::widget::interface::{get_bool, get_i32, get_str, read_anchor};
use crate::widget::Widget;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Load scales width, bars stack downward
    Horizontal,
    /// Load scales height, bars stack rightward
    Vertical,
}

/// Placement of a bar group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarLayout {
    pub x: i32,
    pub y: i32,
    pub bar_width: i32,
    pub bar_height: i32,
    pub padding: i32,
    pub orientation: Orientation,
}

/// Length of a bar for `load` percent of `full_length`
pub fn bar_length(load: f32, full_length: i32) -> i32 {
    let load = if load.is_nan() { 0.0 } else { load.clamp(0.0, 100.0) };
    (load / 100.0 * full_length as f32).round() as i32
}

/// Draw one bar per load value, in order
pub fn draw_cpu_bars(canvas: &mut Canvas, layout: &BarLayout, loads: &[f32]) {
    let (mut x, mut y) = (layout.x, layout.y);
    // Thickness plus one pixel plus padding between bar origins
    let pitch = |thickness: i32| thickness.saturating_add(1).saturating_add(layout.padding);

    for &load in loads {
        match layout.orientation {
            Orientation::Horizontal => {
                let length = bar_length(load, layout.bar_width);
                canvas.draw_rectangle(x, y, length, layout.bar_height, true, true);
                y = y.saturating_add(pitch(layout.bar_height));
            }
            Orientation::Vertical => {
                let length = bar_length(load, layout.bar_height);
                canvas.draw_rectangle(x, y, layout.bar_width, length, true, true);
                x = x.saturating_add(pitch(layout.bar_width));
            }
        }
    }
}

pub struct CpuBarsWidget {
    x: i32,
    y: i32,
    /// `None` stretches horizontal bars to one pixel short of the right edge
    bar_width: Option<i32>,
    bar_height: i32,
    padding: i32,
    orientation: Orientation,
    per_core: bool,
    sampler: Box<dyn CpuSampler>,
}

impl CpuBarsWidget {
    pub fn new(sampler: Box<dyn CpuSampler>) -> Self {
        Self {
            x: 0,
            y: 0,
            bar_width: None,
            bar_height: 10,
            padding: 2,
            orientation: Orientation::Vertical,
            per_core: false,
            sampler,
        }
    }

    pub fn with_sample_interval(interval: Duration) -> Self {
        Self::new(Box::new(SysinfoCpu::new(interval)))
    }

    pub fn layout(&self, canvas: &Canvas) -> BarLayout {
        let bar_width = self.bar_width.unwrap_or(match self.orientation {
            Orientation::Horizontal => (canvas.width() as i32)
                .saturating_sub(1)
                .saturating_sub(self.x),
            Orientation::Vertical => 1,
        });
        BarLayout {
            x: self.x,
            y: self.y,
            bar_width,
            bar_height: self.bar_height,
            padding: self.padding,
            orientation: self.orientation,
        }
    }
}

impl Widget for CpuBarsWidget {
    fn id(&self) -> &str {
        "cpu"
    }

    fn name(&self) -> &str {
        "CPU load"
    }

    fn init(&mut self, config: &toml::Table) -> Result<(), Box<dyn std::error::Error>> {
        read_anchor(config, &mut self.x, &mut self.y)?;
        if let Some(w) = get_i32(config, "bar_width")? {
            self.bar_width = Some(w);
        }
        if let Some(h) = get_i32(config, "bar_height")? {
            self.bar_height = h;
        }
        if let Some(p) = get_i32(config, "padding")? {
            self.padding = p;
        }
        if let Some(per_core) = get_bool(config, "per_core")? {
            self.per_core = per_core;
        }
        if let Some(orientation) = get_str(config, "orientation")? {
            self.orientation = match orientation {
                "horizontal" => Orientation::Horizontal,
                "vertical" => Orientation::Vertical,
                other => return Err(format!("unknown orientation {:?}", other).into()),
            };
        }
        Ok(())
    }

    fn draw(&mut self, canvas: &mut Canvas) -> Result<(), Box<dyn std::error::Error>> {
        let loads = self.sampler.sample(self.per_core)?;
        let layout = self.layout(canvas);
        draw_cpu_bars(canvas, &layout, &loads);
        Ok(())
    }

    fn paces_cycle(&self) -> bool {
        !self.sampler.interval().is_zero()
    }
}
