// filepath: src/app.rs
//! Main application logic for oled-status
//!
//! `DisplayController` owns the canvas and the panel; `RenderLoop` runs
//! clear → draw widgets → render until it is cancelled.

use crate::device::{DeviceError, DisplayDevice};
use crate::draw::Canvas;
use crate::widget::WidgetRegistry;
use log::{debug, error, info};
use std::time::Duration;

pub struct DisplayController<D: DisplayDevice> {
    device: D,
    canvas: Canvas,
    width: u32,
    height: u32,
}

impl<D: DisplayDevice> DisplayController<D> {
    /// Take ownership of a ready device and size the canvas to its panel
    pub fn new(device: D) -> Self {
        let width = device.width();
        let height = device.height();
        info!("Display controller for {}x{} panel", width, height);

        Self {
            device,
            canvas: Canvas::new(width, height),
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    /// Reset the canvas without touching the device
    pub fn clear_canvas(&mut self) {
        self.canvas.clear();
    }

    /// Reset the canvas; with `render`, blank the physical panel right away
    pub fn clear(&mut self, render: bool) -> Result<(), DeviceError> {
        self.clear_canvas();
        if render {
            self.device.clear()?;
            self.device.display()?;
        }
        Ok(())
    }

    /// Push the canvas to the device and commit it to the panel
    pub fn render(&mut self) -> Result<(), DeviceError> {
        self.device.image(self.canvas.pixels())?;
        self.device.display()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Rendering,
    Cancelled,
    Terminated,
}

pub struct RenderLoop<D: DisplayDevice> {
    controller: DisplayController<D>,
    registry: WidgetRegistry,
    idle_delay: Duration,
    state: LoopState,
    cycles: u64,
}

impl<D: DisplayDevice> RenderLoop<D> {
    pub fn new(controller: DisplayController<D>, registry: WidgetRegistry, idle_delay: Duration) -> Self {
        Self {
            controller,
            registry,
            idle_delay,
            state: LoopState::Idle,
            cycles: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn controller(&self) -> &DisplayController<D> {
        &self.controller
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.state, LoopState::Cancelled | LoopState::Terminated)
    }

    /// Request cancellation; takes effect before the next cycle starts
    pub fn cancel(&mut self) {
        if !self.is_cancelled() {
            info!("Cancellation requested");
            self.state = LoopState::Cancelled;
        }
    }

    /// How long to wait before the next cycle
    ///
    /// A widget that blocks on a sampling window already paces the loop,
    /// otherwise the configured idle delay keeps it from spinning.
    pub fn pacing(&self) -> Duration {
        if self.registry.paces_cycle() {
            Duration::ZERO
        } else {
            self.idle_delay
        }
    }

    /// Run one clear → draw → render cycle
    ///
    /// Returns false without drawing once the loop has been cancelled.
    pub fn run_cycle(&mut self) -> bool {
        if self.is_cancelled() {
            return false;
        }

        self.state = LoopState::Rendering;
        self.controller.clear_canvas();
        let skipped = self.registry.draw(self.controller.canvas_mut());
        if let Err(e) = self.controller.render() {
            error!("Failed to render frame: {}", e);
        }
        self.cycles += 1;
        debug!("Cycle {} done, {} widget(s) skipped", self.cycles, skipped);

        self.state = LoopState::Idle;
        true
    }

    /// Blank the panel and mark the loop terminated
    ///
    /// Clearing is best effort: a failure is logged and shutdown goes on.
    pub fn shutdown(&mut self) {
        info!("Clearing display and shutting down");
        if let Err(e) = self.controller.clear(true) {
            error!("Failed to clear display on exit: {}", e);
        }
        self.state = LoopState::Terminated;
    }
}
