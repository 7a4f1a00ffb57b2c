// filepath: src/widget/registry.rs
//! Widget registry
//!
//! Holds the configured widgets in drawing order and draws them onto
//! the canvas each cycle.

use log::{info, warn};

use crate::config::StatusConfig;
use crate::draw::Canvas;
use crate::widget::Widget;
use crate::widgets::{ClockWidget, CpuBarsWidget, ServiceStatusWidget, UptimeWidget};

/// Manages the collection of widgets
#[derive(Default)]
pub struct WidgetRegistry {
    widgets: Vec<Box<dyn Widget>>,
}

impl WidgetRegistry {
    /// Create a new empty widget registry
    pub fn new() -> Self {
        Self {
            widgets: Vec::new(),
        }
    }

    /// Add a widget; widgets draw in the order they were added
    pub fn add_widget(&mut self, widget: Box<dyn Widget>) {
        info!("Adding widget: {}", widget.name());
        self.widgets.push(widget);
    }

    /// Build the built-in widgets listed in `widgets.enabled`
    ///
    /// Unknown ids are skipped with a warning; a widget whose settings do
    /// not parse is an error.
    pub fn load_widgets_from_config(
        &mut self,
        config: &StatusConfig,
    ) -> Result<(), Box<dyn std::error::Error>> {
        for widget_id in &config.widgets.enabled {
            let mut widget: Box<dyn Widget> = match widget_id.as_str() {
                "uptime" => Box::new(UptimeWidget::default()),
                "clock" => Box::new(ClockWidget::new()),
                "cpu" => Box::new(CpuBarsWidget::with_sample_interval(
                    config.render.cpu_sample(),
                )),
                "services" => Box::new(ServiceStatusWidget::with_timeout(
                    config.render.service_timeout(),
                )),
                _ => {
                    warn!("Unknown widget: {}", widget_id);
                    continue;
                }
            };

            widget
                .init(&config.widget_table(widget_id))
                .map_err(|e| format!("widget {}: {}", widget_id, e))?;
            self.add_widget(widget);
        }
        Ok(())
    }

    /// Draw all widgets to the canvas, returning how many were skipped
    pub fn draw(&mut self, canvas: &mut Canvas) -> usize {
        let mut skipped = 0;
        for widget in &mut self.widgets {
            if let Err(e) = widget.draw(canvas) {
                warn!("Skipping widget {} this cycle: {}", widget.name(), e);
                skipped += 1;
            }
        }
        skipped
    }

    /// True when some widget blocks long enough to pace the loop
    pub fn paces_cycle(&self) -> bool {
        self.widgets.iter().any(|w| w.paces_cycle())
    }

    pub fn has_widgets(&self) -> bool {
        !self.widgets.is_empty()
    }

    /// Widget ids in drawing order
    pub fn ids(&self) -> Vec<&str> {
        self.widgets.iter().map(|w| w.id()).collect()
    }
}
