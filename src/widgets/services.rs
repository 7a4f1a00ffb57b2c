// filepath: src/widgets/services.rs
//! Service health badges
//!
//! Only services that need attention are drawn: a boxed label for an
//! inactive unit, a double box for a failed one. Healthy units leave
//! their column empty so badges never shift position.

use crate::draw::Canvas;
use crate::font::Font;
use crate::metrics::{ServiceChecker, ServiceStatus, Systemctl};
use crate::widget::interface::{read_anchor, read_font};
use crate::widget::Widget;
use std::time::Duration;

pub const BADGE_WIDTH: i32 = 23;
pub const BADGE_HEIGHT: i32 = 13;
pub const BADGE_SPACING: i32 = 2;

/// Draw one badge per `(label, status)` pair starting at `(x, y)`
pub fn draw_service_badges(
    canvas: &mut Canvas,
    mut x: i32,
    y: i32,
    badges: &[(&str, ServiceStatus)],
    font: Option<&Font>,
) {
    for &(label, status) in badges {
        match status {
            ServiceStatus::Failed => {
                canvas.draw_rectangle(x, y, BADGE_WIDTH, BADGE_HEIGHT, true, false);
                canvas.draw_rectangle(
                    x.saturating_add(2),
                    y.saturating_add(2),
                    BADGE_WIDTH - 4,
                    BADGE_HEIGHT - 4,
                    true,
                    false,
                );
                let (text_x, text_y) = (x.saturating_add(3), y.saturating_add(1));
                canvas.draw_text(text_x, text_y, label, font, true);
            }
            ServiceStatus::Inactive => {
                canvas.draw_rectangle(x, y, BADGE_WIDTH, BADGE_HEIGHT, true, false);
                let (text_x, text_y) = (x.saturating_add(3), y.saturating_add(1));
                canvas.draw_text(text_x, text_y, label, font, true);
            }
            ServiceStatus::Active => {}
        }

        x = x.saturating_add(BADGE_WIDTH + BADGE_SPACING);
    }
}

pub struct ServiceStatusWidget {
    x: i32,
    y: i32,
    font: Option<Font>,
    /// `(unit, label)` in display order
    services: Vec<(String, String)>,
    checker: Box<dyn ServiceChecker>,
}

impl ServiceStatusWidget {
    pub fn new(checker: Box<dyn ServiceChecker>, services: Vec<(String, String)>) -> Self {
        Self {
            x: 2,
            y: 20,
            font: None,
            services,
            checker,
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(Box::new(Systemctl::new(timeout)), Vec::new())
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn services(&self) -> &[(String, String)] {
        &self.services
    }
}

fn parse_services(value: &toml::Value) -> Result<Vec<(String, String)>, Box<dyn std::error::Error>> {
    let entries = value
        .as_array()
        .ok_or("`services` must be a list of [unit, label] pairs")?;

    entries
        .iter()
        .map(|entry| -> Result<(String, String), Box<dyn std::error::Error>> {
            match entry.as_array().map(Vec::as_slice) {
                Some([unit, label]) => match (unit.as_str(), label.as_str()) {
                    (Some(unit), Some(label)) => Ok((unit.to_string(), label.to_string())),
                    _ => Err(format!("service entry {} must hold two strings", entry).into()),
                },
                _ => Err(format!("service entry {} must be [unit, label]", entry).into()),
            }
        })
        .collect()
}

impl Widget for ServiceStatusWidget {
    fn id(&self) -> &str {
        "services"
    }

    fn name(&self) -> &str {
        "Service status"
    }

    fn init(&mut self, config: &toml::Table) -> Result<(), Box<dyn std::error::Error>> {
        read_anchor(config, &mut self.x, &mut self.y)?;
        self.font = read_font(config)?;
        if let Some(value) = config.get("services") {
            self.services = parse_services(value)?;
        }
        Ok(())
    }

    fn draw(&mut self, canvas: &mut Canvas) -> Result<(), Box<dyn std::error::Error>> {
        // Query everything first so a failed query leaves the canvas untouched
        let mut badges = Vec::with_capacity(self.services.len());
        for (unit, label) in &self.services {
            let status = self.checker.status(unit)?;
            log::debug!("Service {} is {:?}", unit, status);
            badges.push((label.as_str(), status));
        }

        draw_service_badges(canvas, self.x, self.y, &badges, self.font.as_ref());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricError;
    use std::collections::HashMap;

    struct Table(HashMap<&'static str, ServiceStatus>);

    impl ServiceChecker for Table {
        fn status(&self, service: &str) -> Result<ServiceStatus, MetricError> {
            self.0
                .get(service)
                .copied()
                .ok_or_else(|| MetricError::Parse(format!("unknown unit {}", service)))
        }
    }

    fn lit_in_columns(canvas: &Canvas, columns: std::ops::Range<i32>) -> usize {
        columns
            .flat_map(|x| (0..canvas.height() as i32).map(move |y| (x, y)))
            .filter(|&(x, y)| canvas.pixel(x, y))
            .count()
    }

    #[test]
    fn cursor_advances_for_every_status() {
        for status in [
            ServiceStatus::Active,
            ServiceStatus::Inactive,
            ServiceStatus::Failed,
        ] {
            let mut canvas = Canvas::new(128, 64);
            draw_service_badges(
                &mut canvas,
                2,
                20,
                &[("A", status), ("B", ServiceStatus::Inactive)],
                None,
            );
            // Second badge always starts 25 pixels to the right
            assert!(canvas.pixel(27, 20));
            assert!(!canvas.pixel(26, 20));
        }
    }

    #[test]
    fn inactive_is_a_single_outline_with_label() {
        let mut canvas = Canvas::new(64, 40);
        draw_service_badges(&mut canvas, 0, 0, &[("B", ServiceStatus::Inactive)], None);
        assert!(canvas.pixel(0, 0) && canvas.pixel(22, 12));
        // No inner border
        assert!(!canvas.pixel(2, 10) && !canvas.pixel(20, 10));
        // Label inside
        assert!(lit_in_columns(&canvas, 3..21) > 2 * 18);
    }

    #[test]
    fn failed_has_inner_border() {
        let mut canvas = Canvas::new(64, 40);
        draw_service_badges(&mut canvas, 0, 0, &[("C", ServiceStatus::Failed)], None);
        assert!(canvas.pixel(0, 0) && canvas.pixel(22, 12));
        assert!(canvas.pixel(2, 10) && canvas.pixel(20, 10));
        assert!(canvas.pixel(2, 2) && canvas.pixel(20, 2));
        assert!(!canvas.pixel(1, 1) && !canvas.pixel(21, 11));
    }

    #[test]
    fn reads_ordered_services_from_config() {
        let config: toml::Table = toml::from_str(
            r#"
x = 4
services = [["b.service", "B"], ["a.service", "A"]]
"#,
        )
        .unwrap();
        let mut widget = ServiceStatusWidget::with_timeout(Duration::from_secs(1));
        widget.init(&config).unwrap();
        assert_eq!(
            widget.services(),
            &[
                ("b.service".to_string(), "B".to_string()),
                ("a.service".to_string(), "A".to_string())
            ]
        );

        let bad: toml::Table = toml::from_str(r#"services = [["only-one"]]"#).unwrap();
        assert!(widget.init(&bad).is_err());
    }

    #[test]
    fn row_anchored_past_the_edge_draws_nothing() {
        let mut canvas = Canvas::new(128, 64);
        let checker = Table(HashMap::from([
            ("a.service", ServiceStatus::Inactive),
            ("b.service", ServiceStatus::Failed),
        ]));
        let mut widget = ServiceStatusWidget::new(
            Box::new(checker),
            vec![
                ("a.service".to_string(), "NGX".to_string()),
                ("b.service".to_string(), "HAS".to_string()),
            ],
        )
        .at(i32::MAX - 10, 20);
        widget.draw(&mut canvas).unwrap();
        assert!(canvas.is_blank());

        draw_service_badges(
            &mut canvas,
            2,
            i32::MAX - 1,
            &[("A", ServiceStatus::Failed), ("B", ServiceStatus::Inactive)],
            None,
        );
        assert!(canvas.is_blank());
    }

    #[test]
    fn failed_query_skips_whole_widget() {
        let mut canvas = Canvas::new(128, 64);
        let checker = Table(HashMap::from([("b.service", ServiceStatus::Failed)]));
        let mut widget = ServiceStatusWidget::new(
            Box::new(checker),
            vec![
                ("b.service".to_string(), "B".to_string()),
                ("gone.service".to_string(), "G".to_string()),
            ],
        );
        assert!(widget.draw(&mut canvas).is_err());
        assert!(canvas.is_blank());
    }
}
