//! Full render cycles against the headless panel with canned metrics

use oled_status::metrics::{
    CpuSampler, MetricError, ServiceChecker, ServiceStatus, UptimeSource,
};
use oled_status::widgets::{CpuBarsWidget, ServiceStatusWidget, UptimeWidget};
use oled_status::{Canvas, DisplayController, HeadlessDevice, LoopState, RenderLoop, Widget, WidgetRegistry};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

struct Services;

impl ServiceChecker for Services {
    fn status(&self, service: &str) -> Result<ServiceStatus, MetricError> {
        match service {
            "a.service" => Ok(ServiceStatus::Active),
            "b.service" => Ok(ServiceStatus::Inactive),
            "c.service" => Ok(ServiceStatus::Failed),
            other => Err(MetricError::Parse(format!("unknown unit {}", other))),
        }
    }
}

/// Uptime that can be made to fail from the test
struct SharedUptime(Rc<Cell<Option<u64>>>);

impl UptimeSource for SharedUptime {
    fn uptime(&self) -> Result<Duration, MetricError> {
        self.0
            .get()
            .map(Duration::from_secs)
            .ok_or_else(|| MetricError::Parse("unreadable".to_string()))
    }
}

struct Cores(Vec<f32>);

impl CpuSampler for Cores {
    fn sample(&mut self, _per_core: bool) -> Result<Vec<f32>, MetricError> {
        Ok(self.0.clone())
    }

    fn interval(&self) -> Duration {
        Duration::from_secs(1)
    }
}

fn three_services() -> Vec<(String, String)> {
    vec![
        ("a.service".to_string(), "A".to_string()),
        ("b.service".to_string(), "B".to_string()),
        ("c.service".to_string(), "C".to_string()),
    ]
}

fn lit(canvas: &Canvas, columns: std::ops::Range<i32>, rows: std::ops::Range<i32>) -> usize {
    columns
        .flat_map(|x| rows.clone().map(move |y| (x, y)))
        .filter(|&(x, y)| canvas.pixel(x, y))
        .count()
}

#[test]
fn service_row_marks_only_unhealthy_columns() {
    let mut canvas = Canvas::new(128, 64);
    let mut widget = ServiceStatusWidget::new(Box::new(Services), three_services()).at(2, 20);
    widget.draw(&mut canvas).unwrap();

    // Active: nothing
    assert_eq!(lit(&canvas, 2..25, 0..64), 0);

    // Inactive: one outline at x = 27..50, y = 20..33, nothing inside but the label
    assert!(canvas.pixel(27, 20) && canvas.pixel(49, 20) && canvas.pixel(27, 32) && canvas.pixel(49, 32));
    assert!(!canvas.pixel(29, 30) && !canvas.pixel(47, 22));
    assert!(lit(&canvas, 30..48, 21..31) > 0);

    // Failed: outer and inner outline plus the label
    assert!(canvas.pixel(52, 20) && canvas.pixel(74, 32));
    assert!(canvas.pixel(54, 30) && canvas.pixel(72, 22) && canvas.pixel(72, 30));
    assert!(lit(&canvas, 55..72, 23..30) > 0);

    // Nothing past the third column
    assert_eq!(lit(&canvas, 75..128, 0..64), 0);
    assert_eq!(lit(&canvas, 0..128, 0..20), 0);
}

#[test]
fn reference_composition_renders_each_cycle() {
    let uptime = Rc::new(Cell::new(Some(3661)));

    let mut registry = WidgetRegistry::new();
    registry.add_widget(Box::new(
        UptimeWidget::new(Box::new(SharedUptime(uptime.clone()))).at(2, 2),
    ));
    registry.add_widget(Box::new(
        ServiceStatusWidget::new(Box::new(Services), three_services()).at(2, 20),
    ));
    let mut cpu = CpuBarsWidget::new(Box::new(Cores(vec![100.0, 0.0])));
    let settings: toml::Table = toml::from_str(
        "x = 2\ny = 40\nbar_height = 3\npadding = 1\norientation = \"horizontal\"\nper_core = true",
    )
    .unwrap();
    cpu.init(&settings).unwrap();
    registry.add_widget(Box::new(cpu));

    let controller = DisplayController::new(HeadlessDevice::new(128, 64));
    let mut render_loop = RenderLoop::new(controller, registry, Duration::from_secs(1));
    assert_eq!(render_loop.pacing(), Duration::ZERO);

    assert!(render_loop.run_cycle());
    {
        let frame = render_loop.controller().device().last_frame().unwrap();
        let at = |x: usize, y: usize| frame[y * 128 + x];
        // Uptime text in the top band
        assert!((0..18).any(|y| (0..128).any(|x| at(x, y))));
        // First core bar spans x = 2..127 on rows 40..43, second core is idle
        assert!((40..43).all(|y| at(2, y) && at(126, y) && !at(127, y)));
        assert!((45..48).all(|y| (0..128).all(|x| !at(x, y))));
    }

    // A failing uptime read skips only that widget
    uptime.set(None);
    assert!(render_loop.run_cycle());
    {
        let frame = render_loop.controller().device().last_frame().unwrap();
        let at = |x: usize, y: usize| frame[y * 128 + x];
        assert!((0..18).all(|y| (0..128).all(|x| !at(x, y))));
        assert!(at(27, 20));
        assert!(at(2, 40));
    }

    render_loop.cancel();
    assert!(!render_loop.run_cycle());
    render_loop.shutdown();
    assert_eq!(render_loop.state(), LoopState::Terminated);

    let device = render_loop.controller().device();
    assert_eq!(device.commits(), 3);
    assert!(device.last_frame().unwrap().iter().all(|&p| !p));
}
