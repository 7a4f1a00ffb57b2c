// filepath: src/main.rs

use calloop::{
    signals::{Signal, Signals},
    timer::{TimeoutAction, Timer},
    EventLoop,
};
use log::{error, info, warn};
use oled_status::config::{Backend, StatusConfig};
use oled_status::{DisplayController, DisplayDevice, HeadlessDevice, RenderLoop, Ssd1306Device, WidgetRegistry};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Starting oled-status");

    let config = StatusConfig::load_from_file().unwrap_or_else(|e| {
        error!("Failed to load configuration, using defaults: {}", e);
        StatusConfig::default()
    });
    info!("Configuration loaded");

    let mut registry = WidgetRegistry::new();
    registry.load_widgets_from_config(&config)?;
    if registry.has_widgets() {
        info!("Widgets in drawing order: {:?}", registry.ids());
    } else {
        warn!("No widgets enabled, the display will stay blank");
    }

    match config.display.backend {
        Backend::Ssd1306 => run(Ssd1306Device::open(&config.display.i2c_bus)?, registry, &config),
        Backend::Headless => run(
            HeadlessDevice::new(config.display.width, config.display.height),
            registry,
            &config,
        ),
    }
}

fn run<D: DisplayDevice + 'static>(
    device: D,
    registry: WidgetRegistry,
    config: &StatusConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let controller = DisplayController::new(device);
    let mut render_loop = RenderLoop::new(controller, registry, config.render.idle_delay());

    let mut event_loop: EventLoop<RenderLoop<D>> = EventLoop::try_new()?;
    let handle = event_loop.handle();
    let stop = event_loop.get_signal();

    // Signals only flag the loop; the cycle in progress always completes
    let signals = Signals::new(&[Signal::SIGINT, Signal::SIGTERM])?;
    handle
        .insert_source(signals, move |event, _, render_loop| {
            info!("Received {:?}", event.signal());
            render_loop.cancel();
            stop.stop();
        })
        .map_err(|e| e.error)?;

    handle
        .insert_source(Timer::immediate(), |_, _, render_loop| {
            if !render_loop.run_cycle() {
                return TimeoutAction::Drop;
            }
            TimeoutAction::ToDuration(render_loop.pacing())
        })
        .map_err(|e| e.error)?;

    info!("Entering render loop");
    event_loop.run(None::<std::time::Duration>, &mut render_loop, |_| {})?;

    render_loop.shutdown();
    info!("Display cleared, exiting");
    Ok(())
}
