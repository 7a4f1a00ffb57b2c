// filepath: src/device.rs
//! Display devices
//!
//! A device accepts a full bi-level frame, can blank itself and commits
//! the frame to the panel on `display`. The SSD1306 implementation talks
//! to the controller over Linux I2C; the headless one keeps frames in
//! memory and is used for dry runs and tests.

use linux_embedded_hal::I2cdev;
use log::{info, trace};
use ssd1306::{mode::BufferedGraphicsMode, prelude::*, I2CDisplayInterface, Ssd1306};
use std::fmt;

/// Failure talking to the panel
#[derive(Debug)]
pub enum DeviceError {
    /// The bus could not be opened
    Bus(String),
    /// The controller did not accept its init sequence
    Init(String),
    /// A transfer to the controller failed
    Transfer(String),
    /// A frame did not match the panel size
    FrameSize { expected: usize, got: usize },
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::Bus(msg) => write!(f, "bus error: {}", msg),
            DeviceError::Init(msg) => write!(f, "display init failed: {}", msg),
            DeviceError::Transfer(msg) => write!(f, "display transfer failed: {}", msg),
            DeviceError::FrameSize { expected, got } => {
                write!(f, "frame has {} pixels, panel needs {}", got, expected)
            }
        }
    }
}

impl std::error::Error for DeviceError {}

/// Narrow contract the controller needs from a panel driver
pub trait DisplayDevice {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Blank the driver's buffer; the panel changes on the next `display`
    fn clear(&mut self) -> Result<(), DeviceError>;

    /// Copy a row-major frame of `width * height` pixels into the driver
    fn image(&mut self, pixels: &[bool]) -> Result<(), DeviceError>;

    /// Commit the driver's buffer to the panel
    fn display(&mut self) -> Result<(), DeviceError>;
}

fn check_frame(expected: usize, pixels: &[bool]) -> Result<(), DeviceError> {
    if pixels.len() != expected {
        return Err(DeviceError::FrameSize {
            expected,
            got: pixels.len(),
        });
    }
    Ok(())
}

type Panel = Ssd1306<I2CInterface<I2cdev>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// 128x64 SSD1306 on a Linux I2C bus
pub struct Ssd1306Device {
    panel: Panel,
    width: u32,
    height: u32,
}

impl Ssd1306Device {
    /// Open the bus and run the controller's init sequence
    ///
    /// `bus` is typically "/dev/i2c-1" on a Raspberry Pi.
    pub fn open(bus: &str) -> Result<Self, DeviceError> {
        info!("Opening SSD1306 on {}", bus);
        let i2c = I2cdev::new(bus).map_err(|e| DeviceError::Bus(format!("{}: {}", bus, e)))?;
        let interface = I2CDisplayInterface::new(i2c);

        let mut panel = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        panel
            .init()
            .map_err(|e| DeviceError::Init(format!("{:?}", e)))?;

        let (width, height) = panel.dimensions();
        info!("SSD1306 ready, panel is {}x{}", width, height);

        Ok(Self {
            panel,
            width: width as u32,
            height: height as u32,
        })
    }
}

impl DisplayDevice for Ssd1306Device {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) -> Result<(), DeviceError> {
        self.panel.clear_buffer();
        Ok(())
    }

    fn image(&mut self, pixels: &[bool]) -> Result<(), DeviceError> {
        check_frame((self.width * self.height) as usize, pixels)?;
        for (idx, &on) in pixels.iter().enumerate() {
            let x = idx as u32 % self.width;
            let y = idx as u32 / self.width;
            self.panel.set_pixel(x, y, on);
        }
        Ok(())
    }

    fn display(&mut self) -> Result<(), DeviceError> {
        self.panel
            .flush()
            .map_err(|e| DeviceError::Transfer(format!("{:?}", e)))
    }
}

/// In-memory panel that keeps the last frame it would have shown
#[derive(Debug, Clone)]
pub struct HeadlessDevice {
    width: u32,
    height: u32,
    buffer: Vec<bool>,
    shown: Option<Vec<bool>>,
    commits: u64,
}

impl HeadlessDevice {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            buffer: vec![false; width as usize * height as usize],
            shown: None,
            commits: 0,
        }
    }

    /// How many frames have been committed so far
    pub fn commits(&self) -> u64 {
        self.commits
    }

    /// The most recently committed frame
    pub fn last_frame(&self) -> Option<&[bool]> {
        self.shown.as_deref()
    }

    fn dump(&self) -> String {
        self.buffer
            .chunks(self.width.max(1) as usize)
            .map(|row| row.iter().map(|&p| if p { '#' } else { '.' }).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl DisplayDevice for HeadlessDevice {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) -> Result<(), DeviceError> {
        self.buffer.fill(false);
        Ok(())
    }

    fn image(&mut self, pixels: &[bool]) -> Result<(), DeviceError> {
        check_frame(self.buffer.len(), pixels)?;
        self.buffer.copy_from_slice(pixels);
        Ok(())
    }

    fn display(&mut self) -> Result<(), DeviceError> {
        self.commits += 1;
        trace!("Headless frame {}:\n{}", self.commits, self.dump());
        self.shown.get_or_insert_with(Vec::new).clone_from(&self.buffer);
        Ok(())
    }
}
