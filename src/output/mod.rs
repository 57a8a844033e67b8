//! Hardware-free output collaborators: named-color resolution and
//! log-backed driver/publisher implementations for development runs.

use crate::config::OFF_STATE;
use crate::contracts::{DriverError, OutputDriver, PublishError, StatusPublisher};

/// Channel values for one rendered state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const OFF: Rgb = Rgb { r: 0, g: 0, b: 0 };
    pub const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
    pub const GREEN: Rgb = Rgb { r: 0, g: 255, b: 0 };
    pub const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };
}

/// Maps a state name to channel values. An unrecognized name renders as
/// channels-off with a warning, so a typo in a config message shows up
/// in the logs instead of freezing the previous color.
pub fn resolve_color(state: &str) -> Rgb {
    match state {
        "red" => Rgb::RED,
        "green" => Rgb::GREEN,
        "blue" => Rgb::BLUE,
        OFF_STATE => Rgb::OFF,
        other => {
            tracing::warn!(state = %other, "Unrecognized state name, rendering off");
            Rgb::OFF
        }
    }
}

/// Driver that renders by logging the resolved channels. Stands in for
/// the hardware driver outside the device.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDriver;

impl OutputDriver for LogDriver {
    fn render(&self, state: &str) -> Result<(), DriverError> {
        let color = resolve_color(state);
        tracing::info!(state, r = color.r, g = color.g, b = color.b, "Rendering state");
        Ok(())
    }
}

/// Publisher that logs instead of talking to a broker. Stands in for
/// the transport session outside the device.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogPublisher;

impl StatusPublisher for LogPublisher {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), PublishError> {
        tracing::info!(topic, payload, "Status published");
        Ok(())
    }
}
