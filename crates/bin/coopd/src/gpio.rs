//! Backend selection for the digital lines.

use coop_adapter_gpio_sysfs::{SysfsConfig, SysfsGpio};
use coop_adapter_virtual::VirtualGpio;
use coop_app::ports::GpioPort;
use coop_domain::error::LineError;
use coop_domain::line::{Direction, LineId, LineValue};

use crate::config::{GpioBackend, GpioConfig};

/// The configured [`GpioPort`], chosen at startup.
pub enum Gpio {
    Sysfs(SysfsGpio),
    Virtual(VirtualGpio),
}

impl Gpio {
    #[must_use]
    pub fn from_config(config: &GpioConfig) -> Self {
        match config.backend {
            GpioBackend::Sysfs => Self::Sysfs(SysfsGpio::new(SysfsConfig {
                root: config.sysfs_root.clone(),
            })),
            GpioBackend::Virtual => Self::Virtual(VirtualGpio::new(config.simulation.clone())),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sysfs(_) => "sysfs",
            Self::Virtual(_) => "virtual",
        }
    }
}

impl GpioPort for Gpio {
    async fn export(&self, line: LineId) -> Result<(), LineError> {
        match self {
            Self::Sysfs(gpio) => gpio.export(line).await,
            Self::Virtual(gpio) => gpio.export(line).await,
        }
    }

    async fn direction(&self, line: LineId) -> Result<Direction, LineError> {
        match self {
            Self::Sysfs(gpio) => gpio.direction(line).await,
            Self::Virtual(gpio) => gpio.direction(line).await,
        }
    }

    async fn set_direction(&self, line: LineId, direction: Direction) -> Result<(), LineError> {
        match self {
            Self::Sysfs(gpio) => gpio.set_direction(line, direction).await,
            Self::Virtual(gpio) => gpio.set_direction(line, direction).await,
        }
    }

    async fn read_value(&self, line: LineId) -> Result<LineValue, LineError> {
        match self {
            Self::Sysfs(gpio) => gpio.read_value(line).await,
            Self::Virtual(gpio) => gpio.read_value(line).await,
        }
    }

    async fn write_value(&self, line: LineId, value: LineValue) -> Result<(), LineError> {
        match self {
            Self::Sysfs(gpio) => gpio.write_value(line, value).await,
            Self::Virtual(gpio) => gpio.write_value(line, value).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_pick_backend_from_config() {
        let mut config = GpioConfig::default();
        assert_eq!(Gpio::from_config(&config).name(), "sysfs");

        config.backend = GpioBackend::Virtual;
        assert_eq!(Gpio::from_config(&config).name(), "virtual");
    }

    #[tokio::test]
    async fn should_delegate_to_virtual_backend() {
        let config = GpioConfig {
            backend: GpioBackend::Virtual,
            ..GpioConfig::default()
        };
        let gpio = Gpio::from_config(&config);

        let result = gpio.direction(config.door()).await;

        assert!(matches!(result, Err(LineError::NotProvisioned { .. })));
    }
}
