//! The radio capability set and its implementations
//!
//! [`RadioDriver`] is the one interface the keyer sees. [`Radio`] is the
//! closed set of supported rigs, chosen once at startup from a model name
//! and dispatching exhaustively to the matching driver.

use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio_serial::SerialStream;
use tracing::info;

use crate::error::RadioError;
use crate::ft857d::Ft857d;
use crate::ft991a::Ft991a;
use crate::mock::MockRadio;
use crate::transport::{CatTransport, StreamTransport};

/// Operations every supported radio provides
pub trait RadioDriver: Send {
    /// Prepare the radio for use
    fn init(&mut self) -> impl Future<Output = Result<(), RadioError>> + Send;

    /// Read the VFO frequency in Hz
    fn get_frequency(&mut self) -> impl Future<Output = Result<u32, RadioError>> + Send;

    /// Tune the VFO to `hz`
    fn set_frequency(&mut self, hz: u32) -> impl Future<Output = Result<(), RadioError>> + Send;

    /// Read the operating mode code
    fn get_mode(&mut self) -> impl Future<Output = Result<u8, RadioError>> + Send;

    /// Select an operating mode by code
    fn set_mode(&mut self, mode: u8) -> impl Future<Output = Result<(), RadioError>> + Send;

    /// Read the RF power setting (percent)
    fn get_power(&mut self) -> impl Future<Output = Result<u8, RadioError>> + Send;

    /// Set the RF power (percent)
    fn set_power(&mut self, power: u8) -> impl Future<Output = Result<(), RadioError>> + Send;

    /// Switch between transmit and receive
    fn set_ptt(&mut self, on: bool) -> impl Future<Output = Result<(), RadioError>> + Send;

    /// Mode code for a name, or [`cw_protocol::MODE_UNKNOWN`]
    fn mode_from_string(&self, name: &str) -> u8;

    /// Mode name for a code, or [`cw_protocol::UNKNOWN_MODE_NAME`]
    fn mode_to_string(&self, mode: u8) -> &'static str;

    /// Which rig this driver talks to
    fn model(&self) -> RadioModel;
}

/// Supported radio models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RadioModel {
    /// Software-only radio
    #[serde(rename = "MOCK")]
    Mock,
    /// Yaesu FT-857D (binary CAT)
    #[serde(rename = "FT-857D")]
    Ft857d,
    /// Yaesu FT-991A (ASCII CAT)
    #[serde(rename = "FT-991A")]
    Ft991a,
}

impl RadioModel {
    /// All supported models
    pub const ALL: [RadioModel; 3] = [RadioModel::Mock, RadioModel::Ft857d, RadioModel::Ft991a];

    /// Look up a model by its configuration name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|model| model.name() == name)
    }

    /// Configuration name of this model
    pub fn name(&self) -> &'static str {
        match self {
            RadioModel::Mock => "MOCK",
            RadioModel::Ft857d => "FT-857D",
            RadioModel::Ft991a => "FT-991A",
        }
    }
}

impl fmt::Display for RadioModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RadioModel {
    type Err = RadioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| RadioError::UnknownModel(s.to_string()))
    }
}

/// The radio selected at startup
#[derive(Debug)]
pub enum Radio<T = StreamTransport<SerialStream>> {
    /// Software-only radio
    Mock(MockRadio),
    /// Yaesu FT-857D
    Ft857d(Ft857d<T>),
    /// Yaesu FT-991A
    Ft991a(Ft991a<T>),
}

impl Radio {
    /// Build and initialize the driver for `model`, opening the serial port
    /// unless the model is the mock
    pub async fn connect(
        model: RadioModel,
        port_name: &str,
        baud_rate: u32,
        timeout: Duration,
    ) -> Result<Self, RadioError> {
        let mut radio = match model {
            RadioModel::Mock => Radio::Mock(MockRadio::new()),
            RadioModel::Ft857d => Radio::Ft857d(Ft857d::new(StreamTransport::open(
                port_name, baud_rate, timeout,
            )?)),
            RadioModel::Ft991a => Radio::Ft991a(Ft991a::new(StreamTransport::open(
                port_name, baud_rate, timeout,
            )?)),
        };
        radio.init().await?;
        info!("Radio initialized: {}", model);
        Ok(radio)
    }
}

impl<T: CatTransport> Radio<T> {
    /// Wrap an already open link in the driver for `model`
    pub fn with_transport(model: RadioModel, transport: T) -> Self {
        match model {
            RadioModel::Mock => Radio::Mock(MockRadio::new()),
            RadioModel::Ft857d => Radio::Ft857d(Ft857d::new(transport)),
            RadioModel::Ft991a => Radio::Ft991a(Ft991a::new(transport)),
        }
    }
}

impl<T: CatTransport> RadioDriver for Radio<T> {
    async fn init(&mut self) -> Result<(), RadioError> {
        match self {
            Radio::Mock(r) => r.init().await,
            Radio::Ft857d(r) => r.init().await,
            Radio::Ft991a(r) => r.init().await,
        }
    }

    async fn get_frequency(&mut self) -> Result<u32, RadioError> {
        match self {
            Radio::Mock(r) => r.get_frequency().await,
            Radio::Ft857d(r) => r.get_frequency().await,
            Radio::Ft991a(r) => r.get_frequency().await,
        }
    }

    async fn set_frequency(&mut self, hz: u32) -> Result<(), RadioError> {
        match self {
            Radio::Mock(r) => r.set_frequency(hz).await,
            Radio::Ft857d(r) => r.set_frequency(hz).await,
            Radio::Ft991a(r) => r.set_frequency(hz).await,
        }
    }

    async fn get_mode(&mut self) -> Result<u8, RadioError> {
        match self {
            Radio::Mock(r) => r.get_mode().await,
            Radio::Ft857d(r) => r.get_mode().await,
            Radio::Ft991a(r) => r.get_mode().await,
        }
    }

    async fn set_mode(&mut self, mode: u8) -> Result<(), RadioError> {
        match self {
            Radio::Mock(r) => r.set_mode(mode).await,
            Radio::Ft857d(r) => r.set_mode(mode).await,
            Radio::Ft991a(r) => r.set_mode(mode).await,
        }
    }

    async fn get_power(&mut self) -> Result<u8, RadioError> {
        match self {
            Radio::Mock(r) => r.get_power().await,
            Radio::Ft857d(r) => r.get_power().await,
            Radio::Ft991a(r) => r.get_power().await,
        }
    }

    async fn set_power(&mut self, power: u8) -> Result<(), RadioError> {
        match self {
            Radio::Mock(r) => r.set_power(power).await,
            Radio::Ft857d(r) => r.set_power(power).await,
            Radio::Ft991a(r) => r.set_power(power).await,
        }
    }

    async fn set_ptt(&mut self, on: bool) -> Result<(), RadioError> {
        match self {
            Radio::Mock(r) => r.set_ptt(on).await,
            Radio::Ft857d(r) => r.set_ptt(on).await,
            Radio::Ft991a(r) => r.set_ptt(on).await,
        }
    }

    fn mode_from_string(&self, name: &str) -> u8 {
        match self {
            Radio::Mock(r) => r.mode_from_string(name),
            Radio::Ft857d(r) => r.mode_from_string(name),
            Radio::Ft991a(r) => r.mode_from_string(name),
        }
    }

    fn mode_to_string(&self, mode: u8) -> &'static str {
        match self {
            Radio::Mock(r) => r.mode_to_string(mode),
            Radio::Ft857d(r) => r.mode_to_string(mode),
            Radio::Ft991a(r) => r.mode_to_string(mode),
        }
    }

    fn model(&self) -> RadioModel {
        match self {
            Radio::Mock(r) => r.model(),
            Radio::Ft857d(r) => r.model(),
            Radio::Ft991a(r) => r.model(),
        }
    }
}
