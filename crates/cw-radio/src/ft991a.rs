//! FT-991A driver (Yaesu ASCII CAT)
//!
//! Queries are answered with a `;`-terminated reply read under the link
//! timeout; a reply that never terminates is a transport timeout. Set
//! commands are fire-and-forget: the radio sends nothing back.

use cw_protocol::yaesu_ascii::{
    parse_frequency_response, parse_mode_response, parse_power_response, YaesuAsciiCommand,
    MAX_RESPONSE_LEN, MODES, TERMINATOR,
};
use tracing::{debug, info};

use crate::driver::{RadioDriver, RadioModel};
use crate::error::RadioError;
use crate::transport::CatTransport;

/// FT-991A over any [`CatTransport`]
#[derive(Debug)]
pub struct Ft991a<T> {
    transport: T,
}

impl<T: CatTransport> Ft991a<T> {
    /// Create a driver on an open link
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    async fn send(&mut self, cmd: YaesuAsciiCommand) -> Result<(), RadioError> {
        let wire = cmd.encode()?;
        debug!("FT-991A TX {}", wire);
        self.transport.send(wire.as_bytes()).await?;
        Ok(())
    }

    async fn query(&mut self, cmd: YaesuAsciiCommand) -> Result<Vec<u8>, RadioError> {
        self.send(cmd).await?;
        let reply = self
            .transport
            .recv_until(TERMINATOR, MAX_RESPONSE_LEN)
            .await?;
        debug!("FT-991A RX {}", String::from_utf8_lossy(&reply));
        Ok(reply)
    }
}

impl<T: CatTransport> RadioDriver for Ft991a<T> {
    async fn init(&mut self) -> Result<(), RadioError> {
        info!("FT-991A initialized");
        Ok(())
    }

    async fn get_frequency(&mut self) -> Result<u32, RadioError> {
        let reply = self.query(YaesuAsciiCommand::GetFrequency).await?;
        let hz = parse_frequency_response(&reply)?;
        info!("Frequency: {} Hz", hz);
        Ok(hz)
    }

    async fn set_frequency(&mut self, hz: u32) -> Result<(), RadioError> {
        self.send(YaesuAsciiCommand::SetFrequency(hz)).await
    }

    async fn get_mode(&mut self) -> Result<u8, RadioError> {
        let reply = self.query(YaesuAsciiCommand::GetMode).await?;
        Ok(parse_mode_response(&reply)?)
    }

    async fn set_mode(&mut self, mode: u8) -> Result<(), RadioError> {
        self.send(YaesuAsciiCommand::SetMode(mode)).await
    }

    async fn get_power(&mut self) -> Result<u8, RadioError> {
        let reply = self.query(YaesuAsciiCommand::GetPower).await?;
        let power = parse_power_response(&reply)?;
        info!("Power level: {}%", power);
        Ok(power)
    }

    async fn set_power(&mut self, power: u8) -> Result<(), RadioError> {
        self.send(YaesuAsciiCommand::SetPower(power)).await
    }

    async fn set_ptt(&mut self, on: bool) -> Result<(), RadioError> {
        self.send(YaesuAsciiCommand::Transmit(on)).await
    }

    fn mode_from_string(&self, name: &str) -> u8 {
        MODES.code(name)
    }

    fn mode_to_string(&self, mode: u8) -> &'static str {
        MODES.name(mode)
    }

    fn model(&self) -> RadioModel {
        RadioModel::Ft991a
    }
}
