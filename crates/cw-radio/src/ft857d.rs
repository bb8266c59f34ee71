//! FT-857D driver (Yaesu binary CAT)
//!
//! Each operation is one 5-byte frame followed by a fixed-length reply: a
//! single acknowledgement byte for set commands, or the 5-byte
//! frequency/mode report for the read query. Frequency and mode come from
//! the same query, so reading both costs two round trips.
//!
//! The radio has no CAT power control. Power reads return 0 and power
//! writes are accepted and ignored.

use cw_protocol::yaesu::{check_ack, FrequencyModeReport, YaesuCommand, MODES};
use tracing::{debug, info};

use crate::driver::{RadioDriver, RadioModel};
use crate::error::RadioError;
use crate::transport::CatTransport;

/// FT-857D over any [`CatTransport`]
#[derive(Debug)]
pub struct Ft857d<T> {
    transport: T,
}

impl<T: CatTransport> Ft857d<T> {
    /// Create a driver on an open link
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Send one frame and read its fixed-length reply
    async fn transact(&mut self, cmd: YaesuCommand) -> Result<Vec<u8>, RadioError> {
        let frame = cmd.encode()?;
        debug!("FT-857D TX {:02X?}", frame);
        self.transport.send(&frame).await?;

        let reply = self.transport.recv(cmd.reply_len()).await?;
        debug!("FT-857D RX {:02X?}", reply);
        Ok(reply)
    }

    /// Send a set command and check its acknowledgement
    async fn command(&mut self, cmd: YaesuCommand) -> Result<(), RadioError> {
        let reply = self.transact(cmd).await?;
        check_ack(&reply)?;
        Ok(())
    }

    async fn read_frequency_mode(&mut self) -> Result<FrequencyModeReport, RadioError> {
        let reply = self.transact(YaesuCommand::GetFrequencyMode).await?;
        Ok(FrequencyModeReport::decode(&reply)?)
    }
}

impl<T: CatTransport> RadioDriver for Ft857d<T> {
    async fn init(&mut self) -> Result<(), RadioError> {
        info!("FT-857D initialized");
        Ok(())
    }

    async fn get_frequency(&mut self) -> Result<u32, RadioError> {
        let report = self.read_frequency_mode().await?;
        info!("Frequency: {} Hz", report.hz);
        Ok(report.hz)
    }

    async fn set_frequency(&mut self, hz: u32) -> Result<(), RadioError> {
        self.command(YaesuCommand::SetFrequency { hz }).await
    }

    async fn get_mode(&mut self) -> Result<u8, RadioError> {
        Ok(self.read_frequency_mode().await?.mode)
    }

    // Any byte goes out; the radio's ack decides, so a mode read back from
    // the rig can always be written again
    async fn set_mode(&mut self, mode: u8) -> Result<(), RadioError> {
        self.command(YaesuCommand::SetMode { mode }).await
    }

    async fn get_power(&mut self) -> Result<u8, RadioError> {
        debug!("Get power level is not supported for FT-857D");
        Ok(0)
    }

    async fn set_power(&mut self, _power: u8) -> Result<(), RadioError> {
        debug!("Set power level is not supported for FT-857D");
        Ok(())
    }

    async fn set_ptt(&mut self, on: bool) -> Result<(), RadioError> {
        let cmd = if on {
            YaesuCommand::PttOn
        } else {
            YaesuCommand::PttOff
        };
        self.command(cmd).await
    }

    fn mode_from_string(&self, name: &str) -> u8 {
        MODES.code(name)
    }

    fn mode_to_string(&self, mode: u8) -> &'static str {
        MODES.name(mode)
    }

    fn model(&self) -> RadioModel {
        RadioModel::Ft857d
    }
}
