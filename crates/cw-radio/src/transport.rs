//! Byte transport for CAT links
//!
//! Drivers talk to the radio through [`CatTransport`], which bounds every
//! operation with the link timeout. Timeouts surface as
//! [`TransportError::Timeout`] and are never retried here.
//!
//! [`StreamTransport`] implements the trait over any tokio stream: a real
//! serial port via `tokio_serial`, or one end of a `tokio::io::duplex` pair
//! for virtual radios and tests.

use std::future::Future;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;
use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tracing::{debug, trace};

use crate::error::TransportError;

/// Default bound on every send or receive
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

/// A timed byte link to a radio
pub trait CatTransport: Send {
    /// Write all of `data`
    fn send(&mut self, data: &[u8]) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Read exactly `len` bytes
    fn recv(&mut self, len: usize) -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send;

    /// Read up to and including `delim`, giving up after `max_len` bytes
    fn recv_until(
        &mut self,
        delim: u8,
        max_len: usize,
    ) -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send;
}

/// [`CatTransport`] over an async byte stream
///
/// Generic over the I/O type to support both real serial ports and virtual radios.
/// For virtual radios, use `DuplexStream` from `tokio::io::duplex()`.
#[derive(Debug)]
pub struct StreamTransport<T> {
    io: T,
    timeout: Duration,
}

impl StreamTransport<SerialStream> {
    /// Open a serial port
    pub fn open(
        port_name: &str,
        baud_rate: u32,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        debug!("Opening {} at {} baud", port_name, baud_rate);
        let stream = tokio_serial::new(port_name, baud_rate)
            .timeout(timeout)
            .open_native_async()?;
        Ok(Self::new(stream, timeout))
    }
}

impl<T> StreamTransport<T>
where
    T: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wrap an already connected stream
    pub fn new(io: T, timeout: Duration) -> Self {
        Self { io, timeout }
    }
}

impl<T> CatTransport for StreamTransport<T>
where
    T: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        trace!("TX {:02X?}", data);
        let limit = self.timeout;
        let io = &mut self.io;
        let write = async move {
            io.write_all(data).await?;
            io.flush().await
        };

        timeout(limit, write)
            .await
            .map_err(|_| TransportError::Timeout(limit))??;
        Ok(())
    }

    async fn recv(&mut self, len: usize) -> Result<Vec<u8>, TransportError> {
        let mut buf = vec![0u8; len];
        match timeout(self.timeout, self.io.read_exact(&mut buf)).await {
            Ok(Ok(_)) => {
                trace!("RX {:02X?}", buf);
                Ok(buf)
            }
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(TransportError::Timeout(self.timeout)),
        }
    }

    async fn recv_until(&mut self, delim: u8, max_len: usize) -> Result<Vec<u8>, TransportError> {
        let reply = timeout(self.timeout, read_until(&mut self.io, delim, max_len))
            .await
            .map_err(|_| TransportError::Timeout(self.timeout))??;
        trace!("RX {:?}", String::from_utf8_lossy(&reply));
        Ok(reply)
    }
}

/// Read byte by byte so nothing past the delimiter is consumed
async fn read_until<R>(io: &mut R, delim: u8, max_len: usize) -> Result<Vec<u8>, TransportError>
where
    R: AsyncRead + Unpin,
{
    let mut reply = Vec::new();
    loop {
        let byte = io.read_u8().await?;
        reply.push(byte);
        if byte == delim {
            return Ok(reply);
        }
        if reply.len() >= max_len {
            return Err(TransportError::Overflow(max_len));
        }
    }
}
