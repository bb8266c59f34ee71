//! Radio Control Library
//!
//! One capability set over every radio the keyer can drive:
//!
//! - **Mock**: in-memory state, for running without hardware
//! - **FT-857D**: Yaesu 5-byte binary CAT with BCD frequencies
//! - **FT-991A**: Yaesu semicolon-terminated ASCII CAT
//!
//! # Architecture
//!
//! Drivers encode with `cw-protocol` and move bytes through a
//! [`CatTransport`], which bounds every send and receive with a timeout.
//! [`Radio`] selects the driver once at startup and implements
//! [`RadioDriver`] by dispatching to it.
//!
//! # Example
//!
//! ```rust
//! use cw_radio::{MockRadio, RadioDriver};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let mut radio = MockRadio::new();
//! radio.set_frequency(14_060_000).await.unwrap();
//! assert_eq!(radio.get_frequency().await.unwrap(), 14_060_000);
//! # });
//! ```

pub mod driver;
pub mod error;
pub mod ft857d;
pub mod ft991a;
pub mod mock;
pub mod transport;

pub use driver::{Radio, RadioDriver, RadioModel};
pub use error::{RadioError, TransportError};
pub use ft857d::Ft857d;
pub use ft991a::Ft991a;
pub use mock::MockRadio;
pub use transport::{CatTransport, StreamTransport, DEFAULT_TIMEOUT};
