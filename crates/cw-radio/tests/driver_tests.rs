//! Integration tests for the radio drivers
//!
//! Each CAT driver is run against a scripted peer on the far end of a
//! `tokio::io::duplex` pair. The peer checks every request byte-for-byte and
//! answers with the canned reply, so these tests pin the wire format the
//! drivers produce as well as how they read replies.

use std::time::Duration;

use cw_protocol::{ProtocolError, ValidationError, MODE_UNKNOWN};
use cw_radio::{
    Ft857d, Ft991a, Radio, RadioDriver, RadioError, RadioModel, StreamTransport, TransportError,
};
use tokio::io::{duplex, AsyncReadExt, AsyncWriteExt, DuplexStream};
use tokio::task::JoinHandle;

// ============================================================================
// Helper Functions
// ============================================================================

mod helpers {
    use super::*;

    pub const LINK_TIMEOUT: Duration = Duration::from_millis(100);

    /// One request the peer expects and the bytes it answers with
    pub struct Exchange {
        pub request: Vec<u8>,
        pub reply: Vec<u8>,
    }

    pub fn exchange(request: &[u8], reply: &[u8]) -> Exchange {
        Exchange {
            request: request.to_vec(),
            reply: reply.to_vec(),
        }
    }

    /// Create a transport whose far end plays back `script`
    ///
    /// The returned handle yields the peer stream once the script is done,
    /// so tests can check nothing else was sent.
    pub fn scripted_link(
        script: Vec<Exchange>,
    ) -> (StreamTransport<DuplexStream>, JoinHandle<DuplexStream>) {
        let (ours, mut theirs) = duplex(256);

        let peer = tokio::spawn(async move {
            for step in script {
                let mut request = vec![0u8; step.request.len()];
                theirs.read_exact(&mut request).await.unwrap();
                assert_eq!(
                    request,
                    step.request,
                    "unexpected request {:?}",
                    String::from_utf8_lossy(&request)
                );
                theirs.write_all(&step.reply).await.unwrap();
            }
            theirs
        });

        (StreamTransport::new(ours, LINK_TIMEOUT), peer)
    }

    /// Assert the peer received nothing beyond its script
    pub async fn assert_quiet(peer: JoinHandle<DuplexStream>) {
        let mut theirs = peer.await.unwrap();
        let mut buf = [0u8; 16];
        let extra = tokio::time::timeout(Duration::from_millis(20), theirs.read(&mut buf)).await;
        assert!(extra.is_err(), "peer received unexpected bytes");
    }
}

use helpers::{exchange, scripted_link};

// ============================================================================
// FT-857D (binary) Tests
// ============================================================================

mod ft857d_tests {
    use super::*;

    #[tokio::test]
    async fn get_frequency_reads_bcd_report() {
        let (link, peer) = scripted_link(vec![exchange(
            &[0x00, 0x00, 0x00, 0x00, 0x03],
            &[0x00, 0x71, 0x00, 0x00, 0x01],
        )]);
        let mut radio = Ft857d::new(link);

        assert_eq!(radio.get_frequency().await.unwrap(), 7_100_000);
        helpers::assert_quiet(peer).await;
    }

    #[tokio::test]
    async fn get_mode_reads_fifth_byte() {
        let (link, _peer) = scripted_link(vec![exchange(
            &[0x00, 0x00, 0x00, 0x00, 0x03],
            &[0x01, 0x40, 0x74, 0x00, 0x02],
        )]);
        let mut radio = Ft857d::new(link);

        let mode = radio.get_mode().await.unwrap();
        assert_eq!(mode, 0x02);
        assert_eq!(radio.mode_to_string(mode), "CW");
    }

    #[tokio::test]
    async fn set_frequency_sends_bcd_frame() {
        let (link, peer) = scripted_link(vec![exchange(&[0x01, 0x42, 0x50, 0x00, 0x01], &[0x00])]);
        let mut radio = Ft857d::new(link);

        radio.set_frequency(14_250_000).await.unwrap();
        helpers::assert_quiet(peer).await;
    }

    #[tokio::test]
    async fn set_mode_and_ptt_frames() {
        let (link, peer) = scripted_link(vec![
            exchange(&[0x02, 0x00, 0x00, 0x00, 0x07], &[0x00]),
            exchange(&[0x00, 0x00, 0x00, 0x00, 0x08], &[0x00]),
            exchange(&[0x00, 0x00, 0x00, 0x00, 0x88], &[0x00]),
        ]);
        let mut radio = Ft857d::new(link);

        radio.set_mode(radio.mode_from_string("CW")).await.unwrap();
        radio.set_ptt(true).await.unwrap();
        radio.set_ptt(false).await.unwrap();
        helpers::assert_quiet(peer).await;
    }

    #[tokio::test]
    async fn non_zero_ack_is_rejected() {
        let (link, _peer) = scripted_link(vec![exchange(&[0x00, 0x00, 0x00, 0x00, 0x08], &[0xF0])]);
        let mut radio = Ft857d::new(link);

        let err = radio.set_ptt(true).await.unwrap_err();
        assert!(matches!(
            err,
            RadioError::Protocol(ProtocolError::Rejected(0xF0))
        ));
    }

    #[tokio::test]
    async fn invalid_bcd_reply_is_protocol_error() {
        let (link, _peer) = scripted_link(vec![exchange(
            &[0x00, 0x00, 0x00, 0x00, 0x03],
            &[0x00, 0x7A, 0x00, 0x00, 0x01],
        )]);
        let mut radio = Ft857d::new(link);

        let err = radio.get_frequency().await.unwrap_err();
        assert!(matches!(
            err,
            RadioError::Protocol(ProtocolError::InvalidBcd(0x7A))
        ));
    }

    #[tokio::test]
    async fn frequency_out_of_range_is_not_sent() {
        let (link, peer) = scripted_link(vec![]);
        let mut radio = Ft857d::new(link);

        let err = radio.set_frequency(1_000_000_000).await.unwrap_err();
        assert!(matches!(
            err,
            RadioError::Validation(ValidationError::FrequencyRange(1_000_000_000))
        ));
        helpers::assert_quiet(peer).await;
    }

    #[tokio::test]
    async fn mode_read_back_can_be_written_again() {
        // 0x06 (WFM) is not in the table but the radio reports it
        let (link, peer) = scripted_link(vec![
            exchange(&[0x00, 0x00, 0x00, 0x00, 0x03], &[0x00, 0x71, 0x00, 0x00, 0x06]),
            exchange(&[0x06, 0x00, 0x00, 0x00, 0x07], &[0x00]),
        ]);
        let mut radio = Ft857d::new(link);

        let mode = radio.get_mode().await.unwrap();
        assert_eq!(radio.mode_to_string(mode), "UNKNOWN");
        radio.set_mode(mode).await.unwrap();
        helpers::assert_quiet(peer).await;
    }

    #[tokio::test]
    async fn off_table_mode_is_left_to_the_radio() {
        let (link, peer) = scripted_link(vec![exchange(&[0xFF, 0x00, 0x00, 0x00, 0x07], &[0xF0])]);
        let mut radio = Ft857d::new(link);

        let err = radio.set_mode(MODE_UNKNOWN).await.unwrap_err();
        assert!(matches!(
            err,
            RadioError::Protocol(ProtocolError::Rejected(0xF0))
        ));
        helpers::assert_quiet(peer).await;
    }

    #[tokio::test]
    async fn power_is_unsupported_but_succeeds() {
        let (link, peer) = scripted_link(vec![]);
        let mut radio = Ft857d::new(link);

        assert_eq!(radio.get_power().await.unwrap(), 0);
        radio.set_power(5).await.unwrap();
        helpers::assert_quiet(peer).await;
    }

    #[tokio::test]
    async fn missing_ack_times_out() {
        let (link, _peer) = scripted_link(vec![exchange(&[0x00, 0x00, 0x00, 0x00, 0x08], b"")]);
        let mut radio = Ft857d::new(link);

        let err = radio.set_ptt(true).await.unwrap_err();
        assert!(err.is_timeout());
    }
}

// ============================================================================
// FT-991A (ASCII) Tests
// ============================================================================

mod ft991a_tests {
    use super::*;

    #[tokio::test]
    async fn get_frequency_parses_reply() {
        let (link, peer) = scripted_link(vec![exchange(b"FA;", b"FA014074000;")]);
        let mut radio = Ft991a::new(link);

        assert_eq!(radio.get_frequency().await.unwrap(), 14_074_000);
        helpers::assert_quiet(peer).await;
    }

    #[tokio::test]
    async fn set_commands_expect_no_reply() {
        let (link, peer) = scripted_link(vec![
            exchange(b"FA014074000;", b""),
            exchange(b"MD3;", b""),
            exchange(b"PC005;", b""),
            exchange(b"TX1;", b""),
            exchange(b"TX0;", b""),
        ]);
        let mut radio = Ft991a::new(link);

        radio.set_frequency(14_074_000).await.unwrap();
        radio.set_mode(radio.mode_from_string("CW")).await.unwrap();
        radio.set_power(5).await.unwrap();
        radio.set_ptt(true).await.unwrap();
        radio.set_ptt(false).await.unwrap();
        helpers::assert_quiet(peer).await;
    }

    #[tokio::test]
    async fn packet_mode_uses_hex_digit() {
        let (link, _peer) = scripted_link(vec![exchange(b"MDA;", b""), exchange(b"MD;", b"MDA;")]);
        let mut radio = Ft991a::new(link);

        radio.set_mode(radio.mode_from_string("PKT")).await.unwrap();
        let mode = radio.get_mode().await.unwrap();
        assert_eq!(radio.mode_to_string(mode), "PKT");
    }

    #[tokio::test]
    async fn get_power_parses_reply() {
        let (link, _peer) = scripted_link(vec![exchange(b"PC;", b"PC050;")]);
        let mut radio = Ft991a::new(link);

        assert_eq!(radio.get_power().await.unwrap(), 50);
    }

    #[tokio::test]
    async fn missing_terminator_times_out() {
        let (link, _peer) = scripted_link(vec![exchange(b"FA;", b"FA014074000")]);
        let mut radio = Ft991a::new(link);

        let err = radio.get_frequency().await.unwrap_err();
        assert!(matches!(
            err,
            RadioError::Transport(TransportError::Timeout(_))
        ));
    }

    #[tokio::test]
    async fn wrong_prefix_is_protocol_error() {
        let (link, _peer) = scripted_link(vec![exchange(b"FA;", b"FB014074000;")]);
        let mut radio = Ft991a::new(link);

        let err = radio.get_frequency().await.unwrap_err();
        assert!(matches!(
            err,
            RadioError::Protocol(ProtocolError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn wrong_width_is_protocol_error() {
        let (link, _peer) = scripted_link(vec![exchange(b"PC;", b"PC5;")]);
        let mut radio = Ft991a::new(link);

        assert!(matches!(
            radio.get_power().await,
            Err(RadioError::Protocol(_))
        ));
    }

    #[tokio::test]
    async fn power_above_100_is_not_sent() {
        let (link, peer) = scripted_link(vec![]);
        let mut radio = Ft991a::new(link);

        let err = radio.set_power(101).await.unwrap_err();
        assert!(matches!(err, RadioError::Validation(ValidationError::Power(101))));
        helpers::assert_quiet(peer).await;
    }
}

// ============================================================================
// Dispatch Tests
// ============================================================================

mod dispatch_tests {
    use super::*;

    #[tokio::test]
    async fn radio_enum_dispatches_to_selected_driver() {
        let (link, _peer) = scripted_link(vec![exchange(b"FA;", b"FA007100000;")]);
        let mut radio = Radio::with_transport(RadioModel::Ft991a, link);

        radio.init().await.unwrap();
        assert_eq!(radio.model(), RadioModel::Ft991a);
        assert_eq!(radio.get_frequency().await.unwrap(), 7_100_000);
        assert_eq!(radio.mode_from_string("USB"), 2);
    }

    #[tokio::test]
    async fn mock_variant_ignores_transport() {
        let (link, peer) = scripted_link(vec![]);
        let mut radio = Radio::with_transport(RadioModel::Mock, link);

        assert_eq!(radio.get_frequency().await.unwrap(), 7_280_000);
        let mode = radio.get_mode().await.unwrap();
        assert_eq!(radio.mode_to_string(mode), "LSB");
        drop(radio);
        let _ = peer.await;
    }

    #[tokio::test]
    async fn mode_tables_differ_per_model() {
        let (a, _pa) = scripted_link(vec![]);
        let (b, _pb) = scripted_link(vec![]);
        let (c, _pc) = scripted_link(vec![]);
        let mock = Radio::with_transport(RadioModel::Mock, a);
        let ft857d = Radio::with_transport(RadioModel::Ft857d, b);
        let ft991a = Radio::with_transport(RadioModel::Ft991a, c);

        assert_eq!(mock.mode_from_string("CW"), 0x02);
        assert_eq!(ft857d.mode_from_string("CW"), 0x02);
        assert_eq!(ft991a.mode_from_string("CW"), 3);
        assert_eq!(mock.mode_from_string("CWR"), MODE_UNKNOWN);
        assert_eq!(ft857d.mode_to_string(0x8C), "PKTN");
        assert_eq!(ft991a.mode_to_string(0x8C), "UNKNOWN");
    }
}
