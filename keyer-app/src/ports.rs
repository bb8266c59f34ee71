//! Serial port enumeration

use anyhow::Context;
use serialport::{available_ports, SerialPortType};
use tracing::info;

/// A serial port the radio might be on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    /// Port name (e.g., /dev/ttyUSB0, COM3)
    pub port: String,
    /// USB product string
    pub product: Option<String>,
    /// USB vendor and product IDs
    pub usb_id: Option<(u16, u16)>,
}

impl PortInfo {
    fn from_serialport(port: String, port_type: &SerialPortType) -> Self {
        match port_type {
            SerialPortType::UsbPort(usb) => Self {
                port,
                product: usb.product.clone(),
                usb_id: Some((usb.vid, usb.pid)),
            },
            _ => Self {
                port,
                product: None,
                usb_id: None,
            },
        }
    }

    /// One-line description for listings
    pub fn display_label(&self) -> String {
        match (&self.product, self.usb_id) {
            (Some(product), Some((vid, pid))) => {
                format!("{} ({}, {:04x}:{:04x})", self.port, product, vid, pid)
            }
            (None, Some((vid, pid))) => format!("{} ({:04x}:{:04x})", self.port, vid, pid),
            _ => self.port.clone(),
        }
    }
}

/// List the serial ports on this machine
pub fn enumerate_ports() -> anyhow::Result<Vec<PortInfo>> {
    let ports = available_ports().context("Failed to enumerate serial ports")?;
    let ports: Vec<_> = ports
        .into_iter()
        .map(|p| PortInfo::from_serialport(p.port_name, &p.port_type))
        .collect();
    info!("Found {} serial port(s)", ports.len());
    Ok(ports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serialport::UsbPortInfo;

    #[test]
    fn test_usb_port_label() {
        let usb = SerialPortType::UsbPort(UsbPortInfo {
            vid: 0x10c4,
            pid: 0xea60,
            serial_number: None,
            manufacturer: Some("Silicon Labs".to_string()),
            product: Some("CP2105 Dual USB to UART".to_string()),
        });
        let info = PortInfo::from_serialport("/dev/ttyUSB0".to_string(), &usb);
        assert_eq!(
            info.display_label(),
            "/dev/ttyUSB0 (CP2105 Dual USB to UART, 10c4:ea60)"
        );
    }

    #[test]
    fn test_plain_port_label() {
        let info = PortInfo::from_serialport("/dev/ttyS0".to_string(), &SerialPortType::Unknown);
        assert_eq!(info.display_label(), "/dev/ttyS0");
    }
}
