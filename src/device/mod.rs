//! USB scale access: report decoding, the background reader thread and the
//! device boundary it runs against.
//!
//! The reader only needs two capabilities from a transport: opening a device
//! by vendor/product id ([`DeviceOpener`]) and receiving fixed-size raw
//! reports from it ([`ScaleDevice`]). The HID backend lives behind the `hid`
//! cargo feature.

pub mod decoder;
#[cfg(feature = "hid")]
pub mod hid;
pub mod reader;

pub use decoder::{REPORT_LEN, decode};
pub use reader::{ReaderEvent, ReaderHandle, ReaderSettings, start};

use std::time::Duration;
use thiserror::Error;

/// Vendor id of the DYMO S100 shipping scale.
pub const DEFAULT_VENDOR_ID: u16 = 0x0922;
/// Product id of the DYMO S100 shipping scale.
pub const DEFAULT_PRODUCT_ID: u16 = 0x8009;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("raw report must be {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReaderError {
    #[error("scale not found (vendor {vendor_id:#06x}, product {product_id:#06x})")]
    DeviceNotFound { vendor_id: u16, product_id: u16 },

    #[error("device I/O error: {0}")]
    Io(String),

    /// The transport reported the device as gone; the reader stops after this.
    #[error("device disconnected: {0}")]
    Disconnected(String),
}

/// An opened scale. Dropping it releases the underlying handle.
pub trait ScaleDevice: Send {
    /// Wait up to `timeout` for the next raw report.
    ///
    /// Returns `Ok(None)` when nothing arrived in time.
    fn read_report(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>, ReaderError>;
}

pub trait DeviceOpener: Send + 'static {
    type Device: ScaleDevice + 'static;

    fn open(&self, vendor_id: u16, product_id: u16) -> Result<Self::Device, ReaderError>;
}

/// Opener used when the crate is built without a device transport.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDeviceOpener;

/// Device type of [`NoDeviceOpener`]; never constructed.
pub enum NoDevice {}

impl ScaleDevice for NoDevice {
    fn read_report(&mut self, _timeout: Duration) -> Result<Option<Vec<u8>>, ReaderError> {
        match *self {}
    }
}

impl DeviceOpener for NoDeviceOpener {
    type Device = NoDevice;

    fn open(&self, vendor_id: u16, product_id: u16) -> Result<NoDevice, ReaderError> {
        log::warn!("built without the `hid` feature; no scale transport available");
        Err(ReaderError::DeviceNotFound {
            vendor_id,
            product_id,
        })
    }
}

/// The opener for the transport compiled into this build.
#[cfg(feature = "hid")]
pub fn system_opener() -> hid::HidOpener {
    hid::HidOpener
}

/// The opener for the transport compiled into this build.
#[cfg(not(feature = "hid"))]
pub fn system_opener() -> NoDeviceOpener {
    NoDeviceOpener
}
