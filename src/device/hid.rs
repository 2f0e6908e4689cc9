//! hidapi transport for USB HID scales.

use super::{DeviceOpener, REPORT_LEN, ReaderError, ScaleDevice};
use hidapi::{HidApi, HidDevice, HidError};
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default)]
pub struct HidOpener;

pub struct HidScale {
    device: HidDevice,
}

impl DeviceOpener for HidOpener {
    type Device = HidScale;

    fn open(&self, vendor_id: u16, product_id: u16) -> Result<HidScale, ReaderError> {
        let api = HidApi::new().map_err(|e| ReaderError::Io(e.to_string()))?;
        let not_found = || ReaderError::DeviceNotFound {
            vendor_id,
            product_id,
        };

        let info = api
            .device_list()
            .find(|d| d.vendor_id() == vendor_id && d.product_id() == product_id)
            .ok_or_else(not_found)?;

        let device = info.open_device(&api).map_err(|e| {
            log::warn!("scale enumerated but could not be opened: {e}");
            not_found()
        })?;

        Ok(HidScale { device })
    }
}

impl ScaleDevice for HidScale {
    fn read_report(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>, ReaderError> {
        // Some platforms prepend a report id; leave room for it.
        let mut buf = [0u8; REPORT_LEN + 2];
        let millis = i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX);

        match self.device.read_timeout(&mut buf, millis) {
            Ok(0) => Ok(None),
            Ok(n) => Ok(Some(buf[..n.min(REPORT_LEN)].to_vec())),
            Err(e) => Err(read_error(e)),
        }
    }
}

/// hid_read reports every failure as -1 with a message and no error code.
/// A timeout is not a failure (it returns 0 bytes), so any `HidApiError`
/// from a read means the handle is unusable, in practice an unplugged scale.
/// Errors raised on the Rust side of hidapi leave the handle intact.
fn read_error(e: HidError) -> ReaderError {
    match e {
        HidError::HidApiError { message } => ReaderError::Disconnected(message),
        other => ReaderError::Io(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_read_failure_means_disconnected() {
        assert_eq!(
            read_error(HidError::HidApiError {
                message: "No such device".into()
            }),
            ReaderError::Disconnected("No such device".into())
        );
    }

    #[test]
    fn wrapper_errors_keep_the_reader_running() {
        assert!(matches!(
            read_error(HidError::InvalidZeroSizeData),
            ReaderError::Io(_)
        ));
    }
}
