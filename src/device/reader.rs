//! Background reader thread.
//!
//! The thread owns the opened device for its whole life and publishes decoded
//! readings on a bounded crossbeam channel. When the consumer falls behind the
//! oldest queued reading is discarded, so the producer never blocks.

use super::{DEFAULT_PRODUCT_ID, DEFAULT_VENDOR_ID, DeviceOpener, ReaderError, ScaleDevice, decode};
use crate::config::Config;
use crate::models::reading::WeightReading;
use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub type ReaderEvent = Result<WeightReading, ReaderError>;

#[derive(Debug, Clone)]
pub struct ReaderSettings {
    pub vendor_id: u16,
    pub product_id: u16,
    /// Upper bound on how long a stop request goes unnoticed.
    pub poll_interval: Duration,
    /// Readings buffered before the oldest one is dropped.
    pub capacity: usize,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            vendor_id: DEFAULT_VENDOR_ID,
            product_id: DEFAULT_PRODUCT_ID,
            poll_interval: Duration::from_millis(200),
            capacity: 64,
        }
    }
}

impl ReaderSettings {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            vendor_id: cfg.vendor_id,
            product_id: cfg.product_id,
            poll_interval: Duration::from_millis(cfg.poll_interval_ms),
            capacity: cfg.channel_capacity,
        }
    }
}

/// Control handle for a running reader. Dropping it stops the reader.
pub struct ReaderHandle {
    rx: Receiver<ReaderEvent>,
    stop: Arc<AtomicBool>,
    thread: Mutex<Option<JoinHandle<()>>>,
}

/// Spawn the reader thread. Open failures are reported on the channel, not here.
pub fn start<O: DeviceOpener>(opener: O, settings: ReaderSettings) -> io::Result<ReaderHandle> {
    let (tx, rx) = bounded(settings.capacity.max(1));
    let publisher = Publisher {
        tx,
        overflow: rx.clone(),
    };
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = Arc::clone(&stop);

    let thread = thread::Builder::new()
        .name("scale-reader".into())
        .spawn(move || run(opener, settings, publisher, stop_flag))?;

    Ok(ReaderHandle {
        rx,
        stop,
        thread: Mutex::new(Some(thread)),
    })
}

impl ReaderHandle {
    /// Receiver side of the readings channel. Clones share one queue.
    pub fn readings(&self) -> Receiver<ReaderEvent> {
        self.rx.clone()
    }

    pub fn is_running(&self) -> bool {
        self.thread
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|t| !t.is_finished())
    }

    /// Stop the reader and wait for it to release the device.
    ///
    /// Idempotent. Readings still queued when the thread exits are discarded.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Release);

        let thread = self
            .thread
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(thread) = thread {
            if thread.join().is_err() {
                log::error!("scale reader thread panicked");
            }
            while self.rx.try_recv().is_ok() {}
        }
    }
}

impl Drop for ReaderHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

struct Publisher {
    tx: Sender<ReaderEvent>,
    overflow: Receiver<ReaderEvent>,
}

impl Publisher {
    fn publish(&self, event: ReaderEvent) {
        let mut event = event;
        loop {
            match self.tx.try_send(event) {
                Ok(()) => return,
                Err(TrySendError::Full(back)) => {
                    if self.overflow.try_recv().is_ok() {
                        log::debug!("readings channel full, dropped oldest reading");
                    }
                    event = back;
                }
                Err(TrySendError::Disconnected(_)) => return,
            }
        }
    }
}

fn run<O: DeviceOpener>(
    opener: O,
    settings: ReaderSettings,
    publisher: Publisher,
    stop: Arc<AtomicBool>,
) {
    let mut device = match opener.open(settings.vendor_id, settings.product_id) {
        Ok(device) => device,
        Err(e) => {
            log::error!("failed to open scale: {e}");
            publisher.publish(Err(e));
            return;
        }
    };

    log::info!(
        "scale opened ({:#06x}:{:#06x})",
        settings.vendor_id,
        settings.product_id
    );

    while !stop.load(Ordering::Acquire) {
        match device.read_report(settings.poll_interval) {
            Ok(None) => {}
            Ok(Some(raw)) => match decode(&raw) {
                Ok(reading) => publisher.publish(Ok(reading)),
                Err(e) => log::warn!("skipping malformed scale report: {e}"),
            },
            Err(e @ ReaderError::Disconnected(_)) => {
                log::error!("{e}");
                publisher.publish(Err(e));
                break;
            }
            Err(e) => {
                log::warn!("{e}");
                publisher.publish(Err(e));
            }
        }
    }

    drop(device);
    log::info!("scale reader stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::{RecvTimeoutError, unbounded};
    use std::time::Instant;

    struct FakeDevice {
        reports: Receiver<Result<Vec<u8>, ReaderError>>,
        released: Arc<AtomicBool>,
    }

    impl ScaleDevice for FakeDevice {
        fn read_report(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>, ReaderError> {
            match self.reports.recv_timeout(timeout) {
                Ok(r) => r.map(Some),
                Err(RecvTimeoutError::Timeout) => Ok(None),
                Err(RecvTimeoutError::Disconnected) => {
                    thread::sleep(timeout);
                    Ok(None)
                }
            }
        }
    }

    impl Drop for FakeDevice {
        fn drop(&mut self) {
            self.released.store(true, Ordering::SeqCst);
        }
    }

    struct FakeOpener(Mutex<Option<FakeDevice>>);

    impl DeviceOpener for FakeOpener {
        type Device = FakeDevice;

        fn open(&self, vendor_id: u16, product_id: u16) -> Result<FakeDevice, ReaderError> {
            self.0
                .lock()
                .unwrap()
                .take()
                .ok_or(ReaderError::DeviceNotFound {
                    vendor_id,
                    product_id,
                })
        }
    }

    fn fake() -> (
        FakeOpener,
        Sender<Result<Vec<u8>, ReaderError>>,
        Arc<AtomicBool>,
    ) {
        let (tx, rx) = unbounded();
        let released = Arc::new(AtomicBool::new(false));
        let device = FakeDevice {
            reports: rx,
            released: Arc::clone(&released),
        };
        (FakeOpener(Mutex::new(Some(device))), tx, released)
    }

    fn settings() -> ReaderSettings {
        ReaderSettings {
            poll_interval: Duration::from_millis(10),
            ..ReaderSettings::default()
        }
    }

    const TIMEOUT: Duration = Duration::from_secs(2);

    #[test]
    fn missing_device_reports_once_and_closes() {
        let handle = start(FakeOpener(Mutex::new(None)), settings()).unwrap();
        let rx = handle.readings();

        match rx.recv_timeout(TIMEOUT) {
            Ok(Err(ReaderError::DeviceNotFound { vendor_id, product_id })) => {
                assert_eq!(vendor_id, DEFAULT_VENDOR_ID);
                assert_eq!(product_id, DEFAULT_PRODUCT_ID);
            }
            other => panic!("expected DeviceNotFound, got {other:?}"),
        }
        assert_eq!(
            rx.recv_timeout(TIMEOUT),
            Err(RecvTimeoutError::Disconnected)
        );
    }

    #[test]
    fn publishes_decoded_readings_and_skips_malformed() {
        let (opener, reports, _released) = fake();
        let handle = start(opener, settings()).unwrap();
        let rx = handle.readings();

        reports.send(Ok(vec![0, 0, 0x0C, 0xFF, 150, 0])).unwrap();
        reports.send(Ok(vec![1, 2, 3])).unwrap();
        reports.send(Ok(vec![0, 0, 0x0C, 0x00, 7, 0])).unwrap();

        let first = rx.recv_timeout(TIMEOUT).unwrap().unwrap();
        assert!((first.pounds - 15.0).abs() < 1e-9);
        let second = rx.recv_timeout(TIMEOUT).unwrap().unwrap();
        assert!((second.pounds - 7.0).abs() < 1e-9);

        handle.stop();
    }

    #[test]
    fn io_errors_are_surfaced_without_stopping() {
        let (opener, reports, _released) = fake();
        let handle = start(opener, settings()).unwrap();
        let rx = handle.readings();

        reports.send(Err(ReaderError::Io("glitch".into()))).unwrap();
        reports.send(Ok(vec![0, 0, 0x0C, 0x00, 3, 0])).unwrap();

        assert_eq!(
            rx.recv_timeout(TIMEOUT).unwrap(),
            Err(ReaderError::Io("glitch".into()))
        );
        assert!(rx.recv_timeout(TIMEOUT).unwrap().is_ok());
        assert!(handle.is_running());
        handle.stop();
    }

    #[test]
    fn disconnect_ends_reader_and_releases_device() {
        let (opener, reports, released) = fake();
        let handle = start(opener, settings()).unwrap();
        let rx = handle.readings();

        reports
            .send(Err(ReaderError::Disconnected("unplugged".into())))
            .unwrap();

        assert!(matches!(
            rx.recv_timeout(TIMEOUT),
            Ok(Err(ReaderError::Disconnected(_)))
        ));
        assert_eq!(
            rx.recv_timeout(TIMEOUT),
            Err(RecvTimeoutError::Disconnected)
        );
        assert!(released.load(Ordering::SeqCst));
    }

    #[test]
    fn stop_without_readings_closes_channel_and_releases_device() {
        let (opener, _reports, released) = fake();
        let handle = start(opener, settings()).unwrap();
        let rx = handle.readings();

        let started = Instant::now();
        handle.stop();
        assert!(started.elapsed() < TIMEOUT);

        assert!(released.load(Ordering::SeqCst));
        assert!(!handle.is_running());
        assert_eq!(rx.try_recv(), Err(crossbeam_channel::TryRecvError::Disconnected));

        handle.stop();
    }

    #[test]
    fn stop_from_another_thread() {
        let (opener, _reports, released) = fake();
        let handle = Arc::new(start(opener, settings()).unwrap());

        let remote = Arc::clone(&handle);
        thread::spawn(move || remote.stop()).join().unwrap();

        assert!(released.load(Ordering::SeqCst));
        handle.stop();
    }

    #[test]
    fn full_channel_drops_oldest() {
        let (tx, rx) = bounded(2);
        let publisher = Publisher {
            tx,
            overflow: rx.clone(),
        };

        for lb in 1..=5 {
            publisher.publish(Ok(WeightReading::from_pounds(lb as f64)));
        }

        let kept: Vec<f64> = rx.try_iter().map(|r| r.unwrap().pounds).collect();
        assert_eq!(kept, vec![4.0, 5.0]);
    }
}
