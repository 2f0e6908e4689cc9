use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::ledger::Ledger;
use crate::core::session::Session;
use crate::device::{self, ReaderError, ReaderSettings};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use crate::utils::{format_kg, format_lb};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Start the scale reader, wait for a usable reading and record it.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Weigh {
        category,
        source,
        timeout,
    } = cmd
    {
        let ledger = Arc::new(Ledger::open(&cfg.database)?);
        let source_id = ledger.require_source(source)?;
        let category_id = ledger.require_category(category)?;

        let settings = ReaderSettings::from_config(cfg);
        let poll_interval = settings.poll_interval;
        let timeout = Duration::from_secs(timeout.unwrap_or(cfg.weigh_timeout_secs));

        let reader = device::start(device::system_opener(), settings)?;
        let mut session = Session::new(Arc::clone(&ledger), cfg.min_weight_lb);
        session.attach(reader.readings());

        info("Waiting for the scale…");
        let outcome = wait_for_weight(&mut session, poll_interval, timeout);
        reader.stop();
        outcome?;

        let recorded = session.record(category_id, source_id)?;
        let entry = &recorded.entry;

        success(format!(
            "#{} {} ({}) {} from {} at {}",
            entry.id,
            format_lb(entry.weight_lb),
            format_kg(entry.weight_kg()),
            entry.category,
            entry.source,
            entry.timestamp_str()
        ));
        if recorded.duplicate {
            warning("Same weight, type and source as the previous entry.");
        }
    }

    Ok(())
}

/// Poll until the newest reading reaches the minimum weight.
///
/// Fails with the last reader error when the reader stops, or with
/// `NoReading` when `timeout` expires first.
fn wait_for_weight(session: &mut Session, interval: Duration, timeout: Duration) -> AppResult<()> {
    let deadline = Instant::now() + timeout;
    let mut last_error: Option<ReaderError> = None;

    loop {
        for e in session.poll() {
            warning(format!("Scale: {e}"));
            last_error = Some(e);
        }

        if session
            .latest_reading()
            .is_some_and(|r| r.pounds >= session.min_weight_lb())
        {
            return Ok(());
        }

        if !session.is_attached() {
            return Err(last_error.map_or(AppError::NoReading, AppError::from));
        }

        if Instant::now() >= deadline {
            return Err(AppError::NoReading);
        }

        thread::sleep(interval);
    }
}
