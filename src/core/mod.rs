pub mod backup;
pub mod ledger;
pub mod log;
pub mod report;
pub mod session;
