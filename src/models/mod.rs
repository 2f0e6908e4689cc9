pub mod action;
pub mod catalog;
pub mod entry;
pub mod reading;
