//! Domain models for the daily report screen.

mod appointment;
mod consultation;
mod daily_report;
mod patient;
mod record;

pub use appointment::*;
pub use consultation::*;
pub use daily_report::*;
pub use patient::*;
pub use record::*;
