use std::env;

use chrono::{NaiveDate, Utc};

pub mod fetch;
mod ioutil;
mod countries;
mod progress;
mod timeseries;
mod store;
mod jhu;
mod worldometer;
mod govex;
mod pipeline;
mod export;

pub use ioutil::magic_open;
pub use countries::*;
pub use progress::*;
pub use timeseries::*;
pub use store::*;
pub use jhu::*;
pub use worldometer::*;
pub use govex::*;
pub use pipeline::*;
pub use export::*;


pub fn naive_today() -> NaiveDate {
	Utc::today().naive_local()
}

/// First date of the upstream case tables.
pub fn global_start_date() -> NaiveDate {
	NaiveDate::from_ymd(2020, 1, 22)
}

pub fn env_data_dir() -> String {
	env::var("COVIDASH_DATA_DIR").unwrap_or("data".into())
}
