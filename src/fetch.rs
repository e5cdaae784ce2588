use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::debug;

use reqwest;
use bytes::Bytes;


static JHU_BASE: &'static str = "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_time_series";
static GOVEX_BASE: &'static str = "https://raw.githubusercontent.com/govex/COVID-19/master/data_tables/vaccine_data/global_data";


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
	Cases,
	Deaths,
	Recoveries,
	Vaccinations,
}

impl Dataset {
	pub fn all() -> &'static [Dataset] {
		static ALL: [Dataset; 4] = [
			Dataset::Cases,
			Dataset::Deaths,
			Dataset::Recoveries,
			Dataset::Vaccinations,
		];
		&ALL[..]
	}

	pub fn basename(&self) -> &'static str {
		match self {
			Self::Cases => "time_series_covid19_confirmed_global.csv",
			Self::Deaths => "time_series_covid19_deaths_global.csv",
			Self::Recoveries => "time_series_covid19_recovered_global.csv",
			Self::Vaccinations => "time_series_covid19_vaccine_global.csv",
		}
	}

	pub fn url(&self) -> String {
		match self {
			Self::Vaccinations => format!("{}/{}", GOVEX_BASE, self.basename()),
			_ => format!("{}/{}", JHU_BASE, self.basename()),
		}
	}
}


#[derive(Debug)]
pub enum Error {
	Request(reqwest::Error),
	Status(reqwest::StatusCode),
	Io(io::Error),
}

impl fmt::Display for Error {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Request(e) => fmt::Display::fmt(e, f),
			Self::Status(code) => write!(f, "unexpected response status {}", code),
			Self::Io(e) => fmt::Display::fmt(e, f),
		}
	}
}

impl From<reqwest::Error> for Error {
	fn from(err: reqwest::Error) -> Self {
		Self::Request(err)
	}
}

impl From<io::Error> for Error {
	fn from(err: io::Error) -> Self {
		Self::Io(err)
	}
}

impl std::error::Error for Error {}


pub struct Client {
	client: reqwest::blocking::Client,
}

impl Client {
	pub fn new() -> Self {
		Self{
			client: reqwest::blocking::Client::new(),
		}
	}

	pub fn fetch(&self, dataset: Dataset) -> Result<Bytes, Error> {
		let url = dataset.url();
		debug!("fetching {}", url);
		let resp = self.client.get(url).send()?;
		match resp.error_for_status_ref() {
			Ok(_) => (),
			Err(e) => return Err(match e.status() {
				Some(code) => Error::Status(code),
				None => Error::Request(e),
			}),
		}
		Ok(resp.bytes()?)
	}

	pub fn download<P: AsRef<Path>>(&self, dataset: Dataset, dir: P) -> Result<PathBuf, Error> {
		let body = self.fetch(dataset)?;
		let path = dir.as_ref().join(dataset.basename());
		let mut f = File::create(&path)?;
		f.write_all(&body[..])?;
		Ok(path)
	}
}


#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn dataset_urls_point_at_the_upstream_exports() {
		assert_eq!(
			Dataset::Cases.url(),
			"https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_time_series/time_series_covid19_confirmed_global.csv",
		);
		assert_eq!(
			Dataset::Vaccinations.url(),
			"https://raw.githubusercontent.com/govex/COVID-19/master/data_tables/vaccine_data/global_data/time_series_covid19_vaccine_global.csv",
		);
	}

	#[test]
	fn all_datasets_have_distinct_basenames() {
		let all = Dataset::all();
		assert_eq!(all.len(), 4);
		for (i, a) in all.iter().enumerate() {
			for b in all[i+1..].iter() {
				assert!(a.basename() != b.basename());
			}
		}
	}
}
