use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use enum_map::{Enum};

use super::countries::CountryKey;
use super::timeseries::{Counts, SeriesView};
use super::worldometer::PopulationRecord;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum)]
pub enum Metric {
	Cases,
	Deaths,
	Recoveries,
}

impl Metric {
	pub fn name(&self) -> &'static str {
		match self {
			Self::Cases => "cases",
			Self::Deaths => "deaths",
			Self::Recoveries => "recoveries",
		}
	}
}

impl fmt::Display for Metric {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for Metric {
	type Err = ParseMetricError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"cases" => Ok(Self::Cases),
			"deaths" => Ok(Self::Deaths),
			"recoveries" | "recovered" => Ok(Self::Recoveries),
			other => Err(ParseMetricError(other.into())),
		}
	}
}


#[derive(Debug, Clone)]
pub struct ParseMetricError(String);

impl fmt::Display for ParseMetricError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		write!(f, "unknown metric {:?}, expected cases, deaths or recoveries", self.0)
	}
}

impl std::error::Error for ParseMetricError {}


#[derive(Debug, Clone)]
pub struct UnknownCountryError {
	pub country: CountryKey,
	pub table: &'static str,
}

impl UnknownCountryError {
	pub fn new(country: &CountryKey, table: &'static str) -> Self {
		Self{
			country: country.clone(),
			table,
		}
	}
}

impl fmt::Display for UnknownCountryError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		write!(f, "unknown country {:?} in {} table", self.country, self.table)
	}
}

impl std::error::Error for UnknownCountryError {}


/// Anything that can answer "how many people live there". The scaling
/// steps only need this, not a fully loaded store.
pub trait PopulationSource {
	fn population_of(&self, country: &CountryKey) -> Option<u64>;
}

impl PopulationSource for HashMap<CountryKey, PopulationRecord> {
	fn population_of(&self, country: &CountryKey) -> Option<u64> {
		Some(self.get(country)?.population)
	}
}


/// The loaded source tables. Load once, read everywhere: all lookups go
/// through here, and all keys are canonical country names.
pub struct TimeSeriesStore {
	cases: Counts<CountryKey>,
	deaths: Counts<CountryKey>,
	recoveries: Counts<CountryKey>,
	population: HashMap<CountryKey, PopulationRecord>,
}

impl TimeSeriesStore {
	pub fn new(
			cases: Counts<CountryKey>,
			deaths: Counts<CountryKey>,
			recoveries: Counts<CountryKey>,
			population: HashMap<CountryKey, PopulationRecord>,
	) -> Self {
		Self{
			cases,
			deaths,
			recoveries,
			population,
		}
	}

	pub fn metric(&self, metric: Metric) -> &Counts<CountryKey> {
		match metric {
			Metric::Cases => &self.cases,
			Metric::Deaths => &self.deaths,
			Metric::Recoveries => &self.recoveries,
		}
	}

	pub fn metric_series(&self, metric: Metric, country: &CountryKey) -> Result<SeriesView<'_, u64>, UnknownCountryError> {
		match self.metric(metric).view(country) {
			Some(v) => Ok(v),
			None => Err(UnknownCountryError::new(country, metric.name())),
		}
	}

	pub fn population(&self, country: &CountryKey) -> Result<&PopulationRecord, UnknownCountryError> {
		match self.population.get(country) {
			Some(v) => Ok(v),
			None => Err(UnknownCountryError::new(country, "population")),
		}
	}

	pub fn has_population(&self, country: &CountryKey) -> bool {
		self.population.contains_key(country)
	}

	/// Countries all three metric tables know, in case table order. This
	/// is the universe a selector can offer without any request running
	/// into a missing column.
	pub fn countries(&self) -> Vec<&CountryKey> {
		self.cases.keys().filter(|k| {
			self.deaths.contains_key(*k) && self.recoveries.contains_key(*k)
		}).collect()
	}

	pub fn latest_date(&self) -> Option<NaiveDate> {
		self.cases.index_date(self.cases.len() as i64 - 1)
	}
}

impl PopulationSource for TimeSeriesStore {
	fn population_of(&self, country: &CountryKey) -> Option<u64> {
		self.population.population_of(country)
	}
}
