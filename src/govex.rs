use std::fmt;
use std::io;
use std::str::FromStr;

use chrono::NaiveDate;

use serde::Deserialize;

use super::countries::{canonical_country, CountryKey};
use super::progress::ProgressSink;
use super::timeseries::Counts;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VaccineSeries {
	Doses,
	Partial,
	Full,
}

impl VaccineSeries {
	pub fn name(&self) -> &'static str {
		match self {
			Self::Doses => "doses",
			Self::Partial => "partial",
			Self::Full => "full",
		}
	}
}

impl FromStr for VaccineSeries {
	type Err = ParseVaccineSeriesError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"doses" => Ok(Self::Doses),
			"partial" => Ok(Self::Partial),
			"full" => Ok(Self::Full),
			other => Err(ParseVaccineSeriesError(other.into())),
		}
	}
}

impl fmt::Display for VaccineSeries {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.name())
	}
}


#[derive(Debug, Clone)]
pub struct ParseVaccineSeriesError(String);

impl fmt::Display for ParseVaccineSeriesError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		write!(f, "unknown vaccination series {:?}, expected doses, partial or full", self.0)
	}
}

impl std::error::Error for ParseVaccineSeriesError {}


// the count columns are formatted as floats in some exports and carry NA
// cells, hence Option<f64> instead of u64
#[derive(Debug, Clone, Deserialize)]
pub struct VaccinationRecord {
	#[serde(rename = "Country_Region")]
	pub country: String,
	#[serde(rename = "Date")]
	pub date: NaiveDate,
	#[serde(rename = "Doses_admin")]
	pub doses: Option<f64>,
	#[serde(rename = "People_partially_vaccinated")]
	pub partial: Option<f64>,
	#[serde(rename = "People_fully_vaccinated")]
	pub full: Option<f64>,
}


fn count_value(v: Option<f64>) -> Option<u64> {
	let v = v?;
	if !v.is_finite() || v < 0. {
		return None
	}
	Some(v.round() as u64)
}


/// The long vaccination table pivoted into one wide table per series,
/// keyed by canonical country name on a caller-supplied date axis.
pub struct VaccinationData {
	pub doses: Counts<CountryKey>,
	pub partial: Counts<CountryKey>,
	pub full: Counts<CountryKey>,
}

impl VaccinationData {
	pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
		Self{
			doses: Counts::new(start, end),
			partial: Counts::new(start, end),
			full: Counts::new(start, end),
		}
	}

	fn submit(&mut self, rec: &VaccinationRecord) {
		let country = canonical_country(&rec.country);
		let index = match self.doses.date_index(rec.date) {
			Some(i) => i,
			// the export sometimes runs a day ahead of the axis -> skip
			None => return,
		};
		if let Some(v) = count_value(rec.doses) {
			self.doses.get_or_create(country.clone())[index] = Some(v);
		}
		if let Some(v) = count_value(rec.partial) {
			self.partial.get_or_create(country.clone())[index] = Some(v);
		}
		if let Some(v) = count_value(rec.full) {
			self.full.get_or_create(country)[index] = Some(v);
		}
	}

	pub fn series(&self, which: VaccineSeries) -> &Counts<CountryKey> {
		match which {
			VaccineSeries::Doses => &self.doses,
			VaccineSeries::Partial => &self.partial,
			VaccineSeries::Full => &self.full,
		}
	}
}


pub fn load_vaccinations<R: io::Read, S: ProgressSink + ?Sized>(s: &mut S, r: R, data: &mut VaccinationData) -> Result<(), io::Error> {
	let mut r = csv::Reader::from_reader(r);
	s.begin(None);
	let mut n = 0;
	for (i, row) in r.deserialize().enumerate() {
		let rec: VaccinationRecord = match row {
			Ok(v) => v,
			// tolerate the occasional malformed row, but not broken input
			Err(e) if !e.is_io_error() => continue,
			Err(e) => return Err(e.into()),
		};
		data.submit(&rec);
		if i % 10000 == 9999 {
			s.update(i+1);
		}
		n = i+1;
	}
	s.finish(n);
	Ok(())
}


#[cfg(test)]
mod tests {
	use super::*;

	use crate::progress::QuietMeter;

	fn load(data: &str, start: NaiveDate, end: NaiveDate) -> VaccinationData {
		let mut result = VaccinationData::new(start, end);
		load_vaccinations(&mut QuietMeter::new(), data.as_bytes(), &mut result).unwrap();
		result
	}

	#[test]
	fn rows_pivot_onto_their_dates() {
		let data = load("\
UID,Country_Region,Date,Doses_admin,People_partially_vaccinated,People_fully_vaccinated,Report_Date_String
276,Germany,2020-12-28,23423,21500,1900,2020-12-29
276,Germany,2020-12-29,42000,38000,4000,2020-12-30
40,Austria,2020-12-29,6000,5800,200,2020-12-30
", NaiveDate::from_ymd(2020, 12, 28), NaiveDate::from_ymd(2020, 12, 31));
		assert_eq!(data.doses.get(&"Germany".into()).unwrap(), &[Some(23423), Some(42000), None]);
		assert_eq!(data.partial.get(&"Germany".into()).unwrap(), &[Some(21500), Some(38000), None]);
		assert_eq!(data.full.get(&"Austria".into()).unwrap(), &[None, Some(200), None]);
	}

	#[test]
	fn na_cells_stay_missing() {
		let data = load("\
Country_Region,Date,Doses_admin,People_partially_vaccinated,People_fully_vaccinated
Germany,2020-12-28,23423,,
", NaiveDate::from_ymd(2020, 12, 28), NaiveDate::from_ymd(2020, 12, 29));
		assert_eq!(data.doses.get_value(&"Germany".into(), 0), Some(23423));
		assert_eq!(data.partial.get_value(&"Germany".into(), 0), None);
		assert!(data.partial.get(&"Germany".into()).is_none());
	}

	#[test]
	fn rows_outside_the_axis_are_skipped() {
		let data = load("\
Country_Region,Date,Doses_admin,People_partially_vaccinated,People_fully_vaccinated
Germany,2021-06-01,99999,1,1
Germany,2020-12-28,23423,1,1
", NaiveDate::from_ymd(2020, 12, 28), NaiveDate::from_ymd(2020, 12, 30));
		assert_eq!(data.doses.get(&"Germany".into()).unwrap(), &[Some(23423), None]);
	}

	#[test]
	fn malformed_rows_are_skipped() {
		let data = load("\
Country_Region,Date,Doses_admin,People_partially_vaccinated,People_fully_vaccinated
Germany,notadate,1,1,1
Germany,2020-12-28,23423,1,1
", NaiveDate::from_ymd(2020, 12, 28), NaiveDate::from_ymd(2020, 12, 30));
		assert_eq!(data.doses.get_value(&"Germany".into(), 0), Some(23423));
	}

	#[test]
	fn float_formatted_and_negative_counts() {
		let data = load("\
Country_Region,Date,Doses_admin,People_partially_vaccinated,People_fully_vaccinated
Germany,2020-12-28,23423.0,-5,1900
", NaiveDate::from_ymd(2020, 12, 28), NaiveDate::from_ymd(2020, 12, 29));
		assert_eq!(data.doses.get_value(&"Germany".into(), 0), Some(23423));
		assert_eq!(data.partial.get(&"Germany".into()), None);
		assert_eq!(data.full.get_value(&"Germany".into(), 0), Some(1900));
	}

	#[test]
	fn country_names_are_canonicalized() {
		let data = load("\
Country_Region,Date,Doses_admin,People_partially_vaccinated,People_fully_vaccinated
US,2020-12-28,1000000,900000,100000
", NaiveDate::from_ymd(2020, 12, 28), NaiveDate::from_ymd(2020, 12, 29));
		assert_eq!(data.doses.get_value(&"United States".into(), 0), Some(1000000));
	}

	#[test]
	fn series_selector_parses_and_prints() {
		assert_eq!("doses".parse::<VaccineSeries>().unwrap(), VaccineSeries::Doses);
		assert_eq!("partial".parse::<VaccineSeries>().unwrap(), VaccineSeries::Partial);
		assert_eq!("full".parse::<VaccineSeries>().unwrap(), VaccineSeries::Full);
		assert_eq!(VaccineSeries::Doses.to_string(), "doses");
		assert!("booster".parse::<VaccineSeries>().is_err());
	}
}
