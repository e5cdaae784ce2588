use std::fmt;
use std::io;

use chrono::NaiveDate;

use log::debug;

use super::countries::{canonical_country, CountryKey};
use super::progress::ProgressSink;
use super::timeseries::Counts;


static COUNTRY_COLUMN: &'static str = "Country/Region";
// metadata columns of the wide layout, not part of the date axis
static DROPPED_COLUMNS: &'static [&'static str] = &["Province/State", "Lat", "Long"];


#[derive(Debug)]
pub enum LoadError {
	Io(io::Error),
	Csv(csv::Error),
	MissingColumn(&'static str),
	NoDateColumns,
	HeaderDate(String),
	DateAxis(NaiveDate),
	Cell{
		country: CountryKey,
		date: NaiveDate,
		message: String,
	},
}

impl fmt::Display for LoadError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Io(e) => fmt::Display::fmt(e, f),
			Self::Csv(e) => fmt::Display::fmt(e, f),
			Self::MissingColumn(name) => write!(f, "required column {:?} is missing", name),
			Self::NoDateColumns => f.write_str("header has no date columns"),
			Self::HeaderDate(s) => write!(f, "unparseable date {:?} in header", s),
			Self::DateAxis(d) => write!(f, "date axis is not strictly increasing at {}", d),
			Self::Cell{country, date, message} => write!(f, "invalid count for {} on {}: {}", country, date, message),
		}
	}
}

impl From<io::Error> for LoadError {
	fn from(err: io::Error) -> Self {
		Self::Io(err)
	}
}

impl From<csv::Error> for LoadError {
	fn from(err: csv::Error) -> Self {
		Self::Csv(err)
	}
}

impl std::error::Error for LoadError {}


// the header carries either US-style dates ("1/22/20") or ISO dates,
// depending on the age of the export
fn parse_header_date(s: &str) -> Option<NaiveDate> {
	if let Ok(d) = s.parse::<NaiveDate>() {
		return Some(d)
	}
	NaiveDate::parse_from_str(s, "%m/%d/%y").ok()
}


/// Load one of the global wide tables (confirmed, deaths or recovered):
/// one column per day, one row per country or per province of a country.
/// Province rows are summed into their country, country names are mapped
/// onto their canonical form, and empty cells stay empty instead of
/// counting as zero.
pub fn load_global_table<R: io::Read, S: ProgressSink + ?Sized>(s: &mut S, r: R) -> Result<Counts<CountryKey>, LoadError> {
	let mut r = csv::Reader::from_reader(r);
	let headers = r.headers()?.clone();
	let mut country_index: Option<usize> = None;
	let mut date_columns: Vec<(usize, NaiveDate)> = Vec::with_capacity(headers.len());
	for (i, name) in headers.iter().enumerate() {
		if name == COUNTRY_COLUMN {
			country_index = Some(i);
			continue
		}
		if DROPPED_COLUMNS.contains(&name) {
			continue
		}
		match parse_header_date(name) {
			Some(d) => date_columns.push((i, d)),
			None => return Err(LoadError::HeaderDate(name.into())),
		}
	}
	let country_index = match country_index {
		Some(i) => i,
		None => return Err(LoadError::MissingColumn(COUNTRY_COLUMN)),
	};
	if date_columns.len() == 0 {
		return Err(LoadError::NoDateColumns)
	}
	// downstream joins rely on a clean axis, so a duplicate or
	// out-of-order date has to stop the load here
	for w in date_columns.windows(2) {
		if w[1].1 <= w[0].1 {
			return Err(LoadError::DateAxis(w[1].1))
		}
	}
	let start = date_columns[0].1;
	let last = date_columns[date_columns.len() - 1].1;
	let mut columns: Vec<(usize, usize, NaiveDate)> = Vec::with_capacity(date_columns.len());
	for (hi, date) in date_columns.iter() {
		columns.push((*hi, (*date - start).num_days() as usize, *date));
	}
	let mut table = Counts::new(start, last + chrono::Duration::days(1));
	s.begin(None);
	let mut n = 0;
	for (i, row) in r.records().enumerate() {
		let row = row?;
		let country = match row.get(country_index) {
			Some(v) => canonical_country(v),
			None => continue,
		};
		if country.is_empty() {
			debug!("skipping row {} without a country name", i + 1);
			continue
		}
		let cells = table.get_or_create(country.clone());
		for (hi, ti, date) in columns.iter() {
			let cell = match row.get(*hi) {
				Some(v) => v.trim(),
				None => continue,
			};
			if cell.is_empty() {
				continue
			}
			let v = match cell.parse::<u64>() {
				Ok(v) => v,
				Err(e) => return Err(LoadError::Cell{
					country: country.clone(),
					date: *date,
					message: e.to_string(),
				}),
			};
			cells[*ti] = Some(cells[*ti].unwrap_or(0) + v);
		}
		if i % 50 == 49 {
			s.update(i+1);
		}
		n = i+1;
	}
	s.finish(n);
	Ok(table)
}
