use std::fmt;

use chrono::NaiveDate;

use log::debug;

use num_traits::AsPrimitive;

use serde::Serialize;

use super::countries::CountryKey;
use super::store::{Metric, PopulationSource, TimeSeriesStore, UnknownCountryError};
use super::timeseries::{ActiveSeries, CapitaTable, Counts, DatedTable, DeltaTable, MergedTable, SeriesKey};


static CAPITA_SCALE: f64 = 100000.;


#[derive(Debug, Clone)]
pub enum PipelineError {
	UnknownCountry(UnknownCountryError),
	EmptySelection,
}

impl fmt::Display for PipelineError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::UnknownCountry(e) => fmt::Display::fmt(e, f),
			Self::EmptySelection => f.write_str("no countries selected"),
		}
	}
}

impl From<UnknownCountryError> for PipelineError {
	fn from(err: UnknownCountryError) -> Self {
		Self::UnknownCountry(err)
	}
}

impl std::error::Error for PipelineError {}


/// Active cases for one country: cumulative cases minus cumulative deaths
/// and recoveries, on the dates where all three series carry a value. The
/// result is trimmed to the surviving span; gaps inside it stay empty.
/// Values are signed on purpose: retractions in the sources can push the
/// difference below zero and that artifact must survive into the output.
pub fn active_series(store: &TimeSeriesStore, country: &CountryKey) -> Result<ActiveSeries, UnknownCountryError> {
	let cases = store.metric_series(Metric::Cases, country)?;
	let deaths = store.metric_series(Metric::Deaths, country)?;
	let recoveries = store.metric_series(Metric::Recoveries, country)?;
	let mut cells: Vec<Option<i64>> = Vec::new();
	cells.resize(cases.len(), None);
	for i in 0..cases.len() {
		let c = match cases.get(i) {
			Some(v) => v,
			None => continue,
		};
		let date = cases.start() + chrono::Duration::days(i as i64);
		let d = match deaths.date_index(date).and_then(|j| deaths.get(j)) {
			Some(v) => v,
			None => continue,
		};
		let r = match recoveries.date_index(date).and_then(|j| recoveries.get(j)) {
			Some(v) => v,
			None => continue,
		};
		cells[i] = Some(c as i64 - (d as i64 + r as i64));
	}
	Ok(ActiveSeries::new(cases.start(), cells).trimmed())
}


/// Merge the active series of the selected countries into one table:
/// each country is joined and computed on its own, then the columns are
/// outer-joined by date, in selection order with duplicates dropped after
/// their first occurrence. A missing date in one country's sources can
/// therefore never disturb another country's column.
pub fn compute_active(store: &TimeSeriesStore, countries: &[CountryKey]) -> Result<MergedTable<CountryKey>, PipelineError> {
	if countries.is_empty() {
		return Err(PipelineError::EmptySelection)
	}
	let mut columns: Vec<(CountryKey, ActiveSeries)> = Vec::with_capacity(countries.len());
	for country in countries {
		if columns.iter().any(|(k, _)| k == country) {
			continue
		}
		let series = active_series(store, country)?;
		columns.push((country.clone(), series));
	}
	Ok(MergedTable::from_columns(columns))
}


/// Outer join of the selected countries' columns of one source table.
/// `table_name` only feeds the error context.
pub fn select_series(table: &Counts<CountryKey>, table_name: &'static str, countries: &[CountryKey]) -> Result<DatedTable<CountryKey, u64>, PipelineError> {
	if countries.is_empty() {
		return Err(PipelineError::EmptySelection)
	}
	let mut columns = Vec::with_capacity(countries.len());
	for country in countries {
		if columns.iter().any(|(k, _)| k == country) {
			continue
		}
		let column = match table.column(country) {
			Some(c) => c,
			None => return Err(UnknownCountryError::new(country, table_name).into()),
		};
		columns.push((country.clone(), column.trimmed()));
	}
	Ok(DatedTable::from_columns(columns))
}


pub fn metric_table(store: &TimeSeriesStore, metric: Metric, countries: &[CountryKey]) -> Result<DatedTable<CountryKey, u64>, PipelineError> {
	select_series(store.metric(metric), metric.name(), countries)
}


/// Scale every column to values per 100000 inhabitants. A country the
/// population source does not know keeps its raw values; the failure is
/// per column and never affects the others.
pub fn normalize_per_capita<V: Copy + AsPrimitive<f64>, P: PopulationSource + ?Sized>(table: &DatedTable<CountryKey, V>, population: &P) -> CapitaTable<CountryKey> {
	let mut result = CapitaTable::new(table.start(), table.end());
	for country in table.keys() {
		let cells = match table.get(country) {
			Some(v) => v,
			None => continue,
		};
		let per_capita = match population.population_of(country) {
			Some(v) => Some(v as f64),
			None => {
				debug!("no population data for {}, keeping raw values", country);
				None
			},
		};
		let out = result.get_or_create(country.clone());
		for (i, v) in cells.iter().enumerate() {
			let v = match v {
				Some(v) => v.as_(),
				None => continue,
			};
			out[i] = Some(match per_capita {
				Some(p) => v / p * CAPITA_SCALE,
				None => v,
			});
		}
	}
	result
}


/// Day-over-day differences per column. The first row has no predecessor
/// and is always empty; a difference exists only where both of its cells
/// do. Negative differences are legitimate (corrections).
pub fn compute_daily_delta<K: SeriesKey, V: Copy + AsPrimitive<i64>>(table: &DatedTable<K, V>) -> DeltaTable<K> {
	let mut result = DeltaTable::new(table.start(), table.end());
	for key in table.keys() {
		let cells = match table.get(key) {
			Some(v) => v,
			None => continue,
		};
		let out = result.get_or_create(key.clone());
		for i in 1..cells.len() {
			let (prev, curr) = match (cells[i-1], cells[i]) {
				(Some(p), Some(c)) => (p.as_(), c.as_()),
				_ => continue,
			};
			out[i] = Some(curr - prev);
		}
	}
	result
}


#[derive(Debug, Clone, Serialize)]
pub struct LongRow {
	pub country: CountryKey,
	pub date: NaiveDate,
	pub active: Option<i64>,
	pub active_capita: Option<f64>,
}

pub type LongTable = Vec<LongRow>;


/// Melt a merged table into one row per (date, country), walking the
/// dates outward and the columns in table order within each date. Rows
/// for countries without population data keep their raw active value
/// with the per-capita slot empty; a row is dropped only when it has
/// neither value.
pub fn melt_to_long<P: PopulationSource + ?Sized>(table: &MergedTable<CountryKey>, population: &P) -> LongTable {
	let mut populations: Vec<Option<f64>> = Vec::with_capacity(table.num_keys());
	for country in table.keys() {
		populations.push(match population.population_of(country) {
			Some(v) => Some(v as f64),
			None => {
				debug!("no population data for {}, leaving per-capita empty", country);
				None
			},
		});
	}
	let mut result = Vec::new();
	for i in 0..table.len() {
		let date = table.start() + chrono::Duration::days(i as i64);
		for (country, pop) in table.keys().zip(populations.iter().copied()) {
			let active = table.get_value(country, i);
			let active_capita = match (active, pop) {
				(Some(v), Some(p)) => Some(v as f64 / p * CAPITA_SCALE),
				_ => None,
			};
			if active.is_none() && active_capita.is_none() {
				continue
			}
			result.push(LongRow{
				country: country.clone(),
				date,
				active,
				active_capita,
			});
		}
	}
	result
}
