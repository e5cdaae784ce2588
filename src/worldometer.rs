use std::collections::HashMap;
use std::io;

use log::warn;

use serde::Deserialize;

use super::countries::{canonical_country, CountryKey};


#[derive(Debug, Clone, Deserialize)]
pub struct RawPopulationRow {
	pub country: String,
	pub population: u64,
	pub density: Option<f64>,
	pub median_age: Option<f64>,
	pub urban_pop: Option<f64>,
}


#[derive(Debug, Clone)]
pub struct PopulationRecord {
	pub country: CountryKey,
	pub population: u64,
	pub density: Option<f64>,
	pub median_age: Option<f64>,
	pub urban_pop: Option<f64>,
}


/// Load the population reference. Keys are canonicalized here so lookups
/// against the case tables need no further mapping. Rows with a zero
/// population are dropped: every record in the result can be divided by.
pub fn load_population<R: io::Read>(r: &mut R) -> Result<HashMap<CountryKey, PopulationRecord>, io::Error> {
	let mut result = HashMap::new();
	let mut r = csv::Reader::from_reader(r);
	for row in r.deserialize() {
		let rec: RawPopulationRow = row?;
		let country = canonical_country(&rec.country);
		if rec.population == 0 {
			warn!("population reference has a zero population for {}, row ignored", country);
			continue
		}
		result.insert(country.clone(), PopulationRecord{
			country,
			population: rec.population,
			density: rec.density,
			median_age: rec.median_age,
			urban_pop: rec.urban_pop,
		});
	}
	Ok(result)
}


#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn records_are_keyed_by_canonical_name() {
		let data = "\
country,population,density,median_age,urban_pop
Germany,83783942,240,46,0.76
US,331002651,36,38,0.83
";
		let pop = load_population(&mut data.as_bytes()).unwrap();
		assert_eq!(pop.len(), 2);
		let rec = pop.get("United States").unwrap();
		assert_eq!(rec.population, 331002651);
		assert_eq!(rec.country, "United States");
		assert!(pop.get("US").is_none());
	}

	#[test]
	fn demographic_columns_are_optional() {
		let data = "\
country,population
Monaco,39242
";
		let pop = load_population(&mut data.as_bytes()).unwrap();
		let rec = pop.get("Monaco").unwrap();
		assert_eq!(rec.population, 39242);
		assert_eq!(rec.density, None);
		assert_eq!(rec.median_age, None);
		assert_eq!(rec.urban_pop, None);
	}

	#[test]
	fn empty_demographic_cells_read_as_missing() {
		let data = "\
country,population,density,median_age,urban_pop
Andorra,77265,164,,0.88
";
		let pop = load_population(&mut data.as_bytes()).unwrap();
		let rec = pop.get("Andorra").unwrap();
		assert_eq!(rec.density, Some(164.0));
		assert_eq!(rec.median_age, None);
		assert_eq!(rec.urban_pop, Some(0.88));
	}

	#[test]
	fn zero_population_rows_are_dropped() {
		let data = "\
country,population
Atlantis,0
Germany,83783942
";
		let pop = load_population(&mut data.as_bytes()).unwrap();
		assert_eq!(pop.len(), 1);
		assert!(pop.get("Atlantis").is_none());
	}
}
