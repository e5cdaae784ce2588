use std::fs::File;
use std::path::Path;

use covidash::{
	canonical_country, CountryKey, Counts, LoadError, ProgressSink, TimeSeriesStore,
};


fn load_counts<P: AsRef<Path>, S: ProgressSink + ?Sized>(s: &mut S, path: P) -> Result<Counts<CountryKey>, LoadError> {
	let r = covidash::magic_open(path)?;
	covidash::load_global_table(s, r)
}


fn load_store(casefile: &str, deathfile: &str, recoveredfile: &str, popfile: &str) -> Result<TimeSeriesStore, Box<dyn std::error::Error>> {
	println!("loading case data ...");
	let cases = load_counts(&mut *covidash::default_output(), casefile)?;
	println!("loading death data ...");
	let deaths = load_counts(&mut *covidash::default_output(), deathfile)?;
	println!("loading recovery data ...");
	let recoveries = load_counts(&mut *covidash::default_output(), recoveredfile)?;
	println!("loading population data ...");
	let mut r = covidash::magic_open(popfile)?;
	let population = covidash::load_population(&mut r)?;
	Ok(TimeSeriesStore::new(cases, deaths, recoveries, population))
}


fn main() -> Result<(), Box<dyn std::error::Error>> {
	let argv: Vec<String> = std::env::args().collect();
	let casefile = &argv[1];
	let deathfile = &argv[2];
	let recoveredfile = &argv[3];
	let popfile = &argv[4];
	let active_out = &argv[5];
	let capita_out = &argv[6];
	let countries: Vec<CountryKey> = argv[7..].iter().map(|s| canonical_country(s)).collect();

	let store = load_store(casefile, deathfile, recoveredfile, popfile)?;

	println!("crunching ...");
	let active = covidash::compute_active(&store, &countries[..])?;
	let capita = covidash::normalize_per_capita(&active, &store);

	println!("writing active case counts ...");
	{
		let w = File::create(active_out)?;
		covidash::write_wide_csv(w, &active)?;
	}
	println!("writing per-capita table ...");
	{
		let w = File::create(capita_out)?;
		covidash::write_wide_csv(w, &capita)?;
	}
	Ok(())
}
