use std::fs::File;
use std::path::Path;

use covidash::{
	canonical_country, CountryKey, Counts, LoadError, Metric, ProgressSink, TimeSeriesStore,
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
	let metric: Metric = argv[5].parse()?;
	let delta_out = &argv[6];
	let capita_out = &argv[7];
	let countries: Vec<CountryKey> = argv[8..].iter().map(|s| canonical_country(s)).collect();

	let store = load_store(casefile, deathfile, recoveredfile, popfile)?;

	println!("crunching ...");
	let table = covidash::metric_table(&store, metric, &countries[..])?;
	let delta = covidash::compute_daily_delta(&table);
	let capita = covidash::normalize_per_capita(&delta, &store);

	println!("writing daily {} changes ...", metric);
	{
		let w = File::create(delta_out)?;
		covidash::write_wide_csv(w, &delta)?;
	}
	println!("writing per-capita table ...");
	{
		let w = File::create(capita_out)?;
		covidash::write_wide_csv(w, &capita)?;
	}
	Ok(())
}
