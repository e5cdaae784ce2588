use std::fs::File;

use covidash::{
	canonical_country, global_start_date, naive_today, CountryKey, VaccinationData, VaccineSeries,
};


fn main() -> Result<(), Box<dyn std::error::Error>> {
	let argv: Vec<String> = std::env::args().collect();
	let vaccfile = &argv[1];
	let popfile = &argv[2];
	let series: VaccineSeries = argv[3].parse()?;
	let raw_out = &argv[4];
	let capita_out = &argv[5];
	let countries: Vec<CountryKey> = argv[6..].iter().map(|s| canonical_country(s)).collect();

	let mut vacc = VaccinationData::new(global_start_date(), naive_today());
	println!("loading vaccination data ...");
	{
		let r = covidash::magic_open(vaccfile)?;
		covidash::load_vaccinations(&mut *covidash::default_output(), r, &mut vacc)?;
	}
	println!("loading population data ...");
	let population = {
		let mut r = covidash::magic_open(popfile)?;
		covidash::load_population(&mut r)?
	};

	println!("crunching ...");
	let raw = covidash::select_series(vacc.series(series), series.name(), &countries[..])?;
	let capita = covidash::normalize_per_capita(&raw, &population);

	println!("writing {} counts ...", series);
	{
		let w = File::create(raw_out)?;
		covidash::write_wide_csv(w, &raw)?;
	}
	println!("writing per-capita table ...");
	{
		let w = File::create(capita_out)?;
		covidash::write_wide_csv(w, &capita)?;
	}
	Ok(())
}
