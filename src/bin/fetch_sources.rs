use covidash::fetch::{Client, Dataset};


fn main() -> Result<(), Box<dyn std::error::Error>> {
	let argv: Vec<String> = std::env::args().collect();
	let outdir = match argv.get(1) {
		Some(v) => v.clone(),
		None => covidash::env_data_dir(),
	};
	std::fs::create_dir_all(&outdir)?;
	let client = Client::new();
	for dataset in Dataset::all() {
		println!("downloading {} ...", dataset.basename());
		client.download(*dataset, &outdir)?;
	}
	Ok(())
}
