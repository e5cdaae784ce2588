use std::fmt;
use std::io;

use super::pipeline::LongRow;
use super::timeseries::{DatedTable, SeriesKey};


/// Write a dated table as wide CSV: a `Date` column in ISO notation plus
/// one column per key, in table order. Empty cells stay empty fields, so
/// a reader can tell "no data" from zero.
pub fn write_wide_csv<W: io::Write, K: SeriesKey + fmt::Display, V: Copy + fmt::Display>(w: W, table: &DatedTable<K, V>) -> io::Result<()> {
	let mut w = csv::Writer::from_writer(w);
	let mut header: Vec<String> = Vec::with_capacity(table.num_keys() + 1);
	let mut columns: Vec<&[Option<V>]> = Vec::with_capacity(table.num_keys());
	header.push("Date".to_string());
	for k in table.keys() {
		let cells = match table.get(k) {
			Some(v) => v,
			None => continue,
		};
		header.push(k.to_string());
		columns.push(cells);
	}
	w.write_record(&header)?;
	let mut row: Vec<String> = Vec::with_capacity(header.len());
	for i in 0..table.len() {
		row.clear();
		row.push((table.start() + chrono::Duration::days(i as i64)).to_string());
		for cells in columns.iter() {
			row.push(match cells[i] {
				Some(v) => v.to_string(),
				None => String::new(),
			});
		}
		w.write_record(&row)?;
	}
	w.flush()?;
	Ok(())
}


/// Write melted rows as long CSV, one record per (country, date) pair.
pub fn write_long_csv<W: io::Write>(w: W, rows: &[LongRow]) -> io::Result<()> {
	let mut w = csv::Writer::from_writer(w);
	for row in rows {
		w.serialize(row)?;
	}
	w.flush()?;
	Ok(())
}
