use std::collections::HashMap;
use std::hash::Hash;

use chrono::NaiveDate;


pub trait SeriesKey: Hash + Eq + Clone + std::fmt::Debug {}
impl<T: Hash + Eq + Clone + std::fmt::Debug> SeriesKey for T {}


/// Single dated series without a key, dense over its axis.
///
/// A `None` cell means the source had no value for that day, which is
/// distinct from a zero count.
#[derive(Debug, Clone)]
pub struct DatedColumn<V: Copy> {
	start: NaiveDate,
	cells: Vec<Option<V>>,
}

impl<V: Copy> DatedColumn<V> {
	pub fn new(start: NaiveDate, cells: Vec<Option<V>>) -> Self {
		Self{
			start,
			cells,
		}
	}

	#[inline(always)]
	pub fn start(&self) -> NaiveDate {
		self.start
	}

	#[inline(always)]
	pub fn end(&self) -> NaiveDate {
		self.start + chrono::Duration::days(self.cells.len() as i64)
	}

	#[inline(always)]
	pub fn len(&self) -> usize {
		self.cells.len()
	}

	#[inline(always)]
	pub fn cells(&self) -> &[Option<V>] {
		&self.cells[..]
	}

	#[inline(always)]
	pub fn date_index(&self, other: NaiveDate) -> Option<usize> {
		let days = (other - self.start).num_days();
		if days < 0 || days as usize >= self.cells.len() {
			return None
		}
		return Some(days as usize)
	}

	#[inline(always)]
	pub fn index_date(&self, i: i64) -> Option<NaiveDate> {
		if i < 0 || i as usize >= self.cells.len() {
			return None
		}
		return Some(self.start + chrono::Duration::days(i))
	}

	pub fn get(&self, i: usize) -> Option<V> {
		if i >= self.cells.len() {
			return None
		}
		self.cells[i]
	}

	pub fn first_present(&self) -> Option<usize> {
		self.cells.iter().position(|v| v.is_some())
	}

	pub fn last_present(&self) -> Option<usize> {
		self.cells.iter().rposition(|v| v.is_some())
	}

	/// Cut the column down to the span between its first and last present
	/// value. A column without any value becomes a zero-length column at
	/// its original start.
	pub fn trimmed(self) -> Self {
		let (first, last) = match (self.first_present(), self.last_present()) {
			(Some(f), Some(l)) => (f, l),
			_ => return Self{
				start: self.start,
				cells: Vec::new(),
			},
		};
		Self{
			start: self.start + chrono::Duration::days(first as i64),
			cells: self.cells[first..=last].to_vec(),
		}
	}
}


/// Borrowed view on one dated series of a table.
#[derive(Debug, Clone, Copy)]
pub struct SeriesView<'x, V: Copy> {
	start: NaiveDate,
	cells: &'x [Option<V>],
}

impl<'x, V: Copy> SeriesView<'x, V> {
	#[inline(always)]
	pub fn start(&self) -> NaiveDate {
		self.start
	}

	#[inline(always)]
	pub fn len(&self) -> usize {
		self.cells.len()
	}

	#[inline(always)]
	pub fn cells(&self) -> &'x [Option<V>] {
		self.cells
	}

	#[inline(always)]
	pub fn date_index(&self, other: NaiveDate) -> Option<usize> {
		let days = (other - self.start).num_days();
		if days < 0 || days as usize >= self.cells.len() {
			return None
		}
		return Some(days as usize)
	}

	#[inline(always)]
	pub fn index_date(&self, i: i64) -> Option<NaiveDate> {
		if i < 0 || i as usize >= self.cells.len() {
			return None
		}
		return Some(self.start + chrono::Duration::days(i))
	}

	pub fn get(&self, i: usize) -> Option<V> {
		if i >= self.cells.len() {
			return None
		}
		self.cells[i]
	}
}


/// Dense table of dated series: one axis of consecutive days, one column
/// per key. Columns remember their insertion order, which is the order
/// `keys()` iterates in.
#[derive(Debug, Clone)]
pub struct DatedTable<K: Hash + Eq, V: Copy> {
	start: NaiveDate,
	len: usize,
	keys: HashMap<K, usize>,
	order: Vec<K>,
	columns: Vec<Vec<Option<V>>>,
}

impl<K: Hash + Eq, V: Copy> DatedTable<K, V> {
	pub fn new(start: NaiveDate, last: NaiveDate) -> Self {
		let len = (last - start).num_days();
		assert!(len >= 0);
		let len = len as usize;
		Self{
			start,
			len,
			keys: HashMap::new(),
			order: Vec::new(),
			columns: Vec::new(),
		}
	}

	#[inline(always)]
	pub fn date_index(&self, other: NaiveDate) -> Option<usize> {
		let days = (other - self.start).num_days();
		if days < 0 || days as usize >= self.len {
			return None
		}
		return Some(days as usize)
	}

	#[inline(always)]
	pub fn index_date(&self, i: i64) -> Option<NaiveDate> {
		if i < 0 || i as usize >= self.len {
			return None
		}
		return Some(self.start + chrono::Duration::days(i))
	}

	#[inline(always)]
	pub fn start(&self) -> NaiveDate {
		self.start
	}

	#[inline(always)]
	pub fn end(&self) -> NaiveDate {
		self.start + chrono::Duration::days(self.len as i64)
	}

	#[inline(always)]
	pub fn len(&self) -> usize {
		self.len
	}
}

impl<K: SeriesKey, V: Copy> DatedTable<K, V> {
	pub fn get_or_create(&mut self, k: K) -> &mut [Option<V>] {
		let index = self.get_index_or_create(k);
		&mut self.columns[index][..]
	}

	pub fn get_index_or_create(&mut self, k: K) -> usize {
		match self.keys.get(&k) {
			Some(v) => *v,
			None => {
				let v = self.columns.len();
				let mut vec = Vec::with_capacity(self.len);
				vec.resize(self.len, None);
				self.columns.push(vec);
				self.order.push(k.clone());
				self.keys.insert(k, v);
				v
			},
		}
	}

	pub fn get_index(&self, k: &K) -> Option<usize> {
		Some(*self.keys.get(k)?)
	}

	pub fn get(&self, k: &K) -> Option<&[Option<V>]> {
		let index = self.get_index(k)?;
		Some(&self.columns[index][..])
	}

	pub fn get_value(&self, k: &K, i: usize) -> Option<V> {
		if i >= self.len {
			return None
		}
		self.get(k).and_then(|v| { v[i] })
	}

	pub fn view(&self, k: &K) -> Option<SeriesView<'_, V>> {
		let cells = self.get(k)?;
		Some(SeriesView{
			start: self.start,
			cells,
		})
	}

	pub fn column(&self, k: &K) -> Option<DatedColumn<V>> {
		let cells = self.get(k)?;
		Some(DatedColumn{
			start: self.start,
			cells: cells.to_vec(),
		})
	}

	pub fn contains_key(&self, k: &K) -> bool {
		self.keys.contains_key(k)
	}

	pub fn keys(&self) -> std::slice::Iter<'_, K> {
		self.order.iter()
	}

	pub fn num_keys(&self) -> usize {
		self.order.len()
	}

	/// Outer join of dated columns. The result's axis spans from the
	/// earliest to the latest present value over all columns; days a
	/// column has nothing for stay empty. Column order is the input
	/// order. If no column carries any value, the result has its columns
	/// but a zero-length axis.
	pub fn from_columns(columns: Vec<(K, DatedColumn<V>)>) -> Self {
		assert!(columns.len() > 0);
		let mut span: Option<(NaiveDate, NaiveDate)> = None;
		for (_, col) in columns.iter() {
			let (first, last) = match (col.first_present(), col.last_present()) {
				(Some(f), Some(l)) => (f, l),
				_ => continue,
			};
			let first = col.start + chrono::Duration::days(first as i64);
			let last = col.start + chrono::Duration::days(last as i64);
			span = match span {
				Some((f, l)) => Some((f.min(first), l.max(last))),
				None => Some((first, last)),
			};
		}
		let mut result = match span {
			Some((first, last)) => Self::new(first, last + chrono::Duration::days(1)),
			None => Self::new(columns[0].1.start, columns[0].1.start),
		};
		for (k, col) in columns {
			let index = result.get_index_or_create(k);
			let offset = (col.start - result.start).num_days();
			for (i, v) in col.cells.iter().enumerate() {
				let v = match v {
					Some(v) => *v,
					None => continue,
				};
				let ti = offset + i as i64;
				if ti < 0 || ti as usize >= result.len {
					continue
				}
				result.columns[index][ti as usize] = Some(v);
			}
		}
		result
	}
}


pub type Counts<K> = DatedTable<K, u64>;
pub type MergedTable<K> = DatedTable<K, i64>;
pub type DeltaTable<K> = DatedTable<K, i64>;
pub type CapitaTable<K> = DatedTable<K, f64>;
pub type ActiveSeries = DatedColumn<i64>;


#[cfg(test)]
mod tests {
	use super::*;

	fn d(y: i32, m: u32, day: u32) -> NaiveDate {
		NaiveDate::from_ymd(y, m, day)
	}

	#[test]
	fn table_axis_maps_dates_to_indices_and_back() {
		let t = DatedTable::<String, u64>::new(d(2020, 1, 22), d(2020, 1, 27));
		assert_eq!(t.len(), 5);
		assert_eq!(t.start(), d(2020, 1, 22));
		assert_eq!(t.end(), d(2020, 1, 27));
		assert_eq!(t.date_index(d(2020, 1, 22)), Some(0));
		assert_eq!(t.date_index(d(2020, 1, 26)), Some(4));
		assert_eq!(t.date_index(d(2020, 1, 27)), None);
		assert_eq!(t.date_index(d(2020, 1, 21)), None);
		assert_eq!(t.index_date(0), Some(d(2020, 1, 22)));
		assert_eq!(t.index_date(4), Some(d(2020, 1, 26)));
		assert_eq!(t.index_date(5), None);
		assert_eq!(t.index_date(-1), None);
	}

	#[test]
	fn zero_length_axis_is_allowed() {
		let t = DatedTable::<String, u64>::new(d(2020, 1, 22), d(2020, 1, 22));
		assert_eq!(t.len(), 0);
		assert_eq!(t.date_index(d(2020, 1, 22)), None);
	}

	#[test]
	fn new_columns_are_empty_not_zero() {
		let mut t = DatedTable::<String, u64>::new(d(2020, 1, 22), d(2020, 1, 25));
		let col = t.get_or_create("Germany".to_string());
		assert_eq!(col, &[None, None, None]);
		col[1] = Some(7);
		assert_eq!(t.get_value(&"Germany".to_string(), 0), None);
		assert_eq!(t.get_value(&"Germany".to_string(), 1), Some(7));
		assert_eq!(t.get_value(&"Germany".to_string(), 3), None);
		assert_eq!(t.get_value(&"France".to_string(), 1), None);
	}

	#[test]
	fn keys_iterate_in_insertion_order() {
		let mut t = DatedTable::<String, u64>::new(d(2020, 1, 22), d(2020, 1, 24));
		t.get_or_create("Italy".to_string());
		t.get_or_create("Austria".to_string());
		t.get_or_create("Italy".to_string());
		t.get_or_create("Chile".to_string());
		let keys: Vec<&String> = t.keys().collect();
		assert_eq!(keys, vec!["Italy", "Austria", "Chile"]);
		assert_eq!(t.num_keys(), 3);
		assert!(t.contains_key(&"Austria".to_string()));
		assert!(!t.contains_key(&"Spain".to_string()));
	}

	#[test]
	fn view_shares_the_table_axis() {
		let mut t = DatedTable::<String, u64>::new(d(2020, 3, 1), d(2020, 3, 4));
		t.get_or_create("Peru".to_string())[2] = Some(11);
		let v = t.view(&"Peru".to_string()).unwrap();
		assert_eq!(v.start(), d(2020, 3, 1));
		assert_eq!(v.len(), 3);
		assert_eq!(v.get(2), Some(11));
		assert_eq!(v.get(0), None);
		assert_eq!(v.date_index(d(2020, 3, 3)), Some(2));
		assert_eq!(v.index_date(2), Some(d(2020, 3, 3)));
		assert!(t.view(&"Spain".to_string()).is_none());
	}

	#[test]
	fn column_trimming_cuts_to_present_span() {
		let col = DatedColumn::new(d(2020, 2, 1), vec![None, None, Some(3i64), None, Some(5), None]);
		let col = col.trimmed();
		assert_eq!(col.start(), d(2020, 2, 3));
		assert_eq!(col.cells(), &[Some(3), None, Some(5)]);
	}

	#[test]
	fn trimming_an_all_empty_column_yields_zero_length() {
		let col = DatedColumn::<i64>::new(d(2020, 2, 1), vec![None, None, None]);
		let col = col.trimmed();
		assert_eq!(col.len(), 0);
		assert_eq!(col.start(), d(2020, 2, 1));
	}

	#[test]
	fn outer_join_covers_the_union_of_spans() {
		let a = DatedColumn::new(d(2020, 1, 1), vec![Some(1i64), Some(2), Some(3)]);
		let b = DatedColumn::new(d(2020, 1, 3), vec![Some(30i64), Some(40)]);
		let t = DatedTable::from_columns(vec![
			("A".to_string(), a),
			("B".to_string(), b),
		]);
		assert_eq!(t.start(), d(2020, 1, 1));
		assert_eq!(t.len(), 4);
		assert_eq!(t.get(&"A".to_string()).unwrap(), &[Some(1), Some(2), Some(3), None]);
		assert_eq!(t.get(&"B".to_string()).unwrap(), &[None, None, Some(30), Some(40)]);
		let keys: Vec<&String> = t.keys().collect();
		assert_eq!(keys, vec!["A", "B"]);
	}

	#[test]
	fn outer_join_with_disjoint_spans_fills_the_gap() {
		let a = DatedColumn::new(d(2020, 1, 1), vec![Some(1i64), Some(2)]);
		let b = DatedColumn::new(d(2020, 1, 5), vec![Some(9i64)]);
		let t = DatedTable::from_columns(vec![
			("A".to_string(), a),
			("B".to_string(), b),
		]);
		assert_eq!(t.len(), 5);
		assert_eq!(t.get(&"A".to_string()).unwrap(), &[Some(1), Some(2), None, None, None]);
		assert_eq!(t.get(&"B".to_string()).unwrap(), &[None, None, None, None, Some(9)]);
	}

	#[test]
	fn outer_join_ignores_untrimmed_leading_and_trailing_gaps() {
		let a = DatedColumn::new(d(2020, 1, 1), vec![None, Some(2i64), None]);
		let t = DatedTable::from_columns(vec![("A".to_string(), a)]);
		assert_eq!(t.start(), d(2020, 1, 2));
		assert_eq!(t.len(), 1);
		assert_eq!(t.get(&"A".to_string()).unwrap(), &[Some(2)]);
	}

	#[test]
	fn outer_join_of_empty_columns_keeps_keys_without_rows() {
		let a = DatedColumn::<i64>::new(d(2020, 1, 1), vec![None, None]);
		let b = DatedColumn::<i64>::new(d(2020, 1, 4), Vec::new());
		let t = DatedTable::from_columns(vec![
			("A".to_string(), a),
			("B".to_string(), b),
		]);
		assert_eq!(t.len(), 0);
		assert_eq!(t.num_keys(), 2);
		assert!(t.contains_key(&"A".to_string()));
		assert!(t.contains_key(&"B".to_string()));
	}
}
