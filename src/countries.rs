use smartstring::alias::{String as SmartString};


pub type CountryKey = SmartString;


// The case tables and the population reference disagree on a handful of
// country names. This fixed list maps every known divergent spelling onto
// the name the population reference uses; anything not listed passes
// through byte-for-byte. "Congo (Kinshasa)" and "Congo (Brazzaville)" are
// left alone on purpose: the population reference carries a single "DR
// Congo" row and it is not verified which of the two it covers.
static SYNONYMS: &[(&str, &str)] = &[
	("US", "United States"),
	("Korea, South", "South Korea"),
	("Czechia", "Czech Republic"),
	("Taiwan*", "Taiwan"),
	("Burma", "Myanmar"),
];


pub fn canonical_country(name: &str) -> CountryKey {
	let name = name.trim();
	for (from, to) in SYNONYMS {
		if *from == name {
			return (*to).into()
		}
	}
	name.into()
}


#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn known_synonyms_map_onto_reference_names() {
		assert_eq!(canonical_country("US"), "United States");
		assert_eq!(canonical_country("Korea, South"), "South Korea");
		assert_eq!(canonical_country("Czechia"), "Czech Republic");
		assert_eq!(canonical_country("Taiwan*"), "Taiwan");
		assert_eq!(canonical_country("Burma"), "Myanmar");
	}

	#[test]
	fn unlisted_names_pass_through_unchanged() {
		assert_eq!(canonical_country("Germany"), "Germany");
		assert_eq!(canonical_country("Congo (Kinshasa)"), "Congo (Kinshasa)");
		assert_eq!(canonical_country("Congo (Brazzaville)"), "Congo (Brazzaville)");
	}

	#[test]
	fn surrounding_whitespace_is_stripped() {
		assert_eq!(canonical_country(" Germany "), "Germany");
		assert_eq!(canonical_country("US "), "United States");
	}
}
