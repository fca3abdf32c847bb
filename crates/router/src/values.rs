//! Captured parameter values.

/// Parameter name to captured token, with case-insensitive unique keys.
///
/// Insertion order is preserved so bindings see parameters in template order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedValues {
	entries: Vec<(String, String)>,
}

impl CapturedValues {
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts or replaces the value for `name`.
	pub fn insert(&mut self, name: &str, value: &str) {
		match self.position(name) {
			Some(i) => self.entries[i].1 = value.to_string(),
			None => self.entries.push((name.to_string(), value.to_string())),
		}
	}

	pub fn get(&self, name: &str) -> Option<&str> {
		self.position(name).map(|i| self.entries[i].1.as_str())
	}

	pub fn contains(&self, name: &str) -> bool {
		self.position(name).is_some()
	}

	/// Copies every entry of `other` into `self`, later values winning.
	pub fn extend_from(&mut self, other: &CapturedValues) {
		for (name, value) in other.iter() {
			self.insert(name, value);
		}
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	fn position(&self, name: &str) -> Option<usize> {
		self.entries
			.iter()
			.position(|(key, _)| kestrel_route::literal_eq(key, name))
	}
}

impl<'a> FromIterator<(&'a str, &'a str)> for CapturedValues {
	fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
		let mut values = Self::new();
		for (name, value) in iter {
			values.insert(name, value);
		}
		values
	}
}
