//! Router behavior knobs, loadable from TOML.
//!
//! ```toml
//! prefix_matching = true
//!
//! [suggestions]
//! max_distance = 2
//! limit = 3
//!
//! [completion]
//! include_placeholders = true
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;


#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouterOptions {
	/// Expand unique literal abbreviations before resolving.
	pub prefix_matching: bool,
	pub suggestions: SuggestionOptions,
	pub completion: CompletionOptions,
}

impl Default for RouterOptions {
	fn default() -> Self {
		Self {
			prefix_matching: true,
			suggestions: SuggestionOptions::default(),
			completion: CompletionOptions::default(),
		}
	}
}

impl RouterOptions {
	pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(text)?)
	}

	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml(&text)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuggestionOptions {
	/// Largest edit distance still offered as a suggestion.
	pub max_distance: usize,
	pub limit: usize,
}

impl Default for SuggestionOptions {
	fn default() -> Self {
		Self {
			max_distance: 2,
			limit: 3,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompletionOptions {
	/// Offer `{name:kind}` placeholders for parameters with no known values.
	pub include_placeholders: bool,
}

impl Default for CompletionOptions {
	fn default() -> Self {
		Self {
			include_placeholders: true,
		}
	}
}
