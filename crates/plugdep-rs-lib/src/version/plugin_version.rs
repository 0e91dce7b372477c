use std::sync::OnceLock;

use regex::Regex;
use serde::*;

/// A single component of a version.
///
/// Text sorts before numbers so `1.0.0beta` is older than `1.0.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
enum Segment {
	Text(String),
	/// Digits without leading zeros, zero is empty. Kept as text so any length compares correctly.
	Number(String),
}

impl Segment {
	fn number(digits: &str) -> Self {
		Segment::Number(digits.trim_start_matches('0').to_string())
	}
}

impl Ord for Segment {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		match (self, other) {
			(Segment::Text(a), Segment::Text(b)) => a.cmp(b),
			(Segment::Text(_), Segment::Number(_)) => std::cmp::Ordering::Less,
			(Segment::Number(_), Segment::Text(_)) => std::cmp::Ordering::Greater,
			/* Without leading zeros a longer run is always the larger number */
			(Segment::Number(a), Segment::Number(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
		}
	}
}

impl PartialOrd for Segment {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

static ZERO: Segment = Segment::Number(String::new());

/// A dotted plugin version such as `1.4.2`.
///
/// Comparison is segment-wise with the shorter version padded by zero segments,
/// so `1.0` and `1.0.0` are equal. The original string is kept for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginVersion {
	version: String,
	segments: Vec<Segment>,
}

impl PluginVersion {
	/// Never fails; anything that isn't a digit or letter acts as a separator.
	pub fn new(version: &str) -> Self {
		static TOKENS: OnceLock<Regex> = OnceLock::new();
		let tokens = TOKENS.get_or_init(|| Regex::new("[0-9]+|[A-Za-z]+").expect("version token pattern is valid"));

		let segments = tokens.find_iter(version)
			.map(|m| {
				let s = m.as_str();
				if s.starts_with(|c: char| c.is_ascii_digit()) {
					Segment::number(s)
				} else {
					Segment::Text(s.to_lowercase())
				}
			})
			.collect();

		PluginVersion {
			version: version.to_string(),
			segments,
		}
	}

	pub fn as_str(&self) -> &str {
		&self.version
	}

	/// Segments with trailing zeros removed, two versions are equal exactly when these match.
	fn significant_segments(&self) -> &[Segment] {
		let end = self.segments.iter().rposition(|s| *s != ZERO).map(|i| i + 1).unwrap_or(0);
		&self.segments[..end]
	}
}

impl From<&str> for PluginVersion {
	fn from(value: &str) -> Self { Self::new(value) }
}

impl From<String> for PluginVersion {
	fn from(value: String) -> Self { Self::new(&value) }
}

impl Ord for PluginVersion {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		let len = std::cmp::max(self.segments.len(), other.segments.len());
		for i in 0..len {
			let lhs = self.segments.get(i).unwrap_or(&ZERO);
			let rhs = other.segments.get(i).unwrap_or(&ZERO);
			match lhs.cmp(rhs) {
				std::cmp::Ordering::Equal => {},
				ord => return ord,
			}
		}
		std::cmp::Ordering::Equal
	}
}

impl PartialOrd for PluginVersion {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl PartialEq for PluginVersion {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == std::cmp::Ordering::Equal
	}
}

impl Eq for PluginVersion {}

impl std::hash::Hash for PluginVersion {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.significant_segments().hash(state);
	}
}

impl std::fmt::Display for PluginVersion {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.version)
	}
}
