use serde::{Serialize, Deserialize};

use super::PluginVersion;

/// A requirement a dependent places on the version of one of its dependencies.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersionConstraint {
	/// `*`
	#[default] Any,
	/// A bare version. Also what unrecognised expressions fall back to.
	Exact(PluginVersion),
	/// `>=`
	AtLeast(PluginVersion),
	/// `>`
	GreaterThan(PluginVersion),
	/// `<=`
	AtMost(PluginVersion),
	/// `<`
	LessThan(PluginVersion),
}

impl VersionConstraint {
	/// Parses a constraint expression, this never fails.
	///
	/// Two character operators are checked before one character operators so `>=1.0`
	/// isn't read as `>` of `=1.0`. Anything not matching an operator prefix is compared
	/// for equality against the whole expression, malformed input is not rejected.
	pub fn parse(constraint: &str) -> Self {
		let constraint = constraint.trim();

		if constraint.is_empty() || constraint == "*" {
			return VersionConstraint::Any
		}

		if !constraint.contains('>') && !constraint.contains('<') {
			return VersionConstraint::Exact(PluginVersion::new(constraint))
		}

		if let Some(v) = constraint.strip_prefix(">=") {
			VersionConstraint::AtLeast(PluginVersion::new(v))
		} else if let Some(v) = constraint.strip_prefix("<=") {
			VersionConstraint::AtMost(PluginVersion::new(v))
		} else if let Some(v) = constraint.strip_prefix('>') {
			VersionConstraint::GreaterThan(PluginVersion::new(v))
		} else if let Some(v) = constraint.strip_prefix('<') {
			VersionConstraint::LessThan(PluginVersion::new(v))
		} else {
			VersionConstraint::Exact(PluginVersion::new(constraint))
		}
	}

	pub fn is_satisfied_by(&self, installed: &PluginVersion) -> bool {
		match self {
			VersionConstraint::Any => true,
			VersionConstraint::Exact(v) => installed == v,
			VersionConstraint::AtLeast(v) => installed >= v,
			VersionConstraint::GreaterThan(v) => installed > v,
			VersionConstraint::AtMost(v) => installed <= v,
			VersionConstraint::LessThan(v) => installed < v,
		}
	}
}

impl From<&str> for VersionConstraint {
	fn from(value: &str) -> Self { Self::parse(value) }
}

impl std::fmt::Display for VersionConstraint {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			VersionConstraint::Any => write!(f, "*"),
			VersionConstraint::Exact(v) => write!(f, "{}", v),
			VersionConstraint::AtLeast(v) => write!(f, ">={}", v),
			VersionConstraint::GreaterThan(v) => write!(f, ">{}", v),
			VersionConstraint::AtMost(v) => write!(f, "<={}", v),
			VersionConstraint::LessThan(v) => write!(f, "<{}", v),
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn satisfied(installed: &str, constraint: &str) -> bool {
		VersionConstraint::parse(constraint).is_satisfied_by(&PluginVersion::new(installed))
	}

	#[test] fn constraint_any_accepts_everything() { assert!(satisfied("0.0.1", "*")) }
	#[test] fn constraint_empty_is_any() { assert_eq!(VersionConstraint::parse(""), VersionConstraint::Any) }
	#[test] fn constraint_bare_version_is_exact() { assert!(satisfied("1.2.0", "1.2") && !satisfied("1.2.1", "1.2")) }
	#[test] fn constraint_at_least() { assert!(satisfied("2.0.0", ">=2.0.0") && satisfied("2.5.0", ">=2.0.0") && !satisfied("1.0.0", ">=2.0.0")) }
	#[test] fn constraint_greater_than() { assert!(satisfied("2.0.1", ">2.0.0") && !satisfied("2.0.0", ">2.0.0")) }
	#[test] fn constraint_at_most() { assert!(satisfied("1.0", "<=1.0.0") && !satisfied("1.0.1", "<=1.0.0")) }
	#[test] fn constraint_less_than() { assert!(satisfied("0.9", "<1.0") && !satisfied("1.0", "<1.0")) }

	#[test]
	fn constraint_two_character_operators_take_precedence() {
		assert_eq!(VersionConstraint::parse(">=1.0"), VersionConstraint::AtLeast(PluginVersion::new("1.0")));
		assert_eq!(VersionConstraint::parse("<=1.0"), VersionConstraint::AtMost(PluginVersion::new("1.0")));
	}

	#[test]
	fn constraint_unrecognised_operator_falls_back_to_exact() {
		let c = VersionConstraint::parse("=>1.0");
		assert!(matches!(c, VersionConstraint::Exact(_)));
		assert_eq!(c.to_string(), "=>1.0");
	}

	#[test]
	fn constraint_display_round_trips_operator() {
		assert_eq!(VersionConstraint::parse(">=2.0.0").to_string(), ">=2.0.0");
		assert_eq!(VersionConstraint::parse("<3").to_string(), "<3");
	}
}
