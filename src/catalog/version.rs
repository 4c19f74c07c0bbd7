use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// A release label of the strict `MAJOR.MINOR.PATCH` form.
///
/// The original directory label is kept verbatim so reports echo exactly what
/// was found on disk (leading zeros included); ordering uses the parsed
/// components.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Version {
    label: String,
    parts: [u64; 3],
}

/// How versions are ordered before the reconciler walks them.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum VersionOrder {
    /// Compare major, minor, then patch as integers.
    #[default]
    Numeric,
    /// Compare the raw labels as byte strings. `10.0.0` sorts before `2.0.0`;
    /// only useful to reproduce reports generated that way.
    Lexical,
}

impl Version {
    /// Parse a directory label. Anything other than three dot-separated runs
    /// of ASCII digits yields `None`.
    pub fn parse(label: &str) -> Option<Self> {
        let mut parts = [0u64; 3];
        let mut pieces = label.split('.');
        for slot in parts.iter_mut() {
            let piece = pieces.next()?;
            if piece.is_empty() || !piece.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            *slot = piece.parse().ok()?;
        }
        if pieces.next().is_some() {
            return None;
        }
        Some(Self {
            label: label.to_string(),
            parts,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.label
    }

    pub fn major(&self) -> u64 {
        self.parts[0]
    }

    pub fn minor(&self) -> u64 {
        self.parts[1]
    }

    pub fn patch(&self) -> u64 {
        self.parts[2]
    }
}

impl VersionOrder {
    pub fn compare(self, left: &Version, right: &Version) -> Ordering {
        match self {
            VersionOrder::Numeric => left
                .parts
                .cmp(&right.parts)
                .then_with(|| left.label.cmp(&right.label)),
            VersionOrder::Lexical => left.label.cmp(&right.label),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VersionOrder::Numeric => "numeric",
            VersionOrder::Lexical => "lexical",
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl Serialize for Version {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).ok_or_else(|| {
            serde::de::Error::custom(format!("'{value}' is not a MAJOR.MINOR.PATCH version"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(label: &str) -> Version {
        Version::parse(label).unwrap()
    }

    #[test]
    fn parse_accepts_strict_triples() {
        let parsed = v("4.2.17");
        assert_eq!((parsed.major(), parsed.minor(), parsed.patch()), (4, 2, 17));
        assert_eq!(parsed.as_str(), "4.2.17");
        assert_eq!(v("007.0.1").as_str(), "007.0.1");
    }

    #[test]
    fn parse_rejects_non_conforming_labels() {
        for label in [
            "", "4", "4.2", "4.2.1.0", "v4.2.1", "4.2.1-rc0", "4..1", "4.2.", " 4.2.1", "4.2.x",
            "４.2.1", "matches.json", "99999999999999999999.0.0",
        ] {
            assert!(Version::parse(label).is_none(), "{label:?} should not parse");
        }
    }

    #[test]
    fn numeric_order_compares_components() {
        let mut versions = vec![v("10.0.0"), v("2.10.0"), v("2.2.0"), v("2.2.10"), v("2.2.9")];
        versions.sort_by(|a, b| VersionOrder::Numeric.compare(a, b));
        let labels: Vec<&str> = versions.iter().map(Version::as_str).collect();
        assert_eq!(labels, ["2.2.0", "2.2.9", "2.2.10", "2.10.0", "10.0.0"]);
    }

    #[test]
    fn lexical_order_matches_plain_string_sort() {
        let mut versions = vec![v("10.0.0"), v("2.10.0"), v("2.2.0"), v("2.2.10"), v("2.2.9")];
        versions.sort_by(|a, b| VersionOrder::Lexical.compare(a, b));
        let labels: Vec<&str> = versions.iter().map(Version::as_str).collect();
        assert_eq!(labels, ["10.0.0", "2.10.0", "2.2.0", "2.2.10", "2.2.9"]);
    }

    #[test]
    fn serde_uses_the_label() {
        let json = serde_json::to_string(&v("3.6.23")).unwrap();
        assert_eq!(json, "\"3.6.23\"");
        let back: Version = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v("3.6.23"));
        assert!(serde_json::from_str::<Version>("\"3.6\"").is_err());
    }
}
