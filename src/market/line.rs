//! Line value decoding.
//!
//! Totals and handicap bets carry their line encoded in the bet's
//! `specialBetValue` string, e.g. `"total=2.5"` or `"hcp=-1.5"`: the value
//! is the substring after the first `=`, parsed as a float. A bet with an
//! absent or unparsable value is silently excluded from line-keyed markets.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

/// A decoded numeric line, usable as an ordered map key
///
/// Wraps the float with a total ordering so line-keyed market maps iterate
/// and serialize deterministically. Serializes as a decimal string key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line(f64);

impl Line {
    /// Decode a line from an encoded special value
    ///
    /// ```rust
    /// use winamax_feed::market::Line;
    ///
    /// assert_eq!(Line::parse("total=2.5"), Some(Line::from(2.5)));
    /// assert_eq!(Line::parse("hcp=-1.5"), Some(Line::from(-1.5)));
    /// assert_eq!(Line::parse("garbage"), None);
    /// ```
    pub fn parse(special_value: &str) -> Option<Line> {
        let (_, raw) = special_value.split_once('=')?;
        raw.trim().parse::<f64>().ok().map(Line)
    }

    /// The numeric line value
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for Line {
    fn from(value: f64) -> Self {
        Line(value)
    }
}

impl Eq for Line {}

impl Ord for Line {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for Line {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Line {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_parse_takes_substring_after_first_equals() {
        assert_eq!(Line::parse("total=2.5"), Some(Line::from(2.5)));
        assert_eq!(Line::parse("x=1=2"), None); // "1=2" is not a number
        assert_eq!(Line::parse("hcp= -0.5 "), Some(Line::from(-0.5)));
    }

    #[test]
    fn test_unparsable_values_yield_none() {
        assert_eq!(Line::parse(""), None);
        assert_eq!(Line::parse("total"), None);
        assert_eq!(Line::parse("total="), None);
        assert_eq!(Line::parse("total=abc"), None);
    }

    #[test]
    fn test_ordering_in_map() {
        let mut map = BTreeMap::new();
        map.insert(Line::from(2.5), "a");
        map.insert(Line::from(-1.5), "b");
        map.insert(Line::from(0.5), "c");

        let keys: Vec<f64> = map.keys().map(|l| l.value()).collect();
        assert_eq!(keys, vec![-1.5, 0.5, 2.5]);
    }

    #[test]
    fn test_serializes_as_string_key() {
        let mut map = BTreeMap::new();
        map.insert(Line::from(2.5), 1);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"2.5":1}"#);
    }
}
