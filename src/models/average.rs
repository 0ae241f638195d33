// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Running-average encoding for adventure `rating` and `difficulty`.
//!
//! Both fields are stored as `"<average>:<tally>"`, where `tally` counts the
//! samples folded into `average`. A tally of zero means the adventure has
//! never been rated and the average carries no meaning.

use crate::error::FieldError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A running mean together with the number of samples folded into it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EncodedAverage {
    pub average: f64,
    pub tally: u32,
}

impl EncodedAverage {
    pub const UNRATED: EncodedAverage = EncodedAverage {
        average: 0.0,
        tally: 0,
    };

    pub fn new(average: f64, tally: u32) -> Self {
        Self { average, tally }
    }

    /// Parse the `"<average>:<tally>"` form.
    pub fn decode(s: &str) -> Result<Self, FieldError> {
        let malformed = || FieldError::MalformedEncoding(s.to_string());

        let (average, tally) = s.split_once(':').ok_or_else(malformed)?;
        if tally.contains(':') {
            return Err(malformed());
        }

        let average = parse_finite(average).ok_or_else(malformed)?;
        let tally = parse_tally(tally).ok_or_else(malformed)?;

        Ok(Self { average, tally })
    }

    /// Render the `"<average>:<tally>"` form.
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Incorporate one more sample into the running mean.
    pub fn fold_in(&self, value: f64) -> Self {
        if self.tally == 0 {
            return Self {
                average: value,
                tally: 1,
            };
        }

        let tally = f64::from(self.tally);
        Self {
            average: (value + self.average * tally) / (tally + 1.0),
            tally: self.tally.saturating_add(1),
        }
    }

    pub fn is_rated(&self) -> bool {
        self.tally > 0
    }

    /// Whether two encodings describe the same stored state.
    ///
    /// Unrated values match regardless of the placeholder average.
    pub fn same_state(&self, other: &Self) -> bool {
        if self.tally == 0 && other.tally == 0 {
            return true;
        }
        self.tally == other.tally && self.average == other.average
    }
}

impl fmt::Display for EncodedAverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.average, self.tally)
    }
}

impl FromStr for EncodedAverage {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl Serialize for EncodedAverage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EncodedAverage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::decode(&raw).map_err(serde::de::Error::custom)
    }
}

/// Parse a decimal token, rejecting NaN and infinities.
pub(crate) fn parse_finite(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a tally token: digits only, no sign.
pub(crate) fn parse_tally(token: &str) -> Option<u32> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}
