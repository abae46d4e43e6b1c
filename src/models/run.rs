use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::errors::StatusError;

/// A run identifier of the form `<8-digit date>-<sequence>`, e.g. `20230101-2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RunIdentifier {
    raw: String,
    date: String,
    /// Sequence digits without leading zeros. Kept as text so any length orders correctly.
    sequence: String,
}

impl RunIdentifier {
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Sort key: the date digits followed by the sequence padded to six digits,
    /// so `20230101-2` sorts before `20230101-10`. Ordering compares the
    /// sequence numerically instead, which also holds past six digits.
    pub fn sort_key(&self) -> String {
        format!("{}{:0>6}", self.date, self.sequence)
    }

    /// Remote path of an artifact published by this run.
    pub fn artifact_path(&self, artifact: &str) -> String {
        format!("{}/{}", self.raw, artifact)
    }
}

impl FromStr for RunIdentifier {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim_end_matches('/');
        let invalid = || StatusError::parse(s, "expected <YYYYMMDD>-<sequence>");

        let (date, sequence) = trimmed.split_once('-').ok_or_else(invalid)?;
        if date.len() != 8 || !date.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if sequence.is_empty() || !sequence.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let sequence = match sequence.trim_start_matches('0') {
            "" => "0",
            digits => digits,
        };

        Ok(Self {
            raw: trimmed.to_string(),
            date: date.to_string(),
            sequence: sequence.to_string(),
        })
    }
}

impl TryFrom<String> for RunIdentifier {
    type Error = StatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RunIdentifier> for String {
    fn from(value: RunIdentifier) -> Self {
        value.raw
    }
}

impl Ord for RunIdentifier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.date
            .cmp(&other.date)
            .then_with(|| self.sequence.len().cmp(&other.sequence.len()))
            .then_with(|| self.sequence.cmp(&other.sequence))
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for RunIdentifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for RunIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
