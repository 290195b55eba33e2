// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum UnitError {
    #[error("empty magnitude")]
    Empty,
    #[error("invalid magnitude: {0:?}")]
    InvalidNumber(String),
    #[error("unknown unit suffix {suffix:?} in {value:?}")]
    UnknownSuffix { suffix: char, value: String },
}

/// Suffix letter to multiplier, relative to KiB (the unit `top` prints
/// unsuffixed memory columns in).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "BTreeMap<char, u64>")]
pub struct UnitScales(BTreeMap<char, u64>);

impl Default for UnitScales {
    fn default() -> Self {
        Self::new([
            ('k', 1_u64),
            ('m', 1 << 10),
            ('g', 1 << 20),
            ('t', 1 << 30),
            ('p', 1 << 40),
            ('e', 1 << 50),
        ])
    }
}

impl UnitScales {
    pub fn new(scales: impl IntoIterator<Item = (char, u64)>) -> Self {
        Self(
            scales
                .into_iter()
                .map(|(c, factor)| (c.to_ascii_lowercase(), factor))
                .collect(),
        )
    }

    pub fn get(&self, suffix: char) -> Option<u64> {
        self.0.get(&suffix.to_ascii_lowercase()).copied()
    }

    /// Convert a magnitude such as `"123456"` or `"1.5g"` into base units.
    ///
    /// Unsuffixed values are already in base units and must be plain unsigned
    /// integers. Suffixed values are scaled and truncated.
    pub fn normalize(&self, value: &str) -> Result<u64, UnitError> {
        let value = value.trim();
        let Some(suffix) = value.chars().last() else {
            return Err(UnitError::Empty);
        };

        if !suffix.is_alphabetic() {
            return value
                .parse::<u64>()
                .map_err(|_| UnitError::InvalidNumber(value.to_string()));
        }

        let factor = self.get(suffix).ok_or_else(|| UnitError::UnknownSuffix {
            suffix,
            value: value.to_string(),
        })?;
        let number = value.strip_suffix(suffix).unwrap_or_default();
        let magnitude: f64 = number
            .replace(',', ".")
            .parse()
            .map_err(|_| UnitError::InvalidNumber(value.to_string()))?;
        if !magnitude.is_finite() || magnitude < 0.0 {
            return Err(UnitError::InvalidNumber(value.to_string()));
        }

        Ok((magnitude * factor as f64) as u64)
    }
}

impl From<BTreeMap<char, u64>> for UnitScales {
    fn from(map: BTreeMap<char, u64>) -> Self {
        Self::new(map)
    }
}
