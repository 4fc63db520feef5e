//! Month-sequence cells for the results table.
//!
//! A sequence of nine monthly values is stored in a single CSV field as
//! comma-joined text (`"3,1,5,2,2,4,1,1,5"`). The CSV writer quotes the field.

use std::fmt::Display;
use std::str::FromStr;

use grisk_core::MONTHS;
use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

pub fn join<T: Display>(values: &[T; MONTHS]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Join with a fixed number of decimals.
pub fn join_fixed(values: &[f64; MONTHS], decimals: usize) -> String {
    values
        .iter()
        .map(|v| format!("{v:.decimals$}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse a joined cell back into exactly nine values.
pub fn split<T>(raw: &str) -> Result<[T; MONTHS], String>
where
    T: FromStr,
    T::Err: Display,
{
    let values = raw
        .split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<T>()
                .map_err(|e| format!("invalid value '{part}': {e}"))
        })
        .collect::<Result<Vec<T>, String>>()?;
    let count = values.len();
    values
        .try_into()
        .map_err(|_| format!("expected {MONTHS} monthly values, found {count}"))
}

/// `#[serde(with = "cell::joined")]` for `[T; MONTHS]` fields.
pub mod joined {
    use super::*;

    pub fn serialize<T, S>(values: &[T; MONTHS], serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        serializer.serialize_str(&join(values))
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<[T; MONTHS], D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        split(&raw).map_err(D::Error::custom)
    }
}

/// Like [`joined`], but writes five decimals.
pub mod fixed5 {
    use super::*;

    pub fn serialize<S: Serializer>(
        values: &[f64; MONTHS],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&join_fixed(values, 5))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<[f64; MONTHS], D::Error> {
        let raw = String::deserialize(deserializer)?;
        split(&raw).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_and_split() {
        let weather: [u8; MONTHS] = [3, 1, 5, 2, 2, 4, 1, 1, 5];
        let cell = join(&weather);
        assert_eq!(cell, "3,1,5,2,2,4,1,1,5");
        assert_eq!(split::<u8>(&cell).unwrap(), weather);
    }

    #[test]
    fn test_fixed_decimals() {
        let gamma = [0.3, 0.123456, 1.0, 0.0, 0.5, 0.25, 0.333333, 0.7, 0.9];
        assert_eq!(
            join_fixed(&gamma, 5),
            "0.30000,0.12346,1.00000,0.00000,0.50000,0.25000,0.33333,0.70000,0.90000"
        );
    }

    #[test]
    fn test_split_rejects_wrong_length() {
        let err = split::<u32>("1,2,3").unwrap_err();
        assert!(err.contains("expected 9"));
        assert!(split::<u32>("1,2,3,4,5,6,7,8,x").is_err());
    }
}
