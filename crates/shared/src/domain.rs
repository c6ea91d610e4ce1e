use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{error::UnknownField, protocol::TransactionRequest};

pub const FIELD_COUNT: usize = 30;

/// Wire order expected by the prediction service.
const FIELD_NAMES: [&str; FIELD_COUNT] = [
    "Time", "V1", "V2", "V3", "V4", "V5", "V6", "V7", "V8", "V9", "V10", "V11", "V12", "V13",
    "V14", "V15", "V16", "V17", "V18", "V19", "V20", "V21", "V22", "V23", "V24", "V25", "V26",
    "V27", "V28", "Amount",
];

/// One of the 30 recognized transaction attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldName(u8);

impl FieldName {
    pub const TIME: Self = Self(0);
    pub const AMOUNT: Self = Self(FIELD_COUNT as u8 - 1);

    /// `V1`..`V28`; `None` outside that range.
    pub fn v(n: u8) -> Option<Self> {
        (1..=28).contains(&n).then_some(Self(n))
    }

    /// All fields in wire order (`Time`, `V1`..`V28`, `Amount`).
    pub fn all() -> impl Iterator<Item = Self> {
        (0..FIELD_COUNT as u8).map(Self)
    }

    /// All fields in the order the form lays them out (`Time`, `Amount`, `V1`..`V28`).
    pub fn form_order() -> impl Iterator<Item = Self> {
        [Self::TIME, Self::AMOUNT]
            .into_iter()
            .chain((1..=28).map(Self))
    }

    pub fn as_str(self) -> &'static str {
        FIELD_NAMES[self.index()]
    }

    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = UnknownField;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        FIELD_NAMES
            .iter()
            .position(|candidate| *candidate == name)
            .map(|idx| Self(idx as u8))
            .ok_or_else(|| UnknownField::new(name))
    }
}

impl Serialize for FieldName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Converts raw form text the way a number input is read on submit.
///
/// Surrounding whitespace is ignored. Empty or non-numeric text yields `NaN`,
/// which is passed through to the request unchanged. `inf`, `infinity` and
/// out-of-range literals such as `1e999` are not numbers to a form input and
/// also yield `NaN`, so a coerced value is either finite or `NaN`.
pub fn coerce_field_value(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return f64::NAN;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(f64::NAN)
}

/// Live text of every form input. All 30 keys are always present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    values: [String; FIELD_COUNT],
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: FieldName) -> &str {
        &self.values[field.index()]
    }

    pub fn set(&mut self, field: FieldName, raw: impl Into<String>) {
        self.values[field.index()] = raw.into();
    }

    pub fn set_named(&mut self, name: &str, raw: impl Into<String>) -> Result<(), UnknownField> {
        let field = name.parse::<FieldName>()?;
        self.set(field, raw);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &str)> {
        FieldName::all().map(move |field| (field, self.get(field)))
    }

    /// Fields whose text would coerce to `NaN`.
    pub fn invalid_fields(&self) -> Vec<FieldName> {
        self.iter()
            .filter(|(_, raw)| coerce_field_value(raw).is_nan())
            .map(|(field, _)| field)
            .collect()
    }

    pub fn to_request(&self) -> TransactionRequest {
        let mut values = [0.0; FIELD_COUNT];
        for (field, raw) in self.iter() {
            values[field.index()] = coerce_field_value(raw);
        }
        TransactionRequest::from_values(values)
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
