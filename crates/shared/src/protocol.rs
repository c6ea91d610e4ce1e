use std::fmt;

use serde::{
    de::{self, MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::domain::{FieldName, FIELD_COUNT};

/// Body of `POST /predict`: every field coerced to a number.
///
/// `NaN` values are emitted as JSON `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRequest {
    values: [f64; FIELD_COUNT],
}

impl TransactionRequest {
    pub fn from_values(values: [f64; FIELD_COUNT]) -> Self {
        Self { values }
    }

    pub fn get(&self, field: FieldName) -> f64 {
        self.values[field.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldName, f64)> + '_ {
        FieldName::all().map(move |field| (field, self.get(field)))
    }

    pub fn nan_fields(&self) -> Vec<FieldName> {
        self.iter()
            .filter(|(_, value)| value.is_nan())
            .map(|(field, _)| field)
            .collect()
    }
}

impl Serialize for TransactionRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FIELD_COUNT))?;
        for (field, value) in self.iter() {
            if value.is_finite() {
                map.serialize_entry(field.as_str(), &value)?;
            } else {
                map.serialize_entry(field.as_str(), &Option::<f64>::None)?;
            }
        }
        map.end()
    }
}

struct TransactionRequestVisitor;

impl<'de> Visitor<'de> for TransactionRequestVisitor {
    type Value = TransactionRequest;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "an object with exactly {FIELD_COUNT} transaction fields")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut values = [f64::NAN; FIELD_COUNT];
        let mut seen = [false; FIELD_COUNT];

        while let Some(field) = access.next_key::<FieldName>()? {
            if seen[field.index()] {
                return Err(de::Error::custom(format!("duplicate field `{field}`")));
            }
            seen[field.index()] = true;
            let value: Option<f64> = access.next_value()?;
            values[field.index()] = value.unwrap_or(f64::NAN);
        }

        if let Some(missing) = FieldName::all().find(|field| !seen[field.index()]) {
            return Err(de::Error::custom(format!("missing field `{missing}`")));
        }

        Ok(TransactionRequest::from_values(values))
    }
}

impl<'de> Deserialize<'de> for TransactionRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(TransactionRequestVisitor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultVariant {
    Fraud,
    NotFraud,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub prediction: String,
    pub is_fraud: i64,
    pub fraud_probability: String,
}

impl PredictionResult {
    /// Only a flag of exactly `1` counts as fraud.
    pub fn variant(&self) -> ResultVariant {
        if self.is_fraud == 1 {
            ResultVariant::Fraud
        } else {
            ResultVariant::NotFraud
        }
    }
}

/// Error reply the service sends with a success status when no model is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceErrorBody {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictResponseBody {
    Verdict(PredictionResult),
    Rejected(ServiceErrorBody),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
