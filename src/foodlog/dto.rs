use serde::{Deserialize, Deserializer};
use time::OffsetDateTime;

/// Owner reference as the backend serializes it: either a bare id or an
/// embedded user document. Normalized through [`UserRef::id`] so the
/// rest of the crate never double-checks the shape.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    Id(String),
    Doc {
        #[serde(rename = "_id")]
        id: String,
    },
}

impl UserRef {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) | Self::Doc { id } => id,
        }
    }
}

/// One logged meal as persisted by the backend. Immutable; the client
/// only reads or appends. Macro fields are sanitized at the wire
/// boundary, so in memory they are always finite and non-negative.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodLogRecord {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(rename = "user")]
    pub owner: UserRef,
    #[serde(default)]
    pub food_name: String,
    #[serde(default, deserialize_with = "lenient_macro")]
    pub calories: f64,
    #[serde(default, deserialize_with = "lenient_macro")]
    pub protein: f64,
    #[serde(default, deserialize_with = "lenient_macro")]
    pub carbs: f64,
    #[serde(default, deserialize_with = "lenient_macro")]
    pub fat: f64,
    #[serde(default, rename = "createdAt", with = "time::serde::rfc3339::option")]
    pub logged_at: Option<OffsetDateTime>,
}

/// Accepts numbers, numeric strings, or garbage; anything that does not
/// come out as a finite non-negative number is coerced to 0.
fn lenient_macro<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(parsed.filter(|n| n.is_finite() && *n >= 0.0).unwrap_or(0.0))
}
