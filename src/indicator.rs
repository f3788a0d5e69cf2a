//! Indicator records exchanged with the API and the live update hub.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};

/// Opaque indicator identifier.
///
/// The API may send identifiers as JSON strings or numbers; both normalize to the
/// string form, which is also what the hub sends.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct IndicatorId(String);

impl IndicatorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for IndicatorId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IndicatorId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl<'de> Deserialize<'de> for IndicatorId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        display_string(value).map(IndicatorId).map_err(de::Error::custom)
    }
}

/// Position of a widget on the background canvas, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    #[serde(default, deserialize_with = "deserialize_coordinate")]
    pub x: i32,
    #[serde(default, deserialize_with = "deserialize_coordinate")]
    pub y: i32,
}

/// A named, positioned data point with a current value and optional history.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Indicator {
    pub id: IndicatorId,
    #[serde(default, deserialize_with = "deserialize_optional_display")]
    pub name: String,
    #[serde(flatten)]
    pub position: Position,
    #[serde(default, deserialize_with = "deserialize_optional_display")]
    pub value: String,
    #[serde(default, deserialize_with = "deserialize_optional_display")]
    pub unit: String,
    #[serde(default, deserialize_with = "deserialize_history")]
    pub indicator_values: Vec<String>,
}

impl Indicator {
    /// Builds the local record for an indicator the API just created.
    ///
    /// Freshly created indicators carry no history.
    pub fn created(id: IndicatorId, request: &NewIndicator) -> Self {
        Self {
            id,
            name: request.name.clone(),
            position: Position {
                x: request.x,
                y: request.y,
            },
            value: request.value.clone(),
            unit: request.unit.clone(),
            indicator_values: Vec::new(),
        }
    }
}

/// Request body for creating an indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewIndicator {
    pub name: String,
    pub description: String,
    pub x: i32,
    pub y: i32,
    pub value: String,
    pub unit: String,
}

impl NewIndicator {
    /// The description mirrors the name, as the dashboard has no separate field for it.
    pub fn new(name: String, value: String, unit: String, x: i32, y: i32) -> Self {
        Self {
            description: name.clone(),
            name,
            x,
            y,
            value,
            unit,
        }
    }
}

/// Normalizes a JSON scalar to the string shown on a widget.
pub fn display_string(value: Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Object(mut map) => match map.remove("value") {
            Some(inner) => display_string(inner),
            None => Err("object without a `value` field".to_string()),
        },
        other => Err(format!("expected a string or number, got {}", other)),
    }
}

fn deserialize_optional_display<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        value => display_string(value).map_err(de::Error::custom),
    }
}

/// Pixel coordinate: integers, floats (truncated) and numeric strings; null is 0.
fn deserialize_coordinate<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    let number = match Value::deserialize(deserializer)? {
        Value::Null => return Ok(0),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match number {
        Some(n) if n.is_finite() => Ok(n.trunc() as i32),
        _ => Err(de::Error::custom("expected a numeric coordinate")),
    }
}

fn deserialize_history<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .map(display_string)
            .collect::<Result<Vec<_>, _>>()
            .map_err(de::Error::custom),
        other => Err(de::Error::custom(format!(
            "expected an array of values, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_api_listing() {
        let json = r#"[
            {"id": 7, "name": "Temp", "x": 120, "y": 45, "value": "21,5", "unit": "C",
             "indicatorValues": ["20,0", "21,5"]},
            {"id": "b", "name": "Flow", "x": 0, "y": 0, "value": 3, "unit": null}
        ]"#;
        let indicators: Vec<Indicator> = serde_json::from_str(json).unwrap();

        assert_eq!(indicators.len(), 2);
        assert_eq!(indicators[0].id, IndicatorId::from("7"));
        assert_eq!(indicators[0].position, Position { x: 120, y: 45 });
        assert_eq!(indicators[0].indicator_values, vec!["20,0", "21,5"]);
        assert_eq!(indicators[1].value, "3");
        assert_eq!(indicators[1].unit, "");
        assert!(indicators[1].indicator_values.is_empty());
    }

    #[test]
    fn test_null_fields_do_not_fail_the_listing() {
        let json = r#"[
            {"id": 1, "name": null, "x": 120.0, "y": 45.7, "value": null, "unit": "C"},
            {"id": 2, "name": "Flow", "x": 8, "y": 16, "value": "3,5", "unit": "l"}
        ]"#;
        let indicators: Vec<Indicator> = serde_json::from_str(json).unwrap();

        assert_eq!(indicators.len(), 2);
        assert_eq!(indicators[0].name, "");
        assert_eq!(indicators[0].value, "");
        assert_eq!(indicators[0].position, Position { x: 120, y: 45 });
        assert_eq!(indicators[1].name, "Flow");
        assert_eq!(indicators[1].value, "3,5");
        assert_eq!(indicators[1].position, Position { x: 8, y: 16 });
    }

    #[test]
    fn test_history_entries_may_be_value_objects() {
        let json = r#"{"id": 1, "name": "P", "x": 1, "y": 2, "value": "1", "unit": "bar",
            "indicatorValues": [{"value": "1,0"}, {"value": 2.5}]}"#;
        let indicator: Indicator = serde_json::from_str(json).unwrap();
        assert_eq!(indicator.indicator_values, vec!["1,0", "2.5"]);
    }

    #[test]
    fn test_new_indicator_body_uses_name_as_description() {
        let body = NewIndicator::new("Level".into(), "4,2".into(), "m".into(), 10, 20);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Level", "description": "Level", "x": 10, "y": 20,
                "value": "4,2", "unit": "m"
            })
        );
    }
}
