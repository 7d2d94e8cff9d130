/*!
 * Property parameters.
 *
 * Parameters come from the item metadata configuration on discovery and from
 * the endpoint cookie on directives. Both go through the same typed parsing, a
 * malformed value is treated as absent.
 */
use std::collections::BTreeMap;

use serde_json::{Map, Number, Value};
use tracing::debug;

/// Parameter names
pub mod names {
    /// Invert the item state
    pub const INVERTED: &str = "inverted";
    /// Temperature scale
    pub const SCALE: &str = "scale";
    /// Thermostat setpoint range
    pub const SETPOINT_RANGE: &str = "setpointRange";
    /// Supported modes
    pub const SUPPORTED_MODES: &str = "supportedModes";
    /// Ordered modes
    pub const ORDERED: &str = "ordered";
    /// Non controllable capability
    pub const NON_CONTROLLABLE: &str = "nonControllable";
    /// Capability friendly names
    pub const CAPABILITY_NAMES: &str = "capabilityNames";
    /// Alias of capability friendly names
    pub const FRIENDLY_NAMES: &str = "friendlyNames";
    /// Semantic action mappings
    pub const ACTION_MAPPINGS: &str = "actionMappings";
    /// Semantic state mappings
    pub const STATE_MAPPINGS: &str = "stateMappings";
    /// Supported range
    pub const SUPPORTED_RANGE: &str = "supportedRange";
    /// Range presets
    pub const PRESETS: &str = "presets";
    /// Unit of measure
    pub const UNIT_OF_MEASURE: &str = "unitOfMeasure";
    /// Volume adjustment increment
    pub const INCREMENT: &str = "increment";
    /// Property correlation tag
    pub const TAG: &str = "tag";
}

/// Parameter value types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterType {
    /// Boolean (true/false)
    Boolean,
    /// Integer number
    Integer,
    /// Floating point number
    Float,
    /// Free text
    String,
    /// One of a fixed set of values, matched case insensitively
    Enum(&'static [&'static str]),
    /// List of strings, comma separated when given as text
    List,
    /// Ordered key/value pairs, `key=value` comma separated when given as text,
    /// `[key, value]` pairs when given as an array
    Map,
    /// List of numbers, colon separated when given as text
    Range,
}

/// A typed parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// Text value
    String(String),
    /// List value
    List(Vec<String>),
    /// Ordered map value
    Map(Vec<(String, String)>),
    /// Range value
    Range(Vec<f64>),
}

impl ParameterType {
    /// Parse a raw configuration value into a typed value
    ///
    /// # Returns
    ///
    /// The typed value, or `None` if the raw value is malformed
    pub fn parse(&self, raw: &Value) -> Option<ParameterValue> {
        match self {
            ParameterType::Boolean => match raw {
                Value::Bool(b) => Some(ParameterValue::Boolean(*b)),
                Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                    "true" => Some(ParameterValue::Boolean(true)),
                    "false" => Some(ParameterValue::Boolean(false)),
                    _ => None,
                },
                _ => None,
            },
            ParameterType::Integer => match raw {
                Value::Number(n) => n.as_i64().map(ParameterValue::Integer),
                Value::String(s) => s.trim().parse().ok().map(ParameterValue::Integer),
                _ => None,
            },
            ParameterType::Float => match raw {
                Value::Number(n) => n.as_f64().map(ParameterValue::Float),
                Value::String(s) => parse_finite(s).map(ParameterValue::Float),
                _ => None,
            },
            ParameterType::String => match raw {
                Value::String(s) if !s.trim().is_empty() => {
                    Some(ParameterValue::String(s.trim().to_string()))
                }
                Value::Number(n) => Some(ParameterValue::String(n.to_string())),
                _ => None,
            },
            ParameterType::Enum(values) => {
                let s = raw.as_str()?.trim();
                values
                    .iter()
                    .find(|value| value.eq_ignore_ascii_case(s))
                    .map(|value| ParameterValue::String(value.to_string()))
            }
            ParameterType::List => {
                let list: Vec<String> = match raw {
                    Value::Array(values) => values
                        .iter()
                        .filter_map(|value| match value {
                            Value::String(s) => Some(s.trim().to_string()),
                            Value::Number(n) => Some(n.to_string()),
                            _ => None,
                        })
                        .collect(),
                    Value::String(s) => s.split(',').map(|s| s.trim().to_string()).collect(),
                    _ => return None,
                };
                let list: Vec<String> = list.into_iter().filter(|s| !s.is_empty()).collect();
                (!list.is_empty()).then_some(ParameterValue::List(list))
            }
            ParameterType::Map => {
                let map: Vec<(String, String)> = match raw {
                    Value::Object(object) => object
                        .iter()
                        .filter_map(|(key, value)| match value {
                            Value::String(s) => Some((key.trim().to_string(), s.trim().to_string())),
                            Value::Number(n) => Some((key.trim().to_string(), n.to_string())),
                            _ => None,
                        })
                        .collect(),
                    Value::Array(values) => values
                        .iter()
                        .filter_map(|value| match value {
                            Value::String(s) => parse_map_entry(s),
                            Value::Array(pair) => match pair.as_slice() {
                                [Value::String(key), Value::String(value)] if !key.is_empty() => {
                                    Some((key.clone(), value.clone()))
                                }
                                _ => None,
                            },
                            _ => None,
                        })
                        .collect(),
                    Value::String(s) => s.split(',').filter_map(parse_map_entry).collect(),
                    _ => return None,
                };
                (!map.is_empty()).then_some(ParameterValue::Map(map))
            }
            ParameterType::Range => {
                let range: Option<Vec<f64>> = match raw {
                    Value::Array(values) => values
                        .iter()
                        .map(|value| match value {
                            Value::Number(n) => n.as_f64(),
                            Value::String(s) => parse_finite(s),
                            _ => None,
                        })
                        .collect(),
                    Value::String(s) => s.split(':').map(parse_finite).collect(),
                    _ => None,
                };
                range
                    .filter(|range| !range.is_empty())
                    .map(ParameterValue::Range)
            }
        }
    }
}

/// Parse a finite number, `inf` and `NaN` cannot be serialized
fn parse_finite(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}

fn parse_map_entry(entry: &str) -> Option<(String, String)> {
    let (key, value) = entry.split_once('=')?;
    let (key, value) = (key.trim(), value.trim());
    (!key.is_empty() && !value.is_empty()).then(|| (key.to_string(), value.to_string()))
}

impl ParameterValue {
    /// Convert to the serialized cookie representation
    pub fn to_json(&self) -> Value {
        match self {
            ParameterValue::Boolean(b) => Value::Bool(*b),
            ParameterValue::Integer(i) => Value::from(*i),
            ParameterValue::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
            ParameterValue::String(s) => Value::String(s.clone()),
            ParameterValue::List(list) => Value::from(list.clone()),
            ParameterValue::Map(map) => Value::Array(
                map.iter()
                    .map(|(key, value)| Value::from(vec![key.clone(), value.clone()]))
                    .collect(),
            ),
            ParameterValue::Range(range) => Value::Array(
                range
                    .iter()
                    .filter_map(|f| Number::from_f64(*f))
                    .map(Value::Number)
                    .collect(),
            ),
        }
    }
}

/// A set of typed parameters keyed by name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters(BTreeMap<String, ParameterValue>);

impl Parameters {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse raw configuration against the supported parameter types
    ///
    /// Unknown parameters are ignored, malformed ones are dropped.
    ///
    /// # Arguments
    ///
    /// * `raw` - The raw configuration map
    /// * `supported` - The supported parameter names and types
    pub fn parse(raw: &Map<String, Value>, supported: &[(&str, ParameterType)]) -> Self {
        let mut parameters = Self::new();

        for (name, parameter_type) in supported {
            let Some(value) = raw.get(*name) else {
                continue;
            };
            match parameter_type.parse(value) {
                Some(value) => {
                    parameters.0.insert(name.to_string(), value);
                }
                None => debug!("Ignoring malformed parameter {}: {}", name, value),
            }
        }

        parameters
    }

    /// Get a parameter value
    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.0.get(name)
    }

    /// Set a parameter value
    pub fn set<S: Into<String>>(&mut self, name: S, value: ParameterValue) {
        self.0.insert(name.into(), value);
    }

    /// Remove a parameter value
    pub fn remove(&mut self, name: &str) -> Option<ParameterValue> {
        self.0.remove(name)
    }

    /// Check if a parameter is set
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Get a boolean parameter
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            ParameterValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get a numeric parameter
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            ParameterValue::Integer(i) => Some(*i as f64),
            ParameterValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get a text parameter
    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            ParameterValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get a list parameter
    pub fn get_list(&self, name: &str) -> Option<&[String]> {
        match self.get(name)? {
            ParameterValue::List(list) => Some(list),
            _ => None,
        }
    }

    /// Get a map parameter
    pub fn get_map(&self, name: &str) -> Option<&[(String, String)]> {
        match self.get(name)? {
            ParameterValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Get a range parameter
    pub fn get_range(&self, name: &str) -> Option<&[f64]> {
        match self.get(name)? {
            ParameterValue::Range(range) => Some(range),
            _ => None,
        }
    }

    /// Check if no parameter is set
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Convert to the serialized cookie representation
    pub fn to_json(&self) -> Map<String, Value> {
        self.0
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SUPPORTED: &[(&str, ParameterType)] = &[
        (names::INVERTED, ParameterType::Boolean),
        (names::SCALE, ParameterType::Enum(&["Celsius", "Fahrenheit"])),
        (names::CAPABILITY_NAMES, ParameterType::List),
        (names::ACTION_MAPPINGS, ParameterType::Map),
        (names::SUPPORTED_RANGE, ParameterType::Range),
        (names::INCREMENT, ParameterType::Integer),
    ];

    #[test]
    fn test_parse_from_metadata_config() {
        let raw = json!({
            "inverted": "true",
            "scale": "fahrenheit",
            "capabilityNames": "@Setting.Oscillate, Rotate",
            "actionMappings": "Close=0,Open=100,Broken",
            "supportedRange": "0:100:-5",
            "unknown": "ignored"
        });
        let parameters = Parameters::parse(raw.as_object().unwrap(), SUPPORTED);

        assert_eq!(parameters.get_bool(names::INVERTED), Some(true));
        assert_eq!(parameters.get_str(names::SCALE), Some("Fahrenheit"));
        assert_eq!(
            parameters.get_list(names::CAPABILITY_NAMES).unwrap(),
            ["@Setting.Oscillate", "Rotate"]
        );
        assert_eq!(
            parameters.get_map(names::ACTION_MAPPINGS).unwrap(),
            [("Close".to_string(), "0".to_string()), ("Open".to_string(), "100".to_string())]
        );
        assert_eq!(parameters.get_range(names::SUPPORTED_RANGE).unwrap(), [0.0, 100.0, -5.0]);
        assert!(!parameters.contains("unknown"));
    }

    #[test]
    fn test_malformed_values_are_absent() {
        let raw = json!({
            "inverted": "maybe",
            "scale": "Kelvin",
            "supportedRange": "0:inf:1",
            "increment": "ten"
        });
        let parameters = Parameters::parse(raw.as_object().unwrap(), SUPPORTED);
        assert!(parameters.is_empty());
    }

    #[test]
    fn test_cookie_representation() {
        let raw = json!({
            "inverted": true,
            "capabilityNames": ["Light"],
            "actionMappings": {"TurnOff": "0", "TurnOn": "2"},
            "supportedRange": [1, 10, 1]
        });
        let parameters = Parameters::parse(raw.as_object().unwrap(), SUPPORTED);
        let json = Value::Object(parameters.to_json());

        assert_eq!(json["actionMappings"], json!([["TurnOff", "0"], ["TurnOn", "2"]]));
        assert_eq!(json["capabilityNames"], json!(["Light"]));
        assert_eq!(json["supportedRange"], json!([1.0, 10.0, 1.0]));

        let restored = Parameters::parse(json.as_object().unwrap(), SUPPORTED);
        assert_eq!(restored, parameters);
    }

    #[test]
    fn test_map_pairs_keep_separators() {
        let map = vec![
            ("Normal".to_string(), "Normal, Quick".to_string()),
            ("a=b".to_string(), "x=y,z".to_string()),
        ];
        let mut parameters = Parameters::new();
        parameters.set(names::ACTION_MAPPINGS, ParameterValue::Map(map.clone()));

        let json = Value::Object(parameters.to_json());
        let restored = Parameters::parse(json.as_object().unwrap(), SUPPORTED);
        assert_eq!(restored.get_map(names::ACTION_MAPPINGS).unwrap(), map.as_slice());
    }

    #[test]
    fn test_non_finite_numbers_are_absent() {
        let raw = json!({"supportedRange": "0:NaN:1"});
        assert!(Parameters::parse(raw.as_object().unwrap(), SUPPORTED).is_empty());

        let raw = json!({"supportedRange": ["0", "inf", "1"]});
        assert!(Parameters::parse(raw.as_object().unwrap(), SUPPORTED).is_empty());
    }
}
