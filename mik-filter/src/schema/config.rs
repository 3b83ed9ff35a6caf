//! Declared schemas loaded from TOML.
//!
//! The explicit alternative to `#[derive(Filterable)]` for schemas that are
//! only known at deploy time:
//!
//! ```
//! use mik_filter::SchemaConfig;
//!
//! let config = SchemaConfig::from_toml(r#"
//!     [[fields]]
//!     name = "age"
//!     type = "int32"
//!     nullable = true
//!     min = 0
//!
//!     [[fields]]
//!     name = "status"
//!     type = "string"
//!     one_of = ["active", "pending"]
//! "#).unwrap();
//!
//! let specs = config.into_specs().unwrap();
//! assert_eq!(specs.len(), 2);
//! assert_eq!(specs[0].rules.len(), 1);
//! ```

use super::FieldSpec;
use crate::{DataType, SchemaError, TimeFormat, Value, rules};
use serde::{Deserialize, Serialize};

/// A declared schema: an ordered list of fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaConfig {
    /// Declared fields.
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

/// One declared field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldConfig {
    /// Externally visible filter key.
    pub name: String,
    /// Type tag: `bool`, `int8`..`int64`, `uint8`..`uint64`, `float32`,
    /// `float64`, `string` or `timestamp`.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Accept `"nil"` / `"null"` as the absent value.
    #[serde(default)]
    pub nullable: bool,
    /// Timestamp input format (chrono strftime). RFC 3339 when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_format: Option<String>,
    /// Timestamp output format. Values stay timestamps when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_format: Option<String>,
    /// Lower bound, see [`rules::min`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Upper bound, see [`rules::max`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Maximum string length in characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_len: Option<usize>,
    /// Reject empty strings.
    #[serde(default)]
    pub not_empty: bool,
    /// Allowed values, written as they would appear in a query string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<String>>,
}

impl SchemaConfig {
    /// Deserialize a schema from a TOML document.
    pub fn from_toml(source: &str) -> Result<Self, SchemaError> {
        Ok(toml::from_str(source)?)
    }

    /// Build whitelist entries, in declaration order.
    pub fn into_specs(self) -> Result<Vec<FieldSpec>, SchemaError> {
        self.fields.into_iter().map(FieldConfig::into_spec).collect()
    }
}

impl FieldConfig {
    fn into_spec(self) -> Result<FieldSpec, SchemaError> {
        if self.name.is_empty() {
            return Err(SchemaError::EmptyName);
        }

        let mut data_type = self.base_type()?;
        if self.nullable {
            data_type = DataType::optional(data_type);
        }

        let mut spec = FieldSpec::new(self.name.clone(), data_type);
        if let Some(min) = self.min {
            spec = spec.rule(rules::min(min));
        }
        if let Some(max) = self.max {
            spec = spec.rule(rules::max(max));
        }
        if let Some(len) = self.max_len {
            spec = spec.rule(rules::max_len(len));
        }
        if self.not_empty {
            spec = spec.rule(rules::not_empty());
        }
        if let Some(literals) = &self.one_of {
            // Canonicalize through the field's own parser so comparisons match
            let allowed = literals
                .iter()
                .map(|literal| {
                    spec.data_type
                        .parse(&Value::String(literal.clone()))
                        .map_err(|source| SchemaError::InvalidValue {
                            field: self.name.clone(),
                            source,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            spec = spec.rule(rules::one_of(allowed));
        }

        Ok(spec)
    }

    fn base_type(&self) -> Result<DataType, SchemaError> {
        let data_type = match self.type_name.as_str() {
            "bool" | "boolean" => DataType::Bool,
            "int8" => DataType::int(8),
            "int16" => DataType::int(16),
            "int32" => DataType::int(32),
            "int64" | "int" => DataType::int(64),
            "uint8" => DataType::uint(8),
            "uint16" => DataType::uint(16),
            "uint32" => DataType::uint(32),
            "uint64" | "uint" => DataType::uint(64),
            "float32" => DataType::float(32),
            "float64" | "float" => DataType::float(64),
            "string" => DataType::String,
            "timestamp" => {
                return Ok(DataType::Timestamp(TimeFormat {
                    input: self.input_format.clone(),
                    output: self.output_format.clone(),
                }));
            },
            other => {
                return Err(SchemaError::UnknownType {
                    field: self.name.clone(),
                    type_name: other.to_string(),
                });
            },
        };

        if self.input_format.is_some() || self.output_format.is_some() {
            return Err(SchemaError::FormatOnNonTimestamp {
                field: self.name.clone(),
            });
        }
        Ok(data_type)
    }
}
