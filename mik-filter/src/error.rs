//! Error types.
//!
//! Untrusted filter input never produces an error at the public surface: a
//! [`ValueError`] only explains (in logs) why a comparison was dropped.
//! [`SchemaError`] covers declared schemas, which come from trusted config.

use thiserror::Error;

/// Why a raw value could not be parsed into a field's canonical form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValueError {
    /// The value has a type the field never accepts.
    #[error("expected {expected}, got {found}")]
    TypeMismatch {
        /// The field's data type (e.g. "int32").
        expected: String,
        /// The received value type (e.g. "array").
        found: &'static str,
    },

    /// Text that does not parse as the field's type.
    #[error("invalid {expected} value `{input}`")]
    InvalidFormat {
        /// The field's data type.
        expected: String,
        /// The rejected input.
        input: String,
    },

    /// A number outside the field's declared width.
    #[error("value `{input}` out of range for {expected}")]
    OutOfRange {
        /// The field's data type.
        expected: String,
        /// The rejected input.
        input: String,
    },
}

/// Errors from loading a declared schema.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SchemaError {
    /// The TOML document could not be deserialized.
    #[error("invalid schema document: {0}")]
    Toml(#[from] toml::de::Error),

    /// A field was declared with an empty name.
    #[error("field name cannot be empty")]
    EmptyName,

    /// A field was declared with a type tag that is not recognized.
    #[error("field `{field}` has unknown type `{type_name}`")]
    UnknownType {
        /// The field name.
        field: String,
        /// The unrecognized type tag.
        type_name: String,
    },

    /// A declared literal (e.g. in `one_of`) does not parse as the field's type.
    #[error("field `{field}` declares an invalid value: {source}")]
    InvalidValue {
        /// The field name.
        field: String,
        /// Why the literal was rejected.
        source: ValueError,
    },

    /// `input_format` / `output_format` on a field that is not a timestamp.
    #[error("field `{field}` sets a time format but is not a timestamp")]
    FormatOnNonTimestamp {
        /// The field name.
        field: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_error_display() {
        let err = ValueError::TypeMismatch {
            expected: "string".into(),
            found: "integer",
        };
        assert_eq!(err.to_string(), "expected string, got integer");

        let err = ValueError::InvalidFormat {
            expected: "int32".into(),
            input: "abc".into(),
        };
        assert_eq!(err.to_string(), "invalid int32 value `abc`");

        let err = ValueError::OutOfRange {
            expected: "uint8".into(),
            input: "300".into(),
        };
        assert_eq!(err.to_string(), "value `300` out of range for uint8");
    }

    #[test]
    fn test_schema_error_display() {
        let err = SchemaError::UnknownType {
            field: "age".into(),
            type_name: "decimal".into(),
        };
        assert_eq!(err.to_string(), "field `age` has unknown type `decimal`");

        let err = SchemaError::FormatOnNonTimestamp {
            field: "name".into(),
        };
        assert!(err.to_string().contains("`name`"));
        assert_eq!(SchemaError::EmptyName.to_string(), "field name cannot be empty");
    }
}
