//! Schema introspection: from a record description to a field whitelist.
//!
//! A record is described by a [`Shape`], usually generated with
//! `#[derive(Filterable)]`:
//!
//! ```
//! use mik_filter::{Filterable, field_specs};
//!
//! #[derive(Filterable)]
//! struct User {
//!     id: u64,
//!     #[filter(rename = "user_name")]
//!     name: String,
//!     #[filter(skip)]
//!     password_hash: String,
//!     nickname: Option<String>,
//!     tags: Vec<String>,
//! }
//!
//! let names: Vec<_> = field_specs::<User>().into_iter().map(|s| s.name).collect();
//! assert_eq!(names, ["id", "user_name", "nickname"]);
//! ```
//!
//! Fields of unrecognized kinds (`tags` above) are never filterable.

mod config;

pub use config::{FieldConfig, SchemaConfig};

use crate::{DataType, Rule, TimeFormat};
use std::fmt;
use std::sync::Arc;

/// Primitive kind of a record field, as declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// `bool`.
    Bool,
    /// Signed integer of the given bit width.
    Int(u32),
    /// Unsigned integer of the given bit width.
    Uint(u32),
    /// Float of the given bit width.
    Float(u32),
    /// `String` or `&str`.
    String,
    /// `DateTime<_>`.
    Timestamp,
    /// A nullable wrapper (`Option<T>`).
    Nullable(Box<FieldKind>),
    /// Anything else: nested records, sequences, maps, unknown types.
    Other(String),
}

/// One declared field of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// The field's own identifier.
    pub ident: String,
    /// Externally visible name override.
    pub rename: Option<String>,
    /// Excluded from filtering.
    pub skip: bool,
    /// Declared kind.
    pub kind: FieldKind,
    /// Formats for timestamp fields; RFC 3339 when unset.
    pub time_format: Option<TimeFormat>,
}

impl FieldDescriptor {
    /// A field with no overrides.
    pub fn new(ident: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            ident: ident.into(),
            rename: None,
            skip: false,
            kind,
            time_format: None,
        }
    }

    /// Override the externally visible name.
    #[must_use]
    pub fn rename(mut self, name: impl Into<String>) -> Self {
        self.rename = Some(name.into());
        self
    }

    /// Exclude the field.
    #[must_use]
    pub const fn skip(mut self) -> Self {
        self.skip = true;
        self
    }

    /// Set timestamp formats.
    #[must_use]
    pub fn time_format(mut self, format: TimeFormat) -> Self {
        self.time_format = Some(format);
        self
    }

    /// Effective filter key: the override if present and non-empty, else the identifier.
    pub fn name(&self) -> &str {
        match self.rename.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.ident,
        }
    }
}

/// Structural description of a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// A record with ordered, named fields.
    Record(Vec<FieldDescriptor>),
    /// A single primitive value.
    Scalar(FieldKind),
    /// A list of values.
    Sequence,
    /// A key/value map.
    Map,
}

impl Shape {
    const fn kind_name(&self) -> &'static str {
        match self {
            Self::Record(_) => "record",
            Self::Scalar(_) => "scalar",
            Self::Sequence => "sequence",
            Self::Map => "map",
        }
    }
}

/// Types that can describe their own shape.
///
/// Implement with `#[derive(Filterable)]`.
pub trait Filterable {
    /// Structural description of `Self`.
    fn shape() -> Shape;
}

/// A whitelisted field: its name, its type and the rules its values must pass.
#[derive(Clone)]
pub struct FieldSpec {
    /// Externally visible filter key.
    pub name: String,
    /// Operator gate and parser.
    pub data_type: DataType,
    /// Checks run on every parsed operand, in order.
    pub rules: Vec<Arc<dyn Rule>>,
}

impl FieldSpec {
    /// A field with no rules.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            rules: Vec::new(),
        }
    }

    /// Attach a rule. Rules run in the order they were attached.
    #[must_use]
    pub fn rule(mut self, rule: Arc<dyn Rule>) -> Self {
        self.rules.push(rule);
        self
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("data_type", &self.data_type)
            .field("rules", &self.rules.len())
            .finish()
    }
}

/// Derive the whitelist entries of a record shape.
///
/// Skipped fields and fields of unrecognized kinds produce no entry. Every
/// entry starts with no rules.
///
/// # Panics
///
/// Panics if `shape` is not a [`Shape::Record`]. Describing a non-record
/// type as a filter schema is a programming error, not bad input.
pub fn introspect(shape: &Shape) -> Vec<FieldSpec> {
    let Shape::Record(fields) = shape else {
        panic!(
            "filter schema must be a record, got a {}",
            shape.kind_name()
        );
    };

    fields
        .iter()
        .filter(|field| !field.skip)
        .filter_map(|field| {
            let data_type = data_type_of(&field.kind, field.time_format.as_ref())?;
            Some(FieldSpec::new(field.name(), data_type))
        })
        .collect()
}

/// Whitelist entries of a [`Filterable`] type.
pub fn field_specs<T: Filterable>() -> Vec<FieldSpec> {
    introspect(&T::shape())
}

fn data_type_of(kind: &FieldKind, time_format: Option<&TimeFormat>) -> Option<DataType> {
    if let FieldKind::Nullable(inner) = kind {
        // One level only: Option<Option<T>> is not filterable
        return primitive_type(inner, time_format).map(DataType::optional);
    }
    primitive_type(kind, time_format)
}

fn primitive_type(kind: &FieldKind, time_format: Option<&TimeFormat>) -> Option<DataType> {
    use crate::datatype::{FloatWidth, Width};

    Some(match kind {
        FieldKind::Bool => DataType::Bool,
        FieldKind::Int(bits) => DataType::Int(Width::from_bits(*bits)?),
        FieldKind::Uint(bits) => DataType::Uint(Width::from_bits(*bits)?),
        FieldKind::Float(bits) => DataType::Float(FloatWidth::from_bits(*bits)?),
        FieldKind::String => DataType::String,
        FieldKind::Timestamp => DataType::Timestamp(time_format.cloned().unwrap_or_default()),
        FieldKind::Nullable(_) | FieldKind::Other(_) => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: Vec<FieldDescriptor>) -> Shape {
        Shape::Record(fields)
    }

    #[test]
    fn test_introspect_recognized_kinds() {
        let specs = introspect(&record(vec![
            FieldDescriptor::new("active", FieldKind::Bool),
            FieldDescriptor::new("age", FieldKind::Int(32)),
            FieldDescriptor::new("count", FieldKind::Uint(64)),
            FieldDescriptor::new("score", FieldKind::Float(32)),
            FieldDescriptor::new("name", FieldKind::String),
            FieldDescriptor::new("created", FieldKind::Timestamp),
        ]));

        let types: Vec<_> = specs.iter().map(|s| s.data_type.clone()).collect();
        assert_eq!(
            types,
            [
                DataType::Bool,
                DataType::int(32),
                DataType::uint(64),
                DataType::float(32),
                DataType::String,
                DataType::timestamp(),
            ]
        );
        assert!(specs.iter().all(|s| s.rules.is_empty()));
    }

    #[test]
    fn test_introspect_preserves_order_and_names() {
        let specs = introspect(&record(vec![
            FieldDescriptor::new("b", FieldKind::Bool),
            FieldDescriptor::new("a", FieldKind::String).rename("alias"),
            FieldDescriptor::new("c", FieldKind::String).rename(""),
        ]));
        let names: Vec<_> = specs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["b", "alias", "c"]);
    }

    #[test]
    fn test_introspect_skips() {
        let specs = introspect(&record(vec![
            FieldDescriptor::new("secret", FieldKind::String).skip(),
            FieldDescriptor::new("nested", FieldKind::Other("Address".into())),
            FieldDescriptor::new("bad_width", FieldKind::Int(12)),
            FieldDescriptor::new("kept", FieldKind::Bool),
        ]));
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].name, "kept");
    }

    #[test]
    fn test_introspect_nullable_once() {
        let specs = introspect(&record(vec![
            FieldDescriptor::new(
                "maybe",
                FieldKind::Nullable(Box::new(FieldKind::Int(64))),
            ),
            FieldDescriptor::new(
                "twice",
                FieldKind::Nullable(Box::new(FieldKind::Nullable(Box::new(
                    FieldKind::Int(64),
                )))),
            ),
            FieldDescriptor::new(
                "opt_other",
                FieldKind::Nullable(Box::new(FieldKind::Other("Vec".into()))),
            ),
        ]));
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].name, "maybe");
        assert_eq!(specs[0].data_type, DataType::optional(DataType::int(64)));
    }

    #[test]
    fn test_introspect_time_format() {
        let format = TimeFormat::rfc3339().output("%Y-%m-%d");
        let specs = introspect(&record(vec![
            FieldDescriptor::new("day", FieldKind::Timestamp).time_format(format.clone()),
        ]));
        assert_eq!(specs[0].data_type, DataType::Timestamp(format));
    }

    #[test]
    fn test_introspect_empty_record() {
        assert!(introspect(&record(vec![])).is_empty());
    }

    #[test]
    #[should_panic(expected = "filter schema must be a record, got a scalar")]
    fn test_introspect_scalar_panics() {
        let _ = introspect(&Shape::Scalar(FieldKind::String));
    }

    #[test]
    #[should_panic(expected = "got a sequence")]
    fn test_introspect_sequence_panics() {
        let _ = introspect(&Shape::Sequence);
    }

    #[test]
    fn test_field_spec_debug_hides_rules() {
        let spec = FieldSpec::new("age", DataType::int(8)).rule(crate::rules::min(0));
        let debug = format!("{spec:?}");
        assert!(debug.contains("\"age\""));
        assert!(debug.contains("rules: 1"));
    }
}
