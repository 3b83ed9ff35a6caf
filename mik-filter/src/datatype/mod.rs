//! Value-type handlers for whitelisted fields.
//!
//! A [`DataType`] answers two questions about a field:
//! - is this [`Operator`] meaningful for it ([`DataType::is_operator_allowed`])
//! - can this raw [`Value`] be coerced into its canonical form ([`DataType::parse`])
//!
//! | Type | Allowed operators |
//! |------|-------------------|
//! | `Bool` | `Eq`, `In` |
//! | `Int` / `Uint` / `Float` / `Timestamp` | `Eq`, `Gt`, `Gte`, `Lt`, `Lte`, `In` |
//! | `String` | `Eq`, `Like`, `ILike`, `In` |
//! | `Optional(T)` | same as `T` |
//!
//! Every other operator is rejected for every type.

mod parse;
mod time;

pub use time::TimeFormat;

use crate::{Operator, Value, ValueError};
use std::fmt;

/// Integer bit width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Width {
    /// 8 bits.
    W8,
    /// 16 bits.
    W16,
    /// 32 bits.
    W32,
    /// 64 bits.
    W64,
}

impl Width {
    /// Width from a bit count (8, 16, 32 or 64).
    #[must_use]
    pub const fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            8 => Some(Self::W8),
            16 => Some(Self::W16),
            32 => Some(Self::W32),
            64 => Some(Self::W64),
            _ => None,
        }
    }

    /// Number of bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            Self::W8 => 8,
            Self::W16 => 16,
            Self::W32 => 32,
            Self::W64 => 64,
        }
    }

    pub(crate) const fn fits_signed(self, n: i64) -> bool {
        match self {
            Self::W8 => n >= i8::MIN as i64 && n <= i8::MAX as i64,
            Self::W16 => n >= i16::MIN as i64 && n <= i16::MAX as i64,
            Self::W32 => n >= i32::MIN as i64 && n <= i32::MAX as i64,
            Self::W64 => true,
        }
    }

    pub(crate) const fn fits_unsigned(self, n: u64) -> bool {
        match self {
            Self::W8 => n <= u8::MAX as u64,
            Self::W16 => n <= u16::MAX as u64,
            Self::W32 => n <= u32::MAX as u64,
            Self::W64 => true,
        }
    }
}

/// Floating point bit width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatWidth {
    /// Single precision.
    F32,
    /// Double precision.
    F64,
}

impl FloatWidth {
    /// Width from a bit count (32 or 64).
    #[must_use]
    pub const fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            32 => Some(Self::F32),
            64 => Some(Self::F64),
            _ => None,
        }
    }

    /// Number of bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            Self::F32 => 32,
            Self::F64 => 64,
        }
    }
}

/// The type of a whitelisted field.
///
/// `Optional` never wraps another `Optional`; build it with
/// [`DataType::optional`] to keep that invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    /// `true` / `false`, also `yes` / `no` / `y` / `n`.
    Bool,
    /// Signed integer of a fixed width.
    Int(Width),
    /// Unsigned integer of a fixed width.
    Uint(Width),
    /// Floating point number.
    Float(FloatWidth),
    /// Free text.
    String,
    /// Point in time.
    Timestamp(TimeFormat),
    /// Nullable wrapper.
    Optional(Box<DataType>),
}

impl DataType {
    /// Wrap `inner` so that `"nil"`, `"null"` and `Value::Null` are accepted.
    ///
    /// An already optional type is returned unchanged.
    ///
    /// ```
    /// use mik_filter::DataType;
    ///
    /// let once = DataType::optional(DataType::String);
    /// let twice = DataType::optional(once.clone());
    /// assert_eq!(once, twice);
    /// ```
    #[must_use]
    pub fn optional(inner: Self) -> Self {
        match inner {
            Self::Optional(_) => inner,
            other => Self::Optional(Box::new(other)),
        }
    }

    /// Signed integer of `bits` width.
    ///
    /// # Panics
    ///
    /// Panics if `bits` is not 8, 16, 32 or 64.
    #[must_use]
    pub fn int(bits: u32) -> Self {
        match Width::from_bits(bits) {
            Some(w) => Self::Int(w),
            None => panic!("invalid integer width: {bits}"),
        }
    }

    /// Unsigned integer of `bits` width.
    ///
    /// # Panics
    ///
    /// Panics if `bits` is not 8, 16, 32 or 64.
    #[must_use]
    pub fn uint(bits: u32) -> Self {
        match Width::from_bits(bits) {
            Some(w) => Self::Uint(w),
            None => panic!("invalid integer width: {bits}"),
        }
    }

    /// Float of `bits` width.
    ///
    /// # Panics
    ///
    /// Panics if `bits` is not 32 or 64.
    #[must_use]
    pub fn float(bits: u32) -> Self {
        match FloatWidth::from_bits(bits) {
            Some(w) => Self::Float(w),
            None => panic!("invalid float width: {bits}"),
        }
    }

    /// Timestamp parsed as RFC 3339, kept as a timestamp value.
    #[must_use]
    pub fn timestamp() -> Self {
        Self::Timestamp(TimeFormat::default())
    }

    /// Returns `true` for `Optional`.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_))
    }

    /// Whether `op` is meaningful for this type.
    #[must_use]
    pub fn is_operator_allowed(&self, op: Operator) -> bool {
        use Operator::{Eq, Gt, Gte, ILike, In, Like, Lt, Lte};

        match self {
            Self::Bool => matches!(op, Eq | In),
            Self::Int(_) | Self::Uint(_) | Self::Float(_) | Self::Timestamp(_) => {
                matches!(op, Eq | Gt | Gte | Lt | Lte | In)
            },
            Self::String => matches!(op, Eq | Like | ILike | In),
            Self::Optional(inner) => inner.is_operator_allowed(op),
        }
    }

    /// Coerce `raw` into this type's canonical value.
    ///
    /// ```
    /// use mik_filter::{DataType, Value};
    ///
    /// let dt = DataType::int(32);
    /// assert_eq!(dt.parse(&"42".into()), Ok(Value::Int(42)));
    /// assert!(dt.parse(&"abc".into()).is_err());
    /// ```
    pub fn parse(&self, raw: &Value) -> Result<Value, ValueError> {
        match self {
            Self::Bool => parse::boolean(raw),
            Self::Int(w) => parse::signed(raw, *w, self),
            Self::Uint(w) => parse::unsigned(raw, *w, self),
            Self::Float(w) => parse::float(raw, *w, self),
            Self::String => parse::string(raw),
            Self::Timestamp(format) => parse::timestamp(raw, format, self),
            Self::Optional(inner) => match raw {
                Value::Null => Ok(Value::Null),
                Value::String(s) if s == "nil" || s == "null" => Ok(Value::Null),
                _ => inner.parse(raw),
            },
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::Int(w) => write!(f, "int{}", w.bits()),
            Self::Uint(w) => write!(f, "uint{}", w.bits()),
            Self::Float(w) => write!(f, "float{}", w.bits()),
            Self::String => f.write_str("string"),
            Self::Timestamp(_) => f.write_str("timestamp"),
            Self::Optional(inner) => write!(f, "optional<{inner}>"),
        }
    }
}
