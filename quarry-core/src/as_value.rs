use crate::{Error, Result, Value};
use rust_decimal::{Decimal, prelude::FromPrimitive};
use std::{any, borrow::Cow, sync::Arc};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Conversion between native Rust types and the dynamically typed [`Value`]
/// used for bindings, attributes and rows.
///
/// # Examples
/// ```rust
/// use quarry_core::{AsValue, Value};
/// let v = 42i32.as_value();
/// assert!(matches!(v, Value::Int32(Some(42))));
/// let n: i64 = AsValue::try_from_value(v).unwrap();
/// assert_eq!(n, 42);
/// ```
pub trait AsValue {
    /// NULL of the variant used by this type.
    fn as_empty_value() -> Value;
    /// Owned [`Value`] representation.
    fn as_value(self) -> Value;
    /// Convert back, numeric widths are range checked.
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
}

impl<T: AsValue> From<T> for Value {
    fn from(value: T) -> Self {
        value.as_value()
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Varchar(Some(value.into()))
    }
}

fn mismatch<T>(value: &Value) -> Error {
    Error::msg(format!(
        "Cannot convert {value:?} to {}",
        any::type_name::<T>()
    ))
}

macro_rules! impl_as_value_integer {
    ($source:ty, $destination:path) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self as _))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                let Some(v) = value.as_integer() else {
                    return match value {
                        Value::Varchar(Some(ref v)) => v.trim().parse::<$source>().map_err(|e| {
                            Error::new(e).context(format!(
                                "Cannot parse `{v}` as {}",
                                any::type_name::<Self>()
                            ))
                        }),
                        Value::Boolean(Some(v)) => Ok(v as _),
                        _ => Err(mismatch::<Self>(&value)),
                    };
                };
                <$source>::try_from(v).map_err(|_| {
                    Error::msg(format!(
                        "Value {v} is out of range for {}",
                        any::type_name::<Self>(),
                    ))
                })
            }
        }
    };
}

impl_as_value_integer!(i8, Value::Int32);
impl_as_value_integer!(i16, Value::Int32);
impl_as_value_integer!(i32, Value::Int32);
impl_as_value_integer!(i64, Value::Int64);
impl_as_value_integer!(u8, Value::Int32);
impl_as_value_integer!(u16, Value::Int32);
impl_as_value_integer!(u32, Value::Int64);
impl_as_value_integer!(u64, Value::UInt64);
impl_as_value_integer!(usize, Value::UInt64);

macro_rules! impl_as_value {
    ($source:ty, $destination:path $(, $pat_rest:pat => $expr_rest:expr)* $(,)?) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self.into()))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    $destination(Some(v)) => Ok(v.into()),
                    $($pat_rest => $expr_rest,)*
                    #[allow(unreachable_patterns)]
                    _ => Err(mismatch::<Self>(&value)),
                }
            }
        }
    };
}

impl_as_value!(
    bool,
    Value::Boolean,
    Value::Int32(Some(v)) => Ok(v != 0),
    Value::Int64(Some(v)) => Ok(v != 0),
    Value::UInt64(Some(v)) => Ok(v != 0),
);
impl_as_value!(
    f64,
    Value::Float64,
    Value::Int32(Some(v)) => Ok(v as f64),
    Value::Int64(Some(v)) => Ok(v as f64),
    Value::Decimal(Some(v)) => v.try_into().map_err(Error::new),
    Value::Varchar(Some(ref v)) => v.trim().parse().map_err(Error::new),
);
impl_as_value!(
    Decimal,
    Value::Decimal,
    Value::Int32(Some(v)) => Ok(v.into()),
    Value::Int64(Some(v)) => Ok(v.into()),
    Value::UInt64(Some(v)) => Ok(v.into()),
    Value::Float64(Some(v)) => Decimal::from_f64(v)
        .ok_or_else(|| Error::msg(format!("Cannot represent {v} as a decimal"))),
    Value::Varchar(Some(ref v)) => v.trim().parse().map_err(Error::new),
);
impl_as_value!(
    String,
    Value::Varchar,
    ref v @ (Value::Int32(Some(..))
        | Value::Int64(Some(..))
        | Value::UInt64(Some(..))
        | Value::Float64(Some(..))
        | Value::Decimal(Some(..))
        | Value::Date(Some(..))
        | Value::Time(Some(..))
        | Value::Timestamp(Some(..))
        | Value::Uuid(Some(..))) => Ok(v.to_string()),
    Value::Blob(Some(v)) => String::from_utf8(v.into_vec()).map_err(Error::new),
);
impl_as_value!(Box<[u8]>, Value::Blob, Value::Varchar(Some(v)) => Ok(v.into_bytes().into()));
impl_as_value!(Date, Value::Date, Value::Timestamp(Some(v)) => Ok(v.date()));
impl_as_value!(Time, Value::Time);
impl_as_value!(
    PrimitiveDateTime,
    Value::Timestamp,
    Value::TimestampWithTimezone(Some(v)) => Ok(PrimitiveDateTime::new(v.date(), v.time())),
    Value::Date(Some(v)) => Ok(v.midnight()),
);
impl_as_value!(OffsetDateTime, Value::TimestampWithTimezone, Value::Timestamp(Some(v)) => Ok(v.assume_utc()));
impl_as_value!(
    Uuid,
    Value::Uuid,
    Value::Varchar(Some(ref v)) => Uuid::parse_str(v).map_err(Error::new),
    Value::Blob(Some(ref v)) => Uuid::from_slice(v).map_err(Error::new),
);

impl<'a> AsValue for Cow<'a, str> {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(self.into_owned()))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        String::try_from_value(value).map(Into::into)
    }
}

impl<T: AsValue> AsValue for Option<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => T::as_empty_value(),
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            return Ok(None);
        }
        T::try_from_value(value).map(Some)
    }
}

impl<T: AsValue> AsValue for Box<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        (*self).as_value()
    }
    fn try_from_value(value: Value) -> Result<Self> {
        T::try_from_value(value).map(Box::new)
    }
}

impl<T: AsValue + Clone> AsValue for Arc<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        Arc::unwrap_or_clone(self).as_value()
    }
    fn try_from_value(value: Value) -> Result<Self> {
        T::try_from_value(value).map(Arc::new)
    }
}

/// Lists bind as [`Value::List`], the builder expands them where a clause expects many values.
impl<T: AsValue> AsValue for Vec<T> {
    fn as_empty_value() -> Value {
        Value::List(None, Box::new(T::as_empty_value()))
    }
    fn as_value(self) -> Value {
        Value::List(
            Some(self.into_iter().map(AsValue::as_value).collect()),
            Box::new(T::as_empty_value()),
        )
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::List(Some(v), ..) => v.into_iter().map(T::try_from_value).collect(),
            Value::Varchar(Some(ref v)) => match serde_json::from_str::<serde_json::Value>(v) {
                Ok(json @ serde_json::Value::Array(..)) => Self::try_from_value(Value::from_json(json)),
                _ => Err(mismatch::<Self>(&value)),
            },
            _ => Err(mismatch::<Self>(&value)),
        }
    }
}

impl<T: AsValue, const N: usize> AsValue for [T; N] {
    fn as_empty_value() -> Value {
        Value::List(None, Box::new(T::as_empty_value()))
    }
    fn as_value(self) -> Value {
        Value::List(
            Some(self.into_iter().map(AsValue::as_value).collect()),
            Box::new(T::as_empty_value()),
        )
    }
    fn try_from_value(value: Value) -> Result<Self> {
        let values = Vec::<T>::try_from_value(value)?;
        let len = values.len();
        values.try_into().map_err(|_| {
            Error::msg(format!(
                "Expected {N} values to build {}, found {len}",
                any::type_name::<Self>()
            ))
        })
    }
}
