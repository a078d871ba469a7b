use rust_decimal::Decimal;
use std::fmt::{self, Display, Write};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Dynamically typed SQL value.
///
/// Every typed variant wraps an `Option` so that a NULL keeps the type it was
/// declared with. [`Value::Null`] is the untyped NULL.
#[derive(Default, Debug, Clone)]
pub enum Value {
    #[default]
    Null,
    Boolean(Option<bool>),
    Int32(Option<i32>),
    Int64(Option<i64>),
    UInt64(Option<u64>),
    Float64(Option<f64>),
    Decimal(Option<Decimal>),
    Varchar(Option<String>),
    Blob(Option<Box<[u8]>>),
    Date(Option<Date>),
    Time(Option<Time>),
    Timestamp(Option<PrimitiveDateTime>),
    TimestampWithTimezone(Option<OffsetDateTime>),
    Uuid(Option<Uuid>),
    List(Option<Vec<Value>>, /* type: */ Box<Value>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        if self.is_null() || other.is_null() {
            return self.is_null() && other.is_null();
        }
        if let (Some(l), Some(r)) = (self.as_integer(), other.as_integer()) {
            return l == r;
        }
        match (self, other) {
            (Self::Boolean(l), Self::Boolean(r)) => l == r,
            (Self::Float64(l), Self::Float64(r)) => l == r,
            (Self::Decimal(l), Self::Decimal(r)) => l == r,
            (Self::Varchar(l), Self::Varchar(r)) => l == r,
            (Self::Blob(l), Self::Blob(r)) => l == r,
            (Self::Date(l), Self::Date(r)) => l == r,
            (Self::Time(l), Self::Time(r)) => l == r,
            (Self::Timestamp(l), Self::Timestamp(r)) => l == r,
            (Self::TimestampWithTimezone(l), Self::TimestampWithTimezone(r)) => l == r,
            (Self::Uuid(l), Self::Uuid(r)) => l == r,
            (Self::List(l, ..), Self::List(r, ..)) => l == r,
            _ => false,
        }
    }
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(
            self,
            Value::Null
                | Value::Boolean(None)
                | Value::Int32(None)
                | Value::Int64(None)
                | Value::UInt64(None)
                | Value::Float64(None)
                | Value::Decimal(None)
                | Value::Varchar(None)
                | Value::Blob(None)
                | Value::Date(None)
                | Value::Time(None)
                | Value::Timestamp(None)
                | Value::TimestampWithTimezone(None)
                | Value::Uuid(None)
                | Value::List(None, ..)
        )
    }

    pub fn is_integer(&self) -> bool {
        self.as_integer().is_some()
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(Some(..), ..))
    }

    pub(crate) fn as_integer(&self) -> Option<i128> {
        match self {
            Value::Int32(Some(v)) => Some(*v as i128),
            Value::Int64(Some(v)) => Some(*v as i128),
            Value::UInt64(Some(v)) => Some(*v as i128),
            _ => None,
        }
    }

    /// Expands nested lists depth first, scalars produce themselves.
    pub fn flatten(self) -> Vec<Value> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(self, out: &mut Vec<Value>) {
        match self {
            Value::List(Some(values), ..) => {
                for v in values {
                    v.flatten_into(out);
                }
            }
            v => out.push(v),
        }
    }

    /// First scalar of a possibly nested list, the value itself otherwise.
    pub fn first_scalar(self) -> Value {
        match self {
            Value::List(Some(values), ..) => values
                .into_iter()
                .next()
                .map(Value::first_scalar)
                .unwrap_or_default(),
            v => v,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;
        if self.is_null() {
            return Json::Null;
        }
        match self {
            Value::Boolean(Some(v)) => Json::Bool(*v),
            Value::Int32(Some(v)) => Json::from(*v),
            Value::Int64(Some(v)) => Json::from(*v),
            Value::UInt64(Some(v)) => Json::from(*v),
            Value::Float64(Some(v)) => serde_json::Number::from_f64(*v)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::List(Some(v), ..) => Json::Array(v.iter().map(Value::to_json).collect()),
            v => Json::String(v.to_string()),
        }
    }

    pub fn from_json(value: serde_json::Value) -> Value {
        use serde_json::Value as Json;
        match value {
            Json::Null => Value::Null,
            Json::Bool(v) => Value::Boolean(Some(v)),
            Json::Number(v) => {
                if let Some(v) = v.as_i64() {
                    Value::Int64(Some(v))
                } else if let Some(v) = v.as_u64() {
                    Value::UInt64(Some(v))
                } else {
                    Value::Float64(v.as_f64())
                }
            }
            Json::String(v) => Value::Varchar(Some(v)),
            Json::Array(v) => Value::List(
                Some(v.into_iter().map(Value::from_json).collect()),
                Box::new(Value::Null),
            ),
            Json::Object(..) => Value::Varchar(Some(value.to_string())),
        }
    }
}

fn write_date(f: &mut impl Write, value: &Date) -> fmt::Result {
    write!(
        f,
        "{:04}-{:02}-{:02}",
        value.year(),
        value.month() as u8,
        value.day()
    )
}

fn write_time(f: &mut impl Write, value: &Time) -> fmt::Result {
    write!(
        f,
        "{:02}:{:02}:{:02}",
        value.hour(),
        value.minute(),
        value.second()
    )?;
    let micros = value.microsecond();
    if micros != 0 {
        write!(f, ".{:06}", micros)?;
    }
    Ok(())
}

/// Human readable rendering, strings are not quoted.
impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("NULL");
        }
        match self {
            Value::Boolean(Some(v)) => write!(f, "{}", *v as u8),
            Value::Int32(Some(v)) => write!(f, "{v}"),
            Value::Int64(Some(v)) => write!(f, "{v}"),
            Value::UInt64(Some(v)) => write!(f, "{v}"),
            Value::Float64(Some(v)) if v.is_finite() => {
                let mut buffer = ryu::Buffer::new();
                f.write_str(buffer.format_finite(*v))
            }
            Value::Float64(Some(v)) => write!(f, "{v}"),
            Value::Decimal(Some(v)) => write!(f, "{v}"),
            Value::Varchar(Some(v)) => f.write_str(v),
            Value::Blob(Some(v)) => {
                f.write_str("0x")?;
                for b in v.iter() {
                    write!(f, "{:02X}", b)?;
                }
                Ok(())
            }
            Value::Date(Some(v)) => write_date(f, v),
            Value::Time(Some(v)) => write_time(f, v),
            Value::Timestamp(Some(v)) => {
                write_date(f, &v.date())?;
                f.write_char(' ')?;
                write_time(f, &v.time())
            }
            Value::TimestampWithTimezone(Some(v)) => {
                write_date(f, &v.date())?;
                f.write_char(' ')?;
                write_time(f, &v.time())?;
                let offset = v.offset();
                write!(
                    f,
                    "{}{:02}:{:02}",
                    if offset.is_negative() { '-' } else { '+' },
                    offset.whole_hours().abs(),
                    offset.minutes_past_hour().abs()
                )
            }
            Value::Uuid(Some(v)) => write!(f, "{v}"),
            Value::List(Some(v), ..) => {
                f.write_char('[')?;
                for (i, item) in v.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    Display::fmt(item, f)?;
                }
                f.write_char(']')
            }
            _ => f.write_str("NULL"),
        }
    }
}
