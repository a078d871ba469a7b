use quarry_core::{Error, Value};
use time::{Date, Month, PrimitiveDateTime, Time};

pub(crate) struct ValueWrap(pub(crate) Value);

impl From<Value> for ValueWrap {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
impl From<ValueWrap> for Value {
    fn from(value: ValueWrap) -> Self {
        value.0
    }
}

impl mysql::prelude::FromValue for ValueWrap {
    type Intermediate = ValueWrap;
}

impl TryFrom<mysql::Value> for ValueWrap {
    type Error = mysql::FromValueError;
    fn try_from(value: mysql::Value) -> Result<Self, Self::Error> {
        Ok(match value {
            mysql::Value::NULL => Value::Null,
            // Text and binary columns both arrive as bytes.
            mysql::Value::Bytes(v) => match String::from_utf8(v) {
                Ok(v) => Value::Varchar(Some(v)),
                Err(e) => Value::Blob(Some(e.into_bytes().into())),
            },
            mysql::Value::Int(v) => Value::Int64(Some(v)),
            mysql::Value::UInt(v) => Value::UInt64(Some(v)),
            mysql::Value::Float(v) => Value::Float64(Some(v as f64)),
            mysql::Value::Double(v) => Value::Float64(Some(v)),
            mysql::Value::Date(year, month, day, hour, minute, second, microsecond) => {
                let month = Month::try_from(month)
                    .map_err(|_| mysql::FromValueError(value.clone()))?;
                let date = Date::from_calendar_date(year as _, month, day)
                    .map_err(|_| mysql::FromValueError(value.clone()))?;
                let time = Time::from_hms_micro(hour, minute, second, microsecond)
                    .map_err(|_| mysql::FromValueError(value.clone()))?;
                Value::Timestamp(Some(PrimitiveDateTime::new(date, time)))
            }
            mysql::Value::Time(negative, days, hours, minutes, seconds, micro) => {
                if negative || days > 0 {
                    // Durations do not fit a time of day.
                    let sign = if negative { "-" } else { "" };
                    Value::Varchar(Some(format!(
                        "{sign}{:02}:{minutes:02}:{seconds:02}.{micro:06}",
                        days * 24 + hours as u32
                    )))
                } else {
                    Value::Time(Some(
                        Time::from_hms_micro(hours, minutes, seconds, micro)
                            .map_err(|_| mysql::FromValueError(value.clone()))?,
                    ))
                }
            }
        }
        .into())
    }
}

impl TryFrom<ValueWrap> for mysql::Value {
    type Error = Error;

    fn try_from(value: ValueWrap) -> Result<Self, Self::Error> {
        type MySqlValue = mysql::Value;
        let date_time = |date: Date, time: Time| -> Result<MySqlValue, Error> {
            let year = u16::try_from(date.year())
                .map_err(|_| Error::msg(format!("Date {date} is out of range for MySQL")))?;
            Ok(MySqlValue::Date(
                year,
                date.month().into(),
                date.day(),
                time.hour(),
                time.minute(),
                time.second(),
                time.microsecond(),
            ))
        };
        Ok(match value.0 {
            ref v if v.is_null() => MySqlValue::NULL,
            Value::Boolean(Some(v)) => MySqlValue::Int(v as i64),
            Value::Int32(Some(v)) => MySqlValue::Int(v as i64),
            Value::Int64(Some(v)) => MySqlValue::Int(v),
            Value::UInt64(Some(v)) => MySqlValue::UInt(v),
            Value::Float64(Some(v)) => MySqlValue::Double(v),
            Value::Decimal(Some(v)) => MySqlValue::Bytes(v.to_string().into_bytes()),
            Value::Varchar(Some(v)) => MySqlValue::Bytes(v.into_bytes()),
            Value::Blob(Some(v)) => MySqlValue::Bytes(v.into_vec()),
            Value::Date(Some(v)) => date_time(v, Time::MIDNIGHT)?,
            Value::Time(Some(v)) => MySqlValue::Time(
                false,
                0,
                v.hour(),
                v.minute(),
                v.second(),
                v.microsecond(),
            ),
            Value::Timestamp(Some(v)) => date_time(v.date(), v.time())?,
            Value::TimestampWithTimezone(Some(v)) => {
                let v = v.to_offset(time::UtcOffset::UTC);
                date_time(v.date(), v.time())?
            }
            Value::Uuid(Some(v)) => MySqlValue::Bytes(v.to_string().into_bytes()),
            ref v @ Value::List(Some(..), ..) => MySqlValue::Bytes(v.to_json().to_string().into_bytes()),
            v => {
                return Err(Error::msg(format!(
                    "Value `{v:?}` cannot be bound to a MySQL statement"
                )));
            }
        })
    }
}
