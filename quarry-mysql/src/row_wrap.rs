use crate::ValueWrap;
use mysql::{FromRowError, consts::ColumnType};
use quarry_core::{Row, RowLabeled, RowNames, Value};

pub(crate) struct RowWrap(pub(crate) RowLabeled);

impl mysql::prelude::FromRow for RowWrap {
    fn from_row_opt(mut row: mysql::Row) -> Result<Self, FromRowError>
    where
        Self: Sized,
    {
        let columns = row.columns();
        let names: RowNames = columns
            .iter()
            .map(|v| v.name_str().into_owned())
            .collect();
        let values: Result<Row, _> = columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let value = match row.take_opt::<ValueWrap, _>(i) {
                    Some(value) => value.map(|v| v.0)?,
                    None => Value::Null,
                };
                // The binary protocol sends DATE columns as a midnight datetime.
                Ok(match value {
                    Value::Timestamp(Some(v)) if column.column_type() == ColumnType::MYSQL_TYPE_DATE => {
                        Value::Date(Some(v.date()))
                    }
                    v => v,
                })
            })
            .collect::<Result<_, mysql::FromValueError>>();
        match values {
            Ok(values) => Ok(RowWrap(RowLabeled::new(names, values))),
            Err(..) => Err(FromRowError(row)),
        }
    }
}
