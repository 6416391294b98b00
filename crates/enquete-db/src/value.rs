//! Binding [`Value`]s as PostgreSQL parameters.

use std::error::Error;

use enquete_model::Value;
use postgres::types::{IsNull, ToSql, Type, private::BytesMut, to_sql_checked};

type BoxError = Box<dyn Error + Sync + Send>;

/// Binds a [`Value`] to whatever type the server inferred for the
/// parameter, converting where the conversion is lossless.
#[derive(Debug, Clone, Copy)]
pub struct SqlValue<'a>(pub &'a Value);

impl ToSql for SqlValue<'_> {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        match self.0 {
            Value::Null => Ok(IsNull::Yes),
            Value::Text(text) => match *ty {
                Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME | Type::UNKNOWN => {
                    text.as_str().to_sql(ty, out)
                }
                _ => Err(mismatch(self.0, ty)),
            },
            Value::Integer(value) => match *ty {
                Type::INT2 => i16::try_from(*value)?.to_sql(ty, out),
                Type::INT4 => i32::try_from(*value)?.to_sql(ty, out),
                Type::INT8 => value.to_sql(ty, out),
                Type::TEXT | Type::VARCHAR | Type::BPCHAR => value.to_string().to_sql(ty, out),
                _ => Err(mismatch(self.0, ty)),
            },
            Value::Date(date) => match *ty {
                Type::DATE => date.to_sql(ty, out),
                Type::TIMESTAMP => date.and_time(chrono::NaiveTime::MIN).to_sql(ty, out),
                Type::TEXT | Type::VARCHAR | Type::BPCHAR => {
                    date.format("%Y-%m-%d").to_string().to_sql(ty, out)
                }
                _ => Err(mismatch(self.0, ty)),
            },
            Value::DateTime(datetime) => match *ty {
                Type::TIMESTAMPTZ => datetime.to_sql(ty, out),
                Type::TIMESTAMP => datetime.naive_local().to_sql(ty, out),
                Type::DATE => datetime.date_naive().to_sql(ty, out),
                Type::TEXT | Type::VARCHAR | Type::BPCHAR => datetime.to_rfc3339().to_sql(ty, out),
                _ => Err(mismatch(self.0, ty)),
            },
        }
    }

    fn accepts(_: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

fn mismatch(value: &Value, ty: &Type) -> BoxError {
    let kind = match value {
        Value::Null => "null",
        Value::Text(_) => "text",
        Value::Integer(_) => "integer",
        Value::Date(_) => "date",
        Value::DateTime(_) => "datetime",
    };
    format!("cannot bind {kind} value to column of type {ty}").into()
}
