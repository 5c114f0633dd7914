//! MySQL implementation of the connection trait over `mysql_async`.

use std::sync::Arc;

use async_trait::async_trait;
use mysql_async::prelude::Queryable;
use mysql_async::{Conn, Opts, Row, Value};

use super::{DbConnection, DbError, SqlRow, SqlValue};

/// A single live MySQL connection configured from a DSN.
///
/// No pooling: the crawl is strictly sequential, so one connection
/// suffices and the retry layer owns the reconnect policy.
pub struct MySqlConnection {
    opts: Opts,
    conn: Conn,
}

impl MySqlConnection {
    pub async fn connect(dsn: &str) -> Result<Self, DbError> {
        let opts = Opts::from_url(dsn).map_err(|e| DbError::Connect(e.to_string()))?;
        let conn = Conn::new(opts.clone())
            .await
            .map_err(|e| DbError::Connect(e.to_string()))?;
        Ok(Self { opts, conn })
    }
}

#[async_trait]
impl DbConnection for MySqlConnection {
    async fn run(&mut self, sql: &str) -> Result<Vec<SqlRow>, DbError> {
        let rows: Vec<Row> = self.conn.query(sql).await.map_err(classify)?;
        Ok(rows.into_iter().map(convert_row).collect())
    }

    async fn reconnect(&mut self) -> Result<(), DbError> {
        self.conn = Conn::new(self.opts.clone())
            .await
            .map_err(|e| DbError::Connect(e.to_string()))?;
        Ok(())
    }
}

/// Map driver errors onto the crawl's taxonomy. Transport failures and
/// the classic "server has gone away" response are the recoverable
/// class; everything else aborts the run.
fn classify(err: mysql_async::Error) -> DbError {
    match err {
        mysql_async::Error::Io(e) => DbError::ConnectionLost(e.to_string()),
        other => {
            let msg = other.to_string();
            if msg.contains("server has gone away") || msg.contains("Lost connection") {
                DbError::ConnectionLost(msg)
            } else {
                DbError::Query(msg)
            }
        }
    }
}

fn convert_row(row: Row) -> SqlRow {
    let columns: Arc<[String]> = row
        .columns_ref()
        .iter()
        .map(|column| column.name_str().into_owned())
        .collect::<Vec<_>>()
        .into();
    let values = row.unwrap().into_iter().map(convert_value).collect();
    SqlRow::new(columns, values)
}

fn convert_value(value: Value) -> SqlValue {
    match value {
        Value::NULL => SqlValue::Null,
        Value::Int(n) => SqlValue::Int(n),
        Value::UInt(n) => SqlValue::UInt(n),
        Value::Float(f) => SqlValue::Float(f64::from(f)),
        Value::Double(f) => SqlValue::Float(f),
        Value::Bytes(bytes) => SqlValue::Text(String::from_utf8_lossy(&bytes).into_owned()),
        Value::Date(year, month, day, hour, minute, second, _) => SqlValue::Text(format!(
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            year, month, day, hour, minute, second
        )),
        Value::Time(negative, days, hours, minutes, seconds, _) => {
            let sign = if negative { "-" } else { "" };
            let total_hours = u32::from(days) * 24 + u32::from(hours);
            SqlValue::Text(format!("{}{:02}:{:02}:{:02}", sign, total_hours, minutes, seconds))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converts_bytes_to_text() {
        assert_eq!(
            convert_value(Value::Bytes(b"hello".to_vec())),
            SqlValue::Text("hello".to_string())
        );
    }

    #[test]
    fn test_converts_null_and_numbers() {
        assert_eq!(convert_value(Value::NULL), SqlValue::Null);
        assert_eq!(convert_value(Value::Int(-3)), SqlValue::Int(-3));
        assert_eq!(convert_value(Value::UInt(7)), SqlValue::UInt(7));
    }

    #[test]
    fn test_formats_datetime_values() {
        assert_eq!(
            convert_value(Value::Date(2024, 5, 17, 9, 30, 0, 0)),
            SqlValue::Text("2024-05-17 09:30:00".to_string())
        );
    }
}
