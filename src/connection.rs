use crate::error::Result;
use rusqlite::types::Value;

/// Synchronous statement execution over a SQL-capable connection.
///
/// A connection is used by one caller at a time. Implementations must
/// release every statement and result handle before returning, on error
/// paths too.
pub trait SqlConnection {
    /// Run a query and return the first column of its first row.
    ///
    /// `None` means the query produced no row; a row whose first column is
    /// `NULL` yields `Some(Value::Null)`.
    fn query_first(&self, sql: &str) -> Result<Option<Value>>;

    /// Execute a statement, discarding any result.
    fn execute(&self, sql: &str) -> Result<()>;

    fn is_autocommit(&self) -> bool;

    /// Commit the current unit of work.
    fn commit(&self) -> Result<()>;
}

impl SqlConnection for rusqlite::Connection {
    fn query_first(&self, sql: &str) -> Result<Option<Value>> {
        let mut stmt = self.prepare(sql)?;
        let mut rows = stmt.query([])?;
        let value = match rows.next()? {
            Some(row) => Some(row.get::<_, Value>(0)?),
            None => None,
        };
        Ok(value)
    }

    fn execute(&self, sql: &str) -> Result<()> {
        self.execute_batch(sql)?;
        Ok(())
    }

    fn is_autocommit(&self) -> bool {
        rusqlite::Connection::is_autocommit(self)
    }

    fn commit(&self) -> Result<()> {
        self.execute_batch("COMMIT")?;
        Ok(())
    }
}

impl<C: SqlConnection + ?Sized> SqlConnection for &C {
    fn query_first(&self, sql: &str) -> Result<Option<Value>> {
        (**self).query_first(sql)
    }

    fn execute(&self, sql: &str) -> Result<()> {
        (**self).execute(sql)
    }

    fn is_autocommit(&self) -> bool {
        (**self).is_autocommit()
    }

    fn commit(&self) -> Result<()> {
        (**self).commit()
    }
}

/// Read an integer out of a query result, treating anything else as absent.
pub(crate) fn value_as_i64(value: Option<Value>) -> Option<i64> {
    match value {
        Some(Value::Integer(v)) => Some(v),
        Some(Value::Real(v)) if v.fract() == 0.0 => Some(v as i64),
        Some(Value::Text(v)) => v.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::SqlConnection;
    use crate::Result;
    use rusqlite::types::Value;

    #[test]
    fn query_first_distinguishes_no_row_from_null() -> Result<()> {
        let conn = rusqlite::Connection::open_in_memory()?;
        conn.execute_batch("CREATE TABLE t (v INTEGER); INSERT INTO t VALUES (NULL);")?;

        assert_eq!(conn.query_first("SELECT v FROM t")?, Some(Value::Null));
        assert_eq!(conn.query_first("SELECT v FROM t WHERE v IS NOT NULL")?, None);
        Ok(())
    }

    #[test]
    fn commit_ends_explicit_transaction() -> Result<()> {
        let conn = rusqlite::Connection::open_in_memory()?;
        SqlConnection::execute(&conn, "BEGIN")?;
        assert!(!SqlConnection::is_autocommit(&conn));
        SqlConnection::commit(&conn)?;
        assert!(SqlConnection::is_autocommit(&conn));
        Ok(())
    }
}
