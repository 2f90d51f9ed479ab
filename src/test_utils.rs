use crate::connection::SqlConnection;
use crate::error::{DialectError, Result};
use crate::sql_functions::register_spatial_functions;
use rusqlite::Connection;
use rusqlite::types::Value;
use std::cell::{Cell, RefCell};
use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install a `RUST_LOG`-driven subscriber once per test binary.
pub(crate) fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// In-memory engine with the spatial functions and a `PUBLIC` schema.
pub(crate) fn spatial_connection() -> Result<Connection> {
    init_tracing();
    let conn = Connection::open_in_memory()?;
    register_spatial_functions(&conn)?;
    conn.execute_batch(r#"ATTACH DATABASE ':memory:' AS "PUBLIC""#)?;
    Ok(conn)
}

/// Create an empty `GEOMETRY_COLUMNS` catalog.
pub(crate) fn create_geometry_columns(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE GEOMETRY_COLUMNS (
            F_TABLE_SCHEMA TEXT,
            F_TABLE_NAME TEXT,
            F_GEOMETRY_COLUMN TEXT,
            SRID INTEGER,
            COORD_DIMENSION INTEGER,
            TYPE TEXT
        )",
    )?;
    Ok(())
}

/// Connection double that records statements instead of running them.
///
/// Queries answer with the value registered for the first matching fragment,
/// or no row.
pub(crate) struct RecordingConnection {
    executed: RefCell<Vec<String>>,
    queries: RefCell<Vec<String>>,
    answers: RefCell<Vec<(String, Value)>>,
    fail_on: RefCell<Option<String>>,
    autocommit: Cell<bool>,
    commits: Cell<usize>,
}

impl RecordingConnection {
    pub(crate) fn new() -> Self {
        Self {
            executed: RefCell::new(Vec::new()),
            queries: RefCell::new(Vec::new()),
            answers: RefCell::new(Vec::new()),
            fail_on: RefCell::new(None),
            autocommit: Cell::new(true),
            commits: Cell::new(0),
        }
    }

    pub(crate) fn with_autocommit(self, autocommit: bool) -> Self {
        self.autocommit.set(autocommit);
        self
    }

    pub(crate) fn answer(self, fragment: &str, value: Value) -> Self {
        self.answers.borrow_mut().push((fragment.to_string(), value));
        self
    }

    /// Fail any statement or query containing `fragment`.
    pub(crate) fn fail_on(self, fragment: &str) -> Self {
        *self.fail_on.borrow_mut() = Some(fragment.to_string());
        self
    }

    pub(crate) fn executed(&self) -> Vec<String> {
        self.executed.borrow().clone()
    }

    pub(crate) fn queries(&self) -> Vec<String> {
        self.queries.borrow().clone()
    }

    pub(crate) fn commits(&self) -> usize {
        self.commits.get()
    }

    fn check(&self, sql: &str) -> Result<()> {
        match self.fail_on.borrow().as_deref() {
            Some(fragment) if sql.contains(fragment) => Err(DialectError::Sql(
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_ERROR),
                    Some(format!("refused: {sql}")),
                ),
            )),
            _ => Ok(()),
        }
    }
}

impl SqlConnection for RecordingConnection {
    fn query_first(&self, sql: &str) -> Result<Option<Value>> {
        self.queries.borrow_mut().push(sql.to_string());
        self.check(sql)?;
        let answer = self
            .answers
            .borrow()
            .iter()
            .find(|(fragment, _)| sql.contains(fragment.as_str()))
            .map(|(_, value)| value.clone());
        Ok(answer)
    }

    fn execute(&self, sql: &str) -> Result<()> {
        self.check(sql)?;
        self.executed.borrow_mut().push(sql.to_string());
        Ok(())
    }

    fn is_autocommit(&self) -> bool {
        self.autocommit.get()
    }

    fn commit(&self) -> Result<()> {
        self.commits.set(self.commits.get() + 1);
        Ok(())
    }
}
