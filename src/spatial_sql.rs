// SQL text emitted against the spatial engine.

/// Schema used when the caller does not name one.
pub const DEFAULT_SCHEMA: &str = "PUBLIC";

/// Spatial-metadata catalog listing registered geometry columns.
pub(crate) const GEOMETRY_COLUMNS: &str = "GEOMETRY_COLUMNS";

/// Quote an identifier, doubling embedded double quotes.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a string literal, doubling embedded single quotes.
pub(crate) fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

pub(crate) fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(table))
}

/// Read a single catalog column for one geometry column.
pub(crate) fn sql_select_geometry_column_meta(
    catalog_column: &str,
    schema: &str,
    table: &str,
    column: &str,
) -> String {
    format!(
        "SELECT {catalog_column} FROM {GEOMETRY_COLUMNS} WHERE F_TABLE_SCHEMA = {} AND F_TABLE_NAME = {} AND F_GEOMETRY_COLUMN = {}",
        quote_literal(schema),
        quote_literal(table),
        quote_literal(column),
    )
}

/// Geometry type of a column, optionally restricted to a schema.
pub(crate) fn sql_select_geometry_type(schema: Option<&str>, table: &str, column: &str) -> String {
    let schema_clause = match schema {
        Some(schema) => format!("F_TABLE_SCHEMA = {} AND ", quote_literal(schema)),
        None => String::new(),
    };
    format!(
        "SELECT TYPE FROM {GEOMETRY_COLUMNS} WHERE {schema_clause}F_TABLE_NAME = {} AND F_GEOMETRY_COLUMN = {}",
        quote_literal(table),
        quote_literal(column),
    )
}

/// Apply `function` to the first non-null geometry of a column.
pub(crate) fn sql_inspect_first_geometry(
    function: &str,
    schema: &str,
    table: &str,
    column: &str,
) -> String {
    let column = quote_ident(column);
    format!(
        "SELECT {function}({column}) FROM {} WHERE {column} IS NOT NULL LIMIT 1",
        qualified_table(schema, table),
    )
}

pub(crate) fn sql_alter_geometry_column(
    schema: &str,
    table: &str,
    column: &str,
    geometry_type: &str,
) -> String {
    format!(
        "ALTER TABLE {} ALTER COLUMN {} TYPE {geometry_type}",
        qualified_table(schema, table),
        quote_ident(column),
    )
}

pub(crate) fn spatial_index_name(table: &str, column: &str) -> String {
    format!("spatial_{table}_{}", column.to_lowercase())
}

pub(crate) fn sql_create_spatial_index(schema: &str, table: &str, column: &str) -> String {
    format!(
        "CREATE SPATIAL INDEX {} ON {} ({})",
        quote_ident(&spatial_index_name(table, column)),
        qualified_table(schema, table),
        quote_ident(column),
    )
}

/// Sequence names are upper case to be selectable.
pub(crate) fn sequence_name(table: &str, column: &str) -> String {
    format!("{table}_{column}_SEQUENCE").to_uppercase()
}

pub(crate) fn sql_find_sequence(sequence: &str) -> String {
    format!(
        "SELECT SEQUENCE_NAME FROM INFORMATION_SCHEMA.SEQUENCES WHERE SEQUENCE_NAME = {}",
        quote_literal(sequence)
    )
}

pub(crate) fn sql_next_sequence_value(sequence: &str) -> String {
    format!("SELECT nextval({})", quote_literal(sequence))
}

pub(crate) const SQL_LAST_VALUE: &str = "SELECT lastval()";
