use h2gis_dialect::{
    AttributeDescriptor, FeatureType, GeometryAttribute, H2gisDialect, SqlConnection, SqlDialect,
    Value, geometry_kind_for,
};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: h2gis_ddl <table> <column>:<GEOMETRY TYPE>[:srid[:dimension]] ...";

/// Prints statements instead of running them.
struct PrintingConnection;

impl SqlConnection for PrintingConnection {
    fn query_first(&self, sql: &str) -> h2gis_dialect::Result<Option<Value>> {
        println!("-- {sql}");
        Ok(None)
    }

    fn execute(&self, sql: &str) -> h2gis_dialect::Result<()> {
        println!("{sql};");
        Ok(())
    }

    fn is_autocommit(&self) -> bool {
        true
    }

    fn commit(&self) -> h2gis_dialect::Result<()> {
        println!("COMMIT;");
        Ok(())
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(err) = run() {
        eprintln!("h2gis_ddl failed: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let table = args.next().ok_or(USAGE)?;
    let attributes = args
        .map(|arg| parse_attribute(&arg))
        .collect::<Result<Vec<_>, _>>()?;
    if attributes.is_empty() {
        return Err(USAGE.into());
    }

    let feature_type = FeatureType {
        name: table,
        attributes,
    };
    H2gisDialect::new().post_create_table(None, &feature_type, &PrintingConnection)?;
    Ok(())
}

fn parse_attribute(arg: &str) -> Result<AttributeDescriptor, Box<dyn std::error::Error>> {
    let mut parts = arg.split(':');
    let name = parts.next().filter(|name| !name.is_empty()).ok_or(USAGE)?;
    let kind = geometry_kind_for(Some(parts.next().ok_or(USAGE)?));

    let mut geometry = GeometryAttribute::new(kind);
    if let Some(srid) = parts.next() {
        geometry = geometry.with_native_srid(srid.parse()?);
    }
    if let Some(dimension) = parts.next() {
        geometry = geometry.with_coordinate_dimension(dimension.parse()?);
    }
    Ok(AttributeDescriptor::geometry(name, geometry))
}
