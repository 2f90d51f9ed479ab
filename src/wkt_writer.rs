//! WKT output with a caller-chosen coordinate dimension.
//!
//! Coordinates are written with at most `dimension` ordinates. A geometry
//! without Z values is written in 2D even when 3 dimensions are requested;
//! M values are never written.

use geo_traits::{
    CoordTrait, Dimensions, GeometryCollectionTrait, GeometryTrait, LineStringTrait, LineTrait,
    MultiLineStringTrait, MultiPointTrait, MultiPolygonTrait, PointTrait, PolygonTrait,
    RectTrait, TriangleTrait,
};

fn has_z(dim: Dimensions) -> bool {
    matches!(dim, Dimensions::Xyz | Dimensions::Xyzm)
}

/// Write `geom` as WKT.
pub(crate) fn write_geometry<G: GeometryTrait<T = f64>>(out: &mut String, geom: &G, dimension: u32) {
    use geo_traits::GeometryType as GeoType;

    let z = dimension >= 3 && has_z(geom.dim());
    match geom.as_type() {
        GeoType::Point(point) => {
            push_tag(out, "POINT", z);
            match point.coord() {
                Some(coord) => {
                    out.push('(');
                    push_coord(out, &coord, z);
                    out.push(')');
                }
                None => out.push_str("EMPTY"),
            }
        }
        GeoType::LineString(line) => {
            push_tag(out, "LINESTRING", z);
            push_line_string(out, line, z);
        }
        GeoType::Polygon(poly) => {
            push_tag(out, "POLYGON", z);
            push_polygon(out, poly, z);
        }
        GeoType::MultiPoint(multi) => {
            push_tag(out, "MULTIPOINT", z);
            if multi.num_points() == 0 {
                out.push_str("EMPTY");
                return;
            }
            out.push('(');
            for (idx, point) in multi.points().enumerate() {
                if idx > 0 {
                    out.push_str(", ");
                }
                match point.coord() {
                    Some(coord) => {
                        out.push('(');
                        push_coord(out, &coord, z);
                        out.push(')');
                    }
                    None => out.push_str("EMPTY"),
                }
            }
            out.push(')');
        }
        GeoType::MultiLineString(multi) => {
            push_tag(out, "MULTILINESTRING", z);
            if multi.num_line_strings() == 0 {
                out.push_str("EMPTY");
                return;
            }
            out.push('(');
            for (idx, line) in multi.line_strings().enumerate() {
                if idx > 0 {
                    out.push_str(", ");
                }
                push_line_string(out, &line, z);
            }
            out.push(')');
        }
        GeoType::MultiPolygon(multi) => {
            push_tag(out, "MULTIPOLYGON", z);
            if multi.num_polygons() == 0 {
                out.push_str("EMPTY");
                return;
            }
            out.push('(');
            for (idx, poly) in multi.polygons().enumerate() {
                if idx > 0 {
                    out.push_str(", ");
                }
                push_polygon(out, &poly, z);
            }
            out.push(')');
        }
        GeoType::GeometryCollection(collection) => {
            push_tag(out, "GEOMETRYCOLLECTION", z);
            if collection.num_geometries() == 0 {
                out.push_str("EMPTY");
                return;
            }
            out.push('(');
            for (idx, sub_geom) in collection.geometries().enumerate() {
                if idx > 0 {
                    out.push_str(", ");
                }
                write_geometry(out, &sub_geom, dimension);
            }
            out.push(')');
        }
        GeoType::Rect(rect) => {
            // Written as its closed outline, always planar.
            let (min_x, min_y) = rect.min().x_y();
            let (max_x, max_y) = rect.max().x_y();
            push_tag(out, "POLYGON", false);
            out.push_str("((");
            let corners = [
                (min_x, min_y),
                (max_x, min_y),
                (max_x, max_y),
                (min_x, max_y),
                (min_x, min_y),
            ];
            for (idx, (x, y)) in corners.into_iter().enumerate() {
                if idx > 0 {
                    out.push_str(", ");
                }
                push_ordinates(out, x, y, None);
            }
            out.push_str("))");
        }
        GeoType::Triangle(triangle) => {
            push_tag(out, "POLYGON", z);
            out.push_str("((");
            push_coord(out, &triangle.first(), z);
            out.push_str(", ");
            push_coord(out, &triangle.second(), z);
            out.push_str(", ");
            push_coord(out, &triangle.third(), z);
            out.push_str(", ");
            push_coord(out, &triangle.first(), z);
            out.push_str("))");
        }
        GeoType::Line(line) => {
            push_tag(out, "LINESTRING", z);
            out.push('(');
            push_coord(out, &line.start(), z);
            out.push_str(", ");
            push_coord(out, &line.end(), z);
            out.push(')');
        }
    }
}

/// Write a line string, e.g. the coordinates of a ring, as `LINESTRING` WKT.
pub(crate) fn write_line_string<L: LineStringTrait<T = f64>>(
    out: &mut String,
    line: &L,
    dimension: u32,
) {
    let z = dimension >= 3 && has_z(line.dim());
    push_tag(out, "LINESTRING", z);
    push_line_string(out, line, z);
}

fn push_tag(out: &mut String, name: &str, z: bool) {
    out.push_str(name);
    if z {
        out.push_str(" Z");
    }
    out.push(' ');
}

fn push_line_string<L: LineStringTrait<T = f64>>(out: &mut String, line: &L, z: bool) {
    if line.num_coords() == 0 {
        out.push_str("EMPTY");
        return;
    }
    out.push('(');
    for (idx, coord) in line.coords().enumerate() {
        if idx > 0 {
            out.push_str(", ");
        }
        push_coord(out, &coord, z);
    }
    out.push(')');
}

fn push_polygon<P: PolygonTrait<T = f64>>(out: &mut String, poly: &P, z: bool) {
    let Some(exterior) = poly.exterior() else {
        out.push_str("EMPTY");
        return;
    };
    out.push('(');
    push_line_string(out, &exterior, z);
    for ring in poly.interiors() {
        out.push_str(", ");
        push_line_string(out, &ring, z);
    }
    out.push(')');
}

fn push_coord<C: CoordTrait<T = f64>>(out: &mut String, coord: &C, z: bool) {
    let z = if z && has_z(coord.dim()) {
        coord.nth(2)
    } else {
        None
    };
    push_ordinates(out, coord.x(), coord.y(), z);
}

fn push_ordinates(out: &mut String, x: f64, y: f64, z: Option<f64>) {
    out.push_str(&x.to_string());
    out.push(' ');
    out.push_str(&y.to_string());
    if let Some(z) = z {
        out.push(' ');
        out.push_str(&z.to_string());
    }
}

/// Whether a geometry has no coordinates at all.
pub(crate) fn is_empty<G: GeometryTrait<T = f64>>(geom: &G) -> bool {
    use geo_traits::GeometryType as GeoType;

    match geom.as_type() {
        GeoType::Point(point) => point.coord().is_none(),
        GeoType::LineString(line) => line.num_coords() == 0,
        GeoType::Polygon(poly) => polygon_is_empty(poly),
        GeoType::MultiPoint(multi) => multi.points().all(|point| point.coord().is_none()),
        GeoType::MultiLineString(multi) => multi.line_strings().all(|line| line.num_coords() == 0),
        GeoType::MultiPolygon(multi) => multi.polygons().all(|poly| polygon_is_empty(&poly)),
        GeoType::GeometryCollection(collection) => {
            collection.geometries().all(|sub_geom| is_empty(&sub_geom))
        }
        GeoType::Rect(_) | GeoType::Triangle(_) | GeoType::Line(_) => false,
    }
}

fn polygon_is_empty<P: PolygonTrait<T = f64>>(poly: &P) -> bool {
    poly.exterior().is_none_or(|ring| ring.num_coords() == 0)
}
