use geo_traits::{
    CoordTrait, GeometryCollectionTrait, GeometryTrait, LineStringTrait, LineTrait,
    MultiLineStringTrait, MultiPointTrait, MultiPolygonTrait, PointTrait, PolygonTrait,
    RectTrait, TriangleTrait,
};

#[derive(Clone, Copy, Debug, PartialEq)]
struct Bounds {
    minx: f64,
    maxx: f64,
    miny: f64,
    maxy: f64,
}

/// Planar bounding box. An empty envelope contains nothing, not even the origin.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Envelope {
    bounds: Option<Bounds>,
}

impl Envelope {
    pub fn empty() -> Self {
        Self { bounds: None }
    }

    /// Envelope spanning the two corners, in any order.
    pub fn new(x1: f64, x2: f64, y1: f64, y2: f64) -> Self {
        Self {
            bounds: Some(Bounds {
                minx: x1.min(x2),
                maxx: x1.max(x2),
                miny: y1.min(y2),
                maxy: y1.max(y2),
            }),
        }
    }

    /// Bounding box of every coordinate in `geom`.
    pub fn of<G: GeometryTrait<T = f64>>(geom: &G) -> Self {
        let mut envelope = Self::empty();
        envelope.expand_to_include_geometry(geom);
        envelope
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    pub fn min_x(&self) -> Option<f64> {
        self.bounds.map(|b| b.minx)
    }

    pub fn max_x(&self) -> Option<f64> {
        self.bounds.map(|b| b.maxx)
    }

    pub fn min_y(&self) -> Option<f64> {
        self.bounds.map(|b| b.miny)
    }

    pub fn max_y(&self) -> Option<f64> {
        self.bounds.map(|b| b.maxy)
    }

    pub fn expand_to_include(&mut self, x: f64, y: f64) {
        match &mut self.bounds {
            Some(existing) => {
                existing.minx = existing.minx.min(x);
                existing.maxx = existing.maxx.max(x);
                existing.miny = existing.miny.min(y);
                existing.maxy = existing.maxy.max(y);
            }
            None => {
                self.bounds = Some(Bounds {
                    minx: x,
                    maxx: x,
                    miny: y,
                    maxy: y,
                });
            }
        }
    }

    pub fn expand_to_include_envelope(&mut self, other: &Envelope) {
        if let Some(other) = other.bounds {
            self.expand_to_include(other.minx, other.miny);
            self.expand_to_include(other.maxx, other.maxy);
        }
    }

    fn expand_to_include_geometry<G: GeometryTrait<T = f64>>(&mut self, geom: &G) {
        use geo_traits::GeometryType as GeoType;

        match geom.as_type() {
            GeoType::Point(point) => {
                if let Some(coord) = point.coord() {
                    self.add_coord(&coord);
                }
            }
            GeoType::LineString(line) => self.add_line_string(line),
            GeoType::Polygon(poly) => self.add_polygon(poly),
            GeoType::MultiPoint(multi) => {
                for point in multi.points() {
                    if let Some(coord) = point.coord() {
                        self.add_coord(&coord);
                    }
                }
            }
            GeoType::MultiLineString(multi) => {
                for line in multi.line_strings() {
                    self.add_line_string(&line);
                }
            }
            GeoType::MultiPolygon(multi) => {
                for poly in multi.polygons() {
                    self.add_polygon(&poly);
                }
            }
            GeoType::GeometryCollection(collection) => {
                for sub_geom in collection.geometries() {
                    self.expand_to_include_geometry(&sub_geom);
                }
            }
            GeoType::Rect(rect) => {
                self.add_coord(&rect.min());
                self.add_coord(&rect.max());
            }
            GeoType::Triangle(triangle) => {
                self.add_coord(&triangle.first());
                self.add_coord(&triangle.second());
                self.add_coord(&triangle.third());
            }
            GeoType::Line(line) => {
                self.add_coord(&line.start());
                self.add_coord(&line.end());
            }
        }
    }

    fn add_polygon<P: PolygonTrait<T = f64>>(&mut self, poly: &P) {
        // Interior rings lie inside the exterior one.
        if let Some(ring) = poly.exterior() {
            self.add_line_string(&ring);
        }
    }

    fn add_line_string<L: LineStringTrait<T = f64>>(&mut self, line: &L) {
        for coord in line.coords() {
            self.add_coord(&coord);
        }
    }

    fn add_coord<C: CoordTrait<T = f64>>(&mut self, coord: &C) {
        let (x, y) = coord.x_y();
        self.expand_to_include(x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::Envelope;
    use geo_types::{Geometry, GeometryCollection, LineString, MultiLineString, Point};

    #[test]
    fn empty_envelope_has_no_bounds() {
        let envelope = Envelope::empty();
        assert!(envelope.is_empty());
        assert_eq!(envelope.min_x(), None);
        assert_eq!(Envelope::of(&LineString::<f64>::new(Vec::new())), envelope);
    }

    #[test]
    fn bounds_of_multilinestring() {
        let line_a = LineString::from(vec![(0.0, 0.0), (2.0, 1.0)]);
        let line_b = LineString::from(vec![(-3.0, 4.0), (-1.0, 2.0)]);
        let envelope = Envelope::of(&MultiLineString(vec![line_a, line_b]));
        assert_eq!(envelope, Envelope::new(-3.0, 2.0, 0.0, 4.0));
    }

    #[test]
    fn bounds_of_geometry_collection() {
        let point = Geometry::Point(Point::new(5.0, -1.0));
        let line = Geometry::LineString(LineString::from(vec![(-2.0, 2.0), (1.0, 3.0)]));
        let envelope = Envelope::of(&GeometryCollection::from(vec![point, line]));
        assert_eq!(envelope.min_x(), Some(-2.0));
        assert_eq!(envelope.max_x(), Some(5.0));
        assert_eq!(envelope.min_y(), Some(-1.0));
        assert_eq!(envelope.max_y(), Some(3.0));
    }

    #[test]
    fn merges_envelopes() {
        let mut envelope = Envelope::empty();
        envelope.expand_to_include_envelope(&Envelope::new(0.0, 1.0, 0.0, 1.0));
        envelope.expand_to_include_envelope(&Envelope::empty());
        envelope.expand_to_include_envelope(&Envelope::new(4.0, 2.0, -1.0, 0.5));
        assert_eq!(envelope, Envelope::new(0.0, 4.0, -1.0, 1.0));
    }
}
