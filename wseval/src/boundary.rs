//! Region boundaries and point-in-polygon containment.

use geo::{Geometry, LineString, Point, Polygon};
use log::warn;

/// Shapes dropped when building the continental United States
/// boundary from the census national shapefile.
pub const CONTINENTAL_US_OMITTED: &[&str] = &[
    "Hawaii",
    "Alaska",
    "Puerto Rico",
    "American Samoa",
    "Guam",
    "Commonwealth of the Northern Mariana Islands",
    "United States Virgin Islands",
];

/// An ordered set of polygons delimiting a region.
///
/// Multi-part shapes are flattened into independent polygons at
/// construction; a point is contained iff at least one polygon
/// contains it.
#[derive(Debug, Clone)]
pub struct Boundary {
    polygons: Vec<Polygon<f64>>,
}

impl Boundary {
    /// Builds a boundary from loader output, dropping any shape whose
    /// name appears in `omitted`.
    ///
    /// Non-areal geometries are skipped with a logged warning.
    pub fn from_shapes<I>(shapes: I, omitted: &[&str]) -> Self
    where
        I: IntoIterator<Item = (Geometry<f64>, Option<String>)>,
    {
        let mut polygons = Vec::new();
        for (geometry, name) in shapes {
            if let Some(name) = &name {
                if omitted.iter().any(|o| o == name) {
                    continue;
                }
            }
            match geometry {
                Geometry::Polygon(polygon) => polygons.push(polygon),
                Geometry::MultiPolygon(multi) => polygons.extend(multi.0),
                other => {
                    warn!(
                        "skipping non-areal boundary shape {:?} ({:?})",
                        name,
                        kind_of(&other)
                    );
                }
            }
        }
        Self { polygons }
    }

    pub fn from_polygons(polygons: Vec<Polygon<f64>>) -> Self {
        Self { polygons }
    }

    pub fn polygons(&self) -> &[Polygon<f64>] {
        &self.polygons
    }

    /// Tests whether the location is inside the boundary.
    pub fn contains(&self, point: Point<f64>) -> bool {
        self.polygons.iter().any(|p| polygon_contains(p, point))
    }
}

fn kind_of(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

/// Even/odd horizontal-ray containment over every ring of `polygon`.
///
/// Points exactly on a ring vertex or on a horizontal edge count as
/// inside. Interior rings flip parity, so holes are excluded.
fn polygon_contains(polygon: &Polygon<f64>, point: Point<f64>) -> bool {
    let rings = std::iter::once(polygon.exterior()).chain(polygon.interiors());
    for ring in rings.clone() {
        if point_on_vertex_or_horizontal_edge(ring, point) {
            return true;
        }
    }

    let mut inside = false;
    for ring in rings {
        for edge in ring.0.windows(2) {
            let (a, b) = (edge[0], edge[1]);
            if (a.y > point.y()) != (b.y > point.y()) {
                let x_crossing = a.x + (point.y() - a.y) * (b.x - a.x) / (b.y - a.y);
                if point.x() < x_crossing {
                    inside = !inside;
                }
            }
        }
    }
    inside
}

fn point_on_vertex_or_horizontal_edge(ring: &LineString<f64>, point: Point<f64>) -> bool {
    for edge in ring.0.windows(2) {
        let (a, b) = (edge[0], edge[1]);
        if (a.x == point.x() && a.y == point.y()) || (b.x == point.x() && b.y == point.y()) {
            return true;
        }
        if a.y == b.y
            && a.y == point.y()
            && point.x() >= a.x.min(b.x)
            && point.x() <= a.x.max(b.x)
        {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, point};

    fn quad() -> Polygon<f64> {
        polygon![
            (x: 0.0, y: 0.0),
            (x: 5.0, y: 1.0),
            (x: 5.0, y: 5.0),
            (x: 1.0, y: 5.0),
        ]
    }

    #[test]
    fn test_interior_point_contained() {
        let boundary = Boundary::from_polygons(vec![quad()]);
        assert!(boundary.contains(point!(x: 3.0, y: 3.0)));
    }

    #[test]
    fn test_vertex_counts_as_inside() {
        let boundary = Boundary::from_polygons(vec![quad()]);
        assert!(boundary.contains(point!(x: 0.0, y: 0.0)));
        assert!(boundary.contains(point!(x: 5.0, y: 1.0)));
    }

    #[test]
    fn test_outside_point_not_contained() {
        let boundary = Boundary::from_polygons(vec![quad()]);
        assert!(!boundary.contains(point!(x: 6.0, y: 3.0)));
        assert!(!boundary.contains(point!(x: 0.1, y: 4.9)));
    }

    #[test]
    fn test_horizontal_edge_counts_as_inside() {
        let square = polygon![
            (x: 0.0, y: 0.0),
            (x: 2.0, y: 0.0),
            (x: 2.0, y: 2.0),
            (x: 0.0, y: 2.0),
        ];
        let boundary = Boundary::from_polygons(vec![square]);
        assert!(boundary.contains(point!(x: 1.0, y: 0.0)));
        assert!(boundary.contains(point!(x: 1.0, y: 2.0)));
    }

    #[test]
    fn test_hole_excluded() {
        let with_hole = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]),
            vec![LineString::from(vec![
                (4.0, 4.0),
                (6.0, 4.0),
                (6.0, 6.0),
                (4.0, 6.0),
            ])],
        );
        let boundary = Boundary::from_polygons(vec![with_hole]);
        assert!(boundary.contains(point!(x: 2.0, y: 2.0)));
        assert!(!boundary.contains(point!(x: 5.0, y: 5.0)));
    }

    #[test]
    fn test_or_semantics_across_polygons() {
        let far = polygon![
            (x: 100.0, y: 100.0),
            (x: 101.0, y: 100.0),
            (x: 101.0, y: 101.0),
            (x: 100.0, y: 101.0),
        ];
        let boundary = Boundary::from_polygons(vec![quad(), far]);
        assert!(boundary.contains(point!(x: 100.5, y: 100.5)));
        assert!(boundary.contains(point!(x: 3.0, y: 3.0)));
    }

    #[test]
    fn test_named_shapes_omitted() {
        let shapes = vec![
            (Geometry::Polygon(quad()), Some("keep".to_string())),
            (
                Geometry::Polygon(polygon![
                    (x: 100.0, y: 100.0),
                    (x: 101.0, y: 100.0),
                    (x: 101.0, y: 101.0),
                ]),
                Some("Alaska".to_string()),
            ),
        ];
        let boundary = Boundary::from_shapes(shapes, CONTINENTAL_US_OMITTED);
        assert_eq!(boundary.polygons().len(), 1);
        assert!(!boundary.contains(point!(x: 100.5, y: 100.2)));
    }
}
