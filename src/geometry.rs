//! Planar geometry: sample locations, polygons and the prediction domain.
//!
//! Coordinates are assumed to be projected, so distances are Euclidean.

use crate::error::{InputError, Result};

/// Maximum number of times the domain lattice is refined when no lattice point falls inside.
const MAX_REFINEMENTS: usize = 8;

/// A location in the plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A sample location. `id` is the caller's identifier; fold output refers to the position of the
/// sample in its input sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub id: usize,
    pub location: Point,
}

impl SamplePoint {
    pub fn new(id: usize, x: f64, y: f64) -> Self {
        SamplePoint {
            id,
            location: Point::new(x, y),
        }
    }

    /// build samples from bare coordinates, using the position as identifier
    pub fn from_coords<I: IntoIterator<Item = (f64, f64)>>(coords: I) -> Vec<SamplePoint> {
        coords
            .into_iter()
            .enumerate()
            .map(|(i, (x, y))| SamplePoint::new(i, x, y))
            .collect()
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl BoundingBox {
    /// smallest box containing all points, `None` if there are none
    pub fn around<'a, I: IntoIterator<Item = &'a Point>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut bbox = BoundingBox {
            min: first,
            max: first,
        };
        for p in iter {
            bbox.extend(p);
        }
        Some(bbox)
    }

    pub fn extend(&mut self, p: &Point) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn diagonal(&self) -> f64 {
        self.width().hypot(self.height())
    }

    pub fn contains(&self, p: &Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// A simple polygon with optional holes. Rings need not be closed explicitly; the last vertex
/// connects back to the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub exterior: Vec<Point>,
    #[serde(default)]
    pub holes: Vec<Vec<Point>>,
}

impl Polygon {
    pub fn new(exterior: Vec<Point>) -> Self {
        Polygon {
            exterior,
            holes: Vec::new(),
        }
    }

    /// axis-aligned rectangle spanning the two corners
    pub fn rectangle(min: Point, max: Point) -> Self {
        Polygon::new(vec![
            min,
            Point::new(max.x, min.y),
            max,
            Point::new(min.x, max.y),
        ])
    }

    pub fn with_hole(mut self, hole: Vec<Point>) -> Self {
        self.holes.push(hole);
        self
    }

    pub fn area(&self) -> f64 {
        let holes: f64 = self.holes.iter().map(|h| ring_area(h).abs()).sum();
        ring_area(&self.exterior).abs() - holes
    }

    pub fn is_degenerate(&self) -> bool {
        self.exterior.len() < 3
            || !self.exterior.iter().all(Point::is_finite)
            || !(self.area() > 0.0)
    }

    pub fn contains(&self, p: &Point) -> bool {
        ring_contains(&self.exterior, p) && !self.holes.iter().any(|h| ring_contains(h, p))
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::around(&self.exterior)
    }
}

/// signed area by the shoelace formula
fn ring_area(ring: &[Point]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut acc = 0.0;
    for (i, a) in ring.iter().enumerate() {
        let b = &ring[(i + 1) % ring.len()];
        acc += a.x * b.y - b.x * a.y;
    }
    acc / 2.0
}

/// even-odd ray casting
fn ring_contains(ring: &[Point], p: &Point) -> bool {
    let mut inside = false;
    let mut j = ring.len().wrapping_sub(1);
    for (i, a) in ring.iter().enumerate() {
        let b = &ring[j];
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// The region over which the trained model will make predictions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// one or more polygons
    Polygons(Vec<Polygon>),

    /// prediction locations sampled in advance by the caller
    ReferencePoints(Vec<Point>),
}

impl Domain {
    pub fn polygon(p: Polygon) -> Self {
        Domain::Polygons(vec![p])
    }

    pub fn reference_points(points: Vec<Point>) -> Self {
        Domain::ReferencePoints(points)
    }

    /// Whether `p` lies in the domain. For reference points this is the bounding box of the
    /// points.
    pub fn contains(&self, p: &Point) -> bool {
        match *self {
            Domain::Polygons(ref polys) => polys.iter().any(|poly| poly.contains(p)),
            Domain::ReferencePoints(ref pts) => {
                BoundingBox::around(pts).map_or(false, |bbox| bbox.contains(p))
            }
        }
    }

    /// Representative prediction locations covering the domain.
    ///
    /// Polygons are sampled on a regular cell-centred lattice of about `target` cells over their
    /// bounding box, keeping the cell centres that fall inside.
    pub fn sample(&self, target: usize) -> Result<Vec<Point>> {
        match *self {
            Domain::ReferencePoints(ref pts) => {
                if pts.is_empty() {
                    return Err(InputError::EmptyDomain.into());
                }
                if let Some(index) = pts.iter().position(|p| !p.is_finite()) {
                    return Err(InputError::NonFiniteCoordinate { index }.into());
                }
                Ok(pts.clone())
            }
            Domain::Polygons(ref polys) => {
                if polys.is_empty() {
                    return Err(InputError::EmptyDomain.into());
                }
                let usable: Vec<&Polygon> = polys.iter().filter(|p| !p.is_degenerate()).collect();
                if usable.len() < polys.len() {
                    debug!("ignoring {} degenerate polygon(s)", polys.len() - usable.len());
                }
                let bbox = usable
                    .iter()
                    .filter_map(|p| p.bounding_box())
                    .fold(None, |acc: Option<BoundingBox>, b| match acc {
                        None => Some(b),
                        Some(mut a) => {
                            a.extend(&b.min);
                            a.extend(&b.max);
                            Some(a)
                        }
                    })
                    .ok_or(InputError::DegenerateDomain)?;

                let mut spacing = (bbox.area() / target.max(1) as f64).sqrt();
                for _ in 0..=MAX_REFINEMENTS {
                    let points: Vec<Point> = lattice(&bbox, spacing)
                        .filter(|p| usable.iter().any(|poly| poly.contains(p)))
                        .collect();
                    if !points.is_empty() {
                        return Ok(points);
                    }
                    spacing /= 2.0;
                }
                Err(InputError::DegenerateDomain.into())
            }
        }
    }
}

/// cell centres of a square lattice with the given spacing over `bbox`
fn lattice<'a>(bbox: &'a BoundingBox, spacing: f64) -> impl Iterator<Item = Point> + 'a {
    let nx = (bbox.width() / spacing).ceil().max(1.0) as usize;
    let ny = (bbox.height() / spacing).ceil().max(1.0) as usize;
    (0..ny).flat_map(move |j| {
        (0..nx).map(move |i| {
            Point::new(
                bbox.min.x + (i as f64 + 0.5) * spacing,
                bbox.min.y + (j as f64 + 0.5) * spacing,
            )
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Polygon {
        Polygon::rectangle(Point::new(0.0, 0.0), Point::new(1.0, 1.0))
    }

    #[test]
    fn polygon_area_and_containment() {
        let square = unit_square();
        assert_eq!(square.area(), 1.0);
        assert!(square.contains(&Point::new(0.5, 0.5)));
        assert!(!square.contains(&Point::new(1.5, 0.5)));

        let donut = Polygon::rectangle(Point::new(0.0, 0.0), Point::new(4.0, 4.0)).with_hole(vec![
            Point::new(1.0, 1.0),
            Point::new(3.0, 1.0),
            Point::new(3.0, 3.0),
            Point::new(1.0, 3.0),
        ]);
        assert_eq!(donut.area(), 12.0);
        assert!(donut.contains(&Point::new(0.5, 2.0)));
        assert!(!donut.contains(&Point::new(2.0, 2.0)));
    }

    #[test]
    fn collinear_polygon_is_degenerate() {
        let line = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 2.0),
        ]);
        assert!(line.is_degenerate());
        assert!(!unit_square().is_degenerate());
    }

    #[test]
    fn lattice_sample_stays_inside() {
        let domain = Domain::polygon(unit_square());
        let pts = domain.sample(100).unwrap();
        assert_eq!(pts.len(), 100);
        assert!(pts.iter().all(|p| domain.contains(p)));
    }

    #[test]
    fn lattice_sample_respects_holes() {
        let donut = Polygon::rectangle(Point::new(0.0, 0.0), Point::new(4.0, 4.0)).with_hole(vec![
            Point::new(1.0, 1.0),
            Point::new(3.0, 1.0),
            Point::new(3.0, 3.0),
            Point::new(1.0, 3.0),
        ]);
        let pts = Domain::polygon(donut).sample(16).unwrap();
        assert_eq!(pts.len(), 12);
        assert!(!pts.contains(&Point::new(1.5, 1.5)));
    }

    #[test]
    fn empty_and_degenerate_domains_are_rejected() {
        assert!(Domain::Polygons(vec![]).sample(10).is_err());
        assert!(Domain::ReferencePoints(vec![]).sample(10).is_err());

        let sliver = Polygon::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]);
        assert!(Domain::polygon(sliver).sample(10).is_err());
    }

    #[test]
    fn reference_point_domain_contains_by_bbox() {
        let domain = Domain::reference_points(vec![Point::new(0.0, 0.0), Point::new(2.0, 3.0)]);
        assert!(domain.contains(&Point::new(1.0, 1.0)));
        assert!(!domain.contains(&Point::new(5.0, 1.0)));
    }
}
