//! Geometric primitives for detector output.
//!
//! Detectors report each text fragment as a quadrilateral. Everything
//! downstream works on axis-aligned [`Region`]s, so a polygon is read once,
//! collapsed to its enclosing rectangle and then dropped.

use serde::{Deserialize, Serialize};

use crate::traits::BoundingBox;

/// A 2D point with floating-point coordinates.
///
/// Serialized as a two-element array `[x, y]`, which is how detectors emit
/// polygon vertices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<[f32; 2]> for Point {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f32; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

/// Raw quadrilateral from a text detector. No vertex ordering is assumed.
pub type Polygon = [Point; 4];

/// Axis-aligned rectangle `(xmin, ymin, xmax, ymax)`.
///
/// Regions are values: merging two of them yields a new region and leaves
/// both inputs untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub xmin: f32,
    pub ymin: f32,
    pub xmax: f32,
    pub ymax: f32,
}

impl Region {
    pub fn new(xmin: f32, ymin: f32, xmax: f32, ymax: f32) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    pub fn width(&self) -> f32 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f32 {
        self.ymax - self.ymin
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// True for zero-area boxes and boxes with non-finite coordinates.
    ///
    /// A box with finite coordinates whose width or area overflows `f32` is
    /// not degenerate.
    pub fn is_degenerate(&self) -> bool {
        let finite = [self.xmin, self.ymin, self.xmax, self.ymax]
            .iter()
            .all(|v| v.is_finite());
        // NaN fails both comparisons
        !finite || !(self.width() > 0.0 && self.height() > 0.0)
    }

    /// Smallest region enclosing both `self` and `other`.
    pub fn union(&self, other: &Region) -> Region {
        Region {
            xmin: self.xmin.min(other.xmin),
            ymin: self.ymin.min(other.ymin),
            xmax: self.xmax.max(other.xmax),
            ymax: self.ymax.max(other.ymax),
        }
    }
}

impl BoundingBox for Region {
    fn bounds(&self) -> (f32, f32, f32, f32) {
        (self.xmin, self.ymin, self.xmax, self.ymax)
    }
}

/// Collapse a detector polygon to the axis-aligned box spanning all of its
/// vertices. Collinear or single-point polygons give a degenerate region,
/// which the size filter removes later.
pub fn polygon_to_region(polygon: &Polygon) -> Region {
    let mut region = Region::new(
        f32::INFINITY,
        f32::INFINITY,
        f32::NEG_INFINITY,
        f32::NEG_INFINITY,
    );

    for p in polygon {
        region.xmin = region.xmin.min(p.x);
        region.ymin = region.ymin.min(p.y);
        region.xmax = region.xmax.max(p.x);
        region.ymax = region.ymax.max(p.y);
    }

    region
}

/// Midpoint of a region.
pub fn center(region: &Region) -> (f32, f32) {
    region.center()
}

/// Intersection over union of two regions, in `[0, 1]`.
pub fn iou(a: &Region, b: &Region) -> f32 {
    iou_bounds(a.bounds(), b.bounds())
}

/// Intersection over union on raw `(xmin, ymin, xmax, ymax)` tuples.
///
/// Returns 0.0 for disjoint boxes and when the union has no area.
pub(crate) fn iou_bounds(a: (f32, f32, f32, f32), b: (f32, f32, f32, f32)) -> f32 {
    let (ax1, ay1, ax2, ay2) = a;
    let (bx1, by1, bx2, by2) = b;

    let ix1 = ax1.max(bx1);
    let iy1 = ay1.max(by1);
    let ix2 = ax2.min(bx2);
    let iy2 = ay2.min(by2);

    if ix2 < ix1 || iy2 < iy1 {
        return 0.0;
    }

    let intersection = (ix2 - ix1) * (iy2 - iy1);
    let area_a = (ax2 - ax1) * (ay2 - ay1);
    let area_b = (bx2 - bx1) * (by2 - by1);
    let union = area_a + area_b - intersection;

    if union > 0.0 {
        intersection / union
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(points: [(f32, f32); 4]) -> Polygon {
        points.map(|(x, y)| Point::new(x, y))
    }

    #[test]
    fn test_polygon_to_region_axis_aligned() {
        let poly = quad([(10.0, 5.0), (50.0, 5.0), (50.0, 25.0), (10.0, 25.0)]);
        assert_eq!(polygon_to_region(&poly), Region::new(10.0, 5.0, 50.0, 25.0));
    }

    #[test]
    fn test_polygon_to_region_ignores_vertex_order() {
        // Slightly rotated quad listed clockwise from bottom-right
        let poly = quad([(52.0, 27.0), (8.0, 24.0), (10.0, 3.0), (51.0, 6.0)]);
        assert_eq!(polygon_to_region(&poly), Region::new(8.0, 3.0, 52.0, 27.0));
    }

    #[test]
    fn test_polygon_to_region_single_point_is_degenerate() {
        let poly = quad([(7.0, 7.0); 4]);
        let region = polygon_to_region(&poly);
        assert_eq!(region, Region::new(7.0, 7.0, 7.0, 7.0));
        assert!(region.is_degenerate());
    }

    #[test]
    fn test_center() {
        let region = Region::new(0.0, 10.0, 40.0, 30.0);
        assert_eq!(center(&region), (20.0, 20.0));
    }

    #[test]
    fn test_iou_identical_and_disjoint() {
        let a = Region::new(0.0, 0.0, 10.0, 10.0);
        let b = Region::new(20.0, 20.0, 30.0, 30.0);
        assert_eq!(iou(&a, &a), 1.0);
        assert_eq!(iou(&a, &b), 0.0);
    }

    #[test]
    fn test_iou_half_overlap() {
        let a = Region::new(0.0, 0.0, 10.0, 10.0);
        let b = Region::new(5.0, 0.0, 15.0, 10.0);
        // 50 / (100 + 100 - 50)
        assert!((iou(&a, &b) - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_trait_iou_matches_free_function() {
        let a = Region::new(0.0, 0.0, 10.0, 10.0);
        let b = Region::new(4.0, 4.0, 14.0, 14.0);
        assert_eq!(a.iou(&b), iou(&a, &b));
    }

    #[test]
    fn test_iou_zero_union_does_not_divide_by_zero() {
        let a = Region::new(3.0, 3.0, 3.0, 3.0);
        assert_eq!(iou(&a, &a), 0.0);
    }

    #[test]
    fn test_degenerate_detection() {
        assert!(Region::new(0.0, 0.0, 0.0, 10.0).is_degenerate());
        assert!(Region::new(0.0, 0.0, f32::NAN, 10.0).is_degenerate());
        assert!(Region::new(0.0, 0.0, f32::INFINITY, 10.0).is_degenerate());
        assert!(!Region::new(0.0, 0.0, 1.0, 1.0).is_degenerate());
    }

    #[test]
    fn test_finite_box_with_overflowing_area_is_kept() {
        let region = Region::new(0.0, 0.0, 1.0e30, 1.0e30);
        assert!(region.area().is_infinite());
        assert!(!region.is_degenerate());
        assert!(!Region::new(-3.0e38, 0.0, 3.0e38, 1.0).is_degenerate());
    }

    #[test]
    fn test_point_serializes_as_pair() {
        let json = serde_json::to_string(&Point::new(1.5, 2.0)).unwrap();
        assert_eq!(json, "[1.5,2.0]");
        let poly: Polygon = serde_json::from_str("[[0,0],[4,0],[4,2],[0,2]]").unwrap();
        assert_eq!(polygon_to_region(&poly), Region::new(0.0, 0.0, 4.0, 2.0));
    }
}
