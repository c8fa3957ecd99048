//! Hit Index Module
//!
//! R-tree over the rendered polyline of one series, so distance and
//! nearest-point queries stay logarithmic for long spectra.

use crate::geom::{PixelPoint, point_segment_distance};
use rstar::{AABB, PointDistance, RTree, RTreeObject};

/// One polyline segment in pixel space, `a` being point `start`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CachedSegment {
    pub start: usize,
    pub a: PixelPoint,
    pub b: PixelPoint,
}

impl RTreeObject for CachedSegment {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.a.x, self.a.y], [self.b.x, self.b.y])
    }
}

impl PointDistance for CachedSegment {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let d = point_segment_distance(PixelPoint::new(point[0], point[1]), self.a, self.b);
        d * d
    }
}

/// One rendered point and its index in the series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CachedVertex {
    pub index: usize,
    pub at: PixelPoint,
}

impl RTreeObject for CachedVertex {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.at.x, self.at.y])
    }
}

impl PointDistance for CachedVertex {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = point[0] - self.at.x;
        let dy = point[1] - self.at.y;
        dx * dx + dy * dy
    }
}

/// Spatial index over a rendered polyline.
///
/// Points with non-finite pixels (from non-finite data) are left out, as are
/// the segments touching them.
#[derive(Default)]
pub struct HitIndex {
    segments: RTree<CachedSegment>,
    vertices: RTree<CachedVertex>,
}

impl std::fmt::Debug for HitIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HitIndex")
            .field("segments", &self.segments.size())
            .field("vertices", &self.vertices.size())
            .finish()
    }
}

impl HitIndex {
    pub fn from_polyline(pixels: &[PixelPoint]) -> Self {
        let vertices: Vec<CachedVertex> = pixels
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_finite())
            .map(|(index, &at)| CachedVertex { index, at })
            .collect();

        let mut segments: Vec<CachedSegment> = pixels
            .windows(2)
            .enumerate()
            .filter(|(_, w)| w[0].is_finite() && w[1].is_finite())
            .map(|(start, w)| CachedSegment {
                start,
                a: w[0],
                b: w[1],
            })
            .collect();
        // a lone point is a zero-length segment
        if pixels.len() == 1 && pixels[0].is_finite() {
            segments.push(CachedSegment {
                start: 0,
                a: pixels[0],
                b: pixels[0],
            });
        }

        Self {
            segments: RTree::bulk_load(segments),
            vertices: RTree::bulk_load(vertices),
        }
    }

    /// Minimum distance from `pt` to the polyline
    pub fn distance(&self, pt: PixelPoint) -> Option<f64> {
        let query = [pt.x, pt.y];
        self.segments
            .nearest_neighbor(&query)
            .map(|segment| segment.distance_2(&query).sqrt())
    }

    /// Index and distance of the rendered point closest to `pt`
    pub fn nearest_point(&self, pt: PixelPoint) -> Option<(usize, f64)> {
        let query = [pt.x, pt.y];
        self.vertices
            .nearest_neighbor(&query)
            .map(|vertex| (vertex.index, vertex.at.distance_to(pt)))
    }

    pub fn segment_count(&self) -> usize {
        self.segments.size()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.size() == 0
    }
}
