//! Ring validation for candidate polygons
//!
//! A ring is accepted when it has at least 3 distinct vertices, no two edges
//! share a point other than the common vertex of neighbouring edges, and it
//! encloses non-zero area.

use std::fmt;

use geo::line_intersection::{LineIntersection, line_intersection};
use geo::{Area, Coord, Line, LineString, Polygon};

/// Rings below this area are treated as collapsed
const MIN_RING_AREA: f64 = 1e-12;

/// Why a vertex ring cannot form a simple polygon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingDefect {
    TooFewVertices(usize),
    DuplicateVertex,
    SelfIntersecting,
    ZeroArea,
}

impl fmt::Display for RingDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RingDefect::TooFewVertices(n) => write!(f, "ring has {} vertices, need at least 3", n),
            RingDefect::DuplicateVertex => write!(f, "ring repeats a vertex"),
            RingDefect::SelfIntersecting => write!(f, "ring edges cross or touch"),
            RingDefect::ZeroArea => write!(f, "ring encloses no area"),
        }
    }
}

/// Build a hole-free polygon from an open or closed vertex ring
///
/// # Returns
/// * `Ok(Polygon)` - The ring is simple and encloses area
/// * `Err(RingDefect)` - The first defect found
pub fn build_ring(vertices: &[Coord<f64>]) -> Result<Polygon<f64>, RingDefect> {
    let open = strip_closing_vertex(vertices);

    if open.len() < 3 {
        return Err(RingDefect::TooFewVertices(open.len()));
    }

    if has_duplicate(open) {
        return Err(RingDefect::DuplicateVertex);
    }

    if !is_simple(open) {
        return Err(RingDefect::SelfIntersecting);
    }

    let polygon = Polygon::new(LineString::from(open.to_vec()), vec![]);
    if polygon.unsigned_area() <= MIN_RING_AREA {
        return Err(RingDefect::ZeroArea);
    }

    Ok(polygon)
}

fn strip_closing_vertex(vertices: &[Coord<f64>]) -> &[Coord<f64>] {
    match vertices {
        [first, .., last] if vertices.len() > 3 && first == last => &vertices[..vertices.len() - 1],
        _ => vertices,
    }
}

fn has_duplicate(ring: &[Coord<f64>]) -> bool {
    ring.iter()
        .enumerate()
        .any(|(i, a)| ring[i + 1..].iter().any(|b| a == b))
}

/// Check that an open ring does not intersect itself
///
/// Neighbouring edges may only meet at their shared vertex; any other contact,
/// including collinear overlap, makes the ring non-simple.
pub fn is_simple(ring: &[Coord<f64>]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let edge = |i: usize| Line::new(ring[i], ring[(i + 1) % n]);

    for i in 0..n {
        for j in (i + 1)..n {
            let shared = if j == i + 1 {
                Some(ring[j])
            } else if i == 0 && j == n - 1 {
                Some(ring[0])
            } else {
                None
            };

            match (line_intersection(edge(i), edge(j)), shared) {
                (None, _) => {}
                (Some(LineIntersection::SinglePoint { intersection, .. }), Some(vertex))
                    if intersection == vertex => {}
                (Some(_), _) => return false,
            }
        }
    }

    true
}
