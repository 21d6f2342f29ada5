//! Intersection of a straight segment with a closed polygonal region
//!
//! # Algorithm
//! 1. Intersect the segment with every ring edge of the region, recording the
//!    segment parameter `t` of each contact (both ends of collinear overlaps)
//! 2. Sort and merge the parameters into breakpoints, adding `t = 0` and `t = 1`
//! 3. Between consecutive breakpoints the segment is entirely inside or entirely
//!    outside; probe each gap at its midpoint
//! 4. Runs of inside gaps become segment components, contact breakpoints with no
//!    inside gap on either side become point components

use geo::coordinate_position::{CoordPos, CoordinatePosition};
use geo::line_intersection::{LineIntersection, line_intersection};
use geo::{Coord, Line, MultiPolygon};

/// Breakpoints closer than this (in segment parameter space) are merged
const PARAM_EPSILON: f64 = 1e-12;

/// Shape of the intersection between a segment and a region
#[derive(Debug, Clone, PartialEq)]
pub enum Crossing {
    /// The segment does not touch the region
    Clear,
    /// The segment touches the region at exactly one point
    Point(Coord<f64>),
    /// The segment meets the region along exactly one sub-segment
    Segment(Line<f64>),
    /// The intersection has this many disconnected components
    Multiple(usize),
}

#[derive(Debug, Clone, Copy)]
struct Breakpoint {
    t: f64,
    contact: bool,
}

/// Classify how `segment` meets the closed region (interior plus boundary)
pub fn segment_crossing(region: &MultiPolygon<f64>, segment: Line<f64>) -> Crossing {
    let delta = segment.delta();
    let len_sq = delta.x * delta.x + delta.y * delta.y;

    if len_sq == 0.0 {
        return match region.coordinate_position(&segment.start) {
            CoordPos::Outside => Crossing::Clear,
            _ => Crossing::Point(segment.start),
        };
    }

    let param = |c: Coord<f64>| {
        let d = c - segment.start;
        ((d.x * delta.x + d.y * delta.y) / len_sq).clamp(0.0, 1.0)
    };
    let at = |t: f64| segment.start + delta * t;

    let mut breakpoints = vec![
        Breakpoint {
            t: 0.0,
            contact: false,
        },
        Breakpoint {
            t: 1.0,
            contact: false,
        },
    ];

    for polygon in region {
        let rings = std::iter::once(polygon.exterior()).chain(polygon.interiors());
        for edge in rings.flat_map(|ring| ring.lines()) {
            match line_intersection(segment, edge) {
                Some(LineIntersection::SinglePoint { intersection, .. }) => {
                    breakpoints.push(Breakpoint {
                        t: param(intersection),
                        contact: true,
                    });
                }
                Some(LineIntersection::Collinear { intersection }) => {
                    for end in [intersection.start, intersection.end] {
                        breakpoints.push(Breakpoint {
                            t: param(end),
                            contact: true,
                        });
                    }
                }
                None => {}
            }
        }
    }

    let breakpoints = merge_breakpoints(breakpoints);

    // inside[i] covers the open gap between breakpoints i and i + 1
    let inside: Vec<bool> = breakpoints
        .windows(2)
        .map(|pair| {
            let mid = at((pair[0].t + pair[1].t) / 2.0);
            region.coordinate_position(&mid) != CoordPos::Outside
        })
        .collect();

    let mut points = Vec::new();
    let mut segments = Vec::new();
    let mut run_start: Option<f64> = None;

    for (j, bp) in breakpoints.iter().enumerate() {
        let left = j > 0 && inside[j - 1];
        let right = j < inside.len() && inside[j];

        match (left, right) {
            (false, true) => run_start = Some(bp.t),
            (true, false) => {
                if let Some(t0) = run_start.take() {
                    segments.push((t0, bp.t));
                }
            }
            (false, false) if bp.contact => points.push(bp.t),
            _ => {}
        }
    }

    match (points.as_slice(), segments.as_slice()) {
        ([], []) => Crossing::Clear,
        ([t], []) => Crossing::Point(at(*t)),
        ([], [(t0, t1)]) => Crossing::Segment(Line::new(at(*t0), at(*t1))),
        _ => Crossing::Multiple(points.len() + segments.len()),
    }
}

fn merge_breakpoints(mut breakpoints: Vec<Breakpoint>) -> Vec<Breakpoint> {
    breakpoints.sort_by(|a, b| a.t.total_cmp(&b.t));

    let mut merged: Vec<Breakpoint> = Vec::with_capacity(breakpoints.len());
    for bp in breakpoints {
        match merged.last_mut() {
            Some(last) if (bp.t - last.t).abs() <= PARAM_EPSILON => {
                last.contact |= bp.contact;
            }
            _ => merged.push(bp),
        }
    }
    merged
}
