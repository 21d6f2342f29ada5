//! Single-deflection path planning
//!
//! The planner only looks at the straight line from start to goal and how it
//! meets the union of all obstacles:
//! - no contact: go straight
//! - a single touching point: pass through that point
//! - a single overlapping stretch shorter than the straight line: follow it
//! - anything else: go straight
//!
//! It does not route around obstacles, so a route may still cross a polygon
//! interior when the line passes through it.

use std::panic::{self, AssertUnwindSafe};

use geo::{BooleanOps, Coord, Line, MultiPolygon, Polygon};
use log::{debug, warn};

use crate::domain::{Deflection, Route, distance};
use crate::error::PlanError;
use crate::field::PolygonField;
use crate::geometry::{Crossing, segment_crossing};
use crate::selection::Role;

/// Plan a route between two points outside every polygon in `field`
///
/// # Returns
/// * `Ok(Route)` - Deterministic for identical inputs
/// * `Err(PlanError::InvalidEndpoint)` - An endpoint is non-finite, or inside or on a polygon
pub fn plan(field: &PolygonField, start: Coord<f64>, goal: Coord<f64>) -> Result<Route, PlanError> {
    for (role, point) in [(Role::Start, start), (Role::Goal, goal)] {
        let finite = point.x.is_finite() && point.y.is_finite();
        if !finite || field.contains(point) {
            return Err(PlanError::InvalidEndpoint {
                role,
                x: point.x,
                y: point.y,
            });
        }
    }

    let region = combined_region(field.polygons());
    Ok(route_through(start, goal, region.as_ref()))
}

/// Pick the route shape from how the straight line meets `region`
///
/// `None` means there is nothing to avoid.
fn route_through(
    start: Coord<f64>,
    goal: Coord<f64>,
    region: Option<&MultiPolygon<f64>>,
) -> Route {
    let direct = Route::direct(start, goal);
    let Some(region) = region else {
        return direct;
    };

    match segment_crossing(region, Line::new(start, goal)) {
        Crossing::Clear => direct,
        Crossing::Point(p) => Route::new(start, goal, Deflection::Touch(p)),
        Crossing::Segment(stretch) => {
            if distance(stretch.start, stretch.end) < distance(start, goal) {
                Route::new(start, goal, Deflection::Follow(stretch))
            } else {
                direct
            }
        }
        Crossing::Multiple(components) => {
            debug!(
                "straight line meets obstacles in {} places, keeping direct route",
                components
            );
            direct
        }
    }
}

/// Union of all polygons
///
/// Returns `None` for an empty field, or when the boolean-ops engine fails on
/// numerically degenerate input; callers treat both as "nothing in the way".
pub fn combined_region(polygons: &[Polygon<f64>]) -> Option<MultiPolygon<f64>> {
    let (first, rest) = polygons.split_first()?;

    isolate_union(polygons.len(), || {
        rest.iter()
            .fold(MultiPolygon::new(vec![first.clone()]), |acc, polygon| {
                acc.union(&MultiPolygon::new(vec![polygon.clone()]))
            })
    })
}

/// Run a union, turning a panic inside the boolean-ops engine into `None`
fn isolate_union<F>(count: usize, build: F) -> Option<MultiPolygon<f64>>
where
    F: FnOnce() -> MultiPolygon<f64>,
{
    match panic::catch_unwind(AssertUnwindSafe(build)) {
        Ok(region) => Some(region),
        Err(_) => {
            warn!(
                "union of {} polygons failed, treating obstacles as absent",
                count
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::GeneratorConfig;
    use crate::geometry::Domain;
    use geo::{Area, coord};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn field(rings: &[&[(f64, f64)]]) -> PolygonField {
        let rings: Vec<Vec<Coord<f64>>> = rings
            .iter()
            .map(|r| r.iter().map(|&(x, y)| coord! { x: x, y: y }).collect())
            .collect();
        PolygonField::from_polygons(Domain::default(), &rings).unwrap()
    }

    fn origin() -> Coord<f64> {
        coord! { x: 0.0, y: 0.0 }
    }

    fn far_corner() -> Coord<f64> {
        coord! { x: 10.0, y: 10.0 }
    }

    #[test]
    fn test_empty_field_direct_route() {
        let field = PolygonField::empty(Domain::default());
        let route = plan(&field, origin(), far_corner()).unwrap();
        assert_eq!(route.waypoints(), vec![origin(), far_corner()]);
        assert_eq!(route.deflection(), Deflection::Direct);
    }

    #[test]
    fn test_clear_line_of_sight() {
        let field = field(&[&[(6.0, 1.0), (9.0, 1.0), (9.0, 3.0)]]);
        let route = plan(&field, origin(), far_corner()).unwrap();
        assert_eq!(route.waypoints(), vec![origin(), far_corner()]);
    }

    #[test]
    fn test_single_touch_point() {
        let field = field(&[&[(5.0, 5.0), (8.0, 2.0), (9.0, 4.0)]]);
        let route = plan(&field, origin(), far_corner()).unwrap();

        let waypoints = route.waypoints();
        assert_eq!(waypoints.len(), 3);
        assert_eq!(waypoints[0], origin());
        assert_eq!(waypoints[2], far_corner());
        assert!((waypoints[1].x - 5.0).abs() < 1e-9);
        assert!((waypoints[1].y - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_follows_edge_on_line() {
        let field = field(&[&[(3.0, 3.0), (6.0, 6.0), (6.0, 3.0)]]);
        let route = plan(&field, origin(), far_corner()).unwrap();

        match route.deflection() {
            Deflection::Follow(stretch) => {
                assert!((stretch.start.x - 3.0).abs() < 1e-9);
                assert!((stretch.end.x - 6.0).abs() < 1e-9);
            }
            other => panic!("expected follow, got {:?}", other),
        }
        let waypoints = route.waypoints();
        assert_eq!(waypoints.len(), 2);
        assert!((waypoints[0].y - 3.0).abs() < 1e-9);
        assert!((waypoints[1].y - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_diagonal_through_square_is_the_chord() {
        let field = field(&[&[(4.0, 4.0), (6.0, 4.0), (6.0, 6.0), (4.0, 6.0)]]);
        let route = plan(&field, origin(), far_corner()).unwrap();

        let waypoints = route.waypoints();
        assert_eq!(waypoints.len(), 2);
        assert!((waypoints[0].x - 4.0).abs() < 1e-9);
        assert!((waypoints[0].y - 4.0).abs() < 1e-9);
        assert!((waypoints[1].x - 6.0).abs() < 1e-9);
        assert!((waypoints[1].y - 6.0).abs() < 1e-9);
        assert!((route.length() - 8.0_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_follow_is_ordered_from_start() {
        let field = field(&[&[(3.0, 3.0), (6.0, 6.0), (6.0, 3.0)]]);
        let route = plan(&field, far_corner(), origin()).unwrap();

        match route.deflection() {
            Deflection::Follow(stretch) => {
                assert!((stretch.start.x - 6.0).abs() < 1e-9);
                assert!((stretch.end.x - 3.0).abs() < 1e-9);
            }
            other => panic!("expected follow, got {:?}", other),
        }
    }

    #[test]
    fn test_several_obstacles_fall_back_to_direct() {
        let field = field(&[
            &[(1.0, 0.5), (3.0, 0.5), (3.0, 2.5), (1.0, 2.5)],
            &[(6.0, 5.0), (8.0, 5.0), (8.0, 8.0), (6.0, 8.0)],
        ]);
        let route = plan(&field, origin(), far_corner()).unwrap();
        assert_eq!(route.deflection(), Deflection::Direct);
    }

    #[test]
    fn test_rejects_endpoint_inside_polygon() {
        let field = field(&[&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]]);

        let err = plan(&field, coord! { x: 0.5, y: 0.5 }, far_corner()).unwrap_err();
        assert_eq!(
            err,
            PlanError::InvalidEndpoint {
                role: Role::Start,
                x: 0.5,
                y: 0.5
            }
        );

        let err = plan(&field, far_corner(), coord! { x: 1.0, y: 0.5 }).unwrap_err();
        assert!(matches!(
            err,
            PlanError::InvalidEndpoint {
                role: Role::Goal,
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_non_finite_endpoint() {
        let field = PolygonField::empty(Domain::default());
        let err = plan(&field, origin(), coord! { x: f64::NAN, y: 1.0 }).unwrap_err();
        assert!(matches!(
            err,
            PlanError::InvalidEndpoint {
                role: Role::Goal,
                ..
            }
        ));
    }

    #[test]
    fn test_plan_is_idempotent() {
        let config = GeneratorConfig::default()
            .with_seed(21)
            .with_max_attempts(500)
            .with_shrink(8, 0.5);
        let field = PolygonField::generate_with(10, Domain::default(), &config).unwrap();
        let mut rng = StdRng::seed_from_u64(21);

        for _ in 0..20 {
            let start = field.random_free_point(&mut rng, 10_000).unwrap();
            let goal = field.random_free_point(&mut rng, 10_000).unwrap();

            let first = plan(&field, start, goal).unwrap();
            let second = plan(&field, start, goal).unwrap();
            assert_eq!(first, second);
            assert_eq!((first.start(), first.goal()), (start, goal));

            let waypoints = first.waypoints();
            if !matches!(first.deflection(), Deflection::Follow(_)) {
                assert_eq!(waypoints.first(), Some(&start));
                assert_eq!(waypoints.last(), Some(&goal));
            }
        }
    }

    #[test]
    fn test_combined_region_of_disjoint_polygons() {
        let field = field(&[
            &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)],
            &[(5.0, 5.0), (7.0, 5.0), (7.0, 7.0), (5.0, 7.0)],
        ]);
        let region = combined_region(field.polygons()).unwrap();
        assert_eq!(region.0.len(), 2);
        assert!((region.unsigned_area() - 5.0).abs() < 1e-9);

        assert!(combined_region(&[]).is_none());
    }

    #[test]
    fn test_panicking_union_yields_none() {
        let region = isolate_union(3, || panic!("sweep line lost an event"));
        assert!(region.is_none());

        let square = field(&[&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]]);
        let region = isolate_union(1, || MultiPolygon::new(square.polygons().to_vec()));
        assert_eq!(region.map(|r| r.0.len()), Some(1));
    }

    #[test]
    fn test_failed_union_falls_back_to_direct() {
        // the line touches this triangle at (5, 5), but without a region
        // nothing is in the way
        let field = field(&[&[(5.0, 5.0), (8.0, 2.0), (9.0, 4.0)]]);
        let region = isolate_union(field.len(), || panic!("union failed"));

        let route = route_through(origin(), far_corner(), region.as_ref());
        assert_eq!(route, Route::direct(origin(), far_corner()));

        let region = combined_region(field.polygons());
        let route = route_through(origin(), far_corner(), region.as_ref());
        assert!(matches!(route.deflection(), Deflection::Touch(_)));
    }
}
