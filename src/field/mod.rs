//! Polygon fields: generation, construction and containment queries

pub mod generator;

use std::fmt;

use geo::coordinate_position::{CoordPos, CoordinatePosition};
use geo::{Coord, Intersects, Polygon};
use rand::Rng;

use crate::error::{FieldError, GenerationError};
use crate::geometry::{Domain, RingDefect, build_ring};

pub use generator::GeneratorConfig;

/// Why a candidate polygon was not added to a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateRejection {
    /// The ring itself is not a usable simple polygon
    Ring(RingDefect),
    /// The candidate shares at least one point with an accepted polygon
    Overlaps { index: usize },
}

impl fmt::Display for CandidateRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateRejection::Ring(defect) => write!(f, "{}", defect),
            CandidateRejection::Overlaps { index } => {
                write!(f, "intersects accepted polygon {}", index)
            }
        }
    }
}

/// Validate a candidate ring against the polygons already in a field
pub fn check_candidate(
    vertices: &[Coord<f64>],
    accepted: &[Polygon<f64>],
) -> Result<Polygon<f64>, CandidateRejection> {
    let polygon = build_ring(vertices).map_err(CandidateRejection::Ring)?;

    if let Some(index) = accepted.iter().position(|p| p.intersects(&polygon)) {
        return Err(CandidateRejection::Overlaps { index });
    }

    Ok(polygon)
}

/// An immutable set of pairwise disjoint simple polygons inside a square domain
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonField {
    domain: Domain,
    polygons: Vec<Polygon<f64>>,
}

impl PolygonField {
    /// A field with no obstacles
    pub fn empty(domain: Domain) -> Self {
        Self {
            domain,
            polygons: Vec::new(),
        }
    }

    /// Generate `count` random polygons with the default generator settings
    pub fn generate(count: usize, domain: Domain) -> Result<Self, GenerationError> {
        Self::generate_with(count, domain, &GeneratorConfig::default())
    }

    /// Generate `count` random polygons
    ///
    /// # Returns
    /// * `Ok(PolygonField)` - Exactly `count` polygons, in acceptance order
    /// * `Err(GenerationError)` - Invalid settings or exhausted retry budget
    pub fn generate_with(
        count: usize,
        domain: Domain,
        config: &GeneratorConfig,
    ) -> Result<Self, GenerationError> {
        let polygons = generator::generate_polygons(count, &domain, config)?;
        Ok(Self { domain, polygons })
    }

    /// Build a field from explicit vertex rings, applying the same checks as generation
    pub fn from_polygons(domain: Domain, rings: &[Vec<Coord<f64>>]) -> Result<Self, FieldError> {
        let mut polygons: Vec<Polygon<f64>> = Vec::with_capacity(rings.len());

        for (index, ring) in rings.iter().enumerate() {
            if !ring.iter().all(|&c| domain.contains(c)) {
                return Err(FieldError::OutOfDomain { index });
            }

            let polygon = check_candidate(ring, &polygons)
                .map_err(|reason| FieldError::Invalid { index, reason })?;
            polygons.push(polygon);
        }

        Ok(Self { domain, polygons })
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn polygons(&self) -> &[Polygon<f64>] {
        &self.polygons
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// True if `point` lies inside or on the boundary of any polygon
    pub fn contains(&self, point: Coord<f64>) -> bool {
        self.polygons
            .iter()
            .any(|p| p.coordinate_position(&point) != CoordPos::Outside)
    }

    /// Sample a domain point outside every polygon
    ///
    /// Returns `None` if `max_attempts` samples all landed inside obstacles.
    pub fn random_free_point<R: Rng>(&self, rng: &mut R, max_attempts: u32) -> Option<Coord<f64>> {
        (0..max_attempts)
            .map(|_| self.domain.sample(rng))
            .find(|&c| !self.contains(c))
    }
}
