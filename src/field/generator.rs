use geo::{Coord, Polygon};
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::check_candidate;
use crate::defaults;
use crate::error::GenerationError;
use crate::geometry::Domain;

/// Tuning for random polygon generation
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Smallest edge count drawn per candidate
    pub min_edges: usize,
    /// Largest edge count drawn per candidate (inclusive)
    pub max_edges: usize,
    /// Candidates tried per sampling round before the window shrinks
    pub max_attempts: u32,
    /// Extra rounds with a smaller sampling window after the first one fails
    pub shrink_rounds: u32,
    /// Window side multiplier applied each round, in (0, 1]
    pub shrink_factor: f64,
    /// Fixed RNG seed for reproducible fields
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_edges: defaults::MIN_EDGES,
            max_edges: defaults::MAX_EDGES,
            max_attempts: defaults::MAX_ATTEMPTS,
            shrink_rounds: defaults::SHRINK_ROUNDS,
            shrink_factor: defaults::SHRINK_FACTOR,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Configure the fallback rounds used once full-domain sampling stalls
    pub fn with_shrink(mut self, rounds: u32, factor: f64) -> Self {
        self.shrink_rounds = rounds;
        self.shrink_factor = factor;
        self
    }

    pub fn with_edges(mut self, min_edges: usize, max_edges: usize) -> Self {
        self.min_edges = min_edges;
        self.max_edges = max_edges;
        self
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.min_edges < 3 || self.min_edges > self.max_edges {
            return Err(GenerationError::InvalidEdgeRange {
                min: self.min_edges,
                max: self.max_edges,
            });
        }
        if !(self.shrink_factor > 0.0 && self.shrink_factor <= 1.0) {
            return Err(GenerationError::InvalidShrinkFactor(self.shrink_factor));
        }
        Ok(())
    }

    /// Attempts available to a single polygon across all rounds
    pub fn attempt_budget(&self) -> u64 {
        self.max_attempts as u64 * (self.shrink_rounds as u64 + 1)
    }

    pub(crate) fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        }
    }
}

/// Rejection-sample `count` pairwise disjoint simple polygons
///
/// # Algorithm
/// For each polygon:
/// 1. Draw an edge count from `min_edges..=max_edges`
/// 2. Draw every vertex uniformly from the sampling window (the full domain in
///    the first round)
/// 3. Keep the first candidate that is simple, non-degenerate and disjoint from
///    every polygon accepted so far
/// 4. After `max_attempts` failures, shrink the window by `shrink_factor` and
///    retry, up to `shrink_rounds` times
pub(crate) fn generate_polygons(
    count: usize,
    domain: &Domain,
    config: &GeneratorConfig,
) -> Result<Vec<Polygon<f64>>, GenerationError> {
    config.validate()?;

    let mut rng = config.rng();
    let mut accepted: Vec<Polygon<f64>> = Vec::with_capacity(count);

    for index in 0..count {
        match place_polygon(&mut rng, domain, config, &accepted) {
            Some((polygon, attempts)) => {
                debug!(
                    "placed polygon {}/{} with {} vertices after {} attempts",
                    index + 1,
                    count,
                    polygon.exterior().0.len() - 1,
                    attempts
                );
                accepted.push(polygon);
            }
            None => {
                return Err(GenerationError::Exhausted {
                    placed: accepted.len(),
                    requested: count,
                    attempts: config.attempt_budget(),
                });
            }
        }
    }

    Ok(accepted)
}

fn place_polygon(
    rng: &mut StdRng,
    domain: &Domain,
    config: &GeneratorConfig,
    accepted: &[Polygon<f64>],
) -> Option<(Polygon<f64>, u64)> {
    let mut attempts = 0u64;

    for round in 0..=config.shrink_rounds {
        let scale = config.shrink_factor.powi(round as i32);
        if round > 0 {
            debug!(
                "polygon {}: shrinking sampling window to {:.4}",
                accepted.len() + 1,
                domain.size * scale
            );
        }

        for _ in 0..config.max_attempts {
            attempts += 1;
            let window = domain.random_window(scale, rng);
            let edges = rng.random_range(config.min_edges..=config.max_edges);
            let vertices: Vec<Coord<f64>> = (0..edges)
                .map(|_| domain.clamp(window.sample(rng)))
                .collect();

            match check_candidate(&vertices, accepted) {
                Ok(polygon) => return Some((polygon, attempts)),
                Err(rejection) => trace!("candidate rejected: {}", rejection),
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GeneratorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_edges, 3);
        assert_eq!(config.max_edges, 7);
    }

    #[test]
    fn test_invalid_edge_range() {
        let config = GeneratorConfig::default().with_edges(2, 5);
        assert_eq!(
            config.validate(),
            Err(GenerationError::InvalidEdgeRange { min: 2, max: 5 })
        );

        let config = GeneratorConfig::default().with_edges(6, 4);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_shrink_factor() {
        let config = GeneratorConfig::default().with_shrink(2, 0.0);
        assert_eq!(
            config.validate(),
            Err(GenerationError::InvalidShrinkFactor(0.0))
        );
        let config = GeneratorConfig::default().with_shrink(2, 1.5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_attempt_budget() {
        let config = GeneratorConfig::default()
            .with_max_attempts(100)
            .with_shrink(3, 0.5);
        assert_eq!(config.attempt_budget(), 400);
    }

    #[test]
    fn test_edge_counts_within_range() {
        let config = GeneratorConfig::default().with_seed(11).with_edges(4, 5);
        let polygons = generate_polygons(6, &Domain::default(), &config).unwrap();

        for polygon in &polygons {
            let vertices = polygon.exterior().0.len() - 1;
            assert!((4..=5).contains(&vertices), "got {} vertices", vertices);
        }
    }

    #[test]
    fn test_budget_exhaustion() {
        let config = GeneratorConfig::default()
            .with_seed(1)
            .with_max_attempts(1)
            .with_shrink(0, 1.0);

        let err = generate_polygons(200, &Domain::default(), &config).unwrap_err();
        match err {
            GenerationError::Exhausted {
                placed,
                requested,
                attempts,
            } => {
                assert!(placed < 200);
                assert_eq!(requested, 200);
                assert_eq!(attempts, 1);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
