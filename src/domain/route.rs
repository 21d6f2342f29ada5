use geo::{Coord, Line};

/// How the planned route departs from the straight start-goal line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Deflection {
    /// Clear line of sight
    Direct,
    /// The straight line grazes an obstacle at a single point
    Touch(Coord<f64>),
    /// The route is this obstacle stretch alone, ordered from the start side
    Follow(Line<f64>),
}

/// A planned path from start to goal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Route {
    start: Coord<f64>,
    goal: Coord<f64>,
    deflection: Deflection,
}

impl Route {
    pub fn new(start: Coord<f64>, goal: Coord<f64>, deflection: Deflection) -> Self {
        Self {
            start,
            goal,
            deflection,
        }
    }

    pub fn direct(start: Coord<f64>, goal: Coord<f64>) -> Self {
        Self::new(start, goal, Deflection::Direct)
    }

    pub fn start(&self) -> Coord<f64> {
        self.start
    }

    pub fn goal(&self) -> Coord<f64> {
        self.goal
    }

    pub fn deflection(&self) -> Deflection {
        self.deflection
    }

    /// Ordered polyline vertices
    ///
    /// `[start, goal]` for a direct route and `[start, P, goal]` for a touch.
    /// A follow route is the stretch's two ends `[A, B]`, nearest the start
    /// first; it does not repeat start or goal.
    pub fn waypoints(&self) -> Vec<Coord<f64>> {
        match self.deflection {
            Deflection::Direct => vec![self.start, self.goal],
            Deflection::Touch(p) => vec![self.start, p, self.goal],
            Deflection::Follow(line) => vec![line.start, line.end],
        }
    }

    /// Total polyline length
    pub fn length(&self) -> f64 {
        self.waypoints()
            .windows(2)
            .map(|pair| distance(pair[0], pair[1]))
            .sum()
    }
}

pub fn distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let d = b - a;
    d.x.hypot(d.y)
}
