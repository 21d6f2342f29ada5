//! Start/goal acquisition
//!
//! Points arrive one at a time (typically from clicks). The first free point
//! becomes the start, the second the goal; after that the selection is
//! complete and further points are rejected until a new session begins.

use std::fmt;

use geo::Coord;

use crate::field::PolygonField;

/// Which endpoint a point was accepted as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Start,
    Goal,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Start => write!(f, "start"),
            Role::Goal => write!(f, "goal"),
        }
    }
}

/// Why a candidate point was not taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The point is inside or on the boundary of a polygon
    InsidePolygon,
    /// Start and goal are already chosen
    AlreadyComplete,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::InsidePolygon => write!(f, "point lies inside a polygon"),
            RejectReason::AlreadyComplete => write!(f, "start and goal are already selected"),
        }
    }
}

/// Outcome of offering a point to the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Accepted(Role),
    Rejected(RejectReason),
}

/// Progress through `Empty -> StartSet -> Complete`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Empty,
    StartSet {
        start: Coord<f64>,
    },
    Complete {
        start: Coord<f64>,
        goal: Coord<f64>,
    },
}

/// Endpoint selection bound to one field
#[derive(Debug, Clone)]
pub struct SelectionState<'a> {
    field: &'a PolygonField,
    phase: Phase,
}

impl<'a> SelectionState<'a> {
    pub fn new(field: &'a PolygonField) -> Self {
        Self {
            field,
            phase: Phase::Empty,
        }
    }

    /// Offer a point; the state only changes when the point is accepted
    pub fn try_set_point(&mut self, candidate: Coord<f64>) -> Selection {
        if self.field.contains(candidate) {
            return Selection::Rejected(RejectReason::InsidePolygon);
        }

        match self.phase {
            Phase::Empty => {
                self.phase = Phase::StartSet { start: candidate };
                Selection::Accepted(Role::Start)
            }
            Phase::StartSet { start } => {
                self.phase = Phase::Complete {
                    start,
                    goal: candidate,
                };
                Selection::Accepted(Role::Goal)
            }
            Phase::Complete { .. } => Selection::Rejected(RejectReason::AlreadyComplete),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn start(&self) -> Option<Coord<f64>> {
        match self.phase {
            Phase::Empty => None,
            Phase::StartSet { start } | Phase::Complete { start, .. } => Some(start),
        }
    }

    pub fn goal(&self) -> Option<Coord<f64>> {
        match self.phase {
            Phase::Complete { goal, .. } => Some(goal),
            _ => None,
        }
    }

    /// `(start, goal)` once both are chosen
    pub fn endpoints(&self) -> Option<(Coord<f64>, Coord<f64>)> {
        match self.phase {
            Phase::Complete { start, goal } => Some((start, goal)),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.phase, Phase::Complete { .. })
    }
}
