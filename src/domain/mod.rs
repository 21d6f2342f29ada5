pub mod route;

pub use route::{Deflection, Route, distance};
