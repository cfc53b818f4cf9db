pub mod planner;

pub use planner::{reduce, Action, Change, PlannerService, PlannerState, Transition};
