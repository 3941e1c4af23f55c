pub mod plan;
pub mod planner;
pub mod replan;
pub mod step;

pub use plan::Plan;
pub use planner::Planner;
pub use replan::ReplanDecision;
pub use step::Step;
