pub mod budget;
pub mod executor;

pub use budget::StepBudget;
pub use executor::ActionLoop;
