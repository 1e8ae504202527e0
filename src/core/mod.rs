pub mod capacity;
pub mod flow;
pub mod units;
pub mod validation;
