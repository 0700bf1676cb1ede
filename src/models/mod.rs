pub mod attempt;
pub mod attendance;
pub mod coordinate;
pub mod event;
