pub mod downside;
pub mod sizing;
