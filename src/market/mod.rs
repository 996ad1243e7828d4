pub mod presets;
pub mod strikes;
