// Data models for pose input, shot events and analysis output

pub mod analysis;
pub mod pose;
pub mod shot;
pub mod trajectory;

pub use analysis::*;
pub use pose::*;
pub use shot::*;
pub use trajectory::*;
