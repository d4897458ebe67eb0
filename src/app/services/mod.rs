pub mod artifacts;
pub mod compose;
pub mod lifecycle;
pub mod report;
