mod equipment;
mod stats;

pub use equipment::*;
pub use stats::*;
