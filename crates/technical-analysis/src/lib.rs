pub mod indicators;
pub mod snapshot;


pub use indicators::*;
pub use snapshot::IndicatorEngine;
