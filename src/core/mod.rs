pub mod dataset;
pub mod journey;
pub mod sample;

pub use dataset::{Channel, Dataset, DatasetError, RawSample, TimeSeries};
pub use journey::{HudCounters, JourneyInformation};
pub use sample::{DisplaySample, Location, Reading};
