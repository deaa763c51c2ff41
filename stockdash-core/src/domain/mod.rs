//! Domain types: bars, series columns, and company profiles.

pub mod bar;
pub mod profile;
pub mod series;

pub use bar::Bar;
pub use profile::{CompanyProfile, Metric, MetricGroup};
pub use series::{finite, Column, Series};
