pub mod aggregator;
pub mod filter;
pub mod gender;
pub mod geographic;
pub mod query;

pub use crate::domain::model::{
    GenderSplit, GeographicDistribution, Normalized, ProgramYearRecord, StatisticsFilter,
    UniversityYearAggregate,
};
pub use crate::domain::ports::{ConfigProvider, DataProvider};
pub use crate::utils::error::Result;
