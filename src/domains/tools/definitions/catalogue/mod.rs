//! data.gov.my data catalogue tools.
//!
//! Each catalogue dataset is one passthrough tool:
//! - `datasets`: the static table of datasets and their filters
//! - `query`: translation of call arguments into `id` / `filter` parameters
//! - `tool`: the MCP tool wrapping a dataset

pub mod datasets;
pub mod query;
pub mod tool;

pub use datasets::{
    ALL_DATASETS, BIRTHS, Dataset, FUELPRICE, HH_INCOME, POPULATION_MALAYSIA, POPULATION_STATE,
};
pub use query::RemoteQuery;
pub use tool::CatalogueTool;
