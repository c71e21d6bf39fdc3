//! Tool definitions module.
//!
//! - `catalogue`: passthrough tools for the data catalogue API, one per dataset
//! - `registration_car`: the car registrations CSV download and filter
//! - `common`: filter tables, input schemas and result helpers

pub mod catalogue;
pub mod common;
pub mod registration_car;

pub use catalogue::{CatalogueTool, Dataset, RemoteQuery};
pub use registration_car::{RegistrationCarTool, RegistrationFilter, filter_rows};
