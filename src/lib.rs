//! Client library for the Wired People recruiting backend: typed REST access
//! to talents, processes, catalogs and panel metrics, plus session handling,
//! CSV export and seeded demo-data enrichment.

pub mod cli;
pub mod context;
pub mod core;
pub mod enrichment;
pub mod export;
pub mod listing;
pub mod services;
pub mod types;

pub use crate::context::AppContext;
pub use crate::core::{ApiError, ConfigManager, HttpClient, Repository};
pub use crate::listing::ListingState;
pub use crate::types::{validate_filters, Paginated, Talent, TalentFilters};
