// src/services/mod.rs
//! One service per backend resource

pub mod auth_service;
pub mod catalog_service;
pub mod metrics_service;
pub mod process_service;
pub mod talent_service;

pub use auth_service::{AuthService, LoginOutcome, TokenEvent};
pub use catalog_service::{CatalogService, LanguagesService, SkillsService};
pub use metrics_service::MetricsService;
pub use process_service::ProcessService;
pub use talent_service::{TalentService, TalentStatistics};
