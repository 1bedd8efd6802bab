// src/core/mod.rs
//! Transport plumbing shared by every feature service

pub mod config_manager;
pub mod fs_ops;
pub mod http_client;
pub mod repository;
pub mod token_inspect;
pub mod token_store;

pub use config_manager::ConfigManager;
pub use fs_ops::FsOps;
pub use http_client::{ApiError, ApiResponse, HttpClient, RequestConfig, RequestOptions};
pub use repository::Repository;
pub use token_inspect::{inspect_token, TokenInfo};
pub use token_store::{FileTokenStore, MemoryTokenStore, Session, TokenStore};
