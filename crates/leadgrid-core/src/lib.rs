//! Shared domain model for the leadgrid workspace: geographic bounds and
//! grid subdivision, harvested lead records, the metered request budget,
//! domain canonicalization helpers, and configuration loading.

use thiserror::Error;

pub mod app_config;
pub mod budget;
pub mod campaigns;
pub mod config;
pub mod domain;
pub mod geo;
pub mod lead;

pub use app_config::{AppConfig, Environment};
pub use budget::{BudgetPeriod, RequestBudget};
pub use campaigns::{CampaignConfig, CampaignsFile};
pub use geo::{partition, GeoBound, GridCell, GridError};
pub use lead::LeadRecord;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read campaigns file at {path}")]
    CampaignsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse campaigns file")]
    CampaignsFileParse(#[from] serde_yaml::Error),

    #[error("campaign validation failed: {0}")]
    Validation(String),
}
