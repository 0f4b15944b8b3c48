use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Grid granularities a campaign may request: 2×2, 3×3 or 5×5 cells.
pub const SUPPORTED_GRANULARITIES: [u32; 3] = [2, 3, 5];

/// One named search campaign: what to search for and where.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignConfig {
    pub name: String,
    /// Search text passed to the area search API, e.g. `"marketing agency"`.
    pub query: String,
    /// Place name resolved to a bound by the geocoder, e.g. `"Charleston, SC"`.
    pub area: String,
    /// Grid granularity n (the area is split into n×n cells).
    pub grid: u32,
    pub notes: Option<String>,
}

impl CampaignConfig {
    /// Generate a URL-safe slug from the campaign name.
    #[must_use]
    pub fn slug(&self) -> String {
        self.name
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' {
                    c
                } else if c == ' ' {
                    '-'
                } else {
                    '\0'
                }
            })
            .filter(|&c| c != '\0')
            .collect::<String>()
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }
}

#[derive(Debug, Deserialize)]
pub struct CampaignsFile {
    pub campaigns: Vec<CampaignConfig>,
}

/// Load and validate the campaigns configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_campaigns(path: &Path) -> Result<CampaignsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CampaignsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let campaigns_file: CampaignsFile =
        serde_yaml::from_str(&content).map_err(ConfigError::CampaignsFileParse)?;

    validate_campaigns(&campaigns_file)?;

    Ok(campaigns_file)
}

fn validate_campaigns(campaigns_file: &CampaignsFile) -> Result<(), ConfigError> {
    let mut seen_slugs = HashSet::new();

    for campaign in &campaigns_file.campaigns {
        if campaign.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "campaign name must be non-empty".to_string(),
            ));
        }

        if campaign.query.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "campaign '{}' has an empty query",
                campaign.name
            )));
        }

        if campaign.area.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "campaign '{}' has an empty area",
                campaign.name
            )));
        }

        if !SUPPORTED_GRANULARITIES.contains(&campaign.grid) {
            return Err(ConfigError::Validation(format!(
                "campaign '{}' has unsupported grid granularity {}; must be 2, 3, or 5",
                campaign.name, campaign.grid
            )));
        }

        let slug = campaign.slug();
        if !seen_slugs.insert(slug.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate campaign slug: '{slug}' (from campaign '{}')",
                campaign.name
            )));
        }
    }

    Ok(())
}
