use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use url::Url;

/// Configuration for the profile module (`modules.profile` in the app config).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ProfileConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_min_user_id")]
    pub min_user_id: u32,
    #[serde(default = "default_max_user_id")]
    pub max_user_id: u32,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            min_user_id: default_min_user_id(),
            max_user_id: default_max_user_id(),
        }
    }
}

impl ProfileConfig {
    /// Check the values and return the parsed base URL.
    pub fn validate(&self) -> anyhow::Result<Url> {
        if self.min_user_id == 0 {
            bail!("min_user_id must be at least 1");
        }
        if self.min_user_id > self.max_user_id {
            bail!(
                "min_user_id ({}) must not exceed max_user_id ({})",
                self.min_user_id,
                self.max_user_id
            );
        }
        let url = Url::parse(&self.base_url)
            .with_context(|| format!("invalid base_url '{}'", self.base_url))?;
        if url.cannot_be_a_base() {
            bail!("base_url '{}' cannot be used as a base", self.base_url);
        }
        Ok(url)
    }

    /// Inclusive range the random user id is drawn from.
    pub fn user_ids(&self) -> RangeInclusive<u32> {
        self.min_user_id..=self.max_user_id
    }
}

fn default_base_url() -> String {
    "https://jsonplaceholder.typicode.com".to_string()
}

fn default_min_user_id() -> u32 {
    1
}

fn default_max_user_id() -> u32 {
    10
}
