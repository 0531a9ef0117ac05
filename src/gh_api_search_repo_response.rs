use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};

/// Classification of the account owning a repository.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OwnerType {
    User,
    Organization,
    Bot,
    #[serde(other)]
    Unknown,
}

impl FromStr for OwnerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(OwnerType::User),
            "org" | "organization" => Ok(OwnerType::Organization),
            "bot" => Ok(OwnerType::Bot),
            other => Err(format!("unknown owner type '{other}'")),
        }
    }
}

impl fmt::Display for OwnerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            OwnerType::User => "User",
            OwnerType::Organization => "Organization",
            OwnerType::Bot => "Bot",
            OwnerType::Unknown => "Unknown",
        };
        f.write_str(tag)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOwner {
    pub login: String,
    pub id: u64,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub url: String,
    // empty strings are as good as missing
    #[serde(default, deserialize_with = "non_empty_url")]
    pub organizations_url: Option<String>,
    #[serde(rename = "type")]
    pub owner_type: OwnerType,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub owner: RepositoryOwner,
    pub description: Option<String>,
}

impl Repository {
    pub fn organizations_url(&self) -> Option<&str> {
        self.owner.organizations_url.as_deref()
    }
}

/// Envelope of `GET /search/repositories`.
/// `items` holds a single page, so its length may be smaller than `total_count`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SearchResponse {
    pub total_count: u64,
    pub incomplete_results: bool,
    pub items: Vec<Repository>,
}

fn non_empty_url<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let url: Option<String> = Option::deserialize(deserializer)?;
    Ok(url.filter(|url| !url.trim().is_empty()))
}
