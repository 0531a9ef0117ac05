//! Debounced github repository search with owner organizations lookup.
//!
//! Text events go through the query pipeline (trim, drop empty, debounce,
//! distinct, switch-to-latest search), repository selections go through the
//! selection pipeline (switch-to-latest organizations fetch). Both pipelines
//! run as tokio tasks and report to the view state over channels.

#[macro_use]
extern crate log;

pub mod config;
pub mod error;
pub mod gh_api_organizations_response;
pub mod gh_api_search_repo_response;
pub mod github_api_utils;
pub mod pipeline_utils;

pub use config::Config;
pub use error::{ConfigError, ErrorInfo, FetchError, PipelineClosed, SEARCH_ERROR_MESSAGE};
pub use gh_api_organizations_response::Organization;
pub use gh_api_search_repo_response::{OwnerType, Repository, RepositoryOwner, SearchResponse};
pub use github_api_utils::github_api_helper::{GithubApi, GithubClient};
pub use pipeline_utils::{
    owner_type_filter::filter_by_owner_type,
    query_pipeline::{run_query_pipeline, QueryGate, SearchUpdate},
    selection_pipeline::{run_selection_pipeline, OrganizationsUpdate},
    switch_latest::SwitchLatest,
    view_state::{OrganizationsView, SearchView},
};
