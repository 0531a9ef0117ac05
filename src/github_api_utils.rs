pub mod github_api_helper;
pub mod rate_limit;
