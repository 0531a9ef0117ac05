#![allow(dead_code)]

use async_trait::async_trait;
use repo_finder::{
    FetchError, GithubApi, Organization, OwnerType, Repository, RepositoryOwner,
};
use reqwest::StatusCode;
use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
    time::Duration,
};

/// In-memory github: answers after a configurable (virtual) delay and records
/// every call it gets.
#[derive(Default)]
pub struct FakeApi {
    searches: Mutex<Vec<String>>,
    org_fetches: Mutex<Vec<String>>,
    delays: HashMap<String, Duration>,
    failing: HashSet<String>,
}

impl FakeApi {
    /// Delays the answer for a query or organizations url.
    pub fn delay(mut self, key: &str, delay: Duration) -> Self {
        self.delays.insert(key.to_owned(), delay);
        self
    }

    /// Makes a query or organizations url fail with a 500.
    pub fn failing(mut self, key: &str) -> Self {
        self.failing.insert(key.to_owned());
        self
    }

    pub fn searches(&self) -> Vec<String> {
        self.searches.lock().unwrap().clone()
    }

    pub fn org_fetches(&self) -> Vec<String> {
        self.org_fetches.lock().unwrap().clone()
    }

    async fn answer<T>(&self, key: &str, value: T) -> Result<T, FetchError> {
        if let Some(delay) = self.delays.get(key) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(key) {
            return Err(FetchError::Status {
                url: key.to_owned(),
                status: StatusCode::INTERNAL_SERVER_ERROR,
            });
        }
        Ok(value)
    }
}

#[async_trait]
impl GithubApi for FakeApi {
    async fn search_repositories(&self, query: &str) -> Result<Vec<Repository>, FetchError> {
        self.searches.lock().unwrap().push(query.to_owned());
        self.answer(query, vec![repository(1, query, None)]).await
    }

    async fn fetch_organizations(&self, url: &str) -> Result<Vec<Organization>, FetchError> {
        self.org_fetches.lock().unwrap().push(url.to_owned());
        let org = Organization {
            login: Some(url.to_owned()),
            ..Organization::default()
        };
        self.answer(url, vec![org]).await
    }
}

pub fn repository(id: u64, name: &str, organizations_url: Option<&str>) -> Repository {
    Repository {
        id,
        name: name.to_owned(),
        full_name: format!("owner/{name}"),
        owner: RepositoryOwner {
            login: "owner".to_owned(),
            id: 100 + id,
            avatar_url: String::new(),
            url: "https://api.github.com/users/owner".to_owned(),
            organizations_url: organizations_url.map(str::to_owned),
            owner_type: OwnerType::User,
        },
        description: None,
    }
}
