use super::switch_latest::SwitchLatest;
use crate::error::{ErrorInfo, FetchError};
use crate::gh_api_search_repo_response::Repository;
use crate::github_api_utils::github_api_helper::GithubApi;

use std::{sync::Arc, time::Duration};
use tokio::{
    sync::mpsc::{UnboundedReceiver, UnboundedSender},
    time::{sleep, Instant},
};

/// Result of one honored search request.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchUpdate {
    pub generation: u64,
    pub query: String,
    pub result: Result<Vec<Repository>, ErrorInfo>,
}

/// The stateless edges of the query pipeline: trimming + empty filtering
/// before the debounce, distinct-until-changed after it.
#[derive(Debug, Default)]
pub struct QueryGate {
    last_released: Option<String>,
}

impl QueryGate {
    /// Trims a raw text event, `None` when nothing is left.
    pub fn accept(raw: &str) -> Option<String> {
        let query = raw.trim();
        if query.is_empty() {
            None
        } else {
            Some(query.to_owned())
        }
    }

    /// Lets a debounced query through unless it equals the previous one.
    pub fn release(&mut self, query: String) -> Option<String> {
        if self.last_released.as_deref() == Some(query.as_str()) {
            return None;
        }
        self.last_released = Some(query.clone());
        Some(query)
    }
}

/// Runs the query pipeline until `queries` is closed and the latest request
/// has answered, or until nobody listens to `updates` anymore.
///
/// Every raw text event is trimmed and empty ones are dropped. The survivors
/// are debounced by `debounce`, deduplicated against the previously released
/// query, and each released query starts a search that supersedes the one in
/// flight. Failed searches are reported as `Err(ErrorInfo)`, the stream keeps
/// going.
pub async fn run_query_pipeline(
    api: Arc<dyn GithubApi>,
    debounce: Duration,
    mut queries: UnboundedReceiver<String>,
    updates: UnboundedSender<SearchUpdate>,
) {
    let mut gate = QueryGate::default();
    let mut switch: SwitchLatest<(String, Result<Vec<Repository>, FetchError>)> =
        SwitchLatest::new();
    let mut pending: Option<String> = None;
    let mut input_open = true;
    let timer = sleep(debounce);
    tokio::pin!(timer);

    loop {
        if !input_open && pending.is_none() && !switch.is_awaiting() {
            break;
        }

        tokio::select! {
            event = queries.recv(), if input_open => match event {
                Some(raw) => {
                    if let Some(query) = QueryGate::accept(&raw) {
                        pending = Some(query);
                        timer.as_mut().reset(Instant::now() + debounce);
                    }
                }
                None => {
                    debug!("Query input closed");
                    input_open = false;
                    // a pending query is flushed right away on completion
                    if let Some(query) = pending.take() {
                        dispatch(&api, &mut gate, &mut switch, query);
                    }
                }
            },
            () = &mut timer, if pending.is_some() => {
                if let Some(query) = pending.take() {
                    dispatch(&api, &mut gate, &mut switch, query);
                }
            },
            (generation, (query, result)) = switch.latest(), if switch.is_awaiting() => {
                let result = result.map_err(|err| {
                    error!("Couldn't search repositories for '{}'", query);
                    error!("{}", err);
                    ErrorInfo::search_failed(&err)
                });
                if updates.send(SearchUpdate { generation, query, result }).is_err() {
                    debug!("Search updates receiver dropped, stopping");
                    break;
                }
            },
            else => break,
        }
    }
}

fn dispatch(
    api: &Arc<dyn GithubApi>,
    gate: &mut QueryGate,
    switch: &mut SwitchLatest<(String, Result<Vec<Repository>, FetchError>)>,
    query: String,
) {
    let Some(query) = gate.release(query) else {
        debug!("Skipping unchanged query");
        return;
    };
    let api = api.clone();
    let generation = switch.spawn(async move {
        let result = api.search_repositories(&query).await;
        (query, result)
    });
    debug!("Started search #{}", generation);
}
