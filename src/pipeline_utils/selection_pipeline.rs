use super::switch_latest::SwitchLatest;
use crate::error::FetchError;
use crate::gh_api_organizations_response::Organization;
use crate::gh_api_search_repo_response::Repository;
use crate::github_api_utils::github_api_helper::GithubApi;

use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// Organizations of the most recently selected repository's owner.
/// Empty when nothing is selected, the owner has no organizations url, or
/// the fetch failed.
#[derive(Debug, Clone, PartialEq)]
pub struct OrganizationsUpdate {
    pub generation: u64,
    pub organizations: Vec<Organization>,
}

/// Runs the selection pipeline until `selections` is closed and the latest
/// fetch has answered, or until nobody listens to `updates` anymore.
///
/// No debounce here: every selection supersedes the previous one at once.
/// Failures are logged and turned into an empty list, they never reach the
/// user-facing error message.
pub async fn run_selection_pipeline(
    api: Arc<dyn GithubApi>,
    mut selections: UnboundedReceiver<Option<Repository>>,
    updates: UnboundedSender<OrganizationsUpdate>,
) {
    let mut switch: SwitchLatest<Result<Vec<Organization>, FetchError>> = SwitchLatest::new();
    let mut input_open = true;

    loop {
        if !input_open && !switch.is_awaiting() {
            break;
        }

        let update = tokio::select! {
            event = selections.recv(), if input_open => match event {
                Some(selection) => {
                    let url = selection
                        .as_ref()
                        .and_then(|repo| repo.organizations_url())
                        .map(str::to_owned);
                    match url {
                        Some(url) => {
                            info!("Getting organizations of the selected owner from {}", url);
                            let api = api.clone();
                            switch.spawn(async move { api.fetch_organizations(&url).await });
                            None
                        }
                        None => {
                            info!("No organizations url for the current selection");
                            Some(OrganizationsUpdate {
                                generation: switch.supersede(),
                                organizations: Vec::new(),
                            })
                        }
                    }
                }
                None => {
                    debug!("Selection input closed");
                    input_open = false;
                    None
                }
            },
            (generation, result) = switch.latest(), if switch.is_awaiting() => {
                let organizations = result.unwrap_or_else(|err| {
                    error!("Couldn't get the organizations of the selected owner");
                    error!("{}", err);
                    Vec::new()
                });
                Some(OrganizationsUpdate { generation, organizations })
            },
            else => break,
        };

        if let Some(update) = update {
            if updates.send(update).is_err() {
                debug!("Organizations updates receiver dropped, stopping");
                break;
            }
        }
    }
}
