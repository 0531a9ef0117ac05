use super::{query_pipeline::SearchUpdate, selection_pipeline::OrganizationsUpdate};
use crate::error::PipelineClosed;
use crate::gh_api_organizations_response::Organization;
use crate::gh_api_search_repo_response::Repository;

use tokio::sync::mpsc::UnboundedSender;

/// What the search box and result list show.
pub struct SearchView {
    queries: UnboundedSender<String>,
    pub repositories: Vec<Repository>,
    pub error_message: Option<String>,
}

impl SearchView {
    pub fn new(queries: UnboundedSender<String>) -> Self {
        SearchView {
            queries,
            repositories: Vec::new(),
            error_message: None,
        }
    }

    /// Every keystroke clears the error message, then goes down the query pipeline.
    pub fn on_text_change(&mut self, text: &str) -> Result<(), PipelineClosed> {
        self.error_message = None;
        self.queries
            .send(text.to_owned())
            .map_err(|_| PipelineClosed)
    }

    /// Clearing the query doesn't clear the list, the last results stay.
    pub fn apply(&mut self, update: SearchUpdate) {
        match update.result {
            Ok(repositories) => {
                info!(
                    "Showing {} repositories for '{}'",
                    repositories.len(),
                    update.query
                );
                self.repositories = repositories;
                self.error_message = None;
            }
            Err(info) => {
                self.repositories = Vec::new();
                self.error_message = Some(info.message);
            }
        }
    }
}

/// What the organizations panel shows for the hovered/selected repository.
pub struct OrganizationsView {
    selections: UnboundedSender<Option<Repository>>,
    pub organizations: Vec<Organization>,
}

impl OrganizationsView {
    pub fn new(selections: UnboundedSender<Option<Repository>>) -> Self {
        OrganizationsView {
            selections,
            organizations: Vec::new(),
        }
    }

    pub fn on_repository_selected(
        &mut self,
        repository: Option<Repository>,
    ) -> Result<(), PipelineClosed> {
        self.selections.send(repository).map_err(|_| PipelineClosed)
    }

    pub fn apply(&mut self, update: OrganizationsUpdate) {
        self.organizations = update.organizations;
    }
}
