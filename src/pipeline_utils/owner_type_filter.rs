use crate::gh_api_search_repo_response::{OwnerType, Repository};

/// Returns a stage keeping only the repositories owned by an account of
/// `owner_type`. Order is preserved and the input is left untouched.
pub fn filter_by_owner_type(owner_type: OwnerType) -> impl Fn(&[Repository]) -> Vec<Repository> {
    move |repositories: &[Repository]| {
        repositories
            .iter()
            .filter(|repo| repo.owner.owner_type == owner_type)
            .cloned()
            .collect()
    }
}
