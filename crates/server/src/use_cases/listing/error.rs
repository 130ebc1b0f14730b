use crate::infrastructure::ports::RepoError;

#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    #[error(transparent)]
    Repo(#[from] RepoError),
}
