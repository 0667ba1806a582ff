use moviephile_sources::SourceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Please sign in to manage your watchlist")]
    NotSignedIn,
    #[error(transparent)]
    Source(#[from] SourceError),
    /// Reading or writing the session file
    #[error(transparent)]
    Session(#[from] anyhow::Error),
}
