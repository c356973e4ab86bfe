use async_trait::async_trait;

use crate::contract::{
    error::DataClientError,
    model::{Photo, Post, User},
};

/// Read-only access to the remote profile API.
///
/// Every call is independent: no shared mutable state, no timeout, no retry. A call that
/// never completes stalls only its caller, which is expected to cancel it.
#[async_trait]
pub trait DataClient: Send + Sync {
    /// `GET /users/{id}`
    async fn fetch_user(&self, id: u32) -> Result<User, DataClientError>;

    /// `GET /posts?userId={id}`. An empty list is a valid answer.
    async fn fetch_posts_for_user(&self, user_id: u32) -> Result<Vec<Post>, DataClientError>;

    /// `GET /photos?albumId={id}`. An empty list is a valid answer.
    async fn fetch_photos_for_album(&self, album_id: u32) -> Result<Vec<Photo>, DataClientError>;
}
