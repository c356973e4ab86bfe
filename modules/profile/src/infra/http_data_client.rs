use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::contract::client::DataClient;
use crate::contract::error::DataClientError;
use crate::contract::model::{Photo, Post, User};
use modkit::TracedClient;

/// `DataClient` backed by the remote REST API.
///
/// One instance is built per process and shared; `TracedClient` clones share the pool.
#[derive(Clone, Debug)]
pub struct HttpDataClient {
    client: TracedClient,
    base: Url,
}

impl HttpDataClient {
    pub fn new(client: TracedClient, base: Url) -> Self {
        Self { client, base }
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Build `{base}/{segments..}?{query..}`, keeping any path prefix of the base.
    fn endpoint(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<Url, DataClientError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| DataClientError::network(self.base.as_str(), "invalid base URL"))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, DataClientError> {
        let endpoint = format!(
            "{}{}",
            url.path(),
            url.query().map(|q| format!("?{q}")).unwrap_or_default()
        );

        let response = self
            .client
            .get(url.as_str())
            .await
            .map_err(|e| DataClientError::network(&endpoint, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataClientError::http_status(&endpoint, status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| DataClientError::network(&endpoint, e.to_string()))?;

        serde_json::from_slice(&body)
            .map_err(|e| DataClientError::decode(&endpoint, e.to_string()))
    }
}

#[async_trait]
impl DataClient for HttpDataClient {
    #[instrument(
        name = "profile.http.fetch_user",
        skip_all,
        fields(base = %self.base, user_id = id)
    )]
    async fn fetch_user(&self, id: u32) -> Result<User, DataClientError> {
        let id = id.to_string();
        let url = self.endpoint(&["users", id.as_str()], &[])?;
        let user: User = self.get_json(url).await?;
        debug!(user_id = user.id, "fetched user");
        Ok(user)
    }

    #[instrument(
        name = "profile.http.fetch_posts_for_user",
        skip_all,
        fields(base = %self.base, user_id = user_id)
    )]
    async fn fetch_posts_for_user(&self, user_id: u32) -> Result<Vec<Post>, DataClientError> {
        let url = self.endpoint(&["posts"], &[("userId", user_id.to_string())])?;
        let posts: Vec<Post> = self.get_json(url).await?;
        debug!(count = posts.len(), "fetched posts");
        Ok(posts)
    }

    #[instrument(
        name = "profile.http.fetch_photos_for_album",
        skip_all,
        fields(base = %self.base, album_id = album_id)
    )]
    async fn fetch_photos_for_album(&self, album_id: u32) -> Result<Vec<Photo>, DataClientError> {
        let url = self.endpoint(&["photos"], &[("albumId", album_id.to_string())])?;
        let photos: Vec<Photo> = self.get_json(url).await?;
        debug!(count = photos.len(), "fetched photos");
        Ok(photos)
    }
}
