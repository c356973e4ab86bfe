#![allow(dead_code)]

//! Shared fixtures for profile integration tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{Notify, Semaphore};

use profile::contract::client::DataClient;
use profile::contract::error::DataClientError;
use profile::contract::model::{Address, Company, Photo, Post, User};
use profile::Stage;

pub fn user(id: u32, name: &str) -> User {
    User {
        id,
        name: name.to_string(),
        username: name.to_lowercase(),
        email: format!("{}@example.com", name.to_lowercase()),
        address: Address {
            street: "Kulas Light".into(),
            suite: "Apt. 556".into(),
            city: "Gwenborough".into(),
        },
        phone: "1-770-736-8031".into(),
        website: "example.org".into(),
        company: Company {
            name: "Romaguera-Crona".into(),
            catch_phrase: "Multi-layered client-server neural-net".into(),
            bs: "harness real-time e-markets".into(),
        },
    }
}

pub fn photos(album_id: u32, n: u32) -> Vec<Photo> {
    (0..n)
        .map(|i| Photo {
            album_id,
            id: album_id * 100 + i,
            title: format!("album {album_id} photo {i}"),
            url: format!("https://img.example/600/{album_id}-{i}"),
            thumbnail_url: format!("https://img.example/150/{album_id}-{i}"),
        })
        .collect()
}

pub fn posts(user_id: u32, n: u32) -> Vec<Post> {
    (0..n)
        .map(|i| Post {
            id: user_id * 10 + i,
            title: format!("post {i} by {user_id}"),
            body: "lorem ipsum".into(),
            user_id,
        })
        .collect()
}

/// Holds one fetch pending until released.
#[derive(Clone)]
pub struct Gate {
    entered: Arc<Notify>,
    release: Arc<Semaphore>,
}

impl Gate {
    fn new() -> Self {
        Self {
            entered: Arc::new(Notify::new()),
            release: Arc::new(Semaphore::new(0)),
        }
    }

    /// Resolves once the gated fetch has started waiting.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Let the gated fetch complete.
    pub fn open(&self) {
        self.release.add_permits(1);
    }

    async fn pass(&self) {
        self.entered.notify_one();
        if let Ok(permit) = self.release.acquire().await {
            permit.forget();
        }
    }
}

/// In-memory `DataClient` with per-id data, injectable failures, gates and a call log.
#[derive(Default)]
pub struct MockDataClient {
    users: HashMap<u32, User>,
    photos: HashMap<u32, Vec<Photo>>,
    posts: HashMap<u32, Vec<Post>>,
    failures: HashMap<(Stage, u32), DataClientError>,
    gates: HashMap<(Stage, u32), Gate>,
    calls: Mutex<Vec<(Stage, u32)>>,
}

impl MockDataClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.users.insert(user.id, user);
        self
    }

    pub fn with_photos(mut self, album_id: u32, photos: Vec<Photo>) -> Self {
        self.photos.insert(album_id, photos);
        self
    }

    pub fn with_posts(mut self, user_id: u32, posts: Vec<Post>) -> Self {
        self.posts.insert(user_id, posts);
        self
    }

    /// Complete profile: user, `n_photos` photos in album `id`, `n_posts` posts.
    pub fn with_profile(self, id: u32, name: &str, n_photos: u32, n_posts: u32) -> Self {
        self.with_user(user(id, name))
            .with_photos(id, photos(id, n_photos))
            .with_posts(id, posts(id, n_posts))
    }

    pub fn failing(mut self, stage: Stage, id: u32, error: DataClientError) -> Self {
        self.failures.insert((stage, id), error);
        self
    }

    pub fn gated(mut self, stage: Stage, id: u32) -> (Self, Gate) {
        let gate = Gate::new();
        self.gates.insert((stage, id), gate.clone());
        (self, gate)
    }

    pub fn calls(&self) -> Vec<(Stage, u32)> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self, stage: Stage) -> usize {
        self.calls.lock().iter().filter(|(s, _)| *s == stage).count()
    }

    async fn enter(&self, stage: Stage, id: u32) -> Result<(), DataClientError> {
        self.calls.lock().push((stage, id));
        if let Some(gate) = self.gates.get(&(stage, id)) {
            gate.pass().await;
        }
        match self.failures.get(&(stage, id)) {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DataClient for MockDataClient {
    async fn fetch_user(&self, id: u32) -> Result<User, DataClientError> {
        self.enter(Stage::User, id).await?;
        self.users
            .get(&id)
            .cloned()
            .ok_or_else(|| DataClientError::http_status(format!("/users/{id}"), 404))
    }

    async fn fetch_posts_for_user(&self, user_id: u32) -> Result<Vec<Post>, DataClientError> {
        self.enter(Stage::Posts, user_id).await?;
        Ok(self.posts.get(&user_id).cloned().unwrap_or_default())
    }

    async fn fetch_photos_for_album(&self, album_id: u32) -> Result<Vec<Photo>, DataClientError> {
        self.enter(Stage::Photos, album_id).await?;
        Ok(self.photos.get(&album_id).cloned().unwrap_or_default())
    }
}
