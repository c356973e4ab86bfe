use std::future::Future;
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::Rng;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

use crate::contract::client::DataClient;
use crate::contract::error::DataClientError;
use crate::contract::model::{Photo, Post, User};
use crate::domain::emoji::random_emoji;
use crate::domain::state::{Phase, ProfileState, Stage, StageEvent, StageFailure};
use modkit::{Lifecycle, LifecycleError};

/// How long re-activation waits for a revoked chain to unwind before aborting it.
const STOP_GRACE: Duration = Duration::from_secs(1);

/// State plus the activation it belongs to. Writes are accepted only for the current
/// generation.
#[derive(Debug, Default)]
struct Shared {
    state: ProfileState,
    generation: u64,
}

/// Loads and holds one user's profile: user, then photos, then posts.
///
/// Each activation runs its fetch chain as a background task under a single cancellation
/// token. `deactivate` (or dropping the view) revokes the token while holding the state
/// lock, so once it returns no result from that activation can reach the state.
/// Concurrent activations of one view run one at a time; the last one wins.
pub struct ProfileView {
    client: Arc<dyn DataClient>,
    user_ids: RangeInclusive<u32>,
    shared: Arc<Mutex<Shared>>,
    lifecycle: Lifecycle,
    activation: tokio::sync::Mutex<()>,
}

impl ProfileView {
    pub const DEFAULT_USER_IDS: RangeInclusive<u32> = 1..=10;

    pub fn new(client: Arc<dyn DataClient>) -> Self {
        Self {
            client,
            user_ids: Self::DEFAULT_USER_IDS,
            shared: Arc::new(Mutex::new(Shared::default())),
            lifecycle: Lifecycle::new(),
            activation: tokio::sync::Mutex::new(()),
        }
    }

    /// Draw activation ids from `ids` instead of `1..=10`.
    pub fn with_user_ids(mut self, ids: RangeInclusive<u32>) -> Self {
        self.user_ids = ids;
        self
    }

    /// Start a new activation for a uniformly random user id. Returns the chosen id.
    pub async fn activate(&self) -> Result<u32, LifecycleError> {
        let id = if self.user_ids.is_empty() {
            *self.user_ids.start()
        } else {
            rand::rng().random_range(self.user_ids.clone())
        };
        self.activate_with_id(id).await?;
        Ok(id)
    }

    /// Start a new activation for `id`, tearing down any previous one first.
    #[instrument(name = "profile.view.activate", skip(self), fields(user_id = id))]
    pub async fn activate_with_id(&self, id: u32) -> Result<(), LifecycleError> {
        // Held across teardown, reset and start.
        let _activation = self.activation.lock().await;
        self.deactivate();
        self.lifecycle.stop(STOP_GRACE).await?;

        let emoji = random_emoji(&mut rand::rng());
        let generation = {
            let mut shared = self.shared.lock();
            shared.generation += 1;
            let revision = shared.state.revision;
            shared.state = ProfileState::activated(id, emoji, revision);
            shared.generation
        };
        debug!(generation, %emoji, "activation started");

        let chain = Chain {
            client: self.client.clone(),
            shared: self.shared.clone(),
            generation,
        };
        self.lifecycle
            .start(move |cancel| async move { chain.run(id, cancel).await })
    }

    /// Revoke the current activation. Idempotent; returns `true` only if a chain was still
    /// running and this call revoked it.
    ///
    /// The state keeps whatever was loaded before the call.
    pub fn deactivate(&self) -> bool {
        let _state = self.shared.lock();
        let revoked = self.lifecycle.cancel();
        if revoked {
            debug!("activation revoked");
        }
        revoked
    }

    /// Wait until the current chain is done (settled or revoked) and return the phase.
    pub async fn wait_settled(&self) -> Phase {
        self.lifecycle.wait_stopped().await;
        self.phase()
    }

    pub fn phase(&self) -> Phase {
        self.shared.lock().state.phase
    }

    /// Copy of the whole state.
    pub fn snapshot(&self) -> ProfileState {
        self.shared.lock().state.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.shared.lock().state.user.clone()
    }

    pub fn photos(&self) -> Vec<Photo> {
        self.shared.lock().state.user_photos.clone()
    }

    pub fn posts(&self) -> Vec<Post> {
        self.shared.lock().state.user_posts.clone()
    }

    /// Photos 7..10 of the loaded album.
    pub fn highlights(&self) -> Vec<Photo> {
        self.shared
            .lock()
            .state
            .highlights()
            .photos_from_7_to_10()
            .to_vec()
    }

    pub fn emoji(&self) -> Option<char> {
        self.shared.lock().state.random_emoji
    }

    pub fn failure(&self) -> Option<StageFailure> {
        self.shared.lock().state.failure.clone()
    }

    /// Mutation counter of the state.
    pub fn revision(&self) -> u64 {
        self.shared.lock().state.revision
    }
}

impl Drop for ProfileView {
    fn drop(&mut self) {
        self.deactivate();
    }
}

// ----- load chain ------------------------------------------------------------

/// The background half of an activation.
struct Chain {
    client: Arc<dyn DataClient>,
    shared: Arc<Mutex<Shared>>,
    generation: u64,
}

impl Chain {
    async fn run(self, id: u32, cancel: CancellationToken) -> anyhow::Result<()> {
        let Some(user) = self
            .stage(Stage::User, &cancel, self.client.fetch_user(id))
            .await
        else {
            return Ok(());
        };
        let user_id = user.id;
        let name = user.name.clone();
        if !self.commit(&cancel, StageEvent::UserLoaded(user)) {
            return Ok(());
        }
        info!(user_id, %name, "user");

        // Album id is taken to be the user id.
        let Some(photos) = self
            .stage(
                Stage::Photos,
                &cancel,
                self.client.fetch_photos_for_album(user_id),
            )
            .await
        else {
            return Ok(());
        };
        let count = photos.len();
        if !self.commit(&cancel, StageEvent::PhotosLoaded(photos)) {
            return Ok(());
        }
        info!(count, "photos");

        let Some(posts) = self
            .stage(
                Stage::Posts,
                &cancel,
                self.client.fetch_posts_for_user(user_id),
            )
            .await
        else {
            return Ok(());
        };
        let count = posts.len();
        if self.commit(&cancel, StageEvent::PostsLoaded(posts)) {
            info!(count, "posts");
        }
        Ok(())
    }

    /// Await one fetch unless revoked first. Failures are logged and recorded; `None`
    /// means the chain stops here.
    async fn stage<T>(
        &self,
        stage: Stage,
        cancel: &CancellationToken,
        fetch: impl Future<Output = Result<T, DataClientError>>,
    ) -> Option<T> {
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(%stage, "stage revoked before completion");
                return None;
            }
            res = fetch => res,
        };

        match result {
            Ok(value) => Some(value),
            Err(e) => {
                error!(%stage, error = %e, "Error fetching {}", stage);
                self.commit(cancel, StageEvent::Failed(StageFailure { stage, error: e }));
                None
            }
        }
    }

    /// Apply an event if this activation is still current and not revoked.
    fn commit(&self, cancel: &CancellationToken, event: StageEvent) -> bool {
        let mut shared = self.shared.lock();
        if shared.generation != self.generation || cancel.is_cancelled() {
            debug!("dropping result of a revoked activation");
            return false;
        }
        shared.state.apply(event)
    }
}
