use std::fmt;

use crate::contract::error::DataClientError;
use crate::contract::model::{Photo, Post, User};
use crate::domain::highlights::HighlightsView;

/// Where a profile activation is in its load chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    LoadingUser,
    LoadingPhotos,
    LoadingPosts,
    Ready,
    Errored,
}

impl Phase {
    #[inline]
    pub fn is_loading(self) -> bool {
        matches!(
            self,
            Phase::LoadingUser | Phase::LoadingPhotos | Phase::LoadingPosts
        )
    }

    /// `Ready` or `Errored`: nothing further will happen in this activation.
    #[inline]
    pub fn is_settled(self) -> bool {
        matches!(self, Phase::Ready | Phase::Errored)
    }

    /// Stage whose result this phase is waiting for.
    pub fn pending_stage(self) -> Option<Stage> {
        match self {
            Phase::LoadingUser => Some(Stage::User),
            Phase::LoadingPhotos => Some(Stage::Photos),
            Phase::LoadingPosts => Some(Stage::Posts),
            _ => None,
        }
    }
}

/// One of the three sequential fetch steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    User,
    Photos,
    Posts,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::User => "user",
            Stage::Photos => "photos",
            Stage::Posts => "posts",
        })
    }
}

/// The error that stopped an activation, tagged with the stage it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageFailure {
    pub stage: Stage,
    pub error: DataClientError,
}

/// Results delivered by the load chain.
#[derive(Debug, Clone)]
pub(crate) enum StageEvent {
    UserLoaded(User),
    PhotosLoaded(Vec<Photo>),
    PostsLoaded(Vec<Post>),
    Failed(StageFailure),
}

/// Everything one activation has loaded so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileState {
    pub phase: Phase,
    /// Id the activation asked for; the loaded user's id normally matches.
    pub requested_id: Option<u32>,
    pub user: Option<User>,
    pub user_photos: Vec<Photo>,
    pub user_posts: Vec<Post>,
    pub random_emoji: Option<char>,
    pub failure: Option<StageFailure>,
    /// Bumped on every accepted mutation; lets observers detect writes.
    pub revision: u64,
}

impl ProfileState {
    /// Fresh state for a new activation. The revision keeps counting from `previous_revision`.
    pub(crate) fn activated(requested_id: u32, emoji: char, previous_revision: u64) -> Self {
        Self {
            phase: Phase::LoadingUser,
            requested_id: Some(requested_id),
            random_emoji: Some(emoji),
            revision: previous_revision + 1,
            ..Default::default()
        }
    }

    /// Advance the state machine. Events that do not match the current phase are refused
    /// and leave the state untouched, so `Ready` is reachable only through every stage.
    pub(crate) fn apply(&mut self, event: StageEvent) -> bool {
        match (self.phase, event) {
            (Phase::LoadingUser, StageEvent::UserLoaded(user)) => {
                self.user = Some(user);
                self.phase = Phase::LoadingPhotos;
            }
            (Phase::LoadingPhotos, StageEvent::PhotosLoaded(photos)) => {
                self.user_photos = photos;
                self.phase = Phase::LoadingPosts;
            }
            (Phase::LoadingPosts, StageEvent::PostsLoaded(posts)) => {
                self.user_posts = posts;
                self.phase = Phase::Ready;
            }
            (phase, StageEvent::Failed(failure))
                if phase.pending_stage() == Some(failure.stage) =>
            {
                self.failure = Some(failure);
                self.phase = Phase::Errored;
            }
            _ => return false,
        }
        self.revision += 1;
        true
    }

    /// Highlights over the loaded photos.
    pub fn highlights(&self) -> HighlightsView<'_> {
        HighlightsView::new(&self.user_photos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::model::{Address, Company};

    fn user(id: u32) -> User {
        User {
            id,
            name: "Ann".into(),
            username: "ann".into(),
            email: "ann@example.com".into(),
            address: Address {
                street: "s".into(),
                suite: "1".into(),
                city: "c".into(),
            },
            phone: "0".into(),
            website: "ann.example".into(),
            company: Company {
                name: "co".into(),
                catch_phrase: "cp".into(),
                bs: "bs".into(),
            },
        }
    }

    fn failure(stage: Stage) -> StageFailure {
        StageFailure {
            stage,
            error: DataClientError::http_status("/x", 500),
        }
    }

    #[test]
    fn happy_path_walks_every_phase() {
        let mut s = ProfileState::activated(3, '😀', 0);
        assert_eq!(s.phase, Phase::LoadingUser);
        assert_eq!(s.revision, 1);

        assert!(s.apply(StageEvent::UserLoaded(user(3))));
        assert_eq!(s.phase, Phase::LoadingPhotos);
        assert!(s.apply(StageEvent::PhotosLoaded(vec![])));
        assert_eq!(s.phase, Phase::LoadingPosts);
        assert!(s.apply(StageEvent::PostsLoaded(vec![])));
        assert_eq!(s.phase, Phase::Ready);
        assert_eq!(s.revision, 4);
        assert!(s.phase.is_settled());
    }

    #[test]
    fn out_of_order_events_are_refused() {
        let mut s = ProfileState::activated(3, '😀', 0);
        assert!(!s.apply(StageEvent::PostsLoaded(vec![])));
        assert!(!s.apply(StageEvent::PhotosLoaded(vec![])));
        assert_eq!(s.phase, Phase::LoadingUser);
        assert_eq!(s.revision, 1);

        let mut idle = ProfileState::default();
        assert!(!idle.apply(StageEvent::UserLoaded(user(1))));
        assert_eq!(idle, ProfileState::default());
    }

    #[test]
    fn failure_keeps_partial_data_and_absorbs() {
        let mut s = ProfileState::activated(3, '😀', 0);
        s.apply(StageEvent::UserLoaded(user(3)));
        assert!(s.apply(StageEvent::Failed(failure(Stage::Photos))));
        assert_eq!(s.phase, Phase::Errored);
        assert_eq!(s.user.as_ref().map(|u| u.id), Some(3));
        assert_eq!(s.failure.as_ref().map(|f| f.stage), Some(Stage::Photos));

        // Errored is absorbing.
        assert!(!s.apply(StageEvent::PostsLoaded(vec![])));
        assert!(!s.apply(StageEvent::Failed(failure(Stage::Posts))));
        assert_eq!(s.phase, Phase::Errored);
    }

    #[test]
    fn failure_for_wrong_stage_is_refused() {
        let mut s = ProfileState::activated(3, '😀', 0);
        assert!(!s.apply(StageEvent::Failed(failure(Stage::Posts))));
        assert_eq!(s.phase, Phase::LoadingUser);
    }

    #[test]
    fn activation_keeps_revision_monotonic() {
        let s = ProfileState::activated(1, '😀', 41);
        assert_eq!(s.revision, 42);
        assert!(s.user.is_none());
        assert!(s.user_photos.is_empty());
        assert!(s.user_posts.is_empty());
    }

    #[test]
    fn stage_names() {
        assert_eq!(Stage::User.to_string(), "user");
        assert_eq!(Stage::Photos.to_string(), "photos");
        assert_eq!(Stage::Posts.to_string(), "posts");
        assert_eq!(Phase::LoadingPhotos.pending_stage(), Some(Stage::Photos));
        assert_eq!(Phase::Ready.pending_stage(), None);
    }
}
