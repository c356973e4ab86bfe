//! Plain-text rendering of a loaded profile.

use std::io::{self, Write};

use profile::{Phase, ProfileState};

/// Write `state` as a human-readable block. Partial data is rendered as far as it goes.
pub fn render_profile<W: Write>(out: &mut W, state: &ProfileState) -> io::Result<()> {
    let emoji = state.random_emoji.map(String::from).unwrap_or_default();

    match &state.user {
        Some(user) => {
            writeln!(out, "{} {} (@{})", emoji, user.name, user.username)?;
            writeln!(out, "  email:   {}", user.email)?;
            writeln!(out, "  phone:   {}", user.phone)?;
            writeln!(out, "  website: {}", user.website)?;
            writeln!(
                out,
                "  address: {}, {}, {}",
                user.address.street, user.address.suite, user.address.city
            )?;
            writeln!(
                out,
                "  company: {} ({})",
                user.company.name, user.company.catch_phrase
            )?;
        }
        None => match state.requested_id {
            Some(id) => writeln!(out, "{} user #{} not loaded", emoji, id)?,
            None => writeln!(out, "no profile loaded")?,
        },
    }

    let highlights = state.highlights().photos_from_7_to_10();
    if !highlights.is_empty() {
        writeln!(out)?;
        writeln!(out, "Highlights:")?;
        for photo in highlights {
            writeln!(out, "  - {} <{}>", photo.title, photo.thumbnail_url)?;
        }
    }

    if !state.user_posts.is_empty() {
        writeln!(out)?;
        writeln!(out, "Posts ({}):", state.user_posts.len())?;
        for post in &state.user_posts {
            writeln!(out, "  - {}", post.title)?;
        }
    }

    if let Some(failure) = &state.failure {
        writeln!(out)?;
        writeln!(out, "Error fetching {}: {}", failure.stage, failure.error)?;
    } else if state.phase.is_loading() {
        writeln!(out)?;
        writeln!(out, "(interrupted while {})", phase_label(state.phase))?;
    }
    Ok(())
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::LoadingUser => "loading user",
        Phase::LoadingPhotos => "loading photos",
        Phase::LoadingPosts => "loading posts",
        Phase::Idle => "idle",
        Phase::Ready => "ready",
        Phase::Errored => "errored",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use profile::contract::error::DataClientError;
    use profile::model::{Address, Company, Photo, Post, User};
    use profile::{Stage, StageFailure};

    fn user() -> User {
        User {
            id: 3,
            name: "Ann".into(),
            username: "ann".into(),
            email: "ann@example.com".into(),
            address: Address {
                street: "Main St".into(),
                suite: "1".into(),
                city: "Springfield".into(),
            },
            phone: "555".into(),
            website: "ann.dev".into(),
            company: Company {
                name: "Acme".into(),
                catch_phrase: "We make things".into(),
                bs: "synergy".into(),
            },
        }
    }

    fn photos(n: u32) -> Vec<Photo> {
        (0..n)
            .map(|i| Photo {
                album_id: 3,
                id: i,
                title: format!("photo {i}"),
                url: format!("https://img.example/600/{i}"),
                thumbnail_url: format!("https://img.example/150/{i}"),
            })
            .collect()
    }

    fn render(state: &ProfileState) -> String {
        let mut buf = Vec::new();
        render_profile(&mut buf, state).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn ready_profile_lists_highlights_and_posts() {
        let state = ProfileState {
            phase: Phase::Ready,
            requested_id: Some(3),
            user: Some(user()),
            user_photos: photos(10),
            user_posts: vec![Post {
                id: 1,
                title: "hello".into(),
                body: "world".into(),
                user_id: 3,
            }],
            random_emoji: Some('😀'),
            failure: None,
            revision: 4,
        };

        let text = render(&state);
        assert!(text.starts_with("😀 Ann (@ann)"));
        assert!(text.contains("address: Main St, 1, Springfield"));
        assert!(text.contains("photo 7"));
        assert!(text.contains("photo 9"));
        assert!(!text.contains("photo 6 "));
        assert!(text.contains("Posts (1):"));
        assert!(!text.contains("Error"));
    }

    #[test]
    fn errored_profile_keeps_partial_data() {
        let state = ProfileState {
            phase: Phase::Errored,
            requested_id: Some(3),
            user: Some(user()),
            failure: Some(StageFailure {
                stage: Stage::Photos,
                error: DataClientError::http_status("/photos?albumId=3", 500),
            }),
            ..Default::default()
        };

        let text = render(&state);
        assert!(text.contains("Ann"));
        assert!(!text.contains("Highlights"));
        assert!(text.contains("Error fetching photos"));
    }

    #[test]
    fn interrupted_before_user() {
        let state = ProfileState {
            phase: Phase::LoadingUser,
            requested_id: Some(8),
            ..Default::default()
        };

        let text = render(&state);
        assert!(text.contains("user #8 not loaded"));
        assert!(text.contains("interrupted while loading user"));
    }
}
