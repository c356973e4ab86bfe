//! Records returned by the remote profile API.
//!
//! Field names follow Rust conventions; serde maps them onto the camelCase wire format.
//! Unknown wire fields (e.g. `address.zipcode`, `address.geo`) are ignored.

use serde::{Deserialize, Serialize};

/// A user identity record, as returned by `GET /users/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u32,
    pub name: String,
    pub username: String,
    pub email: String,
    pub address: Address,
    pub phone: String,
    pub website: String,
    pub company: Company,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub suite: String,
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub name: String,
    pub catch_phrase: String,
    /// Business descriptor ("bs" on the wire).
    pub bs: String,
}

/// A post written by a user, as returned by `GET /posts?userId={id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: u32,
    pub title: String,
    pub body: String,
    pub user_id: u32,
}

/// A photo in an album, as returned by `GET /photos?albumId={id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub album_id: u32,
    pub id: u32,
    pub title: String,
    pub url: String,
    pub thumbnail_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_decodes_from_wire_shape_and_ignores_extras() {
        let raw = json!({
            "id": 1,
            "name": "Leanne Graham",
            "username": "Bret",
            "email": "Sincere@april.biz",
            "address": {
                "street": "Kulas Light",
                "suite": "Apt. 556",
                "city": "Gwenborough",
                "zipcode": "92998-3874",
                "geo": { "lat": "-37.3159", "lng": "81.1496" }
            },
            "phone": "1-770-736-8031 x56442",
            "website": "hildegard.org",
            "company": {
                "name": "Romaguera-Crona",
                "catchPhrase": "Multi-layered client-server neural-net",
                "bs": "harness real-time e-markets"
            }
        });

        let user: User = serde_json::from_value(raw).unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.address.city, "Gwenborough");
        assert_eq!(
            user.company.catch_phrase,
            "Multi-layered client-server neural-net"
        );
    }

    #[test]
    fn post_and_photo_use_camel_case_on_the_wire() {
        let post: Post = serde_json::from_value(json!({
            "userId": 3, "id": 21, "title": "t", "body": "b"
        }))
        .unwrap();
        assert_eq!(post.user_id, 3);

        let photo: Photo = serde_json::from_value(json!({
            "albumId": 3, "id": 101, "title": "p",
            "url": "https://via.placeholder.com/600/92c952",
            "thumbnailUrl": "https://via.placeholder.com/150/92c952"
        }))
        .unwrap();
        assert_eq!(photo.album_id, 3);
        assert!(photo.thumbnail_url.ends_with("/150/92c952"));

        let back = serde_json::to_value(&photo).unwrap();
        assert!(back.get("thumbnailUrl").is_some());
        assert!(back.get("thumbnail_url").is_none());
    }

    #[test]
    fn user_missing_nested_field_fails() {
        let res: Result<User, _> = serde_json::from_value(json!({
            "id": 1, "name": "n", "username": "u", "email": "e",
            "phone": "p", "website": "w",
            "company": { "name": "c", "catchPhrase": "x", "bs": "y" }
        }));
        assert!(res.is_err());
    }
}
