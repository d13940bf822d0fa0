//! Route resolution.
//!
//! Every operation the client exposes maps to one variant here. A route
//! knows its HTTP method, which host it lives on, its path, and any query
//! items the route itself mandates (bulk lookups carry their `ids` list as
//! part of the route, not as caller-supplied query).

use chirp_client::{ClientConfig, Method};

/// The closed set of endpoints this crate can call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `GET /2/tweets/:id`
    Tweet { id: String },
    /// `GET /2/tweets?ids=...`
    Tweets { ids: Vec<String> },
    /// `POST /2/tweets`
    CreateTweet,
    /// `DELETE /2/tweets/:id`
    DeleteTweet { id: String },
    /// `GET /2/users/:id`
    User { id: String },
    /// `GET /2/users?ids=...`
    Users { ids: Vec<String> },
    /// `GET /2/users/by/username/:username`
    UserByUsername { username: String },
    /// `GET /2/users/me`
    Me,
    /// `GET /2/users/:id/tweets`
    UserTweets { id: String },
    /// `GET /2/tweets/search/recent`
    SearchRecent,
    /// `GET /2/tweets/search/stream/rules`
    StreamRules,
    /// `POST /2/tweets/search/stream/rules`
    UpdateStreamRules,
    /// `GET /2/tweets/search/stream`
    FilteredStream,
    /// `GET /2/tweets/sample/stream`
    SampleStream,
    /// `POST /1.1/media/upload.json` on the upload host
    MediaUpload,
}

impl Route {
    /// The HTTP method for this route.
    pub fn method(&self) -> Method {
        match self {
            Route::CreateTweet | Route::UpdateStreamRules | Route::MediaUpload => Method::Post,
            Route::DeleteTweet { .. } => Method::Delete,
            _ => Method::Get,
        }
    }

    /// The absolute URL for this route under `config`'s hosts.
    pub fn url(&self, config: &ClientConfig) -> String {
        let base = match self {
            Route::MediaUpload => config.upload_base_url.trim_end_matches('/'),
            _ => config.api_base_url.trim_end_matches('/'),
        };
        format!("{base}{}", self.path())
    }

    /// The path component, always with a leading slash.
    fn path(&self) -> String {
        match self {
            Route::Tweet { id } => format!("/2/tweets/{id}"),
            Route::Tweets { .. } => "/2/tweets".to_string(),
            Route::CreateTweet => "/2/tweets".to_string(),
            Route::DeleteTweet { id } => format!("/2/tweets/{id}"),
            Route::User { id } => format!("/2/users/{id}"),
            Route::Users { .. } => "/2/users".to_string(),
            Route::UserByUsername { username } => format!("/2/users/by/username/{username}"),
            Route::Me => "/2/users/me".to_string(),
            Route::UserTweets { id } => format!("/2/users/{id}/tweets"),
            Route::SearchRecent => "/2/tweets/search/recent".to_string(),
            Route::StreamRules | Route::UpdateStreamRules => {
                "/2/tweets/search/stream/rules".to_string()
            }
            Route::FilteredStream => "/2/tweets/search/stream".to_string(),
            Route::SampleStream => "/2/tweets/sample/stream".to_string(),
            Route::MediaUpload => "/1.1/media/upload.json".to_string(),
        }
    }

    /// Query items the route itself mandates. These precede any
    /// caller-composed items.
    pub fn query_items(&self) -> Vec<(String, String)> {
        match self {
            Route::Tweets { ids } | Route::Users { ids } => {
                vec![("ids".to_string(), ids.join(","))]
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ClientConfig {
        ClientConfig::default()
    }

    #[test]
    fn test_paths_and_methods() {
        let route = Route::Tweet { id: "123".into() };
        assert_eq!(route.method(), Method::Get);
        assert_eq!(route.url(&config()), "https://api.twitter.com/2/tweets/123");

        assert_eq!(Route::CreateTweet.method(), Method::Post);
        assert_eq!(
            Route::DeleteTweet { id: "9".into() }.method(),
            Method::Delete
        );
        assert_eq!(
            Route::UserByUsername {
                username: "alice".into()
            }
            .url(&config()),
            "https://api.twitter.com/2/users/by/username/alice"
        );
        assert_eq!(
            Route::Me.url(&config()),
            "https://api.twitter.com/2/users/me"
        );
    }

    #[test]
    fn test_bulk_lookup_mandates_ids() {
        let route = Route::Tweets {
            ids: vec!["1".into(), "2".into(), "3".into()],
        };
        assert_eq!(
            route.query_items(),
            vec![("ids".to_string(), "1,2,3".to_string())]
        );
        assert!(Route::Me.query_items().is_empty());
    }

    #[test]
    fn test_media_upload_lives_on_upload_host() {
        assert_eq!(
            Route::MediaUpload.url(&config()),
            "https://upload.twitter.com/1.1/media/upload.json"
        );
        assert_eq!(Route::MediaUpload.method(), Method::Post);
    }

    #[test]
    fn test_stream_rules_share_path_across_methods() {
        assert_eq!(
            Route::StreamRules.url(&config()),
            Route::UpdateStreamRules.url(&config())
        );
        assert_eq!(Route::StreamRules.method(), Method::Get);
        assert_eq!(Route::UpdateStreamRules.method(), Method::Post);
    }
}
