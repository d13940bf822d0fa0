//! Typed resource models.
//!
//! Only `id` plus the always-returned defaults are mandatory; everything a
//! field selection has to opt into is `Option` so a minimal response still
//! deserializes cleanly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tweet as returned by the v2 endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Tweet {
    /// Tweet ID.
    pub id: String,
    /// Tweet text.
    pub text: String,
    /// Author's user ID. Needs `tweet.fields=author_id` or the author
    /// expansion.
    #[serde(default)]
    pub author_id: Option<String>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Conversation thread root ID.
    #[serde(default)]
    pub conversation_id: Option<String>,
    /// ID of the user this tweet replies to.
    #[serde(default)]
    pub in_reply_to_user_id: Option<String>,
    /// BCP47 language tag.
    #[serde(default)]
    pub lang: Option<String>,
    /// Sensitivity flag.
    #[serde(default)]
    pub possibly_sensitive: Option<bool>,
    /// Engagement counts.
    #[serde(default)]
    pub public_metrics: Option<TweetPublicMetrics>,
    /// Tweets this one references (replies, quotes, retweets).
    #[serde(default)]
    pub referenced_tweets: Option<Vec<ReferencedTweet>>,
    /// Attachment keys (media, polls).
    #[serde(default)]
    pub attachments: Option<Attachments>,
}

/// Engagement counts on a tweet.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TweetPublicMetrics {
    #[serde(default)]
    pub retweet_count: u64,
    #[serde(default)]
    pub reply_count: u64,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub quote_count: u64,
    #[serde(default)]
    pub impression_count: Option<u64>,
}

/// A reference from one tweet to another.
#[derive(Debug, Clone, Deserialize)]
pub struct ReferencedTweet {
    /// Reference kind: `replied_to`, `quoted`, or `retweeted`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Referenced tweet ID.
    pub id: String,
}

/// Attachment keys on a tweet.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Attachments {
    #[serde(default)]
    pub media_keys: Vec<String>,
    #[serde(default)]
    pub poll_ids: Vec<String>,
}

/// A user as returned by the v2 endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    /// User ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Handle, without the leading `@`.
    pub username: String,
    /// Account creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Profile description.
    #[serde(default)]
    pub description: Option<String>,
    /// Free-form location.
    #[serde(default)]
    pub location: Option<String>,
    /// Pinned tweet ID.
    #[serde(default)]
    pub pinned_tweet_id: Option<String>,
    /// Profile image URL.
    #[serde(default)]
    pub profile_image_url: Option<String>,
    /// Whether the account is protected.
    #[serde(default)]
    pub protected: Option<bool>,
    /// Whether the account is verified.
    #[serde(default)]
    pub verified: Option<bool>,
    /// Follower and tweet counts.
    #[serde(default)]
    pub public_metrics: Option<UserPublicMetrics>,
}

/// Follower and tweet counts on a user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPublicMetrics {
    #[serde(default)]
    pub followers_count: u64,
    #[serde(default)]
    pub following_count: u64,
    #[serde(default)]
    pub tweet_count: u64,
    #[serde(default)]
    pub listed_count: u64,
}

/// A media object from `includes.media`.
#[derive(Debug, Clone, Deserialize)]
pub struct Media {
    /// Media key linking the object to a tweet's attachments.
    pub media_key: String,
    /// Media kind: `photo`, `video`, or `animated_gif`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub preview_image_url: Option<String>,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
}

/// The expanded objects an envelope can carry alongside its data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Includes {
    #[serde(default)]
    pub tweets: Vec<Tweet>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub media: Vec<Media>,
}

/// Request body for creating a tweet.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewTweet {
    /// Tweet text.
    pub text: String,
    /// Reply target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<Reply>,
    /// Tweet ID to quote.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_tweet_id: Option<String>,
    /// Previously uploaded media to attach.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<TweetMedia>,
}

impl NewTweet {
    /// A plain text tweet.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Make this tweet a reply.
    pub fn in_reply_to(mut self, tweet_id: impl Into<String>) -> Self {
        self.reply = Some(Reply {
            in_reply_to_tweet_id: tweet_id.into(),
        });
        self
    }

    /// Quote another tweet.
    pub fn quoting(mut self, tweet_id: impl Into<String>) -> Self {
        self.quote_tweet_id = Some(tweet_id.into());
        self
    }

    /// Attach previously uploaded media.
    pub fn with_media_ids(mut self, media_ids: Vec<String>) -> Self {
        self.media = Some(TweetMedia { media_ids });
        self
    }
}

/// Reply target inside a [`NewTweet`].
#[derive(Debug, Clone, Serialize)]
pub struct Reply {
    pub in_reply_to_tweet_id: String,
}

/// Media attachment list inside a [`NewTweet`].
#[derive(Debug, Clone, Serialize)]
pub struct TweetMedia {
    pub media_ids: Vec<String>,
}

/// Response data for a created tweet.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedTweet {
    pub id: String,
    pub text: String,
}

/// Response data for a deleted tweet.
#[derive(Debug, Clone, Deserialize)]
pub struct DeletedTweet {
    pub deleted: bool,
}

/// A filtered-stream matching rule.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamRule {
    /// Server-assigned rule ID.
    pub id: String,
    /// The rule expression.
    pub value: String,
    /// Caller-supplied label.
    #[serde(default)]
    pub tag: Option<String>,
}

/// A rule to add via [`RuleChanges`].
#[derive(Debug, Clone, Serialize)]
pub struct NewStreamRule {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl NewStreamRule {
    /// A rule with no tag.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            tag: None,
        }
    }

    /// Attach a label.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

/// A batch of rule additions and deletions, applied atomically server-side.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RuleChanges {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub add: Vec<NewStreamRule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<RuleDeletions>,
}

impl RuleChanges {
    /// Add rules.
    pub fn adding(rules: Vec<NewStreamRule>) -> Self {
        Self {
            add: rules,
            delete: None,
        }
    }

    /// Delete rules by ID.
    pub fn deleting(ids: Vec<String>) -> Self {
        Self {
            add: Vec::new(),
            delete: Some(RuleDeletions { ids }),
        }
    }
}

/// Rule IDs to delete inside a [`RuleChanges`].
#[derive(Debug, Clone, Serialize)]
pub struct RuleDeletions {
    pub ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_tweet_deserializes() {
        let tweet: Tweet =
            serde_json::from_str(r#"{"id":"1","text":"hello"}"#).unwrap();
        assert_eq!(tweet.id, "1");
        assert_eq!(tweet.text, "hello");
        assert!(tweet.author_id.is_none());
        assert!(tweet.public_metrics.is_none());
    }

    #[test]
    fn test_full_tweet_deserializes() {
        let tweet: Tweet = serde_json::from_str(
            r#"{
                "id": "1",
                "text": "hi",
                "author_id": "42",
                "created_at": "2023-01-15T12:00:00.000Z",
                "lang": "en",
                "public_metrics": {
                    "retweet_count": 3,
                    "reply_count": 1,
                    "like_count": 10,
                    "quote_count": 0
                },
                "referenced_tweets": [{"type": "replied_to", "id": "0"}]
            }"#,
        )
        .unwrap();
        assert_eq!(tweet.author_id.as_deref(), Some("42"));
        assert_eq!(tweet.public_metrics.unwrap().like_count, 10);
        assert_eq!(tweet.referenced_tweets.unwrap()[0].kind, "replied_to");
    }

    #[test]
    fn test_new_tweet_serializes_sparsely() {
        let body = serde_json::to_value(NewTweet::text("hi")).unwrap();
        assert_eq!(body, serde_json::json!({"text": "hi"}));

        let reply = serde_json::to_value(NewTweet::text("re").in_reply_to("7")).unwrap();
        assert_eq!(
            reply,
            serde_json::json!({"text": "re", "reply": {"in_reply_to_tweet_id": "7"}})
        );
    }

    #[test]
    fn test_rule_changes_serialize() {
        let add = serde_json::to_value(RuleChanges::adding(vec![
            NewStreamRule::new("from:alice").with_tag("alice"),
        ]))
        .unwrap();
        assert_eq!(
            add,
            serde_json::json!({"add": [{"value": "from:alice", "tag": "alice"}]})
        );

        let delete = serde_json::to_value(RuleChanges::deleting(vec!["1".into()])).unwrap();
        assert_eq!(delete, serde_json::json!({"delete": {"ids": ["1"]}}));
    }

    #[test]
    fn test_includes_default_empty() {
        let includes: Includes = serde_json::from_str("{}").unwrap();
        assert!(includes.tweets.is_empty());
        assert!(includes.users.is_empty());
        assert!(includes.media.is_empty());
    }
}
