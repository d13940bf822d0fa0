//! Expansions and query composition.
//!
//! An expansion pulls a referenced object into the envelope's `includes`
//! section and may carry its own field selection for the expanded type.
//! [`compose`] turns one field set plus a list of expansions into the final
//! query items, ready for the transport layer's encoder.

use crate::fields::{Field, FieldSet, MediaField, TweetField, UserField};

/// One expandable reference, with the field selection for its target type.
pub trait Expansion {
    /// The wire tag that goes into the shared `expansions` list, e.g.
    /// `author_id`.
    fn tag(&self) -> &'static str;

    /// The nested field query item for the expanded type, or `None` when
    /// the attached field set is empty.
    fn nested_query_item(&self) -> Option<(String, String)>;
}

/// Expansions available on tweet-returning operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TweetExpansion {
    /// Expand the tweet's author into `includes.users`.
    AuthorId(FieldSet<UserField>),
    /// Expand the replied-to user into `includes.users`.
    InReplyToUserId(FieldSet<UserField>),
    /// Expand referenced tweets into `includes.tweets`.
    ReferencedTweetsId(FieldSet<TweetField>),
    /// Expand the authors of referenced tweets into `includes.users`.
    ReferencedTweetsIdAuthorId(FieldSet<UserField>),
    /// Expand attached media into `includes.media`.
    AttachmentsMediaKeys(FieldSet<MediaField>),
}

impl Expansion for TweetExpansion {
    fn tag(&self) -> &'static str {
        match self {
            TweetExpansion::AuthorId(_) => "author_id",
            TweetExpansion::InReplyToUserId(_) => "in_reply_to_user_id",
            TweetExpansion::ReferencedTweetsId(_) => "referenced_tweets.id",
            TweetExpansion::ReferencedTweetsIdAuthorId(_) => "referenced_tweets.id.author_id",
            TweetExpansion::AttachmentsMediaKeys(_) => "attachments.media_keys",
        }
    }

    fn nested_query_item(&self) -> Option<(String, String)> {
        match self {
            TweetExpansion::AuthorId(fields)
            | TweetExpansion::InReplyToUserId(fields)
            | TweetExpansion::ReferencedTweetsIdAuthorId(fields) => fields.to_query_item(),
            TweetExpansion::ReferencedTweetsId(fields) => fields.to_query_item(),
            TweetExpansion::AttachmentsMediaKeys(fields) => fields.to_query_item(),
        }
    }
}

/// Expansions available on user-returning operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserExpansion {
    /// Expand the user's pinned tweet into `includes.tweets`.
    PinnedTweetId(FieldSet<TweetField>),
}

impl Expansion for UserExpansion {
    fn tag(&self) -> &'static str {
        match self {
            UserExpansion::PinnedTweetId(_) => "pinned_tweet_id",
        }
    }

    fn nested_query_item(&self) -> Option<(String, String)> {
        match self {
            UserExpansion::PinnedTweetId(fields) => fields.to_query_item(),
        }
    }
}

/// Compose the query items for one request from its field selection and
/// expansions.
///
/// Pure and deterministic:
/// - the primary field item comes first (omitted when the set is empty),
/// - then a single shared `expansions` item with the tags in caller order,
/// - then each expansion's nested field item, in the same caller order,
///   skipping expansions whose field set is empty.
///
/// No expansions and no fields compose to zero query items.
pub fn compose<F: Field, E: Expansion>(
    fields: &FieldSet<F>,
    expansions: &[E],
) -> Vec<(String, String)> {
    let mut items = Vec::new();

    if let Some(item) = fields.to_query_item() {
        items.push(item);
    }

    if !expansions.is_empty() {
        let tags = expansions
            .iter()
            .map(|e| e.tag())
            .collect::<Vec<_>>()
            .join(",");
        items.push(("expansions".to_string(), tags));

        for expansion in expansions {
            if let Some(item) = expansion.nested_query_item() {
                items.push(item);
            }
        }
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_selected_composes_to_nothing() {
        let fields: FieldSet<TweetField> = FieldSet::new();
        let items = compose::<_, TweetExpansion>(&fields, &[]);
        assert!(items.is_empty());
    }

    #[test]
    fn test_fields_only() {
        let fields = FieldSet::new()
            .with(TweetField::CreatedAt)
            .with(TweetField::AuthorId);
        let items = compose::<_, TweetExpansion>(&fields, &[]);
        assert_eq!(
            items,
            vec![("tweet.fields".to_string(), "author_id,created_at".to_string())]
        );
    }

    #[test]
    fn test_expansion_tags_keep_caller_order() {
        let fields: FieldSet<TweetField> = FieldSet::new();
        let expansions = [
            TweetExpansion::InReplyToUserId(FieldSet::new()),
            TweetExpansion::AuthorId(FieldSet::new()),
        ];
        let items = compose(&fields, &expansions);
        assert_eq!(
            items,
            vec![(
                "expansions".to_string(),
                "in_reply_to_user_id,author_id".to_string()
            )]
        );
    }

    #[test]
    fn test_nested_fields_follow_shared_list() {
        let fields = FieldSet::new().with(TweetField::Lang);
        let expansions = [
            TweetExpansion::AuthorId(
                FieldSet::new()
                    .with(UserField::Verified)
                    .with(UserField::Description),
            ),
            TweetExpansion::AttachmentsMediaKeys(FieldSet::new()),
        ];
        let items = compose(&fields, &expansions);
        assert_eq!(
            items,
            vec![
                ("tweet.fields".to_string(), "lang".to_string()),
                (
                    "expansions".to_string(),
                    "author_id,attachments.media_keys".to_string()
                ),
                ("user.fields".to_string(), "description,verified".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_nested_sets_are_skipped() {
        let fields: FieldSet<UserField> = FieldSet::new();
        let expansions = [UserExpansion::PinnedTweetId(FieldSet::new())];
        let items = compose(&fields, &expansions);
        assert_eq!(
            items,
            vec![("expansions".to_string(), "pinned_tweet_id".to_string())]
        );
    }

    #[test]
    fn test_media_expansion_carries_media_fields() {
        let fields: FieldSet<TweetField> = FieldSet::new();
        let expansions = [TweetExpansion::AttachmentsMediaKeys(
            FieldSet::new().with(MediaField::Url).with(MediaField::Width),
        )];
        let items = compose(&fields, &expansions);
        assert_eq!(
            items,
            vec![
                (
                    "expansions".to_string(),
                    "attachments.media_keys".to_string()
                ),
                ("media.fields".to_string(), "url,width".to_string()),
            ]
        );
    }
}
