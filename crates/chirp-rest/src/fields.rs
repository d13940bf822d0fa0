//! Typed field selection for v2 resources.
//!
//! Each resource exposes a closed enum of selectable fields. A [`FieldSet`]
//! collects them deduplicated and ordered, so the same selection always
//! serializes to the same query item regardless of insertion order.

use std::collections::BTreeSet;

/// A selectable field on one resource type.
///
/// Implementations are closed enums: the wire names are fixed by the API,
/// not by callers.
pub trait Field: Copy + Ord {
    /// The query parameter this field family serializes under, e.g.
    /// `tweet.fields`.
    const PARAM_NAME: &'static str;

    /// The wire name of this field, e.g. `created_at`.
    fn as_str(&self) -> &'static str;
}

/// An ordered, deduplicated set of fields of one resource type.
///
/// Serializes to a single `{PARAM_NAME}={a},{b},...` query item in enum
/// declaration order. An empty set serializes to nothing at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSet<F: Field> {
    inner: BTreeSet<F>,
}

impl<F: Field> FieldSet<F> {
    /// Create an empty field set.
    pub fn new() -> Self {
        Self {
            inner: BTreeSet::new(),
        }
    }

    /// Add a field. Duplicates are absorbed.
    pub fn insert(&mut self, field: F) -> &mut Self {
        self.inner.insert(field);
        self
    }

    /// Builder-style insert.
    pub fn with(mut self, field: F) -> Self {
        self.inner.insert(field);
        self
    }

    /// Whether no fields are selected.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Number of selected fields.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// The query item for this selection, or `None` when empty.
    ///
    /// Values are joined with literal commas; the transport layer's query
    /// encoding keeps commas unescaped.
    pub fn to_query_item(&self) -> Option<(String, String)> {
        if self.inner.is_empty() {
            return None;
        }
        let joined = self
            .inner
            .iter()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join(",");
        Some((F::PARAM_NAME.to_string(), joined))
    }
}

impl<F: Field> Default for FieldSet<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Field> FromIterator<F> for FieldSet<F> {
    fn from_iter<I: IntoIterator<Item = F>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

impl<F: Field> Extend<F> for FieldSet<F> {
    fn extend<I: IntoIterator<Item = F>>(&mut self, iter: I) {
        self.inner.extend(iter);
    }
}

/// Selectable fields on a tweet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TweetField {
    Attachments,
    AuthorId,
    ContextAnnotations,
    ConversationId,
    CreatedAt,
    Entities,
    Geo,
    InReplyToUserId,
    Lang,
    PossiblySensitive,
    PublicMetrics,
    ReferencedTweets,
    ReplySettings,
    Source,
    Withheld,
}

impl Field for TweetField {
    const PARAM_NAME: &'static str = "tweet.fields";

    fn as_str(&self) -> &'static str {
        match self {
            TweetField::Attachments => "attachments",
            TweetField::AuthorId => "author_id",
            TweetField::ContextAnnotations => "context_annotations",
            TweetField::ConversationId => "conversation_id",
            TweetField::CreatedAt => "created_at",
            TweetField::Entities => "entities",
            TweetField::Geo => "geo",
            TweetField::InReplyToUserId => "in_reply_to_user_id",
            TweetField::Lang => "lang",
            TweetField::PossiblySensitive => "possibly_sensitive",
            TweetField::PublicMetrics => "public_metrics",
            TweetField::ReferencedTweets => "referenced_tweets",
            TweetField::ReplySettings => "reply_settings",
            TweetField::Source => "source",
            TweetField::Withheld => "withheld",
        }
    }
}

/// Selectable fields on a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum UserField {
    CreatedAt,
    Description,
    Entities,
    Location,
    PinnedTweetId,
    ProfileImageUrl,
    Protected,
    PublicMetrics,
    Url,
    Verified,
    Withheld,
}

impl Field for UserField {
    const PARAM_NAME: &'static str = "user.fields";

    fn as_str(&self) -> &'static str {
        match self {
            UserField::CreatedAt => "created_at",
            UserField::Description => "description",
            UserField::Entities => "entities",
            UserField::Location => "location",
            UserField::PinnedTweetId => "pinned_tweet_id",
            UserField::ProfileImageUrl => "profile_image_url",
            UserField::Protected => "protected",
            UserField::PublicMetrics => "public_metrics",
            UserField::Url => "url",
            UserField::Verified => "verified",
            UserField::Withheld => "withheld",
        }
    }
}

/// Selectable fields on an attached media object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MediaField {
    AltText,
    DurationMs,
    Height,
    MediaKey,
    PreviewImageUrl,
    PublicMetrics,
    Type,
    Url,
    Width,
}

impl Field for MediaField {
    const PARAM_NAME: &'static str = "media.fields";

    fn as_str(&self) -> &'static str {
        match self {
            MediaField::AltText => "alt_text",
            MediaField::DurationMs => "duration_ms",
            MediaField::Height => "height",
            MediaField::MediaKey => "media_key",
            MediaField::PreviewImageUrl => "preview_image_url",
            MediaField::PublicMetrics => "public_metrics",
            MediaField::Type => "type",
            MediaField::Url => "url",
            MediaField::Width => "width",
        }
    }
}
