//! Typed v2 API client.
//!
//! Every operation follows the same flow: resolve the route, compose the
//! query items, sign, execute, decode. Operations that act on behalf of a
//! user check for user context before any network I/O.

use futures::TryStreamExt;
use serde::de::DeserializeOwned;
use tracing::instrument;

use chirp_auth::AuthState;
use chirp_client::{
    decode_envelope, decode_failure, ApiRequest, ClientConfig, Envelope, HttpClient,
    MalformedRecordPolicy, RecordStream, StreamRecord,
};

use crate::error::{Error, ErrorKind, Result};
use crate::expansions::{compose, TweetExpansion, UserExpansion};
use crate::fields::{FieldSet, TweetField, UserField};
use crate::models::{
    CreatedTweet, DeletedTweet, Includes, NewTweet, RuleChanges, StreamRule, Tweet, User,
};
use crate::routes::Route;

/// A page request for cursor-paginated collection endpoints.
///
/// Feed [`Envelope::next_token`] back through
/// [`with_pagination_token`](Page::with_pagination_token) to walk forward.
#[derive(Debug, Clone, Default)]
pub struct Page {
    max_results: Option<u32>,
    pagination_token: Option<String>,
}

impl Page {
    /// Default page: server-side page size, first page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size.
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }

    /// Continue from a previously returned cursor token.
    pub fn with_pagination_token(mut self, token: impl Into<String>) -> Self {
        self.pagination_token = Some(token.into());
        self
    }

    fn query_items(&self, token_param: &str, bounds: (u32, u32)) -> Result<Vec<(String, String)>> {
        let mut items = Vec::new();
        if let Some(n) = self.max_results {
            let (lo, hi) = bounds;
            if n < lo || n > hi {
                return Err(Error::new(ErrorKind::InvalidInput(format!(
                    "max_results must be within {lo}..={hi}, got {n}"
                ))));
            }
            items.push(("max_results".to_string(), n.to_string()));
        }
        if let Some(token) = &self.pagination_token {
            items.push((token_param.to_string(), token.clone()));
        }
        Ok(items)
    }
}

/// Typed client for the v2 REST and streaming endpoints.
///
/// Holds one authentication variant for its lifetime. Cheap to share behind
/// an `Arc`; all methods take `&self`.
///
/// # Example
///
/// ```rust,ignore
/// use chirp_rest::{ChirpClient, FieldSet, TweetField};
/// use chirp_auth::AuthState;
/// use chirp_client::ClientConfig;
///
/// let client = ChirpClient::new(
///     AuthState::app_only("bearer-token"),
///     ClientConfig::default(),
/// )?;
///
/// let fields = FieldSet::new().with(TweetField::CreatedAt);
/// let envelope = client.tweet("20", &fields, &[]).await?;
/// println!("{}", envelope.data.text);
/// ```
#[derive(Debug)]
pub struct ChirpClient {
    pub(crate) http: HttpClient,
    pub(crate) auth: AuthState,
    /// Bare client for token-endpoint exchanges. Refresh requests must not
    /// go through the signing path they exist to unblock.
    auth_http: reqwest::Client,
    stream_policy: MalformedRecordPolicy,
}

impl ChirpClient {
    /// Create a client with the given authentication and configuration.
    pub fn new(auth: AuthState, config: ClientConfig) -> Result<Self> {
        let http = HttpClient::new(config)?;
        Ok(Self {
            http,
            auth,
            auth_http: reqwest::Client::new(),
            stream_policy: MalformedRecordPolicy::default(),
        })
    }

    /// Create a client against the default hosts.
    pub fn with_auth(auth: AuthState) -> Result<Self> {
        Self::new(auth, ClientConfig::default())
    }

    /// Set how streaming lines that decode to nothing known are handled.
    pub fn with_stream_policy(mut self, policy: MalformedRecordPolicy) -> Self {
        self.stream_policy = policy;
        self
    }

    /// The transport configuration in effect.
    pub fn config(&self) -> &ClientConfig {
        self.http.config()
    }

    // =========================================================================
    // Tweets
    // =========================================================================

    /// Look up a single tweet by ID.
    #[instrument(skip(self, fields, expansions))]
    pub async fn tweet(
        &self,
        id: &str,
        fields: &FieldSet<TweetField>,
        expansions: &[TweetExpansion],
    ) -> Result<Envelope<Tweet, Includes>> {
        let route = Route::Tweet { id: id.to_string() };
        self.get(route, compose(fields, expansions)).await
    }

    /// Look up up to 100 tweets by ID in one call.
    ///
    /// Partial success is normal here: found tweets come back in `data`,
    /// missing ones as entries in the envelope's `errors`.
    #[instrument(skip(self, fields, expansions), fields(count = ids.len()))]
    pub async fn tweets(
        &self,
        ids: &[&str],
        fields: &FieldSet<TweetField>,
        expansions: &[TweetExpansion],
    ) -> Result<Envelope<Vec<Tweet>, Includes>> {
        if ids.is_empty() || ids.len() > 100 {
            return Err(Error::new(ErrorKind::InvalidInput(format!(
                "bulk tweet lookup takes 1..=100 ids, got {}",
                ids.len()
            ))));
        }
        let route = Route::Tweets {
            ids: ids.iter().map(|s| s.to_string()).collect(),
        };
        self.get(route, compose(fields, expansions)).await
    }

    /// Post a tweet on behalf of the authenticated user.
    #[instrument(skip(self, tweet))]
    pub async fn create_tweet(&self, tweet: &NewTweet) -> Result<Envelope<CreatedTweet, Includes>> {
        self.auth.require_user_context()?;
        let request = self
            .request(Route::CreateTweet, Vec::new())
            .json(tweet)
            .map_err(Error::from)?;
        self.execute(request).await
    }

    /// Delete a tweet owned by the authenticated user.
    #[instrument(skip(self))]
    pub async fn delete_tweet(&self, id: &str) -> Result<Envelope<DeletedTweet, Includes>> {
        self.auth.require_user_context()?;
        let route = Route::DeleteTweet { id: id.to_string() };
        let request = self.request(route, Vec::new());
        self.execute(request).await
    }

    /// The most recent tweets authored by one user, newest first.
    #[instrument(skip(self, fields, expansions, page))]
    pub async fn user_timeline(
        &self,
        user_id: &str,
        fields: &FieldSet<TweetField>,
        expansions: &[TweetExpansion],
        page: &Page,
    ) -> Result<Envelope<Vec<Tweet>, Includes>> {
        let route = Route::UserTweets {
            id: user_id.to_string(),
        };
        let mut query = compose(fields, expansions);
        query.extend(page.query_items("pagination_token", (5, 100))?);
        self.get(route, query).await
    }

    /// Search tweets from the last seven days.
    ///
    /// `query` uses the upstream search syntax; operators like `from:` and
    /// grouping parentheses pass through the query encoder untouched in
    /// meaning, encoded on the wire.
    #[instrument(skip(self, fields, expansions, page))]
    pub async fn search_recent(
        &self,
        query: &str,
        fields: &FieldSet<TweetField>,
        expansions: &[TweetExpansion],
        page: &Page,
    ) -> Result<Envelope<Vec<Tweet>, Includes>> {
        if query.is_empty() {
            return Err(Error::new(ErrorKind::InvalidInput(
                "search query must not be empty".to_string(),
            )));
        }
        let mut items = vec![("query".to_string(), query.to_string())];
        items.extend(compose(fields, expansions));
        items.extend(page.query_items("pagination_token", (10, 100))?);
        self.get(Route::SearchRecent, items).await
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Look up a single user by ID.
    #[instrument(skip(self, fields, expansions))]
    pub async fn user(
        &self,
        id: &str,
        fields: &FieldSet<UserField>,
        expansions: &[UserExpansion],
    ) -> Result<Envelope<User, Includes>> {
        let route = Route::User { id: id.to_string() };
        self.get(route, compose(fields, expansions)).await
    }

    /// Look up up to 100 users by ID in one call.
    #[instrument(skip(self, fields, expansions), fields(count = ids.len()))]
    pub async fn users(
        &self,
        ids: &[&str],
        fields: &FieldSet<UserField>,
        expansions: &[UserExpansion],
    ) -> Result<Envelope<Vec<User>, Includes>> {
        if ids.is_empty() || ids.len() > 100 {
            return Err(Error::new(ErrorKind::InvalidInput(format!(
                "bulk user lookup takes 1..=100 ids, got {}",
                ids.len()
            ))));
        }
        let route = Route::Users {
            ids: ids.iter().map(|s| s.to_string()).collect(),
        };
        self.get(route, compose(fields, expansions)).await
    }

    /// Look up a user by handle (without the leading `@`).
    #[instrument(skip(self, fields, expansions))]
    pub async fn user_by_username(
        &self,
        username: &str,
        fields: &FieldSet<UserField>,
        expansions: &[UserExpansion],
    ) -> Result<Envelope<User, Includes>> {
        let route = Route::UserByUsername {
            username: username.to_string(),
        };
        self.get(route, compose(fields, expansions)).await
    }

    /// The authenticated user.
    #[instrument(skip(self, fields, expansions))]
    pub async fn me(
        &self,
        fields: &FieldSet<UserField>,
        expansions: &[UserExpansion],
    ) -> Result<Envelope<User, Includes>> {
        self.auth.require_user_context()?;
        self.get(Route::Me, compose(fields, expansions)).await
    }

    // =========================================================================
    // Streaming
    // =========================================================================

    /// The current filtered-stream rule set.
    #[instrument(skip(self))]
    pub async fn stream_rules(&self) -> Result<Vec<StreamRule>> {
        let request = self.request(Route::StreamRules, Vec::new());
        let envelope: Envelope<Option<Vec<StreamRule>>, serde_json::Value> =
            self.execute(request).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Add and delete filtered-stream rules in one batch.
    ///
    /// Returns the rules the server created. Deletions come back only as
    /// counts in the response metadata, so a delete-only batch yields an
    /// empty list.
    #[instrument(skip(self, changes))]
    pub async fn update_stream_rules(&self, changes: &RuleChanges) -> Result<Vec<StreamRule>> {
        let request = self
            .request(Route::UpdateStreamRules, Vec::new())
            .json(changes)
            .map_err(Error::from)?;
        let envelope: Envelope<Option<Vec<StreamRule>>, serde_json::Value> =
            self.execute(request).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Connect to the filtered stream.
    ///
    /// Yields one decoded record per matching tweet, indefinitely. Dropping
    /// the returned stream disconnects; there is nothing to shut down
    /// explicitly.
    #[instrument(skip(self, fields, expansions))]
    pub async fn filtered_stream(
        &self,
        fields: &FieldSet<TweetField>,
        expansions: &[TweetExpansion],
    ) -> Result<RecordStream<StreamRecord<Tweet, Includes>>> {
        self.connect_stream(Route::FilteredStream, compose(fields, expansions))
            .await
    }

    /// Connect to the ~1% sampled firehose.
    #[instrument(skip(self, fields, expansions))]
    pub async fn sample_stream(
        &self,
        fields: &FieldSet<TweetField>,
        expansions: &[TweetExpansion],
    ) -> Result<RecordStream<StreamRecord<Tweet, Includes>>> {
        self.connect_stream(Route::SampleStream, compose(fields, expansions))
            .await
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    pub(crate) fn request(&self, route: Route, query: Vec<(String, String)>) -> ApiRequest {
        ApiRequest::new(route.method(), route.url(self.http.config()))
            .queries(route.query_items())
            .queries(query)
    }

    /// Sign one request: compute the `Authorization` header for the held
    /// authentication variant and append it.
    pub(crate) async fn sign(&self, request: ApiRequest) -> Result<ApiRequest> {
        let mut params = request.query.clone();
        params.extend(request.form_params().iter().cloned());
        let header = self
            .auth
            .authorization_header(
                &self.auth_http,
                &self.http.config().token_url(),
                request.method.as_str(),
                &request.url,
                &params,
            )
            .await?;
        Ok(request.header("Authorization", header))
    }

    pub(crate) async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let request = self.sign(request).await?;
        let (status, body) = self.http.execute(&request).await?;
        decode_envelope(status, &body).map_err(Error::from)
    }

    /// Raw status + body, for the endpoints whose success responses are not
    /// envelope-shaped (media upload).
    pub(crate) async fn http_execute(&self, request: &ApiRequest) -> Result<(u16, Vec<u8>)> {
        let (status, body) = self.http.execute(request).await?;
        Ok((status, body.to_vec()))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        route: Route,
        query: Vec<(String, String)>,
    ) -> Result<T> {
        self.execute(self.request(route, query)).await
    }

    async fn connect_stream<T: DeserializeOwned>(
        &self,
        route: Route,
        query: Vec<(String, String)>,
    ) -> Result<RecordStream<T>> {
        let request = self.sign(self.request(route, query)).await?;
        let (status, stream) = self.http.execute_streaming(&request).await?;

        if !(200..300).contains(&status) {
            // The connect was rejected; drain the (finite) failure body and
            // classify it.
            let mut body = Vec::new();
            let mut stream = stream;
            while let Some(chunk) = stream.try_next().await.map_err(Error::from)? {
                body.extend_from_slice(&chunk);
            }
            return Err(decode_failure(status, &body).into());
        }

        Ok(RecordStream::new(stream, self.stream_policy))
    }
}
