//! Async client for the rentahuman.ai REST API.
//!
//! Every operation validates its inputs before a request is built:
//! caller-supplied identifiers are checked for path-traversal characters
//! and pagination values are clamped into the API's accepted ranges.
//! Rate-limited (429) and transient failures are retried with a
//! deterministic backoff up to the configured ceiling; everything else
//! surfaces immediately as a typed [`Error`].
//!
//! The API enforces rate limits of 100 GET and 20 POST requests per
//! minute per key. The client does not meter requests itself, it only
//! reacts to 429 responses.
//!
//! ```no_run
//! use rentahuman_client::{types::HumanSearch, Client};
//!
//! # async fn run() -> rentahuman_client::Result<()> {
//! let client = Client::new()?;
//! let humans = client
//!     .search_humans(&HumanSearch {
//!         skill: Some("Photography".to_string()),
//!         ..HumanSearch::default()
//!     })
//!     .await?;
//! for human in humans {
//!     println!("{}", human.summary());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Blocking callers use [`blocking::Client`], which applies the same
//! validation, classification, and retry policy through the same core.

pub mod blocking;
mod config;
mod error;
mod params;
mod retry;
pub mod types;

pub use config::{Config, API_KEY_ENV, DEFAULT_BASE_URL};
pub use error::{Error, Result};
pub use params::{clamp_limit, clamp_offset, sanitize_path_param, MAX_PAGE_LIMIT};
pub use retry::RetryPolicy;

use std::time::Duration;

use reqwest::{header::RETRY_AFTER, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use tracing::{debug, instrument};

use types::{
    Booking, BookingCreate, BookingFilter, Bounty, BountyApplication, BountyCreate, BountyUpdate,
    Conversation, Human, HumanSearch, Message, Skill, SkillEntry, DEFAULT_AGENT_ID,
};

const API_KEY_HEADER: &str = "X-API-Key";
const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(1);

/// Async rentahuman.ai client.
///
/// Holds a connection pool for the client's lifetime; dropping the
/// client releases it. The client is cheap to share behind an `Arc` and
/// holds no mutable state, so concurrent operations never contend.
#[derive(Debug)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    max_retries: u32,
    policy: RetryPolicy,
}

impl Client {
    /// Build a client from [`Config::default`].
    pub fn new() -> Result<Self> {
        Self::with_config(Config::default())
    }

    /// Build a client from an explicit configuration. Fails here, before
    /// any request is attempted, when the base URL is not HTTPS.
    pub fn with_config(config: Config) -> Result<Self> {
        let base_url = config.validated_base_url()?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("rentahuman-rs/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .gzip(true)
            .build()
            .map_err(|error| Error::Connection(format!("failed to build HTTP client: {error}")))?;
        Ok(Self {
            http,
            base_url,
            api_key: config.api_key,
            max_retries: config.max_retries,
            policy: RetryPolicy::default(),
        })
    }

    /// Whether an API key is configured. Write operations fail with an
    /// authentication error without one.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    // ── humans ────────────────────────────────────────────────

    /// Search for available humans, filtered by skill, rate, or name.
    #[instrument(name = "rentahuman_client.search_humans", skip(self))]
    pub async fn search_humans(&self, search: &HumanSearch) -> Result<Vec<Human>> {
        let mut query = vec![
            ("limit", clamp_limit(search.limit).to_string()),
            ("offset", clamp_offset(search.offset).to_string()),
        ];
        if let Some(skill) = &search.skill {
            query.push(("skill", skill.clone()));
        }
        if let Some(min_rate) = search.min_rate {
            query.push(("minRate", min_rate.to_string()));
        }
        if let Some(max_rate) = search.max_rate {
            query.push(("maxRate", max_rate.to_string()));
        }
        if let Some(name) = &search.name {
            query.push(("name", name.clone()));
        }
        let data = self.request(Method::GET, "/humans", &query, None).await?;
        decode_list(data, "humans")
    }

    /// Full profile for one human, including availability and wallets.
    #[instrument(name = "rentahuman_client.get_human", skip(self))]
    pub async fn get_human(&self, human_id: &str) -> Result<Human> {
        let human_id = sanitize_path_param(human_id)?;
        let data = self
            .request(Method::GET, &format!("/humans/{human_id}"), &[], None)
            .await?;
        decode(data, "human")
    }

    /// All skills offered on the platform.
    #[instrument(name = "rentahuman_client.list_skills", skip(self))]
    pub async fn list_skills(&self) -> Result<Vec<Skill>> {
        let data = self.request(Method::GET, "/skills", &[], None).await?;
        let entries: Vec<SkillEntry> = decode_list(data, "skills")?;
        Ok(entries.into_iter().map(SkillEntry::into_skill).collect())
    }

    /// Reviews left for a human. Review shapes vary by reviewer kind, so
    /// entries stay loosely typed.
    #[instrument(name = "rentahuman_client.get_reviews", skip(self))]
    pub async fn get_reviews(&self, human_id: &str) -> Result<Vec<Value>> {
        let human_id = sanitize_path_param(human_id)?;
        let data = self
            .request(Method::GET, &format!("/humans/{human_id}/reviews"), &[], None)
            .await?;
        decode_list(data, "reviews")
    }

    // ── bookings ──────────────────────────────────────────────

    /// Book a specific human for a task. Requires an API key.
    #[instrument(name = "rentahuman_client.create_booking", skip(self, booking))]
    pub async fn create_booking(&self, booking: &BookingCreate) -> Result<Booking> {
        let body = encode(booking)?;
        let data = self
            .request(Method::POST, "/bookings", &[], Some(&body))
            .await?;
        decode(data, "booking")
    }

    #[instrument(name = "rentahuman_client.get_booking", skip(self))]
    pub async fn get_booking(&self, booking_id: &str) -> Result<Booking> {
        let booking_id = sanitize_path_param(booking_id)?;
        let data = self
            .request(Method::GET, &format!("/bookings/{booking_id}"), &[], None)
            .await?;
        decode(data, "booking")
    }

    /// List bookings, optionally filtered by human, agent, or status.
    #[instrument(name = "rentahuman_client.list_bookings", skip(self))]
    pub async fn list_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>> {
        let mut query = vec![("limit", clamp_limit(filter.limit).to_string())];
        if let Some(human_id) = &filter.human_id {
            query.push(("humanId", human_id.clone()));
        }
        if let Some(agent_id) = &filter.agent_id {
            query.push(("agentId", agent_id.clone()));
        }
        if let Some(status) = &filter.status {
            query.push(("status", status.clone()));
        }
        let data = self.request(Method::GET, "/bookings", &query, None).await?;
        decode_list(data, "bookings")
    }

    // ── bounties ──────────────────────────────────────────────

    /// Post a task bounty for humans to apply to. Requires an API key.
    #[instrument(name = "rentahuman_client.create_bounty", skip(self, bounty))]
    pub async fn create_bounty(&self, bounty: &BountyCreate) -> Result<Bounty> {
        let body = encode(bounty)?;
        let data = self
            .request(Method::POST, "/bounties", &[], Some(&body))
            .await?;
        decode(data, "bounty")
    }

    #[instrument(name = "rentahuman_client.get_bounty", skip(self))]
    pub async fn get_bounty(&self, bounty_id: &str) -> Result<Bounty> {
        let bounty_id = sanitize_path_param(bounty_id)?;
        let data = self
            .request(Method::GET, &format!("/bounties/{bounty_id}"), &[], None)
            .await?;
        decode(data, "bounty")
    }

    #[instrument(name = "rentahuman_client.list_bounties", skip(self))]
    pub async fn list_bounties(&self, limit: i64) -> Result<Vec<Bounty>> {
        let query = [("limit", clamp_limit(limit).to_string())];
        let data = self.request(Method::GET, "/bounties", &query, None).await?;
        decode_list(data, "bounties")
    }

    /// Applications humans have submitted to a bounty.
    #[instrument(name = "rentahuman_client.get_bounty_applications", skip(self))]
    pub async fn get_bounty_applications(
        &self,
        bounty_id: &str,
    ) -> Result<Vec<BountyApplication>> {
        let bounty_id = sanitize_path_param(bounty_id)?;
        let data = self
            .request(
                Method::GET,
                &format!("/bounties/{bounty_id}/applications"),
                &[],
                None,
            )
            .await?;
        decode_list(data, "applications")
    }

    /// Accept one application for a bounty. Requires an API key.
    #[instrument(name = "rentahuman_client.accept_application", skip(self))]
    pub async fn accept_application(
        &self,
        bounty_id: &str,
        application_id: &str,
    ) -> Result<Value> {
        let bounty_id = sanitize_path_param(bounty_id)?;
        let application_id = sanitize_path_param(application_id)?;
        self.request(
            Method::POST,
            &format!("/bounties/{bounty_id}/applications/{application_id}/accept"),
            &[],
            None,
        )
        .await
    }

    /// Update or cancel a bounty. Unset fields are left alone.
    #[instrument(name = "rentahuman_client.update_bounty", skip(self, updates))]
    pub async fn update_bounty(&self, bounty_id: &str, updates: &BountyUpdate) -> Result<Bounty> {
        let bounty_id = sanitize_path_param(bounty_id)?;
        let body = encode(updates)?;
        let data = self
            .request(
                Method::PATCH,
                &format!("/bounties/{bounty_id}"),
                &[],
                Some(&body),
            )
            .await?;
        decode(data, "bounty")
    }

    // ── conversations ─────────────────────────────────────────

    /// Open a conversation with a human. Requires an API key.
    #[instrument(name = "rentahuman_client.start_conversation", skip(self, message))]
    pub async fn start_conversation(
        &self,
        human_id: &str,
        subject: &str,
        message: &str,
    ) -> Result<Conversation> {
        let human_id = sanitize_path_param(human_id)?;
        let body = json!({
            "humanId": human_id,
            "agentType": DEFAULT_AGENT_ID,
            "subject": subject,
            "message": message,
        });
        let data = self
            .request(Method::POST, "/conversations", &[], Some(&body))
            .await?;
        decode(data, "conversation")
    }

    /// Send a message in an existing conversation. Requires an API key.
    #[instrument(name = "rentahuman_client.send_message", skip(self, message))]
    pub async fn send_message(&self, conversation_id: &str, message: &str) -> Result<Message> {
        let conversation_id = sanitize_path_param(conversation_id)?;
        let body = json!({ "message": message });
        let data = self
            .request(
                Method::POST,
                &format!("/conversations/{conversation_id}/messages"),
                &[],
                Some(&body),
            )
            .await?;
        decode(data, "message")
    }

    /// A conversation with its full message history.
    #[instrument(name = "rentahuman_client.get_conversation", skip(self))]
    pub async fn get_conversation(&self, conversation_id: &str) -> Result<Conversation> {
        let conversation_id = sanitize_path_param(conversation_id)?;
        let data = self
            .request(
                Method::GET,
                &format!("/conversations/{conversation_id}"),
                &[],
                None,
            )
            .await?;
        decode(data, "conversation")
    }

    #[instrument(name = "rentahuman_client.list_conversations", skip(self))]
    pub async fn list_conversations(&self, limit: i64) -> Result<Vec<Conversation>> {
        let query = [("limit", clamp_limit(limit).to_string())];
        let data = self
            .request(Method::GET, "/conversations", &query, None)
            .await?;
        decode_list(data, "conversations")
    }

    // ── request core ──────────────────────────────────────────

    /// Issue one logical operation, retrying rate-limited and transient
    /// failures until success, a fatal classification, or the retry
    /// budget runs out.
    ///
    /// The backoff sleep is a plain `tokio::time::sleep`, so dropping
    /// the returned future (or racing it against a caller-side timeout)
    /// cancels both the pending delay and any in-flight request.
    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let url = format!("{}{path}", self.base_url);
        let mut attempt: u32 = 0;
        loop {
            let mut request = self.http.request(method.clone(), &url);
            if let Some(key) = &self.api_key {
                request = request.header(API_KEY_HEADER, key);
            }
            if !query.is_empty() {
                request = request.query(query);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            debug!(target: "rentahuman_client", %method, path, attempt, "issuing request");
            let outcome = match request.send().await {
                Ok(response) => classify(response).await,
                Err(error) => Err(Error::Connection(error.to_string())),
            };

            match outcome {
                Ok(value) => return Ok(value),
                Err(error) if !error.is_retryable() => return Err(error),
                Err(error) if attempt >= self.max_retries => {
                    return Err(Error::RetriesExhausted {
                        attempts: attempt + 1,
                        source: Box::new(error),
                    });
                }
                Err(error) => {
                    let delay = error
                        .retry_after()
                        .unwrap_or_else(|| self.policy.delay_for(attempt));
                    debug!(
                        target: "rentahuman_client",
                        path,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "retrying after transient failure"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

/// Map an HTTP response onto the status-code contract callers branch on.
async fn classify(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<Value>()
            .await
            .map_err(|error| Error::Validation(format!("failed to decode response body: {error}")));
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<f64>().ok())
            .filter(|seconds| seconds.is_finite() && *seconds >= 0.0)
            .map_or(DEFAULT_RETRY_AFTER, Duration::from_secs_f64);
        return Err(Error::RateLimit { retry_after });
    }

    let code = status.as_u16();
    let message = error_detail(response).await;
    match code {
        401 | 403 => Err(Error::Authentication {
            status: code,
            message,
        }),
        404 => Err(Error::NotFound { message }),
        400 | 422 => Err(Error::Validation(message)),
        _ => Err(Error::Server {
            status: code,
            message,
        }),
    }
}

/// Pull the server's `error` detail out of a failure body, falling back
/// to the status line when the body is empty or not JSON.
async fn error_detail(response: reqwest::Response) -> String {
    let status = response.status();
    let fallback = || {
        status
            .canonical_reason()
            .map_or_else(|| format!("HTTP {status}"), str::to_string)
    };
    match response.json::<Value>().await {
        Ok(body) => body
            .get("error")
            .and_then(Value::as_str)
            .map_or_else(fallback, str::to_string),
        Err(_) => fallback(),
    }
}

fn encode(body: &impl Serialize) -> Result<Value> {
    serde_json::to_value(body)
        .map_err(|error| Error::Validation(format!("unserializable request body: {error}")))
}

/// Decode a single resource. Responses arrive either enveloped
/// (`{"booking": {...}}`) or bare; both shapes are accepted.
fn decode<T: DeserializeOwned>(mut value: Value, key: &str) -> Result<T> {
    if let Some(inner) = value.get_mut(key) {
        value = inner.take();
    }
    serde_json::from_value(value)
        .map_err(|error| Error::Validation(format!("unexpected response shape: {error}")))
}

/// Decode a listing. An enveloped key wins; a bare array is accepted;
/// anything else decodes as an empty listing.
fn decode_list<T: DeserializeOwned>(mut value: Value, key: &str) -> Result<Vec<T>> {
    let items = if let Some(inner) = value.get_mut(key) {
        inner.take()
    } else if value.is_array() {
        value
    } else {
        return Ok(Vec::new());
    };
    serde_json::from_value(items)
        .map_err(|error| Error::Validation(format!("unexpected response shape: {error}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_accepts_enveloped_and_bare_payloads() {
        let enveloped = json!({"booking": {"id": "b1", "humanId": "h1"}});
        let booking: Booking = decode(enveloped, "booking").expect("enveloped decodes");
        assert_eq!(booking.id, "b1");

        let bare = json!({"id": "b2", "humanId": "h1"});
        let booking: Booking = decode(bare, "booking").expect("bare decodes");
        assert_eq!(booking.id, "b2");
    }

    #[test]
    fn decode_rejects_mismatched_shapes() {
        let error = decode::<Booking>(json!({"booking": [1, 2, 3]}), "booking")
            .expect_err("array is not a booking");
        assert!(matches!(error, Error::Validation(_)));
    }

    #[test]
    fn decode_list_tolerates_all_three_wire_shapes() {
        let enveloped = json!({"humans": [{"id": "h1", "name": "Ada"}]});
        let humans: Vec<Human> = decode_list(enveloped, "humans").expect("enveloped list");
        assert_eq!(humans.len(), 1);

        let bare = json!([{"id": "h2", "name": "Grace"}]);
        let humans: Vec<Human> = decode_list(bare, "humans").expect("bare list");
        assert_eq!(humans[0].id, "h2");

        let empty: Vec<Human> =
            decode_list(json!({"total": 0}), "humans").expect("missing key is empty");
        assert!(empty.is_empty());
    }

    #[test]
    fn construction_rejects_non_https_base_urls() {
        let config = Config::default().with_base_url("http://rentahuman.ai/api");
        assert!(matches!(
            Client::with_config(config),
            Err(Error::Validation(_))
        ));
    }
}
