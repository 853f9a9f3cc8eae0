//! Blocking facade over the async client.
//!
//! Each call drives the async core on a private current-thread runtime
//! and returns once the full retry sequence resolves. Validation,
//! normalization, classification, and retry policy are identical by
//! construction; only the wait primitive differs.

use serde_json::Value;

use crate::{
    types::{
        Booking, BookingCreate, BookingFilter, Bounty, BountyApplication, BountyCreate,
        BountyUpdate, Conversation, Human, HumanSearch, Message, Skill,
    },
    Config, Error, Result,
};

/// Blocking rentahuman.ai client.
///
/// Safe to share across threads; concurrent calls serialize on the
/// owned runtime, so each call occupies its calling thread until the
/// operation resolves. Dropping the client (or calling
/// [`Client::shutdown`]) releases the runtime and the connection pool.
#[derive(Debug)]
pub struct Client {
    inner: crate::Client,
    runtime: tokio::runtime::Runtime,
}

impl Client {
    /// Build a blocking client from [`Config::default`].
    pub fn new() -> Result<Self> {
        Self::with_config(Config::default())
    }

    /// Build a blocking client from an explicit configuration.
    pub fn with_config(config: Config) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|error| Error::Connection(format!("failed to start runtime: {error}")))?;
        Ok(Self {
            inner: crate::Client::with_config(config)?,
            runtime,
        })
    }

    /// Release the runtime and the underlying connection pool without
    /// waiting for background connection cleanup.
    pub fn shutdown(self) {
        let Self { inner, runtime } = self;
        drop(inner);
        runtime.shutdown_background();
    }

    pub fn search_humans(&self, search: &HumanSearch) -> Result<Vec<Human>> {
        self.runtime.block_on(self.inner.search_humans(search))
    }

    pub fn get_human(&self, human_id: &str) -> Result<Human> {
        self.runtime.block_on(self.inner.get_human(human_id))
    }

    pub fn list_skills(&self) -> Result<Vec<Skill>> {
        self.runtime.block_on(self.inner.list_skills())
    }

    pub fn get_reviews(&self, human_id: &str) -> Result<Vec<Value>> {
        self.runtime.block_on(self.inner.get_reviews(human_id))
    }

    pub fn create_booking(&self, booking: &BookingCreate) -> Result<Booking> {
        self.runtime.block_on(self.inner.create_booking(booking))
    }

    pub fn get_booking(&self, booking_id: &str) -> Result<Booking> {
        self.runtime.block_on(self.inner.get_booking(booking_id))
    }

    pub fn list_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>> {
        self.runtime.block_on(self.inner.list_bookings(filter))
    }

    pub fn create_bounty(&self, bounty: &BountyCreate) -> Result<Bounty> {
        self.runtime.block_on(self.inner.create_bounty(bounty))
    }

    pub fn get_bounty(&self, bounty_id: &str) -> Result<Bounty> {
        self.runtime.block_on(self.inner.get_bounty(bounty_id))
    }

    pub fn list_bounties(&self, limit: i64) -> Result<Vec<Bounty>> {
        self.runtime.block_on(self.inner.list_bounties(limit))
    }

    pub fn get_bounty_applications(&self, bounty_id: &str) -> Result<Vec<BountyApplication>> {
        self.runtime
            .block_on(self.inner.get_bounty_applications(bounty_id))
    }

    pub fn accept_application(&self, bounty_id: &str, application_id: &str) -> Result<Value> {
        self.runtime
            .block_on(self.inner.accept_application(bounty_id, application_id))
    }

    pub fn update_bounty(&self, bounty_id: &str, updates: &BountyUpdate) -> Result<Bounty> {
        self.runtime
            .block_on(self.inner.update_bounty(bounty_id, updates))
    }

    pub fn start_conversation(
        &self,
        human_id: &str,
        subject: &str,
        message: &str,
    ) -> Result<Conversation> {
        self.runtime
            .block_on(self.inner.start_conversation(human_id, subject, message))
    }

    pub fn send_message(&self, conversation_id: &str, message: &str) -> Result<Message> {
        self.runtime
            .block_on(self.inner.send_message(conversation_id, message))
    }

    pub fn get_conversation(&self, conversation_id: &str) -> Result<Conversation> {
        self.runtime
            .block_on(self.inner.get_conversation(conversation_id))
    }

    pub fn list_conversations(&self, limit: i64) -> Result<Vec<Conversation>> {
        self.runtime.block_on(self.inner.list_conversations(limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_applies_the_same_https_validation() {
        let config = Config::default().with_base_url("http://rentahuman.ai/api");
        assert!(matches!(
            Client::with_config(config),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn sanitization_runs_before_any_network_wait() {
        let client = Client::new().expect("default client builds");
        assert!(matches!(
            client.get_human("../admin"),
            Err(Error::Validation(_))
        ));
        client.shutdown();
    }
}
