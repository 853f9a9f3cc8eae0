//! Wire types for the rentahuman.ai REST API.
//!
//! Field names follow the API's camelCase convention on the wire;
//! absent fields decode to their defaults.

use serde::{Deserialize, Serialize};

/// Agent identifier stamped on bookings, bounties, and conversations
/// created through this client.
pub const DEFAULT_AGENT_ID: &str = "rentahuman-rs";

// ── humans ────────────────────────────────────────────────────

/// A human's crypto wallet.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CryptoWallet {
    pub chain: String,
    pub address: String,
}

/// A skill on the platform.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Skill {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// The skills listing arrives either as bare names or full objects.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum SkillEntry {
    Name(String),
    Full(Skill),
}

impl SkillEntry {
    pub(crate) fn into_skill(self) -> Skill {
        match self {
            Self::Name(name) => Skill {
                name,
                category: None,
            },
            Self::Full(skill) => skill,
        }
    }
}

/// A human available for hire on rentahuman.ai.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Human {
    pub id: String,
    pub name: String,
    pub location: Option<String>,
    /// Hourly rate in USD.
    pub rate: Option<f64>,
    pub skills: Vec<String>,
    pub bio: Option<String>,
    pub availability: Option<String>,
    pub crypto_wallets: Vec<CryptoWallet>,
    pub rating: Option<f64>,
    pub completed_tasks: Option<i64>,
    pub created_at: Option<String>,
}

impl Human {
    /// One-line profile summary for agent consumption.
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("{} ({})", self.name, self.id)];
        if let Some(location) = &self.location {
            parts.push(format!("in {location}"));
        }
        if let Some(rate) = self.rate {
            parts.push(format!("${rate}/hr"));
        }
        if !self.skills.is_empty() {
            let listed = self
                .skills
                .iter()
                .take(5)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ");
            parts.push(format!("skills: {listed}"));
        }
        if let Some(rating) = self.rating {
            parts.push(format!("rating: {rating:.1}"));
        }
        parts.join(" | ")
    }
}

/// Filters for [`crate::Client::search_humans`].
#[derive(Debug, Clone)]
pub struct HumanSearch {
    /// Filter by skill name, e.g. "Packages" or "Photography".
    pub skill: Option<String>,
    pub min_rate: Option<f64>,
    pub max_rate: Option<f64>,
    /// Filter by name, case-insensitive.
    pub name: Option<String>,
    /// Page size, clamped to 1..=500.
    pub limit: i64,
    /// Pagination offset, clamped to be non-negative.
    pub offset: i64,
}

impl Default for HumanSearch {
    fn default() -> Self {
        Self {
            skill: None,
            min_rate: None,
            max_rate: None,
            name: None,
            limit: 20,
            offset: 0,
        }
    }
}

// ── bookings ──────────────────────────────────────────────────

/// Request body for creating a booking.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCreate {
    pub human_id: String,
    pub agent_id: String,
    pub task_title: String,
    pub start_time: String,
    pub estimated_hours: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl BookingCreate {
    pub fn new(
        human_id: impl Into<String>,
        task_title: impl Into<String>,
        start_time: impl Into<String>,
        estimated_hours: f64,
    ) -> Self {
        Self {
            human_id: human_id.into(),
            agent_id: DEFAULT_AGENT_ID.to_string(),
            task_title: task_title.into(),
            start_time: start_time.into(),
            estimated_hours,
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A booking between an agent and a human.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Booking {
    pub id: String,
    pub human_id: String,
    pub agent_id: String,
    pub task_title: String,
    #[serde(default = "pending_status")]
    pub status: String,
    pub start_time: Option<String>,
    pub estimated_hours: Option<f64>,
    pub created_at: Option<String>,
}

/// Filters for [`crate::Client::list_bookings`].
#[derive(Debug, Clone)]
pub struct BookingFilter {
    pub human_id: Option<String>,
    pub agent_id: Option<String>,
    pub status: Option<String>,
    pub limit: i64,
}

impl Default for BookingFilter {
    fn default() -> Self {
        Self {
            human_id: None,
            agent_id: None,
            status: None,
            limit: 20,
        }
    }
}

// ── bounties ──────────────────────────────────────────────────

/// Request body for posting a bounty.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BountyCreate {
    pub agent_type: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    pub price_type: String,
    pub price: f64,
    pub skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl BountyCreate {
    pub fn new(title: impl Into<String>, description: impl Into<String>, price: f64) -> Self {
        Self {
            agent_type: DEFAULT_AGENT_ID.to_string(),
            title: title.into(),
            description: description.into(),
            estimated_hours: None,
            price_type: "fixed".to_string(),
            price,
            skills: Vec::new(),
            location: None,
        }
    }
}

/// Partial update for an existing bounty; unset fields are left alone.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BountyUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// A task bounty posted by an agent.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Bounty {
    pub id: String,
    pub title: String,
    pub description: String,
    pub agent_type: String,
    pub estimated_hours: Option<f64>,
    #[serde(default = "fixed_price_type")]
    pub price_type: String,
    pub price: f64,
    #[serde(default = "open_status")]
    pub status: String,
    pub application_count: i64,
    pub created_at: Option<String>,
}

/// An application from a human to a bounty.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BountyApplication {
    pub id: String,
    pub bounty_id: String,
    pub human_id: String,
    pub human_name: String,
    pub message: String,
    pub rate: Option<f64>,
    #[serde(default = "pending_status")]
    pub status: String,
    pub created_at: Option<String>,
}

// ── conversations ─────────────────────────────────────────────

/// A message within a conversation.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    pub sender: String,
    pub content: String,
    pub created_at: Option<String>,
}

/// A conversation between an agent and a human.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Conversation {
    pub id: String,
    pub human_id: String,
    pub agent_type: String,
    pub subject: String,
    pub messages: Vec<Message>,
    pub created_at: Option<String>,
}

fn pending_status() -> String {
    "pending".to_string()
}

fn open_status() -> String {
    "open".to_string()
}

fn fixed_price_type() -> String {
    "fixed".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn human_decodes_camel_case_fields() {
        let human: Human = serde_json::from_value(json!({
            "id": "h1",
            "name": "Ada",
            "cryptoWallets": [{"chain": "eth", "address": "0xabc"}],
            "completedTasks": 12,
            "createdAt": "2026-01-02T03:04:05Z"
        }))
        .expect("valid human payload");
        assert_eq!(human.completed_tasks, Some(12));
        assert_eq!(human.crypto_wallets[0].chain, "eth");
        assert!(human.skills.is_empty());
    }

    #[test]
    fn human_summary_reads_like_a_profile_line() {
        let human = Human {
            id: "h1".to_string(),
            name: "Ada".to_string(),
            location: Some("Lisbon".to_string()),
            rate: Some(45.0),
            skills: vec!["Photography".to_string(), "Errands".to_string()],
            rating: Some(4.86),
            ..Human::default()
        };
        assert_eq!(
            human.summary(),
            "Ada (h1) | in Lisbon | $45/hr | skills: Photography, Errands | rating: 4.9"
        );
    }

    #[test]
    fn booking_status_defaults_to_pending() {
        let booking: Booking =
            serde_json::from_value(json!({"id": "b1", "humanId": "h1"})).expect("valid booking");
        assert_eq!(booking.status, "pending");
    }

    #[test]
    fn booking_create_serializes_camel_case_without_empty_description() {
        let body = serde_json::to_value(BookingCreate::new("h1", "Walk the dog", "2026-08-05", 1.5))
            .expect("serializable");
        assert_eq!(body["humanId"], "h1");
        assert_eq!(body["taskTitle"], "Walk the dog");
        assert_eq!(body["agentId"], DEFAULT_AGENT_ID);
        assert!(body.get("description").is_none());
    }

    #[test]
    fn bounty_update_skips_unset_fields() {
        let update = BountyUpdate {
            status: Some("cancelled".to_string()),
            ..BountyUpdate::default()
        };
        let body = serde_json::to_value(update).expect("serializable");
        assert_eq!(body, json!({"status": "cancelled"}));
    }

    #[test]
    fn skill_entries_accept_both_wire_shapes() {
        let entries: Vec<SkillEntry> = serde_json::from_value(json!([
            "Packages",
            {"name": "Photography", "category": "Creative"}
        ]))
        .expect("valid skills payload");
        let skills: Vec<Skill> = entries.into_iter().map(SkillEntry::into_skill).collect();
        assert_eq!(skills[0].name, "Packages");
        assert_eq!(skills[1].category.as_deref(), Some("Creative"));
    }
}
