//! Request payloads and list queries for the management API.
//!
//! The server owns every response schema, so reads come back as raw
//! `serde_json::Value`. Writes accept any `Serialize` body; the structs here
//! are optional conveniences shaped like the documents the management plugin
//! expects on its PUT endpoints.

use rabbitmq_mgmt_core::query::QueryParams;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body for `PUT queues/{vhost}/{name}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QueueDefinition {
    /// Whether the queue survives a broker restart.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub durable: Option<bool>,
    /// Whether the queue is deleted when its last consumer unsubscribes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_delete: Option<bool>,
    /// Node the queue should be located on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
    /// Optional queue arguments (`x-message-ttl`, `x-queue-type`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Map<String, Value>>,
}

/// Body for `PUT exchanges/{vhost}/{name}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExchangeDefinition {
    /// Exchange type (`direct`, `fanout`, `topic`, `headers`).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub exchange_type: Option<String>,
    /// Whether the exchange survives a broker restart.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub durable: Option<bool>,
    /// Whether the exchange is deleted when the last binding is removed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_delete: Option<bool>,
    /// Whether the exchange may only be published to via exchange bindings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal: Option<bool>,
    /// Optional exchange arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Map<String, Value>>,
}

/// Body for `PUT vhosts/{name}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VhostDefinition {
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Comma-separated vhost tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    /// Whether firehose tracing is enabled for the vhost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracing: Option<bool>,
}

/// Body for `PUT users/{name}`.
///
/// Exactly one of `password` or `password_hash` should be set; the server
/// rejects bodies carrying both.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserDefinition {
    /// Plaintext password, hashed by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Pre-hashed password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    /// Comma-separated user tags (`administrator`, `monitoring`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
}

/// Body for `PUT permissions/{vhost}/{user}`.
///
/// Each field is a regular expression matched against resource names; the
/// management plugin requires all three.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PermissionsDefinition {
    /// Regex for resources the user may configure.
    pub configure: String,
    /// Regex for resources the user may write to.
    pub write: String,
    /// Regex for resources the user may read from.
    pub read: String,
}

impl PermissionsDefinition {
    /// Grant full access to every resource in the vhost.
    #[must_use]
    pub fn allow_all() -> Self {
        Self {
            configure: ".*".to_string(),
            write: ".*".to_string(),
            read: ".*".to_string(),
        }
    }
}

/// Filter and pagination options for `GET queues/{vhost}`.
#[derive(Debug, Clone, Default)]
pub struct QueueListQuery {
    /// Page number (1-based).
    pub page: Option<u32>,
    /// Page size.
    pub page_size: Option<u32>,
    /// Name filter.
    pub name: Option<String>,
    /// Treat the name filter as a regular expression.
    pub use_regex: bool,
    /// Column to sort by.
    pub sort: Option<String>,
    /// Reverse the sort order.
    pub sort_reverse: bool,
    /// Restrict the columns returned for each queue.
    pub columns: Option<String>,
}

impl QueueListQuery {
    /// Create an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page number.
    #[must_use]
    pub const fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Set the page size.
    #[must_use]
    pub const fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Filter queues by name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Treat the name filter as a regular expression.
    #[must_use]
    pub const fn use_regex(mut self, enabled: bool) -> Self {
        self.use_regex = enabled;
        self
    }

    /// Sort by the given column.
    #[must_use]
    pub fn with_sort(mut self, column: impl Into<String>) -> Self {
        self.sort = Some(column.into());
        self
    }

    /// Reverse the sort order.
    #[must_use]
    pub const fn sort_reverse(mut self, reverse: bool) -> Self {
        self.sort_reverse = reverse;
        self
    }

    /// Restrict the columns returned for each queue.
    #[must_use]
    pub fn with_columns(mut self, columns: impl Into<String>) -> Self {
        self.columns = Some(columns.into());
        self
    }

    /// Convert the query into key/value pairs.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut params = QueryParams::new();
        params.push_opt("page", self.page);
        params.push_opt("page_size", self.page_size);
        params.push_opt("name", self.name.as_deref());
        params.push_flag("use_regex", self.use_regex);
        params.push_opt("sort", self.sort.as_deref());
        params.push_flag("sort_reverse", self.sort_reverse);
        params.push_opt("columns", self.columns.as_deref());
        params.into_pairs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn queue_list_query_to_pairs() {
        let query = QueueListQuery::new()
            .with_page(2)
            .with_page_size(50)
            .with_name("^orders")
            .use_regex(true);

        let pairs = query.to_pairs();
        assert!(pairs.contains(&("page", "2".into())));
        assert!(pairs.contains(&("page_size", "50".into())));
        assert!(pairs.contains(&("name", "^orders".into())));
        assert!(pairs.contains(&("use_regex", "true".into())));
    }

    #[test]
    fn empty_queue_list_query_yields_no_pairs() {
        assert!(QueueListQuery::new().to_pairs().is_empty());
    }

    #[test]
    fn queue_definition_skips_unset_fields() {
        let body = QueueDefinition {
            durable: Some(true),
            ..QueueDefinition::default()
        };
        assert_eq!(serde_json::to_value(&body).unwrap(), json!({"durable": true}));
    }

    #[test]
    fn exchange_definition_serializes_type_field() {
        let body = ExchangeDefinition {
            exchange_type: Some("topic".to_string()),
            durable: Some(true),
            ..ExchangeDefinition::default()
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"type": "topic", "durable": true})
        );
    }

    #[test]
    fn permissions_allow_all() {
        let body = PermissionsDefinition::allow_all();
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"configure": ".*", "write": ".*", "read": ".*"})
        );
    }
}
