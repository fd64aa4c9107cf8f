//! Remote agent settings
//!
//! A local copy of the server's key/value settings. Values are fetched
//! with `GET /api/settings`; an update is sent with
//! `PUT /api/settings/:key` and only applied locally once the server has
//! accepted it.

use crate::api::ApiClient;
use crate::error::{Result, SwarmChatError};
use colored::Colorize;
use prettytable::{format, Table};
use serde_json::Value;
use std::collections::BTreeMap;

/// Settings panel backed by the server
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsPanel {
    settings: BTreeMap<String, Value>,
}

impl SettingsPanel {
    /// Build a panel from already fetched settings
    pub fn from_settings(settings: BTreeMap<String, Value>) -> Self {
        Self { settings }
    }

    /// Fetch every setting from the server
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not a JSON object
    pub async fn load(client: &ApiClient) -> Result<Self> {
        let settings = client.get_settings().await?;
        tracing::debug!("Loaded {} settings", settings.len());
        Ok(Self { settings })
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.settings.get(key)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.settings.iter()
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    pub fn as_map(&self) -> &BTreeMap<String, Value> {
        &self.settings
    }

    /// Store `value` under `key` on the server, then locally
    ///
    /// # Errors
    ///
    /// Returns error if the key is blank or the server rejects the update;
    /// the local copy is left untouched in that case
    pub async fn update(&mut self, client: &ApiClient, key: &str, value: Value) -> Result<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(SwarmChatError::Settings("Setting key cannot be empty".to_string()).into());
        }

        client.put_setting(key, value.clone()).await?;
        tracing::info!("Setting {} updated", key);
        self.settings.insert(key.to_string(), value);
        Ok(())
    }

    /// Settings as a two-column table
    pub fn table(&self) -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
        table.add_row(prettytable::row!["Setting".bold(), "Value".bold()]);
        for (key, value) in &self.settings {
            table.add_row(prettytable::row![key.cyan(), display_value(value)]);
        }
        table
    }

    /// Print the settings table to stdout
    pub fn print(&self) {
        if self.settings.is_empty() {
            println!("{}", "No settings found.".yellow());
            return;
        }
        println!("\nAgent settings:");
        self.table().printstd();
        println!();
    }
}

/// Parse a raw value typed by the user
///
/// Valid JSON is kept as is (`0.7`, `true`, `["a"]`); anything else
/// becomes a string.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use swarmchat::settings::parse_value;
///
/// assert_eq!(parse_value("0.7"), json!(0.7));
/// assert_eq!(parse_value("gpt-4"), json!("gpt-4"));
/// ```
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Render a value without quoting plain strings
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
