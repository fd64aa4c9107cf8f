//! The agent the user is currently chatting with

use serde::{Deserialize, Serialize};

/// Descriptive fields of the active agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub name: String,
    pub role: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Default for Agent {
    fn default() -> Self {
        Self {
            name: "GPT Assistant".to_string(),
            role: "General Purpose AI".to_string(),
            status: "active".to_string(),
            id: None,
        }
    }
}

/// Partial agent update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentUpdate {
    pub name: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    pub id: Option<String>,
}

impl AgentUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.role.is_none() && self.status.is_none() && self.id.is_none()
    }
}

/// Owner of the active agent
#[derive(Debug, Clone, Default)]
pub struct AgentState {
    agent: Agent,
}

impl AgentState {
    pub fn new(agent: Agent) -> Self {
        Self { agent }
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Shallow-merge `update` into the active agent
    pub fn update_agent(&mut self, update: AgentUpdate) -> &Agent {
        if let Some(name) = update.name {
            self.agent.name = name;
        }
        if let Some(role) = update.role {
            self.agent.role = role;
        }
        if let Some(status) = update.status {
            self.agent.status = status;
        }
        if let Some(id) = update.id {
            self.agent.id = Some(id);
        }
        &self.agent
    }
}
