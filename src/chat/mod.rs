//! Chat core
//!
//! Messages, session accounting, statistics and the active agent, owned
//! by a single [`ChatController`].

pub mod agent;
pub mod controller;
pub mod dispatcher;
pub mod export;
pub mod format;
pub mod message;
pub mod metrics;
pub mod session;
pub mod stats;

pub use agent::{Agent, AgentState, AgentUpdate};
pub use controller::{ChatController, CommandOutcome, ControllerOptions};
pub use dispatcher::{DispatchState, MessageDispatcher, SendOutcome};
pub use export::ExportData;
pub use message::{Message, MessageKind, MessageStore, NewMessage, Sender};
pub use session::{MessageStats, Session, SessionTracker, SessionUpdate};
pub use stats::{Stats, StatsAggregator, Trends};
