/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes three top-level command modules:

- `chat`: Interactive chat session
- `send`: One-shot message send
- `settings`: Remote agent settings management

Terminal rendering shared by the handlers lives in `render`.
*/

use crate::api::{ApiClient, ChatBackend};
use crate::chat::agent::Agent;
use crate::chat::controller::{ChatController, CommandOutcome, ControllerOptions};
use crate::config::Config;
use crate::error::{Result, SwarmChatError};
use crate::settings::SettingsPanel;
use colored::Colorize;
use std::sync::Arc;

// Slash-command parser, completion and help
pub mod special_commands;

fn build_controller(config: &Config, client: &ApiClient) -> ChatController {
    let backend: Arc<dyn ChatBackend> = Arc::new(client.clone());
    ChatController::new(
        Agent::from(&config.agent),
        backend,
        ControllerOptions::from_config(config),
    )
}

// Interactive chat handler
pub mod chat {
    //! Interactive chat handler.
    //!
    //! Lines are read by rustyline on a dedicated thread and forwarded over
    //! a channel, so the session loop can also react to the statistics
    //! timer and to Ctrl-C while a request is in flight.

    use super::*;
    use crate::chat::dispatcher::SendOutcome;
    use crate::commands::special_commands::{
        complete_command, parse_special_command, SpecialCommand,
    };
    use rustyline::completion::{Completer, Pair};
    use rustyline::error::ReadlineError;
    use rustyline::highlight::Highlighter;
    use rustyline::hint::Hinter;
    use rustyline::history::DefaultHistory;
    use rustyline::validate::Validator;
    use rustyline::{Context, Editor, Helper};
    use tokio::sync::mpsc;
    use tokio::time::MissedTickBehavior;

    /// Tab completion for slash commands
    #[derive(Debug, Clone, Copy, Default)]
    pub struct CommandCompleter;

    /// Completion candidates for the text left of the cursor
    ///
    /// Only a leading `/word` with no whitespace before the cursor is
    /// completed.
    pub fn command_candidates(line: &str, pos: usize) -> Vec<String> {
        let head = &line[..pos.min(line.len())];
        if !head.starts_with('/') || head.contains(char::is_whitespace) {
            return Vec::new();
        }
        complete_command(head)
            .into_iter()
            .map(|cmd| cmd.name.to_string())
            .collect()
    }

    impl Completer for CommandCompleter {
        type Candidate = Pair;

        fn complete(
            &self,
            line: &str,
            pos: usize,
            _ctx: &Context<'_>,
        ) -> rustyline::Result<(usize, Vec<Pair>)> {
            let candidates = command_candidates(line, pos)
                .into_iter()
                .map(|name| Pair {
                    display: name.clone(),
                    replacement: name,
                })
                .collect();
            Ok((0, candidates))
        }
    }

    impl Hinter for CommandCompleter {
        type Hint = String;
    }

    impl Highlighter for CommandCompleter {}

    impl Validator for CommandCompleter {}

    impl Helper for CommandCompleter {}

    enum InputEvent {
        Line(String),
        Interrupted,
        Eof,
        Failed(String),
    }

    /// Prompt text plus any text to place on the line for editing
    struct Prompt {
        text: String,
        initial: String,
    }

    /// Read lines on a blocking thread, one per prompt received
    fn spawn_reader(
        prompts: std::sync::mpsc::Receiver<Prompt>,
        events: mpsc::Sender<InputEvent>,
    ) {
        std::thread::spawn(move || {
            let mut rl = match Editor::<CommandCompleter, DefaultHistory>::new() {
                Ok(rl) => rl,
                Err(e) => {
                    let _ = events.blocking_send(InputEvent::Failed(e.to_string()));
                    return;
                }
            };
            rl.set_helper(Some(CommandCompleter));

            while let Ok(prompt) = prompts.recv() {
                let read = if prompt.initial.is_empty() {
                    rl.readline(&prompt.text)
                } else {
                    rl.readline_with_initial(&prompt.text, (prompt.initial.as_str(), ""))
                };
                let event = match read {
                    Ok(line) => {
                        if !line.trim().is_empty() {
                            let _ = rl.add_history_entry(line.as_str());
                        }
                        InputEvent::Line(line)
                    }
                    Err(ReadlineError::Interrupted) => InputEvent::Interrupted,
                    Err(ReadlineError::Eof) => InputEvent::Eof,
                    Err(err) => InputEvent::Failed(err.to_string()),
                };
                if events.blocking_send(event).is_err() {
                    break;
                }
            }
        });
    }

    /// Start an interactive chat session
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    ///
    /// # Errors
    ///
    /// Returns error if the API client cannot be created
    pub async fn run_chat(config: Config) -> Result<()> {
        tracing::info!("Starting interactive chat session");

        let client = ApiClient::new(&config.server)?;
        let mut controller = build_controller(&config, &client);

        let (prompt_tx, prompt_rx) = std::sync::mpsc::channel::<Prompt>();
        let (event_tx, mut event_rx) = mpsc::channel::<InputEvent>(1);
        spawn_reader(prompt_rx, event_tx);

        let mut ticker = tokio::time::interval(controller.stats_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        render::print_welcome_banner(controller.agent(), client.base_url());
        let mut rendered = render::print_new_messages(&controller, 0);
        let mut initial = String::new();

        loop {
            let prompt = Prompt {
                text: "you> ".to_string(),
                initial: std::mem::take(&mut initial),
            };
            if prompt_tx.send(prompt).is_err() {
                break;
            }

            let event = loop {
                tokio::select! {
                    event = event_rx.recv() => break event,
                    _ = ticker.tick() => {
                        controller.refresh_stats();
                    }
                }
            };

            let line = match event {
                Some(InputEvent::Line(line)) => line,
                Some(InputEvent::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Some(InputEvent::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Some(InputEvent::Failed(err)) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
                None => break,
            };

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match parse_special_command(trimmed) {
                Err(e) => {
                    println!("{}\n", e.to_string().red());
                    continue;
                }
                Ok(SpecialCommand::None) => {
                    send_interruptibly(&mut controller, trimmed).await;
                }
                Ok(command) => match controller.run_command(command) {
                    CommandOutcome::Handled | CommandOutcome::NotACommand => {}
                    CommandOutcome::Resend(text) => {
                        println!("{}", format!("Sending again: {}", text).dimmed());
                        send_interruptibly(&mut controller, &text).await;
                    }
                    CommandOutcome::Prefill(text) => initial = text,
                    CommandOutcome::ShowSettings => show_settings(&client, &mut controller).await,
                    CommandOutcome::ShowSession => {
                        controller.refresh_stats();
                        render::print_session(&controller);
                    }
                    CommandOutcome::Exit => break,
                },
            }

            rendered = render::print_new_messages(&controller, rendered);
        }

        controller.shutdown();
        tracing::info!("Chat session {} ended", controller.session().id);
        Ok(())
    }

    /// Send one message; Ctrl-C abandons the request
    async fn send_interruptibly(controller: &mut ChatController, text: &str) {
        println!(
            "{}",
            format!("{} is typing...", controller.agent().name).dimmed()
        );
        let outcome = tokio::select! {
            outcome = controller.send_message(text) => Some(outcome),
            _ = tokio::signal::ctrl_c() => None,
        };
        if matches!(outcome, Some(SendOutcome::Cancelled) | None) {
            controller.refresh_stats();
            println!("{}", "Request cancelled".yellow());
        }
    }

    async fn show_settings(client: &ApiClient, controller: &mut ChatController) {
        match SettingsPanel::load(client).await {
            Ok(panel) => panel.print(),
            Err(e) => {
                tracing::error!("Failed to load settings: {:#}", e);
                controller.add_system_message(
                    format!("Failed to load settings: {}", e),
                    crate::chat::message::MessageKind::Error,
                );
            }
        }
    }

}

// One-shot send handler
pub mod send {
    //! Send a single message without entering the interactive loop.

    use super::*;
    use crate::chat::dispatcher::SendOutcome;
    use crate::chat::message::Sender;
    use serde::Serialize;

    /// Machine-readable result of a send
    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SendReport<'a> {
        pub response: &'a str,
        pub session_id: &'a str,
        pub tokens_used: u64,
        pub response_time: u64,
        pub stats: &'a crate::chat::stats::Stats,
    }

    /// Send `message` and print the reply
    ///
    /// # Errors
    ///
    /// Returns error if the client cannot be created or the message could
    /// not be delivered
    pub async fn run_send(config: Config, message: String, json: bool) -> Result<()> {
        let client = ApiClient::new(&config.server)?;
        let mut controller = build_controller(&config, &client);

        let outcome = tokio::select! {
            outcome = controller.send_message(&message) => outcome,
            _ = tokio::signal::ctrl_c() => SendOutcome::Cancelled,
        };
        if outcome != SendOutcome::Delivered {
            return Err(undelivered(&controller, outcome, client.base_url()).into());
        }

        let reply = controller
            .messages()
            .last()
            .map(|m| m.text.as_str())
            .unwrap_or_default();
        let session = controller.session();
        let response_time = session.response_times.last().copied().unwrap_or(0);

        if json {
            let report = SendReport {
                response: reply,
                session_id: &session.id,
                tokens_used: session.tokens_used,
                response_time,
                stats: controller.stats(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("{}", reply);
            println!(
                "{}",
                format!(
                    "tokens: {} | response time: {}s | session: {}",
                    session.tokens_used, response_time, session.id
                )
                .dimmed()
            );
        }
        Ok(())
    }

    /// Error for a send that produced no reply
    fn undelivered(
        controller: &ChatController,
        outcome: SendOutcome,
        server: &str,
    ) -> SwarmChatError {
        if outcome == SendOutcome::Cancelled {
            return SwarmChatError::Cancelled;
        }
        let reason = controller
            .messages()
            .last()
            .filter(|m| m.sender == Sender::System)
            .map(|m| m.text.clone())
            .unwrap_or_default();
        SwarmChatError::Network(format!("Message not delivered to {}: {}", server, reason))
    }

}

// Remote settings handler
pub mod settings {
    //! List, read and change the server-side agent settings.

    use super::*;
    use crate::cli::SettingsCommand;
    use crate::settings::{display_value, parse_value};

    /// Handle a settings subcommand
    ///
    /// # Errors
    ///
    /// Returns error if the server request fails or a requested key does
    /// not exist
    pub async fn handle_settings(config: &Config, command: SettingsCommand) -> Result<()> {
        let client = ApiClient::new(&config.server)?;

        match command {
            SettingsCommand::List { json } => {
                let panel = SettingsPanel::load(&client).await?;
                if json {
                    println!("{}", serde_json::to_string_pretty(panel.as_map())?);
                } else {
                    panel.print();
                }
            }
            SettingsCommand::Get { key } => {
                let panel = SettingsPanel::load(&client).await?;
                let value = panel
                    .get(&key)
                    .ok_or_else(|| SwarmChatError::Settings(format!("Unknown setting: {}", key)))?;
                println!("{}", display_value(value));
            }
            SettingsCommand::Set { key, value } => {
                let value = parse_value(&value);
                let mut panel = SettingsPanel::default();
                panel.update(&client, &key, value.clone()).await?;
                println!(
                    "{}",
                    format!("Updated {} = {}", key, display_value(&value)).green()
                );
            }
        }
        Ok(())
    }
}

// Terminal rendering
pub mod render {
    //! Terminal rendering of messages, the banner and session details.

    use crate::chat::agent::Agent;
    use crate::chat::controller::ChatController;
    use crate::chat::format::{
        format_duration, format_message_date, format_message_time, format_number, format_trend,
    };
    use crate::chat::message::{Message, MessageKind, Sender};
    use colored::Colorize;
    use prettytable::{format, Table};

    pub fn print_welcome_banner(agent: &Agent, server: &str) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                 swarmchat - Interactive Chat                 ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("Agent:  {} ({}, {})", agent.name.green(), agent.role, agent.status);
        println!("Server: {}\n", server.cyan());
        println!("Type '/help' for available commands, 'exit' to quit\n");
    }

    /// Render one message under its 1-based `number`
    ///
    /// User text is already on screen as input, so only its number and time
    /// are shown.
    pub fn format_message(number: usize, message: &Message, agent_name: &str) -> String {
        let tag = format!("#{} {}", number, format_message_time(message.timestamp)).dimmed();
        match message.sender {
            Sender::User => format!("{} {}", "you".cyan(), tag),
            Sender::Ai => format!("{} {}\n{}\n", agent_name.green().bold(), tag, message.text),
            Sender::System => {
                let text = match message.message_type.unwrap_or_default() {
                    MessageKind::Info => message.text.blue(),
                    MessageKind::Success => message.text.green(),
                    MessageKind::Error => message.text.red(),
                    MessageKind::Warning => message.text.yellow(),
                };
                format!("{} {}\n", text, tag)
            }
        }
    }

    /// Print messages from `from` onwards and return the new render mark
    ///
    /// When the store shrank below `from` only the latest message is
    /// printed.
    pub fn print_new_messages(controller: &ChatController, from: usize) -> usize {
        let store = controller.messages();
        let start = if from > store.len() {
            store.len().saturating_sub(1)
        } else {
            from
        };

        for index in start..store.len() {
            if store.should_show_timestamp(index) {
                if let Some(message) = store.get(index) {
                    println!(
                        "{}",
                        format!("── {} ──", format_message_date(message.timestamp)).dimmed()
                    );
                }
            }
            if let Some(message) = store.get(index) {
                println!(
                    "{}",
                    format_message(index + 1, message, &controller.agent().name)
                );
            }
        }
        store.len()
    }

    /// Session and statistics details as a table
    pub fn session_table(controller: &ChatController) -> Table {
        let session = controller.session();
        let stats = controller.stats();
        let agent = controller.agent();

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
        table.add_row(prettytable::row!["Field".bold(), "Value".bold(), "Trend".bold()]);
        table.add_row(prettytable::row!["Session", session.id.cyan(), ""]);
        table.add_row(prettytable::row![
            "Started",
            format!(
                "{} {}",
                format_message_date(session.start_time),
                format_message_time(session.start_time)
            ),
            ""
        ]);
        table.add_row(prettytable::row![
            "Agent",
            format!("{} ({})", agent.name, agent.status),
            ""
        ]);
        table.add_row(prettytable::row![
            "Messages",
            format_number(stats.messages_count),
            format_trend(stats.trends.messages)
        ]);
        table.add_row(prettytable::row![
            "Tokens",
            format_number(stats.tokens_used),
            format_trend(stats.trends.tokens)
        ]);
        table.add_row(prettytable::row![
            "Avg response",
            format!("{}s", stats.average_response_time),
            format_trend(stats.trends.response_time)
        ]);
        table.add_row(prettytable::row![
            "Duration",
            format_duration(stats.session_duration),
            ""
        ]);
        table
    }

    pub fn print_session(controller: &ChatController) {
        println!("\nSession details:");
        session_table(controller).printstd();
        println!();
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::chat::controller::ControllerOptions;
        use crate::chat::message::NewMessage;
        use crate::test_utils::ScriptedBackend;
        use chrono::Utc;
        use std::sync::Arc;

        fn message(new: NewMessage) -> Message {
            Message {
                text: new.text,
                sender: new.sender,
                timestamp: Utc::now(),
                message_type: new.message_type,
            }
        }

        #[test]
        fn test_user_messages_show_number_only() {
            let line = format_message(4, &message(NewMessage::user("hi there")), "Bot");
            assert!(line.contains("#4"));
            assert!(!line.contains("hi there"));
        }

        #[test]
        fn test_ai_and_system_messages_render_text() {
            let ai = format_message(2, &message(NewMessage::ai("the answer")), "Bot");
            assert!(ai.contains("Bot"));
            assert!(ai.contains("#2"));
            assert!(ai.contains("the answer"));

            let error = format_message(
                3,
                &message(NewMessage::system("went wrong", MessageKind::Error)),
                "Bot",
            );
            assert!(error.contains("went wrong"));
        }

        #[test]
        fn test_session_table_rows() {
            let controller = ChatController::new(
                Agent::default(),
                Arc::new(ScriptedBackend::replying("ok", None)),
                ControllerOptions::default(),
            );
            assert_eq!(session_table(&controller).len(), 8);
        }

        #[test]
        fn test_print_new_messages_returns_mark() {
            let controller = ChatController::new(
                Agent::default(),
                Arc::new(ScriptedBackend::replying("ok", None)),
                ControllerOptions::default(),
            );
            assert_eq!(print_new_messages(&controller, 0), 1);
            assert_eq!(print_new_messages(&controller, 5), 1);
        }
    }
}
