//! Conversation engine: maps inbound commands and free text to exactly one
//! reply per message, driving the session store, the persistence adapter,
//! and the remote gateway.
//!
//! Adapter failures never propagate past this module; they are matched into
//! human-readable reply text so the operator always hears back.

use crate::sessions::{Intent, SessionStore};
use crate::telegram::Command;
use cob_core::{extract, password, ContactStore, ContactTable, RemoteRunner};
use cob_gateway::DiagCommand;
use std::collections::BTreeSet;
use std::sync::Arc;
use teloxide::utils::command::BotCommands;
use tracing::{info, warn};

const MSG_INVALID: &str = "Invalid command.";
const MSG_CANCELLED: &str = "Operation cancelled.";
const MSG_PROMPT_EMAIL: &str = "Send the text to search for email addresses.";
const MSG_PROMPT_PHONE: &str = "Send the text to search for phone numbers.";
const MSG_PROMPT_PASSWORD: &str = "Send the password to check its strength.";
const MSG_NO_EMAILS_FOUND: &str = "No email addresses found.";
const MSG_NO_PHONES_FOUND: &str = "No phone numbers found.";
const MSG_EMAILS_SAVED: &str = "Email addresses saved to the database.";
const MSG_PHONES_SAVED: &str = "Phone numbers saved to the database.";
const MSG_EMAILS_EMPTY: &str = "No email addresses stored.";
const MSG_PHONES_EMPTY: &str = "No phone numbers stored.";
const MSG_PASSWORD_STRONG: &str = "Password is strong.";
const MSG_PASSWORD_WEAK: &str = "Password is weak.";
const MSG_NO_OUTPUT: &str = "(no output)";

pub struct Engine {
    sessions: SessionStore,
    store: Arc<dyn ContactStore>,
    remote: Arc<dyn RemoteRunner>,
    repl_log_path: String,
    help: String,
}

impl Engine {
    pub fn new(
        store: Arc<dyn ContactStore>,
        remote: Arc<dyn RemoteRunner>,
        repl_log_path: String,
    ) -> Self {
        Self {
            sessions: SessionStore::new(),
            store,
            remote,
            repl_log_path,
            help: format!("{MSG_INVALID}\n{}", Command::descriptions()),
        }
    }

    pub async fn handle_command(&self, operator: i64, command: Command) -> String {
        match command {
            Command::FindEmail => {
                self.sessions.set_intent(operator, Intent::AwaitingEmail);
                MSG_PROMPT_EMAIL.to_string()
            }
            Command::FindPhoneNumber => {
                self.sessions.set_intent(operator, Intent::AwaitingPhone);
                MSG_PROMPT_PHONE.to_string()
            }
            Command::VerifyPassword => {
                self.sessions.set_intent(operator, Intent::AwaitingPassword);
                MSG_PROMPT_PASSWORD.to_string()
            }
            Command::Yes => self.confirm(operator).await,
            Command::No => self.cancel(operator),
            Command::GetEmails => self.list_contacts(ContactTable::Emails).await,
            Command::GetPhoneNumbers => self.list_contacts(ContactTable::PhoneNumbers).await,
            Command::GetRelease => self.run_remote(DiagCommand::Release).await,
            Command::GetUname => self.run_remote(DiagCommand::Uname).await,
            Command::GetUptime => self.run_remote(DiagCommand::Uptime).await,
            Command::GetDf => self.run_remote(DiagCommand::DiskUsage).await,
            Command::GetFree => self.run_remote(DiagCommand::Memory).await,
            Command::GetMpstat => self.run_remote(DiagCommand::CpuStats).await,
            Command::GetW => self.run_remote(DiagCommand::LoggedIn).await,
            Command::GetAuths => self.run_remote(DiagCommand::AuthHistory).await,
            Command::GetCritical => self.run_remote(DiagCommand::SyslogTail).await,
            Command::GetPs => self.run_remote(DiagCommand::Processes).await,
            Command::GetSs => self.run_remote(DiagCommand::Sockets).await,
            Command::GetAptList(package) => {
                self.run_remote(DiagCommand::apt_list(package.as_deref())).await
            }
            Command::GetServices => self.run_remote(DiagCommand::Services).await,
            Command::GetReplLog => self.run_remote(DiagCommand::ReplLog).await,
        }
    }

    pub async fn handle_text(&self, operator: i64, text: &str) -> String {
        match self.sessions.intent(operator) {
            None => self.help.clone(),
            Some(Intent::AwaitingEmail) => self.stage_matches(
                operator,
                Intent::AwaitingEmail,
                extract::extract_emails(text),
                MSG_NO_EMAILS_FOUND,
                "Found email addresses:",
            ),
            Some(Intent::AwaitingPhone) => self.stage_matches(
                operator,
                Intent::AwaitingPhone,
                extract::extract_phone_numbers(text),
                MSG_NO_PHONES_FOUND,
                "Found phone numbers:",
            ),
            Some(Intent::AwaitingPassword) => {
                self.sessions.take(operator);
                if password::is_strong(text) {
                    MSG_PASSWORD_STRONG.to_string()
                } else {
                    MSG_PASSWORD_WEAK.to_string()
                }
            }
        }
    }

    /// Stages extracted candidates and asks for confirmation. An empty
    /// extraction leaves the armed state (and any previously staged batch)
    /// untouched.
    fn stage_matches(
        &self,
        operator: i64,
        intent: Intent,
        found: BTreeSet<String>,
        none_message: &str,
        header: &str,
    ) -> String {
        if found.is_empty() {
            return none_message.to_string();
        }
        let values: Vec<String> = found.into_iter().collect();
        let reply = format!(
            "{header}\n{}\nAdd to the database? (/yes or /no)",
            values.join("\n")
        );
        self.sessions.stage(operator, intent, values);
        reply
    }

    /// `/yes`: takes the staged batch and resets to Idle in one state-map
    /// transition, then persists outside the lock. Nothing staged (including
    /// the password intent, which never stages) is invalid, mirroring
    /// confirm-while-idle.
    async fn confirm(&self, operator: i64) -> String {
        let Some(session) = self.sessions.take(operator) else {
            return MSG_INVALID.to_string();
        };
        let (table, saved_message) = match session.intent {
            Intent::AwaitingEmail => (ContactTable::Emails, MSG_EMAILS_SAVED),
            Intent::AwaitingPhone => (ContactTable::PhoneNumbers, MSG_PHONES_SAVED),
            Intent::AwaitingPassword => return MSG_INVALID.to_string(),
        };
        if session.staged.is_empty() {
            return MSG_INVALID.to_string();
        }
        match self.store.insert_many(table, &session.staged).await {
            Ok(()) => {
                info!(
                    event = "batch_saved",
                    operator,
                    table = ?table,
                    count = session.staged.len()
                );
                saved_message.to_string()
            }
            Err(err) => {
                warn!(event = "batch_save_failed", operator, error = %err);
                format!("Failed to save to the database: {err}")
            }
        }
    }

    fn cancel(&self, operator: i64) -> String {
        if self.sessions.take(operator).is_some() {
            MSG_CANCELLED.to_string()
        } else {
            MSG_INVALID.to_string()
        }
    }

    async fn list_contacts(&self, table: ContactTable) -> String {
        let (header, empty_message) = match table {
            ContactTable::Emails => ("Stored email addresses:", MSG_EMAILS_EMPTY),
            ContactTable::PhoneNumbers => ("Stored phone numbers:", MSG_PHONES_EMPTY),
        };
        match self.store.select_all(table).await {
            Ok(rows) if rows.is_empty() => empty_message.to_string(),
            Ok(rows) => format!("{header}\n{}", rows.join("\n")),
            Err(err) => {
                warn!(event = "contact_list_failed", table = ?table, error = %err);
                format!("Failed to read the database: {err}")
            }
        }
    }

    async fn run_remote(&self, command: DiagCommand) -> String {
        let line = command.shell_line(&self.repl_log_path);
        match self.remote.execute(&line).await {
            Ok(output) if output.stdout.trim().is_empty() => MSG_NO_OUTPUT.to_string(),
            Ok(output) => output.stdout,
            Err(err) => {
                warn!(event = "remote_command_failed", command = %line, error = %err);
                format!("Remote command failed: {err}")
            }
        }
    }
}
