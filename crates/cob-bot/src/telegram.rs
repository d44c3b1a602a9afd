//! Telegram transport: command parsing and the dispatcher loop.
//!
//! Commands route to the engine's command path; plain text (anything not
//! starting with `/`) routes to the state-machine path. Unknown slash
//! commands fall through to the default handler and get no reply.

use crate::engine::Engine;
use std::sync::Arc;
use teloxide::{
    dispatching::{Dispatcher, HandlerExt, UpdateFilterExt},
    dptree,
    error_handlers::LoggingErrorHandler,
    prelude::*,
    utils::command::{BotCommands, ParseError},
};
use tracing::debug;

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "snake_case", description = "Supported commands:")]
pub enum Command {
    #[command(description = "find email addresses in a text")]
    FindEmail,
    #[command(description = "find phone numbers in a text")]
    FindPhoneNumber,
    #[command(description = "check password strength")]
    VerifyPassword,
    #[command(description = "OS release info")]
    GetRelease,
    #[command(description = "kernel and architecture")]
    GetUname,
    #[command(description = "uptime")]
    GetUptime,
    #[command(description = "disk usage")]
    GetDf,
    #[command(description = "memory usage")]
    GetFree,
    #[command(description = "per-CPU statistics")]
    GetMpstat,
    #[command(description = "logged-in users")]
    GetW,
    #[command(description = "recent logins")]
    GetAuths,
    #[command(description = "tail of the system log")]
    GetCritical,
    #[command(description = "process list")]
    GetPs,
    #[command(description = "listening sockets")]
    GetSs,
    #[command(description = "package info, or first 10 installed packages", parse_with = parse_package_arg)]
    GetAptList(Option<String>),
    #[command(description = "running service units")]
    GetServices,
    #[command(description = "recent replication log lines")]
    GetReplLog,
    #[command(description = "stored email addresses")]
    GetEmails,
    #[command(description = "stored phone numbers")]
    GetPhoneNumbers,
    #[command(description = "confirm the staged batch")]
    Yes,
    #[command(description = "discard the staged batch")]
    No,
}

fn parse_package_arg(input: String) -> Result<(Option<String>,), ParseError> {
    let word = input.split_whitespace().next().map(|s| s.to_string());
    Ok((word,))
}

pub async fn run(bot: Bot, engine: Arc<Engine>) {
    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(command_handler),
        )
        .branch(
            Update::filter_message()
                .filter(|msg: Message| {
                    msg.text().map(|text| !text.starts_with('/')).unwrap_or(false)
                })
                .endpoint(text_handler),
        );

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![engine])
        .default_handler(|update| async move {
            debug!(event = "unhandled_update", update = ?update);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("dispatcher error"))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn command_handler(
    bot: Bot,
    msg: Message,
    command: Command,
    engine: Arc<Engine>,
) -> ResponseResult<()> {
    let reply = engine.handle_command(msg.chat.id.0, command).await;
    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

async fn text_handler(bot: Bot, msg: Message, engine: Arc<Engine>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let reply = engine.handle_text(msg.chat.id.0, text).await;
    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_argument_takes_the_first_word_only() {
        let (word,) = parse_package_arg("nginx extra words".to_string()).expect("parses");
        assert_eq!(word, Some("nginx".to_string()));
        let (word,) = parse_package_arg(String::new()).expect("parses");
        assert_eq!(word, None);
        let (word,) = parse_package_arg("   ".to_string()).expect("parses");
        assert_eq!(word, None);
    }

    #[test]
    fn commands_parse_under_snake_case_names() {
        let bot_name = "opsbot";
        assert_eq!(
            Command::parse("/find_email", bot_name).expect("parses"),
            Command::FindEmail
        );
        assert_eq!(
            Command::parse("/get_apt_list nginx", bot_name).expect("parses"),
            Command::GetAptList(Some("nginx".to_string()))
        );
        assert_eq!(
            Command::parse("/get_apt_list", bot_name).expect("parses"),
            Command::GetAptList(None)
        );
        assert_eq!(Command::parse("/yes", bot_name).expect("parses"), Command::Yes);
    }
}
