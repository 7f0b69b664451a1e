//! Bot commands: everything that starts with `/`.
//!
//! `/create` and `/cancel` drive the conversation engine; the rest answer
//! instantly without touching any in-progress conversation.

mod account;
mod habits;


use crate::conversation::{ConversationEngine, Reply};
use crate::i18n;
use crate::identity::ChatIdentityBridge;
use habitual_core::traits::HabitRepository;

/// Grouped context for command execution.
pub struct CommandContext<'a> {
    pub identity: &'a ChatIdentityBridge,
    pub habits: &'a dyn HabitRepository,
    pub engine: &'a ConversationEngine,
    pub chat_id: &'a str,
    pub sender_name: Option<&'a str>,
    pub sender_handle: Option<&'a str>,
    pub lang: &'a str,
}

/// Known bot commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Create,
    MyHabits,
    Public,
    Cancel,
    Help,
}

impl Command {
    /// Parse a command from message text. Returns `None` for unknown `/` prefixes.
    pub fn parse(text: &str) -> Option<Self> {
        let first = text.split_whitespace().next()?;
        // Strip @botname suffix (e.g. "/help@habitual_bot" → "/help").
        let cmd = first.split('@').next().unwrap_or(first);
        match cmd {
            "/start" => Some(Self::Start),
            "/create" => Some(Self::Create),
            "/myhabits" => Some(Self::MyHabits),
            "/public" => Some(Self::Public),
            "/cancel" => Some(Self::Cancel),
            "/help" => Some(Self::Help),
            _ => None,
        }
    }
}

/// Handle a command and return the reply.
pub async fn handle(cmd: Command, ctx: &CommandContext<'_>) -> Reply {
    match cmd {
        Command::Start => account::handle_start(ctx).await,
        Command::Create => ctx.engine.begin(ctx.chat_id).await,
        Command::MyHabits => habits::handle_my_habits(ctx).await,
        Command::Public => habits::handle_public(ctx.habits, ctx.lang).await,
        Command::Cancel => ctx.engine.cancel(ctx.chat_id).await,
        Command::Help => Reply::text(i18n::t("help", ctx.lang)),
    }
}
