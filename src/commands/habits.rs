//! Habit listings: /myhabits, /public.

use super::CommandContext;
use crate::conversation::Reply;
use crate::i18n;
use habitual_core::traits::HabitRepository;
use tracing::error;

/// How many of the caller's own habits /myhabits shows.
const MY_HABITS_LIMIT: usize = 10;
/// How many public habits /public shows.
const PUBLIC_HABITS_LIMIT: usize = 5;

pub(super) async fn handle_my_habits(ctx: &CommandContext<'_>) -> Reply {
    let user = match ctx.identity.resolve(ctx.chat_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return Reply::text(i18n::t("not_registered", ctx.lang)),
        Err(e) => {
            error!("identity lookup failed for chat {}: {e}", ctx.chat_id);
            return Reply::text(i18n::t("error_generic", ctx.lang));
        }
    };

    match ctx.habits.list_by_user(user.id, MY_HABITS_LIMIT).await {
        Ok(habits) if habits.is_empty() => Reply::text(i18n::t("no_habits", ctx.lang)),
        Ok(habits) => Reply::text(i18n::habit_list(ctx.lang, &habits)),
        Err(e) => {
            error!("failed to list habits for user {}: {e}", user.id);
            Reply::text(i18n::t("error_generic", ctx.lang))
        }
    }
}

pub(super) async fn handle_public(habits: &dyn HabitRepository, lang: &str) -> Reply {
    match habits.list_public(PUBLIC_HABITS_LIMIT).await {
        Ok(list) if list.is_empty() => Reply::text(i18n::t("no_public_habits", lang)),
        Ok(list) => Reply::text(i18n::public_list(lang, &list)),
        Err(e) => {
            error!("failed to list public habits: {e}");
            Reply::text(i18n::t("error_generic", lang))
        }
    }
}
