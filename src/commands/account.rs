//! Registration: /start.

use super::CommandContext;
use crate::conversation::Reply;
use crate::i18n;
use tracing::error;

pub(super) async fn handle_start(ctx: &CommandContext<'_>) -> Reply {
    match ctx.identity.register(ctx.chat_id, ctx.sender_handle).await {
        Ok(reg) if reg.created => {
            let name = ctx.sender_name.unwrap_or(&reg.user.username);
            Reply::text(i18n::welcome_new(ctx.lang, name, &reg.user.username))
        }
        Ok(reg) => Reply::text(i18n::welcome_back(ctx.lang, &reg.user.username)),
        Err(e) => {
            error!("registration failed for chat {}: {e}", ctx.chat_id);
            Reply::text(i18n::t("error_generic", ctx.lang))
        }
    }
}
