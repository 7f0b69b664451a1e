//! Message routing: ordering per chat, command vs. conversation dispatch.

use super::Gateway;
use crate::commands::{self, Command, CommandContext};
use crate::conversation::Reply;
use crate::i18n::t;
use habitual_core::message::{IncomingMessage, OutgoingMessage};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, error, warn};

impl Gateway {
    /// Dispatch a message: queue it if the chat is busy, otherwise process it
    /// and then drain the chat's queue in order.
    pub(super) async fn dispatch_message(self: Arc<Self>, incoming: IncomingMessage) {
        let chat_key = format!("{}:{}", incoming.channel, incoming.chat_key());

        {
            let mut active = self.active_chats.lock().await;
            if let Some(queue) = active.get_mut(&chat_key) {
                debug!("queued message from {chat_key} (chat busy)");
                queue.push_back(incoming);
                return;
            }
            active.insert(chat_key.clone(), VecDeque::new());
        }

        self.handle_message(incoming).await;
        self.drain_queue(&chat_key).await;
    }

    /// Process queued messages for a chat until its queue is empty, then mark it idle.
    pub(super) async fn drain_queue(&self, chat_key: &str) {
        loop {
            let next = {
                let mut active = self.active_chats.lock().await;
                match active.get_mut(chat_key).and_then(VecDeque::pop_front) {
                    Some(msg) => Some(msg),
                    None => {
                        active.remove(chat_key);
                        None
                    }
                }
            };

            match next {
                Some(queued) => self.handle_message(queued).await,
                None => break,
            }
        }
    }

    /// Produce the reply for one message and send it.
    async fn handle_message(&self, incoming: IncomingMessage) {
        let reply = self.route(&incoming).await;
        self.send_reply(&incoming, reply).await;
    }

    /// Decide the reply for one message. Every message gets exactly one.
    pub(super) async fn route(&self, incoming: &IncomingMessage) -> Reply {
        let chat_id = incoming.chat_key();
        let text = incoming.text.trim();

        if text.starts_with('/') {
            let Some(cmd) = Command::parse(text) else {
                return Reply::text(t("unknown_command", &self.lang));
            };
            let ctx = CommandContext {
                identity: &self.identity,
                habits: self.habits.as_ref(),
                engine: &self.engine,
                chat_id,
                sender_name: incoming.sender_name.as_deref(),
                sender_handle: incoming.sender_handle.as_deref(),
                lang: &self.lang,
            };
            return commands::handle(cmd, &ctx).await;
        }

        match self.engine.handle_text(chat_id, text).await {
            Some(reply) => reply,
            None => Reply::text(t("text_hint", &self.lang)),
        }
    }

    /// Send a reply back to the chat the message came from.
    async fn send_reply(&self, incoming: &IncomingMessage, reply: Reply) {
        let Some(channel) = self.channels.get(&incoming.channel) else {
            warn!("no channel named {} for reply", incoming.channel);
            return;
        };
        let msg = OutgoingMessage {
            text: reply.text,
            keyboard: reply.keyboard,
            reply_target: Some(incoming.chat_key().to_string()),
        };
        if let Err(e) = channel.send(msg).await {
            error!("failed to send reply to {}: {e}", incoming.chat_key());
        }
    }
}
