//! Message handlers module
//!
//! Feeds private text messages into the banner state machine and delivers
//! the structured reply back to the chat.

use base64::Engine;
use teloxide::{Bot, types::{ChatId, InputFile, Message}, prelude::*};
use tracing::{debug, warn};
use crate::models::Reply;
use crate::state::{BannerFlow, SessionStore};
use crate::utils::errors::{BannerBuddyError, Result};
use crate::utils::logging::log_turn;

/// Handle incoming text messages
pub async fn handle_message(
    bot: Bot,
    msg: Message,
    flow: BannerFlow,
    sessions: SessionStore,
) -> Result<()> {
    let chat_id = msg.chat.id;

    if !chat_id.is_user() {
        debug!(chat_id = ?chat_id, "Ignoring message outside a private chat");
        return Ok(());
    }

    let Some(text) = msg.text() else {
        bot.send_message(chat_id, "Please reply with text.").await?;
        return Ok(());
    };

    // The session stays locked until the reply is built
    let reply = {
        let mut session = sessions.lock(chat_id.0).await;
        let from_state = session.state;
        let reply = flow.handle_turn(&mut session, text).await;
        log_turn(&chat_id.0.to_string(), from_state.as_str(), session.state.as_str(), &reply.message);
        reply
    };

    send_reply(&bot, chat_id, &reply).await
}

/// Deliver a turn reply: candidate photos then text, or the finished banner
pub async fn send_reply(bot: &Bot, chat_id: ChatId, reply: &Reply) -> Result<()> {
    if let Some(banner) = &reply.banner {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&banner.base64)
            .map_err(|e| BannerBuddyError::InvalidInput(format!("Banner is not valid base64: {}", e)))?;

        bot.send_photo(chat_id, InputFile::memory(bytes).file_name("banner.jpg"))
            .caption(format!("{}\nSaved to {}", reply.message, banner.saved_path))
            .await?;
        return Ok(());
    }

    // Candidate photos precede the prompt
    for image in &reply.images {
        if let Err(e) = bot
            .send_photo(chat_id, InputFile::file(&image.reference))
            .caption(image.id.to_string())
            .await
        {
            warn!(error = %e, image = %image.reference, "Failed to send candidate image");
            bot.send_message(chat_id, format!("{}. {}", image.id, image.reference)).await?;
        }
    }

    bot.send_message(chat_id, reply.message.clone()).await?;
    Ok(())
}
