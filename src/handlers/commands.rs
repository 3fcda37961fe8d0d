//! Command handlers module
//!
//! Handles /start, /cancel and /help.

use teloxide::{Bot, types::Message, prelude::*};
use tracing::info;
use crate::state::{replies, SessionStore};
use crate::utils::errors::Result;

/// Handle /start: forget any banner in progress and ask for a product
pub async fn handle_start(bot: Bot, msg: Message, sessions: SessionStore) -> Result<()> {
    let chat_id = msg.chat.id;
    sessions.reset(chat_id.0).await;
    info!(chat_id = chat_id.0, "Session started");

    bot.send_message(
        chat_id,
        format!("Hi! I turn your product photos into banners.\n{}", replies::ASK_PRODUCT_NAME),
    )
    .await?;
    Ok(())
}

/// Handle /cancel: drop the banner in progress
pub async fn handle_cancel(bot: Bot, msg: Message, sessions: SessionStore) -> Result<()> {
    let chat_id = msg.chat.id;
    sessions.reset(chat_id.0).await;
    info!(chat_id = chat_id.0, "Session cancelled");

    bot.send_message(chat_id, replies::SESSION_CANCELLED).await?;
    Ok(())
}

/// Handle /help
pub async fn handle_help(bot: Bot, msg: Message) -> Result<()> {
    bot.send_message(msg.chat.id, help_text()).await?;
    Ok(())
}

pub fn help_text() -> &'static str {
    "BannerBuddy builds a promotional banner in four steps:\n\
     1. Type a product name to see matching photos.\n\
     2. Reply with the number of the photo you want (or another name to search again).\n\
     3. Send the headline.\n\
     4. Send the description and wait for your banner.\n\n\
     /start - start a new banner\n\
     /cancel - drop the banner in progress\n\
     /help - show this help"
}
