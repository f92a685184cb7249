use std::sync::Arc;
use std::time::Duration;

use teloxide::prelude::*;
use teloxide::types::{KeyboardButton, KeyboardMarkup, ParseMode};
use tokio::sync::Mutex;

use crate::bot::commands::Command;
use crate::database::store::{ProverbStore, StoreError};
use crate::services::subscription::SubscriptionScheduler;
use crate::utils::logging::{log_command_error, log_command_start, log_command_success};
use crate::utils::markdown::format_proverb;

const GREETING: &str = "Hi, this is ProverbOfTheDay Bot. \
    Push \"Get Me Another One!\" button or send any message and I'll reply you with a proverb";
const UNSUBSCRIBED_REPLY: &str = "You've been successfully unsubscribed.";
const SUBSCRIPTIONS_DISABLED_REPLY: &str =
    "Subscriptions are not available on this bot. Send any message to get a proverb.";
const EMPTY_STORE_REPLY: &str = "No proverbs are available yet. Please try again later.";
const FAILURE_REPLY: &str = "Something went wrong, please try again later.";

/// The one-button reply keyboard the bot attaches to every proverb.
pub fn reply_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new([[KeyboardButton::new("Get Me Another One!")]])
}

fn sender_of(msg: &Message) -> (String, i64) {
    match msg.from() {
        Some(user) => (user.full_name(), user.id.0 as i64),
        None => ("unknown".to_string(), 0),
    }
}

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    store: ProverbStore,
    scheduler: Arc<Mutex<SubscriptionScheduler>>,
    interval: Duration,
    subscriptions_enabled: bool,
) -> ResponseResult<()> {
    let (user, user_id) = sender_of(&msg);
    let chat_id = msg.chat.id;

    match cmd {
        Command::Help | Command::Start => {
            log_command_start("start", &user, user_id, chat_id.0);
            bot.send_message(chat_id, GREETING)
                .reply_to_message_id(msg.id)
                .reply_markup(reply_keyboard())
                .await?;
        }
        Command::Subscribe => {
            log_command_start("subscribe", &user, user_id, chat_id.0);
            if !subscriptions_enabled {
                bot.send_message(chat_id, SUBSCRIPTIONS_DISABLED_REPLY)
                    .reply_to_message_id(msg.id)
                    .await?;
                return Ok(());
            }

            // the requesting chat becomes the delivery destination; a
            // re-subscribe from any chat replaces both job and destination
            let job_bot = bot.clone();
            let job_store = store.clone();
            scheduler.lock().await.subscribe(interval, move || {
                let bot = job_bot.clone();
                let store = job_store.clone();
                async move {
                    let entry = store.get_random().await?;
                    bot.send_message(chat_id, format_proverb(&entry))
                        .parse_mode(ParseMode::Markdown)
                        .reply_markup(reply_keyboard())
                        .await?;
                    Ok(())
                }
            });

            let confirmation = format!(
                "You've been successfully subscribed to getting new proverbs each {} secs. \
                 Should you stop receiving proverbs please /unsubscribe",
                interval.as_secs()
            );
            bot.send_message(chat_id, confirmation)
                .reply_to_message_id(msg.id)
                .await?;
            log_command_success("subscribe", &user, user_id, chat_id.0);
        }
        Command::Unsubscribe => {
            log_command_start("unsubscribe", &user, user_id, chat_id.0);
            if !subscriptions_enabled {
                bot.send_message(chat_id, SUBSCRIPTIONS_DISABLED_REPLY)
                    .reply_to_message_id(msg.id)
                    .await?;
                return Ok(());
            }

            scheduler.lock().await.unsubscribe();
            bot.send_message(chat_id, UNSUBSCRIBED_REPLY)
                .reply_to_message_id(msg.id)
                .await?;
            log_command_success("unsubscribe", &user, user_id, chat_id.0);
        }
    }
    Ok(())
}

/// Any non-command message is answered with one random proverb.
pub async fn proverb_reply_handler(
    bot: Bot,
    msg: Message,
    store: ProverbStore,
) -> ResponseResult<()> {
    let (user, user_id) = sender_of(&msg);
    let chat_id = msg.chat.id;
    log_command_start("proverb", &user, user_id, chat_id.0);

    match store.get_random().await {
        Ok(entry) => {
            bot.send_message(chat_id, format_proverb(&entry))
                .parse_mode(ParseMode::Markdown)
                .reply_to_message_id(msg.id)
                .reply_markup(reply_keyboard())
                .await?;
            log_command_success("proverb", &user, user_id, chat_id.0);
        }
        Err(StoreError::Empty) => {
            bot.send_message(chat_id, EMPTY_STORE_REPLY)
                .reply_to_message_id(msg.id)
                .await?;
        }
        Err(err) => {
            log_command_error("proverb", &user, user_id, chat_id.0, &err.to_string());
            bot.send_message(chat_id, FAILURE_REPLY)
                .reply_to_message_id(msg.id)
                .await?;
        }
    }
    Ok(())
}
