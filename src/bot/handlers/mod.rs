pub mod message;

use std::sync::Arc;
use std::time::Duration;

use teloxide::{
    dispatching::{dialogue, UpdateHandler},
    prelude::*,
};
use tokio::sync::Mutex;

use crate::database::store::ProverbStore;
use crate::services::subscription::SubscriptionScheduler;

/// Wires inbound chat traffic to store reads and scheduler
/// (un)subscription. The subscribe/unsubscribe commands can be switched
/// off by configuration, leaving a reply-only bot.
pub struct BotHandler {
    pub store: ProverbStore,
    pub scheduler: Arc<Mutex<SubscriptionScheduler>>,
    pub interval: Duration,
    pub subscriptions_enabled: bool,
}

impl BotHandler {
    pub fn new(
        store: ProverbStore,
        scheduler: Arc<Mutex<SubscriptionScheduler>>,
        interval: Duration,
        subscriptions_enabled: bool,
    ) -> Self {
        Self {
            store,
            scheduler,
            interval,
            subscriptions_enabled,
        }
    }

    pub fn schema(&self) -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
        use teloxide::dispatching::UpdateFilterExt;

        let store = self.store.clone();
        let scheduler = self.scheduler.clone();
        let interval = self.interval;
        let subscriptions_enabled = self.subscriptions_enabled;
        let fallback_store = self.store.clone();

        dialogue::enter::<Update, teloxide::dispatching::dialogue::InMemStorage<()>, (), _>()
            .branch(
                Update::filter_message()
                    .filter_command::<crate::bot::commands::Command>()
                    .endpoint(move |bot: Bot, msg: Message, cmd: crate::bot::commands::Command| {
                        let store = store.clone();
                        let scheduler = scheduler.clone();
                        async move {
                            message::command_handler(
                                bot,
                                msg,
                                cmd,
                                store,
                                scheduler,
                                interval,
                                subscriptions_enabled,
                            )
                            .await
                            .map_err(Into::into)
                        }
                    }),
            )
            .branch(
                Update::filter_message().endpoint(move |bot: Bot, msg: Message| {
                    let store = fallback_store.clone();
                    async move {
                        message::proverb_reply_handler(bot, msg, store)
                            .await
                            .map_err(Into::into)
                    }
                }),
            )
    }
}
