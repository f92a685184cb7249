use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone)]
#[command(
    rename_rule = "lowercase",
    description = "Proverb of the Day Bot commands:"
)]
pub enum Command {
    #[command(description = "Display this help message")]
    Help,
    #[command(description = "Start the bot")]
    Start,
    #[command(description = "Receive a random proverb on a recurring schedule")]
    Subscribe,
    #[command(description = "Stop receiving recurring proverbs")]
    Unsubscribe,
}
