//! BannerBuddy Telegram Bot
//!
//! Main application entry point

use std::time::Duration;
use teloxide::{prelude::*, types::Update};
use teloxide::dispatching::UpdateHandler;
use teloxide::utils::command::BotCommands as TeloxideBotCommands;
use tracing::{info, warn, error};

use banner_buddy::{
    config::Settings,
    utils::logging,
    services::ServiceFactory,
    state::{BannerFlow, SessionStore},
    handlers::{handle_cancel, handle_help, handle_message, handle_start},
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// How often idle sessions are swept
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard flushes file logs on exit
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", banner_buddy::info());

    info!("Initializing services...");
    let services = ServiceFactory::new(&settings)?;
    let flow = BannerFlow::new(services);
    let sessions = SessionStore::new(&settings.session);

    let sweeper = sessions.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            sweeper.purge_expired().await;
        }
    });

    let bot = Bot::new(&settings.bot.token);
    if let Err(e) = bot.set_my_commands(BotCommands::bot_commands()).await {
        warn!(error = %e, "Failed to register bot commands");
    }

    let mut dispatcher = Dispatcher::builder(bot, create_handler())
        .dependencies(dptree::deps![flow, sessions])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd);
        })
        .enable_ctrlc_handler()
        .build();

    info!("BannerBuddy bot is ready, starting polling...");
    dispatcher.dispatch().await;

    info!("BannerBuddy bot has been shut down.");
    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    use teloxide::dispatching::UpdateFilterExt;

    Update::filter_message()
        .branch(
            // Handle commands
            dptree::entry()
                .filter_command::<BotCommands>()
                .endpoint(handle_commands)
        )
        .branch(
            // Handle regular messages
            dptree::endpoint(handle_messages)
        )
}

#[derive(TeloxideBotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "BannerBuddy Bot Commands")]
enum BotCommands {
    #[command(description = "Start a new banner")]
    Start,
    #[command(description = "Drop the banner in progress")]
    Cancel,
    #[command(description = "Show help information")]
    Help,
}

/// Handle bot commands
async fn handle_commands(
    bot: Bot,
    msg: Message,
    cmd: BotCommands,
    sessions: SessionStore,
) -> HandlerResult {
    let result = match cmd {
        BotCommands::Start => handle_start(bot, msg, sessions).await,
        BotCommands::Cancel => handle_cancel(bot, msg, sessions).await,
        BotCommands::Help => handle_help(bot, msg).await,
    };

    if let Err(e) = result {
        error!(error = %e, "Error handling command");
        return Err(e.into());
    }

    Ok(())
}

/// Handle regular messages
async fn handle_messages(
    bot: Bot,
    msg: Message,
    flow: BannerFlow,
    sessions: SessionStore,
) -> HandlerResult {
    if let Err(e) = handle_message(bot, msg, flow, sessions).await {
        error!(error = %e, "Error handling message");
        return Err(e.into());
    }

    Ok(())
}
