//! Bot command handlers.

mod bitcoin;
mod botinfo;
mod cat;
mod coinflip;
mod covid;
mod dog;
mod eight_ball;
mod fact;
mod help;
mod invite;
mod ping;
mod rps;
mod serverinfo;
mod userinfo;

pub use bitcoin::BitcoinHandler;
pub use botinfo::BotInfoHandler;
pub use cat::CatHandler;
pub use coinflip::CoinFlipHandler;
pub use covid::CovidHandler;
pub use dog::DogHandler;
pub use eight_ball::{EightBallHandler, ANSWERS};
pub use fact::FactHandler;
pub use help::HelpHandler;
pub use invite::{InviteHandler, SupportServerHandler};
pub use ping::PingHandler;
pub use rps::RpsHandler;
pub use serverinfo::ServerInfoHandler;
pub use userinfo::UserInfoHandler;

use crate::config::Config;
use bot_core::{CommandRegistry, Embed, ParamSpec};
use fetchers::{FetchError, FetchResponse, HttpFetcher};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Per-user cooldown of the commands that call third-party APIs.
pub const FETCH_COOLDOWN: Duration = Duration::from_secs(3);

/// Register every bot command.
pub fn register_all(
    registry: &mut CommandRegistry,
    config: &Config,
    fetcher: Arc<HttpFetcher>,
    interactions: Arc<bot_core::InteractionController>,
) {
    let prefix = config.bot.prefix.clone();
    let urls = &config.fetch;

    // general
    registry.register(
        "help",
        "List all commands the bot has loaded.",
        HelpHandler::new(prefix.clone()),
    );
    registry
        .register(
            "userinfo",
            "Get some useful (or not) information about the userinfo.",
            UserInfoHandler::new(),
        )
        .param(ParamSpec::user("user", "The user's info that going to be displayed.").optional());
    registry.register(
        "botinfo",
        "Get some useful (or not) information about the bot.",
        BotInfoHandler::new(config.display.clone(), prefix),
    );
    registry.register(
        "serverinfo",
        "Get some useful (or not) information about the server.",
        ServerInfoHandler::new(config.display.clone()),
    );
    registry.register("ping", "Check if the bot is alive.", PingHandler::new());
    registry.register(
        "invite",
        "Get the invite link of the bot to be able to invite it.",
        InviteHandler::new(config.discord.application_id, config.discord.permissions),
    );
    registry.register(
        "server",
        "Get the invite link of the discord server of the bot for some support.",
        SupportServerHandler::new(config.display.support_invite.clone()),
    );
    registry
        .register("8ball", "Ask any question to the bot.", EightBallHandler::new())
        .param(ParamSpec::string("question", "The question you want to ask.").rest());
    registry
        .register(
            "bitcoin",
            "Get the current price of bitcoin.",
            BitcoinHandler::new(fetcher.clone(), urls.bitcoin_url.clone()),
        )
        .cooldown(FETCH_COOLDOWN);
    registry
        .register(
            "covid",
            "Get current covid status of Vietnam.",
            CovidHandler::new(fetcher.clone(), urls.covid_url.clone()),
        )
        .cooldown(FETCH_COOLDOWN);

    // fun
    registry
        .register(
            "randomfact",
            "Get a random fact.",
            FactHandler::new(fetcher.clone(), urls.fact_url.clone()),
        )
        .category("fun")
        .cooldown(FETCH_COOLDOWN);
    registry
        .register(
            "dog",
            "Get a dog image.",
            DogHandler::new(fetcher, urls.dog_url.clone()),
        )
        .category("fun")
        .cooldown(FETCH_COOLDOWN);
    registry
        .register("cat", "Get a cat image", CatHandler::new(urls.cat_base_url.clone()))
        .category("fun")
        .param(ParamSpec::string("word", "Provide a word."))
        .param(ParamSpec::integer("size", "Provide size of the image."));
    registry
        .register(
            "coinflip",
            "Make a coin flip, but give your bet before.",
            CoinFlipHandler::new(interactions.clone()),
        )
        .category("fun");
    registry
        .register(
            "rps",
            "Play the rock paper scissors game against the bot.",
            RpsHandler::new(interactions),
        )
        .category("fun");
}

/// GET `url` and map the body into `T`.
pub(crate) async fn fetch_record<T>(fetcher: &HttpFetcher, url: &str) -> Result<T, FetchError>
where
    T: for<'a> TryFrom<&'a FetchResponse, Error = FetchError>,
{
    let response = fetcher.fetch(url).await?;
    T::try_from(&response)
}

/// Red "Error!" embed for a failed fetch: `<status> - <error>`, or the error
/// alone when no HTTP status was received.
pub fn fetch_error_embed(err: &FetchError) -> Embed {
    warn!(error = %err, status = ?err.status(), "Fetch failed");
    match err.status() {
        Some(status) => Embed::error(format!("{} - {}", status, err)),
        None => Embed::error(err.to_string()),
    }
}

/// Red notice shown when an interactive prompt expires.
pub(crate) fn expired_embed() -> Embed {
    Embed::failure("You took too long to answer.")
}
