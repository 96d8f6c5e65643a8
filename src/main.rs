mod commands;
mod models;
mod services;
mod util;

use std::error;
use std::fs;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serenity::client::{Context, FullEvent};
use serenity::model::gateway::GatewayIntents;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;

use models::config::Config;
use services::cooldown::CooldownGate;
use services::database::Database;
use services::locks::AccountLocks;
use services::unbelievaboat::UnbClient;
use services::{bot_init, member_handler, message_handler};

pub type Error = Box<dyn error::Error + Send + Sync>;
pub type SunsetContext<'a> = poise::Context<'a, Data, Error>;

/// Everything the handlers share, owned here and handed to the
/// framework at startup. Nothing in the bot reaches for globals.
pub struct Data {
    pub config: Arc<Config>,
    pub db: Arc<Database>,
    /// Gate consulted before every message-driven XP grant.
    pub cooldowns: Mutex<CooldownGate>,
    /// Per-user locks serializing account mutations.
    pub locks: AccountLocks,
    /// Rate limit on welcomer-role pings, shared across joins.
    pub welcome: member_handler::WelcomeThrottle,
    pub http: reqwest::Client,
    pub unb: UnbClient,
}

pub async fn event_handler(
    ctx: &Context,
    event: &FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        FullEvent::Ready { data_about_bot } => {
            bot_init::ready(ctx, data_about_bot, data).await;
        }
        FullEvent::Message { new_message } => {
            message_handler::non_command(ctx, new_message, data).await;
        }
        FullEvent::TypingStart { event } => {
            if let Some(guild_id) = event.guild_id {
                message_handler::remove_afk_if_needed(
                    ctx,
                    data,
                    guild_id,
                    event.user_id,
                    Some(event.channel_id),
                )
                .await?;
            }
        }
        FullEvent::ReactionAdd { add_reaction } => {
            if let (Some(guild_id), Some(user_id)) =
                (add_reaction.guild_id, add_reaction.user_id)
            {
                message_handler::remove_afk_if_needed(ctx, data, guild_id, user_id, None).await?;
            }
        }
        FullEvent::GuildMemberUpdate { event, .. } => {
            // Our own "[AFK]" nickname edit echoes back as a member
            // update; clearing on it would undo the AFK command.
            let own_tag = event
                .nick
                .as_deref()
                .is_some_and(|nick| nick.starts_with("[AFK]"));

            if !event.user.bot && !own_tag {
                message_handler::remove_afk_if_needed(
                    ctx,
                    data,
                    event.guild_id,
                    event.user.id,
                    None,
                )
                .await?;
            }
        }
        FullEvent::InviteCreate { data: invite } => {
            if let (Some(guild_id), Some(inviter)) = (invite.guild_id, &invite.inviter) {
                message_handler::remove_afk_if_needed(ctx, data, guild_id, inviter.id, None)
                    .await?;
            }
        }
        FullEvent::GuildMemberAddition { new_member } => {
            member_handler::on_join(ctx, new_member, data).await;
        }
        FullEvent::GuildMemberRemoval { user, .. } => {
            member_handler::on_leave(ctx, user, data).await;
        }
        _ => {}
    }

    Ok(())
}

fn init_logger() -> std::io::Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::hourly("logs", "sunset.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing::subscriber::set_global_default(
        fmt::Subscriber::builder()
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_span_events(fmt::format::FmtSpan::CLOSE)
            .with_ansi(true)
            .with_max_level(tracing::Level::INFO)
            .finish()
            .with(fmt::Layer::default().with_writer(non_blocking)),
    )
    .expect("Failed to set global subscriber");

    const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");
    info!("Initializing Sunset v{}", VERSION.unwrap_or("<unknown>"));
    info!("Reading from {}", std::env::current_dir()?.display());

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let _log_guard = match init_logger() {
        Ok(guard) => Some(guard),
        Err(ex) => {
            eprintln!("Failed to initialize logger: {ex}");
            None
        }
    };

    let config_json = fs::read_to_string("config.json").expect("config.json not found");
    let config: Arc<Config> =
        Arc::new(serde_json::from_str(&config_json).expect("config.json is malformed"));

    let database = Arc::new(
        Database::new(
            &config.sql_server_ip,
            config.sql_server_port,
            &config.sql_server_username,
            &config.sql_server_password,
        )
        .await
        .expect("Failed to connect to the database"),
    );

    let token = config.token.clone();
    let options = commands::get_framework(&config.cmd_prefix);

    let setup_config = config.clone();
    let framework = poise::Framework::builder()
        .options(options)
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;

                let http = reqwest::Client::new();
                let unb = UnbClient::new(
                    http.clone(),
                    &setup_config.unbelievaboat.token,
                    setup_config.guild.id,
                );

                Ok(Data {
                    db: database,
                    cooldowns: Mutex::new(CooldownGate::new(
                        setup_config.xp.cooldown_capacity,
                        Duration::from_secs(setup_config.xp.cooldown_seconds),
                    )),
                    locks: AccountLocks::new(),
                    welcome: member_handler::WelcomeThrottle::new(
                        member_handler::WELCOME_PING_INTERVAL,
                    ),
                    http,
                    unb,
                    config: setup_config,
                })
            })
        })
        .build();

    let mut client = serenity::client::ClientBuilder::new(&token, GatewayIntents::all())
        .framework(framework)
        .await
        .expect("Failed to create client");

    if let Err(ex) = client.start().await {
        error!("Client error: {}", ex);
    }

    Ok(())
}
