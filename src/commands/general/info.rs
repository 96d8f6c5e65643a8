use poise::CreateReply;
use serenity::{builder::CreateEmbed, model::colour::Colour};

use crate::{Error, SunsetContext};

#[poise::command(
    prefix_command,
    slash_command,
    description_localized("en-US", "Info about this bot.")
)]
pub async fn info(ctx: SunsetContext<'_>) -> Result<(), Error> {
    const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");
    let content = format!(
        "Sunset v{} - The community bot for Sunset City",
        VERSION.unwrap_or("<unknown>")
    );

    ctx.say(content).await?;
    Ok(())
}

/// Registers or unregisters application commands in this guild or globally
#[poise::command(prefix_command, hide_in_help, owners_only)]
pub async fn register(ctx: SunsetContext<'_>) -> Result<(), Error> {
    poise::builtins::register_application_commands_buttons(ctx).await?;

    Ok(())
}

#[poise::command(
    prefix_command,
    slash_command,
    description_localized("en-US", "Shows the bot's latency.")
)]
pub async fn ping(ctx: SunsetContext<'_>) -> Result<(), Error> {
    let latency = ctx.ping().await;

    let embed = CreateEmbed::new()
        .title("Pong!")
        .field("Bot Latency", format!("{} ms", latency.as_millis()), true)
        .colour(Colour::BLURPLE);

    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}
