//! The single place command failures are turned into user-facing
//! replies. Commands return errors; nothing replies to its own
//! failures inline.

use poise::{CreateReply, FrameworkError};
use serenity::{builder::CreateEmbed, model::colour::Colour};
use tracing::error;

use crate::models::errors::DomainError;
use crate::{Data, Error, SunsetContext};

async fn reply_error(ctx: &SunsetContext<'_>, embed: CreateEmbed) {
    if let Err(ex) = ctx.send(CreateReply::default().embed(embed)).await {
        error!("Failed to send an error reply: {}", ex);
    }
}

pub async fn on_error(error: FrameworkError<'_, Data, Error>) {
    match error {
        FrameworkError::Setup { error, .. } => panic!("Failed to start bot: {error:?}"),
        FrameworkError::Command { error, ctx, .. } => {
            // Domain failures carry their own user-facing message and
            // imply the operation had no partial effect.
            if let Some(domain) = error.downcast_ref::<DomainError>() {
                let embed = CreateEmbed::new()
                    .title(domain.to_string())
                    .colour(Colour::RED);

                reply_error(&ctx, embed).await;
                return;
            }

            error!(
                "Error in command `{}`: {:?}",
                ctx.command().qualified_name,
                error
            );

            let embed = CreateEmbed::new()
                .title("An unknown error has occurred.")
                .field("Details", error.to_string(), false)
                .colour(Colour::RED);

            reply_error(&ctx, embed).await;
        }
        FrameworkError::ArgumentParse { input, ctx, error, .. } => {
            error!(
                "Bad argument for `{}`: {:?}",
                ctx.command().qualified_name,
                error
            );

            let mut embed = CreateEmbed::new()
                .title("One or more of the arguments provided is invalid.")
                .colour(Colour::RED);

            if let Some(input) = input {
                embed = embed.description(format!("`{input}`"));
            }

            reply_error(&ctx, embed).await;
        }
        FrameworkError::CooldownHit {
            remaining_cooldown,
            ctx,
            ..
        } => {
            let embed = CreateEmbed::new()
                .title("That command is on cooldown.")
                .description(format!(
                    "Try again in `{}` seconds.",
                    remaining_cooldown.as_secs() + 1
                ))
                .colour(Colour::RED);

            reply_error(&ctx, embed).await;
        }
        FrameworkError::MissingUserPermissions { ctx, .. }
        | FrameworkError::NotAnOwner { ctx, .. }
        | FrameworkError::GuildOnly { ctx, .. } => {
            let embed = CreateEmbed::new()
                .title("You can't use that command here.")
                .colour(Colour::RED);

            reply_error(&ctx, embed).await;
        }
        FrameworkError::CommandCheckFailed { error, ctx, .. } => {
            if let Some(ex) = error {
                error!(
                    "Check errored for `{}`: {:?}",
                    ctx.command().qualified_name,
                    ex
                );
            }

            let embed = CreateEmbed::new()
                .title("You can't use that command here.")
                .colour(Colour::RED);

            reply_error(&ctx, embed).await;
        }
        other => {
            if let Err(ex) = poise::builtins::on_error(other).await {
                error!("Error while handling error: {}", ex);
            }
        }
    }
}
