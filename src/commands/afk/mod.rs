use std::time::Duration;

use poise::CreateReply;
use serenity::{
    builder::{CreateEmbed, CreateEmbedFooter, EditMember},
    model::{colour::Colour, user::User},
};
use tracing::warn;

use crate::{
    commands::{acknowledge, checks},
    services::message_handler,
    util::shorten,
    Error, SunsetContext,
};

/// Marks the caller as AFK.
///
/// The reason is shown whenever someone mentions them and the state
/// clears on their next activity. The nickname tag is best-effort;
/// mod-tier members outrank the bot.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    check = "checks::afk_access",
    description_localized("en-US", "Marks you as AFK with the given reason.")
)]
pub async fn afk(
    ctx: SunsetContext<'_>,
    #[rest]
    #[description = "Why you're away"]
    reason: String,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    let data = ctx.data();
    let author = ctx.author();
    let reason = shorten(&reason, 75);

    let member = guild_id.member(ctx.http(), author.id).await?;
    let old_nick = member.nick.clone();

    data.db
        .set_afk(author.id.get(), &reason, old_nick.as_deref())
        .await?;

    let tagged = format!("[AFK] {}", member.display_name());
    if let Err(ex) = guild_id
        .edit_member(ctx.http(), author.id, EditMember::new().nickname(tagged))
        .await
    {
        warn!("Failed to tag {}'s nickname: {}", author.id, ex);
    }

    let reply = ctx
        .send(
            CreateReply::default().embed(
                CreateEmbed::new()
                    .title("You have been marked AFK")
                    .colour(Colour::BLURPLE)
                    .field("Reason", reason.clone(), true)
                    .footer(CreateEmbedFooter::new(
                        "This will be cleared automatically when you start typing in Sunset City",
                    )),
            ),
        )
        .await?;

    let notice = reply.into_message().await?;
    message_handler::delete_later(
        ctx.serenity_context().http.clone(),
        notice,
        Duration::from_secs(5),
    );

    if let poise::Context::Prefix(prefix) = ctx {
        prefix.msg.delete(ctx.http()).await?;
    }

    Ok(())
}

/// Forcibly clears a member's AFK state.
#[poise::command(
    prefix_command,
    slash_command,
    owners_only,
    guild_only,
    description_localized("en-US", "Clears a member's AFK state.")
)]
pub async fn removeafk(
    ctx: SunsetContext<'_>,
    #[description = "The member to clear"] user: User,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    message_handler::remove_afk_if_needed(
        ctx.serenity_context(),
        ctx.data(),
        guild_id,
        user.id,
        Some(ctx.channel_id()),
    )
    .await?;

    acknowledge(&ctx).await?;
    Ok(())
}
