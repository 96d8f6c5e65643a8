use poise::CreateReply;
use rand::{distributions::Alphanumeric, Rng};
use serenity::{
    builder::{
        CreateEmbed, CreateEmbedAuthor, CreateEmbedFooter, CreateMessage, EditMember,
        ExecuteWebhook,
    },
    model::{
        channel::{PermissionOverwrite, PermissionOverwriteType},
        colour::Colour,
        id::{ChannelId, RoleId},
        mention::Mentionable,
        permissions::Permissions,
        timestamp::Timestamp,
        user::User,
        webhook::Webhook,
    },
};

use crate::{
    commands::{acknowledge, checks},
    services::profanity,
    Error, SunsetContext,
};

/// Toggles the caller's staff-leave role.
///
/// Turning leave on optionally forwards a goodbye note to the staff
/// webhook, run through the profanity filter first.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    check = "checks::is_staff",
    description_localized("en-US", "Toggles your staff leave status.")
)]
pub async fn leave(
    ctx: SunsetContext<'_>,
    #[rest]
    #[description = "An optional note for the staff channel"]
    message: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    let data = ctx.data();
    let author = ctx.author();
    let leave_role = RoleId::new(data.config.guild.roles.staff_leave);

    let member = guild_id.member(ctx.http(), author.id).await?;

    if member.roles.contains(&leave_role) {
        member.remove_role(ctx.http(), leave_role).await?;

        ctx.send(
            CreateReply::default().embed(
                CreateEmbed::new()
                    .title("Turned staff leave off")
                    .colour(Colour::DARK_GREEN),
            ),
        )
        .await?;

        return Ok(());
    }

    member.add_role(ctx.http(), leave_role).await?;

    ctx.send(
        CreateReply::default().embed(
            CreateEmbed::new()
                .title("Turned staff leave on")
                .colour(Colour::DARK_GREEN),
        ),
    )
    .await?;

    if let Some(message) = message {
        let censored = profanity::censor(&data.http, &message).await;

        let embed = CreateEmbed::new()
            .description(censored)
            .colour(Colour::BLURPLE)
            .author(CreateEmbedAuthor::new(author.tag()).icon_url(author.face()));

        let webhook = Webhook::from_url(ctx.http(), &data.config.guild.webhooks.leave).await?;
        webhook
            .execute(ctx.http(), false, ExecuteWebhook::new().embed(embed))
            .await?;
    }

    Ok(())
}

/// Notifies a user that they've been blacklisted from giveaways.
///
/// Falls back to the blacklist webhook when their DMs are closed.
#[poise::command(
    prefix_command,
    slash_command,
    owners_only,
    description_localized("en-US", "Notifies a user of a giveaway blacklist.")
)]
pub async fn blacklisted(
    ctx: SunsetContext<'_>,
    #[description = "The blacklisted user"] user: User,
    #[description = "How long the blacklist lasts"] time: String,
    #[rest]
    #[description = "Why they were blacklisted"]
    reason: String,
) -> Result<(), Error> {
    let data = ctx.data();

    let embed = CreateEmbed::new()
        .title("You've been blacklisted from giveaways, lotteries, and events.")
        .description(format!(
            "You can appeal [here]({}) or undo this early by purchasing \
             `Escape Jail` from the UnbelievaBoat store.",
            data.config.guild.appeals_url
        ))
        .colour(Colour::RED)
        .field("Time", time.clone(), true)
        .field("Reason", reason.clone(), true);

    let dm = user
        .direct_message(ctx.http(), CreateMessage::new().embed(embed.clone()))
        .await;

    if dm.is_err() {
        let webhook =
            Webhook::from_url(ctx.http(), &data.config.guild.webhooks.blacklist).await?;
        webhook
            .execute(
                ctx.http(),
                false,
                ExecuteWebhook::new()
                    .content(user.mention().to_string())
                    .embed(embed),
            )
            .await?;
    }

    acknowledge(&ctx).await?;
    Ok(())
}

/// Removes a user's giveaway entry and tells them why. Must be used by
/// replying to the giveaway message whose reaction should go.
#[poise::command(
    prefix_command,
    owners_only,
    guild_only,
    description_localized("en-US", "Removes a user's giveaway entry.")
)]
pub async fn gawreqs(
    ctx: SunsetContext<'_>,
    #[description = "The user whose entry to remove"] user: User,
) -> Result<(), Error> {
    let poise::Context::Prefix(prefix) = ctx else {
        return Ok(());
    };

    let Some(giveaway) = &prefix.msg.referenced_message else {
        ctx.say("Reply to the giveaway message to use this.").await?;
        return Ok(());
    };

    giveaway
        .channel_id
        .delete_reaction(ctx.http(), giveaway.id, Some(user.id), '🎉')
        .await?;

    let embed = CreateEmbed::new()
        .title("Your giveaway entry has been removed.")
        .description(format!(
            "You did not meet/complete the requirements for [this giveaway]({}).",
            giveaway.link()
        ))
        .colour(Colour::RED);

    user.direct_message(ctx.http(), CreateMessage::new().embed(embed))
        .await?;

    prefix.msg.delete(ctx.http()).await?;
    Ok(())
}

/// Replaces a member's nickname with a moderated placeholder plus a random tag.
///
/// The tag keeps repeated moderations distinguishable.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    check = "checks::is_moderator",
    description_localized("en-US", "Moderates the nickname of a member.")
)]
pub async fn modnick(
    ctx: SunsetContext<'_>,
    #[description = "The member to rename"] user: User,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    let tag: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();

    guild_id
        .edit_member(
            ctx.http(),
            user.id,
            EditMember::new()
                .nickname(format!("Moderated name {tag}"))
                .audit_log_reason(&format!("Moderated by {}", ctx.author().tag())),
        )
        .await?;

    acknowledge(&ctx).await?;
    Ok(())
}

/// Pings the chat revival role with a conversation starter.
///
/// Uses either the one given or a random topic from the pool. Helpers
/// only, in the main chat channel, at most once an hour.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    check = "checks::helper_in_chat",
    guild_cooldown = 3600,
    description_localized("en-US", "Pings the chat revival role.")
)]
pub async fn revive(
    ctx: SunsetContext<'_>,
    #[rest]
    #[description = "A topic to revive the chat with"]
    topic: Option<String>,
) -> Result<(), Error> {
    let data = ctx.data();
    let author = ctx.author();

    let mut embed = CreateEmbed::new()
        .title("Let's revive the chat!")
        .author(CreateEmbedAuthor::new(author.tag()).icon_url(author.face()));

    match topic {
        Some(topic) => embed = embed.description(topic),
        None => {
            let Some(starter) = data.db.random_topic().await? else {
                ctx.say("There are no topics in the pool yet.").await?;
                return Ok(());
            };

            embed = embed.description(starter.content);

            if starter.thumbnail_approved {
                if let Some(thumbnail) = starter.thumbnail {
                    embed = embed.thumbnail(thumbnail);

                    if let Some(credit) = starter.credit {
                        embed = embed.footer(CreateEmbedFooter::new(credit));
                    }
                }
            }
        }
    }

    ctx.channel_id()
        .send_message(
            ctx.http(),
            CreateMessage::new()
                .content(RoleId::new(data.config.guild.roles.reviver).mention().to_string())
                .embed(embed),
        )
        .await?;

    if let poise::Context::Prefix(prefix) = ctx {
        prefix.msg.delete(ctx.http()).await?;
    }

    Ok(())
}

/// Posts a claim deadline for a giveaway. Must be used by replying to
/// the winner announcement; the deadline counts from that message.
#[poise::command(
    prefix_command,
    guild_only,
    check = "checks::giveaways_only",
    description_localized("en-US", "Shows a claim time limit for a giveaway.")
)]
pub async fn claim(
    ctx: SunsetContext<'_>,
    #[description = "Minutes until the claim expires"] minutes: i64,
) -> Result<(), Error> {
    let poise::Context::Prefix(prefix) = ctx else {
        return Ok(());
    };

    let Some(winner) = &prefix.msg.referenced_message else {
        ctx.say("Reply to the winner message to use this.").await?;
        return Ok(());
    };

    let end_time = *winner.timestamp + chrono::Duration::minutes(minutes);

    let embed = CreateEmbed::new()
        .colour(Colour::BLURPLE)
        .timestamp(Timestamp::from(end_time))
        .footer(CreateEmbedFooter::new("Must DM host (not sponsor) to claim by"));

    winner
        .channel_id
        .send_message(
            ctx.http(),
            CreateMessage::new()
                .embed(embed)
                .reference_message(winner.as_ref()),
        )
        .await?;

    prefix.msg.delete(ctx.http()).await?;
    Ok(())
}

async fn set_dank_lockdown(ctx: SunsetContext<'_>, locked: bool) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    let data = ctx.data();
    let everyone = RoleId::new(guild_id.get());

    let overwrite = PermissionOverwrite {
        allow: Permissions::empty(),
        deny: if locked {
            Permissions::SEND_MESSAGES
        } else {
            Permissions::empty()
        },
        kind: PermissionOverwriteType::Role(everyone),
    };

    let embed = if locked {
        CreateEmbed::new()
            .title("Dank Memer is down!")
            .description(
                "**You are not muted.** __All Dank Memer channels are locked until \
                 the bot comes back online.__\n\n\
                 *(Note that just because the bot is online in another server \
                 doesn't mean it's online here.)*",
            )
            .colour(Colour::RED)
            .thumbnail(
                "https://emojipedia-us.s3.dualstack.us-west-1.amazonaws.com/thumbs/240/apple/271/locked_1f512.png",
            )
    } else {
        CreateEmbed::new()
            .title("Dank Memer is back!")
            .description("Thank you for your patience.")
            .colour(Colour::RED)
            .thumbnail(
                "https://emojipedia-us.s3.dualstack.us-west-1.amazonaws.com/thumbs/240/apple/271/unlocked_1f513.png",
            )
    };

    for channel_id in &data.config.guild.dank_channels {
        let channel = ChannelId::new(*channel_id);

        channel.create_permission(ctx.http(), overwrite.clone()).await?;
        channel
            .send_message(ctx.http(), CreateMessage::new().embed(embed.clone()))
            .await?;
    }

    if locked {
        ctx.say("Locked down Dank Memer channels.").await?;
    } else {
        ctx.say("Unlocked Dank Memer channels.").await?;
    }

    Ok(())
}

/// Locks the Dank Memer channels while the economy bot is down.
#[poise::command(
    prefix_command,
    slash_command,
    owners_only,
    guild_only,
    description_localized("en-US", "Locks down Dank Memer channels.")
)]
pub async fn dankdown(ctx: SunsetContext<'_>) -> Result<(), Error> {
    set_dank_lockdown(ctx, true).await
}

/// Reopens the Dank Memer channels.
#[poise::command(
    prefix_command,
    slash_command,
    owners_only,
    guild_only,
    description_localized("en-US", "Unlocks Dank Memer channels.")
)]
pub async fn dankup(ctx: SunsetContext<'_>) -> Result<(), Error> {
    set_dank_lockdown(ctx, false).await
}

/// Speaks through the bot in another channel.
#[poise::command(
    prefix_command,
    owners_only,
    description_localized("en-US", "Sends a message to a channel as the bot.")
)]
pub async fn say(
    ctx: SunsetContext<'_>,
    #[description = "Where to send the message"] channel: ChannelId,
    #[rest]
    #[description = "What to say"]
    message: String,
) -> Result<(), Error> {
    channel.say(ctx.http(), message).await?;

    acknowledge(&ctx).await?;
    Ok(())
}
