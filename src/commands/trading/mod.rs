use poise::CreateReply;
use serenity::{
    builder::{CreateEmbed, CreateEmbedFooter, CreateMessage},
    model::{
        colour::Colour,
        id::{ChannelId, RoleId},
        mention::Mentionable,
        user::User,
    },
};

use crate::{commands::checks, Error, SunsetContext};

async fn red_reply(ctx: SunsetContext<'_>, embed: CreateEmbed) -> Result<(), Error> {
    ctx.send(CreateReply::default().embed(embed.colour(Colour::RED)))
        .await?;
    Ok(())
}

/// Requests a trusted middleman for a trade with another member.
///
/// Both parties must have agreed to the trading rules and neither may
/// be blacklisted; the request pings the middleman role with a
/// ready-made command to pull both traders into the trading channel.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    aliases("mm"),
    user_cooldown = 60,
    description_localized("en-US", "Requests a middleman for a trade with a user.")
)]
pub async fn middleman(
    ctx: SunsetContext<'_>,
    #[description = "The member you're trading with"] user: User,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    let data = ctx.data();
    let roles = &data.config.guild.roles;

    let author_member = guild_id.member(ctx.http(), ctx.author().id).await?;
    let other_member = guild_id.member(ctx.http(), user.id).await?;

    let blacklisted = RoleId::new(roles.blacklisted);
    let trading = RoleId::new(roles.trading);

    if author_member.roles.contains(&blacklisted) {
        return red_reply(
            ctx,
            CreateEmbed::new()
                .title("You're blacklisted from trading!")
                .description(format!(
                    "**[Click here]({})** to appeal your punishment.",
                    data.config.guild.appeals_url
                )),
        )
        .await;
    }

    if other_member.roles.contains(&blacklisted) {
        return red_reply(
            ctx,
            CreateEmbed::new().title("That user is blacklisted from trading."),
        )
        .await;
    }

    if !author_member.roles.contains(&trading) {
        return red_reply(
            ctx,
            CreateEmbed::new()
                .title("You haven't agreed to our trading rules yet!")
                .description(format!(
                    "Head over to <#{}> to do so.",
                    data.config.guild.channels.trading_rules
                )),
        )
        .await;
    }

    if !other_member.roles.contains(&trading) {
        return red_reply(
            ctx,
            CreateEmbed::new().title("That user hasn't agreed to our trading rules yet."),
        )
        .await;
    }

    if user.id == ctx.author().id {
        return red_reply(ctx, CreateEmbed::new().title("You can't trade with yourself!")).await;
    }

    if user.bot {
        return red_reply(ctx, CreateEmbed::new().title("You can't trade with bots!")).await;
    }

    let request = CreateEmbed::new()
        .title("A user is looking for a middleman!")
        .colour(Colour::BLURPLE)
        .field("User 1", ctx.author().mention().to_string(), true)
        .field("User 2", user.mention().to_string(), true)
        .field(
            "Command to add users",
            format!(
                "```\n{}ta {} {}```",
                data.config.cmd_prefix,
                ctx.author().id,
                user.id
            ),
            false,
        );

    ChannelId::new(data.config.guild.channels.middleman)
        .send_message(
            ctx.http(),
            CreateMessage::new()
                .content(RoleId::new(roles.middleman).mention().to_string())
                .embed(request),
        )
        .await?;

    ctx.send(
        CreateReply::default().embed(
            CreateEmbed::new()
                .title("A middleman request has been sent.")
                .description(
                    "You'll be pinged when you're added to the trading channel. \
                     Please respond once added as soon as possible.",
                )
                .colour(Colour::BLURPLE),
        ),
    )
    .await?;

    Ok(())
}

/// Adds the given traders to the trading channel by granting them the
/// channel-access role, then briefs them in that channel.
#[poise::command(
    prefix_command,
    guild_only,
    check = "checks::is_middleman",
    description_localized("en-US", "Adds the specified users to the trading channel.")
)]
pub async fn ta(ctx: SunsetContext<'_>, users: Vec<User>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    let data = ctx.data();
    let access = RoleId::new(data.config.guild.roles.middleman_trading);

    for user in &users {
        guild_id
            .member(ctx.http(), user.id)
            .await?
            .add_role(ctx.http(), access)
            .await?;
    }

    let ids = users
        .iter()
        .map(|user| user.id.to_string())
        .collect::<Vec<_>>()
        .join(" ");

    let briefing = CreateEmbed::new()
        .title("You've been added to this channel by a middleman.")
        .description(
            "Please follow all instructions from your middleman in this channel. \
             Failure to do so may result in moderation action.",
        )
        .colour(Colour::BLURPLE)
        .field("Your middleman", ctx.author().mention().to_string(), true)
        .field(
            "Command to remove users",
            format!("```\n{}tr {ids}```", data.config.cmd_prefix),
            false,
        );

    let mentions = users
        .iter()
        .map(|user| user.mention().to_string())
        .collect::<Vec<_>>()
        .join(" ");

    ChannelId::new(data.config.guild.channels.middleman)
        .send_message(
            ctx.http(),
            CreateMessage::new().content(mentions).embed(briefing),
        )
        .await?;

    Ok(())
}

/// Removes the given traders from the trading channel and thanks them
/// by DM, best-effort.
#[poise::command(
    prefix_command,
    guild_only,
    check = "checks::is_middleman",
    description_localized("en-US", "Removes the specified users from the trading channel.")
)]
pub async fn tr(ctx: SunsetContext<'_>, users: Vec<User>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    let data = ctx.data();
    let access = RoleId::new(data.config.guild.roles.middleman_trading);

    let thanks = CreateEmbed::new()
        .title("Thank you for using our middleman service!")
        .description(format!(
            "If you have any complaints about your middleman, please DM <@{}>.",
            data.config.users.contact
        ))
        .colour(Colour::BLURPLE)
        .footer(CreateEmbedFooter::new("Have a great day!"));

    for user in &users {
        guild_id
            .member(ctx.http(), user.id)
            .await?
            .remove_role(ctx.http(), access)
            .await?;

        let _ = user
            .direct_message(ctx.http(), CreateMessage::new().embed(thanks.clone()))
            .await;
    }

    ctx.send(
        CreateReply::default()
            .embed(CreateEmbed::new().title("Success!").colour(Colour::BLURPLE)),
    )
    .await?;

    Ok(())
}
