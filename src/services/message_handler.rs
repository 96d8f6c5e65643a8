use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use serenity::{
    builder::{CreateEmbed, CreateMessage, EditMember},
    client::Context,
    http::Http,
    model::{
        channel::Message,
        colour::Colour,
        id::{ChannelId, GuildId, RoleId, UserId},
        mention::Mentionable,
    },
};
use std::sync::Arc;
use tracing::error;

use crate::services::leveling::{earned_rewards, level_for, xp_threshold};
use crate::{Data, Error};

/// Everything that happens to a guild message besides command dispatch.
pub async fn non_command(ctx: &Context, msg: &Message, data: &Data) {
    if msg.author.bot {
        return;
    }

    if msg.guild_id.is_none() {
        let notice = format!(
            "**Commands are disabled in DMs.** If you're trying to contact the mods, \
             reach out to <@{}> instead.",
            data.config.users.contact
        );

        if let Err(ex) = msg.channel_id.say(&ctx.http, notice).await {
            error!("Failed to reply to a DM: {}", ex);
        }

        return;
    }

    let channels = &data.config.guild.channels;

    if msg.channel_id.get() == channels.scammer_banner {
        scammer_banner_check(ctx, msg, data).await;
        return;
    }

    if msg.channel_id.get() == channels.outside_heists {
        let embed = CreateEmbed::new()
            .title("Opt out")
            .description(format!(
                "You can hide this channel by reacting in <#{}> with the :moneybag: emoji.",
                channels.reaction_roles
            ))
            .colour(Colour::BLURPLE);

        if let Err(ex) = msg
            .channel_id
            .send_message(&ctx.http, CreateMessage::new().embed(embed))
            .await
        {
            error!("Failed to send heist opt-out notice: {}", ex);
        }

        return;
    }

    afk_check(ctx, msg, data).await;
    xp_check(ctx, msg, data).await;
}

/// Every long number posted in the scammer-banner channel is recorded
/// as a scammer with the message link as proof, and banned on sight if
/// they're in the server.
async fn scammer_banner_check(ctx: &Context, msg: &Message, data: &Data) {
    static ID_PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = ID_PATTERN.get_or_init(|| Regex::new(r"\d{10,}").unwrap());

    let Some(guild_id) = msg.guild_id else {
        return;
    };

    let mut recorded = false;

    for raw in pattern.find_iter(&msg.content) {
        let Ok(user_id) = raw.as_str().parse::<u64>() else {
            continue;
        };

        if let Err(ex) = data.db.add_scammer_ban(user_id, &msg.link()).await {
            error!("Failed to record scammer {}: {}", user_id, ex);
            continue;
        }

        recorded = true;

        // Only present members can be banned right away; absent ones
        // are caught by the join handler.
        if guild_id.member(&ctx.http, UserId::new(user_id)).await.is_ok() {
            if let Err(ex) = guild_id
                .ban_with_reason(&ctx.http, UserId::new(user_id), 2, "Known scammer")
                .await
            {
                error!("Failed to ban scammer {}: {}", user_id, ex);
            }
        }
    }

    if recorded {
        if let Err(ex) = msg.react(&ctx.http, '✅').await {
            error!("Failed to acknowledge scammer report: {}", ex);
        }
    }
}

/// Clears the author's AFK state and answers mentions of AFK users.
async fn afk_check(ctx: &Context, msg: &Message, data: &Data) {
    let Some(guild_id) = msg.guild_id else {
        return;
    };

    if let Err(ex) =
        remove_afk_if_needed(ctx, data, guild_id, msg.author.id, Some(msg.channel_id)).await
    {
        error!("Failed to clear AFK status: {}", ex);
    }

    for mentioned in &msg.mentions {
        if mentioned.bot || mentioned.id == msg.author.id {
            continue;
        }

        let account = match data.db.get_account(mentioned.id.get()).await {
            Ok(account) => account,
            Err(ex) => {
                error!("Failed to look up mentioned account: {}", ex);
                continue;
            }
        };

        if let Some(afk) = account.afk {
            let display_name = afk.old_nick.unwrap_or_else(|| mentioned.name.clone());

            let embed = CreateEmbed::new()
                .title(format!("{display_name} is currently AFK"))
                .field("Reason", afk.reason.clone(), false)
                .colour(Colour::GOLD);

            match msg
                .channel_id
                .send_message(
                    &ctx.http,
                    CreateMessage::new().embed(embed).reference_message(msg),
                )
                .await
            {
                Ok(reply) => delete_later(ctx.http.clone(), reply, Duration::from_secs(8)),
                Err(ex) => error!("Failed to send AFK notice: {}", ex),
            }
        }
    }
}

/// Takes a user out of AFK if they were in it: restores the stored
/// nickname (best effort; the state is cleared even if Discord says
/// no), then posts a short self-deleting notice.
pub async fn remove_afk_if_needed(
    ctx: &Context,
    data: &Data,
    guild_id: GuildId,
    user_id: UserId,
    channel: Option<ChannelId>,
) -> Result<(), Error> {
    let account = data.db.get_account(user_id.get()).await?;

    let Some(afk) = account.afk else {
        return Ok(());
    };

    if !data.db.clear_afk(user_id.get()).await? {
        // Another handler got there first.
        return Ok(());
    }

    let restored = afk.old_nick.unwrap_or_default();
    if let Err(ex) = guild_id
        .edit_member(&ctx.http, user_id, EditMember::new().nickname(restored))
        .await
    {
        error!("Failed to restore nickname for {}: {}", user_id, ex);
    }

    let channel = channel.unwrap_or(ChannelId::new(data.config.guild.channels.chat));

    let embed = CreateEmbed::new()
        .title("Your AFK status has been removed")
        .colour(Colour::BLURPLE);

    match channel
        .send_message(
            &ctx.http,
            CreateMessage::new()
                .content(format!("<@{user_id}>"))
                .embed(embed),
        )
        .await
    {
        Ok(notice) => delete_later(ctx.http.clone(), notice, Duration::from_secs(4)),
        Err(ex) => error!("Failed to announce AFK removal: {}", ex),
    }

    Ok(())
}

/// The XP pipeline: cooldown gate, then one point, then level-up side
/// effects. Holds the user's account lock across the grant so a racing
/// banking command can't have its write swallowed.
async fn xp_check(ctx: &Context, msg: &Message, data: &Data) {
    let Some(guild_id) = msg.guild_id else {
        return;
    };

    if !data.config.xp.channels.contains(&msg.channel_id.get()) {
        return;
    }

    let user_id = msg.author.id.get();

    // Check and mark in one step so a second message arriving while
    // this grant is still in flight can't slip through the gate.
    if !data.cooldowns.lock().unwrap().try_pass(user_id) {
        return;
    }

    let _account = data.locks.acquire(user_id).await;

    let grant = match data.db.add_xp(user_id, 1).await {
        Ok(grant) => grant,
        Err(ex) => {
            error!("Failed providing xp to user: {}", ex);
            return;
        }
    };

    let level_before = level_for(grant.xp_before);
    let level_after = level_for(grant.xp_after);

    if level_after > level_before {
        level_up(ctx, msg, data, guild_id, level_after, grant.xp_after).await;
    }
}

async fn level_up(
    ctx: &Context,
    msg: &Message,
    data: &Data,
    guild_id: GuildId,
    new_level: i64,
    xp_after: i64,
) {
    let rewards = earned_rewards(new_level, &data.config.xp.roles);
    apply_reward_roles(ctx, guild_id, msg.author.id, &rewards).await;

    let to_next = xp_threshold(new_level + 1) - xp_after;
    let congrats = format!(
        "Congrats, you are now at level {new_level}! \
         You need {to_next} more XP to reach the next level."
    );

    // DM the user; fall back to a channel reply if their DMs are shut.
    if msg
        .author
        .dm(&ctx.http, CreateMessage::new().content(&congrats))
        .await
        .is_err()
    {
        if let Err(ex) = msg
            .reply(&ctx.http, format!("{} - {congrats}", msg.author.mention()))
            .await
        {
            error!("Failed to announce a level up: {}", ex);
        }
    }
}

/// Idempotently re-grants every earned reward role. Discord treats
/// re-adding a held role as a no-op, so no diffing is needed.
pub async fn apply_reward_roles(
    ctx: &Context,
    guild_id: GuildId,
    user_id: UserId,
    rewards: &[RoleId],
) {
    let member = match guild_id.member(&ctx.http, user_id).await {
        Ok(member) => member,
        Err(ex) => {
            error!("Failed to fetch member {} for rewards: {}", user_id, ex);
            return;
        }
    };

    for role in rewards {
        if let Err(ex) = member.add_role(&ctx.http, *role).await {
            error!("Failed to grant reward role {} to {}: {}", role, user_id, ex);
        }
    }
}

/// Deletes a notice after a delay without holding up the handler.
pub fn delete_later(http: Arc<Http>, msg: Message, after: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(after).await;
        let _ = msg.delete(&http).await;
    });
}
