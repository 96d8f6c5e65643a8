use poise::CreateReply;
use serenity::{
    builder::{CreateEmbed, CreateEmbedFooter},
    model::{colour::Colour, user::User},
};
use tracing::warn;

use crate::{commands::checks, services::leveling, util::format_coins, Error, SunsetContext};

/// Looks up a member's profile. Only helpers may inspect someone other
/// than themselves.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    aliases("me", "profile"),
    description_localized("en-US", "Shows a member's profile.")
)]
pub async fn user(
    ctx: SunsetContext<'_>,
    #[description = "The member to look up (helpers only)"] member: Option<User>,
) -> Result<(), Error> {
    let target = match member {
        Some(user) if user.id != ctx.author().id => {
            if !checks::is_helper(ctx).await? {
                let embed = CreateEmbed::new()
                    .title("Nope")
                    .description("Only helpers can look at other members' profiles.")
                    .colour(Colour::RED);
                ctx.send(CreateReply::default().embed(embed)).await?;
                return Ok(());
            }
            user
        }
        _ => ctx.author().clone(),
    };

    let data = ctx.data();
    let account = data.db.get_account(target.id.get()).await?;

    let level = leveling::level_for(account.xp);
    let to_next = leveling::xp_to_next(account.xp);

    let mut embed = CreateEmbed::new()
        .title(target.tag())
        .colour(Colour::from_rgb(158, 0, 89))
        .thumbnail(target.face())
        .field("Level", level.to_string(), true)
        .field("XP", format!("{} ({} to next level)", account.xp, to_next), true)
        .field("Donated", format_coins(account.donated), true);

    if let Some(afk) = &account.afk {
        embed = embed.field("AFK", afk.reason.clone(), false);
    }

    // UnbelievaBoat balance is best-effort; the profile still renders if
    // the API is down.
    match data.unb.balance(target.id.get()).await {
        Ok(balance) => {
            embed = embed
                .field("Wallet", format_coins(balance.cash), true)
                .field("Bank", format_coins(balance.bank), true);
        }
        Err(error) => warn!(%error, "failed to fetch UnbelievaBoat balance"),
    }

    if let Some(guild_id) = ctx.guild_id() {
        if let Ok(guild_member) = guild_id.member(ctx, target.id).await {
            if let Some(joined) = guild_member.joined_at {
                embed = embed.footer(CreateEmbedFooter::new(format!(
                    "Joined {}",
                    joined.format("%B %-d, %Y")
                )));
            }
        }
    }

    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}
