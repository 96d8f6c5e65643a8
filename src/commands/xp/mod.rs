use poise::CreateReply;
use serenity::{
    builder::CreateEmbed,
    model::{colour::Colour, id::UserId, mention::Mentionable, user::User},
};

use crate::{
    commands::acknowledge,
    services::{leveling, message_handler},
    Error, SunsetContext,
};

/// Adds XP to a user directly.
///
/// The grant may be large enough to cross several level boundaries at
/// once; reward roles are reconciled here rather than waiting for the
/// next message-driven level up.
#[poise::command(
    prefix_command,
    slash_command,
    owners_only,
    guild_only,
    description_localized("en-US", "Adds the specified amount of XP to a user.")
)]
pub async fn addxp(
    ctx: SunsetContext<'_>,
    #[description = "The recipient"] user: User,
    #[description = "The amount of XP to grant"] amount: i64,
) -> Result<(), Error> {
    let data = ctx.data();

    let grant = {
        let _guard = data.locks.acquire(user.id.get()).await;
        data.db.add_xp(user.id.get(), amount).await?
    };

    if let Some(guild_id) = ctx.guild_id() {
        let level = leveling::level_for(grant.xp_after);
        let rewards = leveling::earned_rewards(level, &data.config.xp.roles);
        message_handler::apply_reward_roles(ctx.serenity_context(), guild_id, user.id, &rewards)
            .await;
    }

    acknowledge(&ctx).await?;
    Ok(())
}

/// Retrieves the top users by XP.
///
/// The limit is clamped to keep the embed within Discord's description
/// length.
#[poise::command(
    prefix_command,
    slash_command,
    aliases("lb", "top"),
    description_localized("en-US", "Retrieves the top users by XP.")
)]
pub async fn leaderboard(
    ctx: SunsetContext<'_>,
    #[description = "How many users to show (1-20)"] limit: Option<i32>,
) -> Result<(), Error> {
    let limit = limit.unwrap_or(10).clamp(1, 20);

    let rankings = ctx.data().db.top_by_xp(limit).await?;
    let title = leaderboard_title(limit);

    let lines: Vec<String> = rankings
        .iter()
        .enumerate()
        .map(|(index, ranking)| {
            format!(
                "__**`{}`**__ {} - **{}** ({} XP)",
                index + 1,
                UserId::new(ranking.user_id).mention(),
                leveling::level_for(ranking.xp),
                ranking.xp,
            )
        })
        .collect();

    ctx.send(
        CreateReply::default().embed(
            CreateEmbed::new()
                .title(title)
                .description(lines.join("\n"))
                .colour(Colour::BLURPLE),
        ),
    )
    .await?;

    Ok(())
}

/// Largest member page the API hands out per request.
const MEMBER_PAGE: usize = 1_000;

/// Cursor for the next member page. A short page means the listing is
/// exhausted; a full one may have more members past the last id.
fn member_page_cursor(page_len: usize, last: Option<UserId>) -> Option<UserId> {
    if page_len == MEMBER_PAGE {
        last
    } else {
        None
    }
}

fn leaderboard_title(limit: i32) -> String {
    format!("Top {limit} XP Users")
}

/// Walks every member of the guild, page by page, and re-applies the
/// reward roles their current level earns. Slow by nature; it reports
/// progress as it goes so the operator can tell it hasn't stalled.
#[poise::command(
    prefix_command,
    owners_only,
    guild_only,
    description_localized("en-US", "Re-applies level reward roles for every member.")
)]
pub async fn fixalllevels(ctx: SunsetContext<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    let data = ctx.data();
    let mut after: Option<UserId> = None;
    let mut index = 0usize;

    loop {
        let page = guild_id
            .members(ctx.http(), Some(MEMBER_PAGE as u64), after)
            .await?;

        for member in &page {
            if member.user.bot {
                index += 1;
                continue;
            }

            let account = data.db.get_account(member.user.id.get()).await?;
            let level = leveling::level_for(account.xp);
            let rewards = leveling::earned_rewards(level, &data.config.xp.roles);

            message_handler::apply_reward_roles(
                ctx.serenity_context(),
                guild_id,
                member.user.id,
                &rewards,
            )
            .await;

            ctx.say(format!("{}. {}", index, member.user.tag())).await?;
            index += 1;
        }

        after = member_page_cursor(page.len(), page.last().map(|member| member.user.id));
        if after.is_none() {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_full_page_continues_after_its_last_member() {
        let last = Some(UserId::new(42));

        assert_eq!(member_page_cursor(MEMBER_PAGE, last), last);
    }

    #[test]
    fn a_short_page_ends_the_walk() {
        assert_eq!(member_page_cursor(999, Some(UserId::new(42))), None);
        assert_eq!(member_page_cursor(0, None), None);
    }

    #[test]
    fn leaderboard_title_names_the_requested_count() {
        assert_eq!(leaderboard_title(10), "Top 10 XP Users");
        assert_eq!(leaderboard_title(1), "Top 1 XP Users");
        assert_eq!(leaderboard_title(20), "Top 20 XP Users");
    }
}
