use std::sync::OnceLock;
use std::time::Duration;

use poise::CreateReply;
use regex::Regex;
use serenity::{
    builder::{CreateEmbed, CreateMessage},
    collector::MessageCollector,
    model::{colour::Colour, mention::Mentionable, user::User},
};
use tracing::warn;

use crate::{
    commands::acknowledge,
    models::errors::{validate_transfer, DomainError},
    services::{leveling, message_handler},
    util::format_coins,
    Error, SunsetContext,
};

/// How long `extra` waits for each of its two follow-up messages.
const EXTRA_WAIT: Duration = Duration::from_secs(120);

/// Shows a user's account balance.
///
/// Only the bot owner may look at someone else's, and that reply
/// cleans itself up after a moment.
#[poise::command(
    prefix_command,
    slash_command,
    description_localized("en-US", "Shows a user's account balance.")
)]
pub async fn bal(
    ctx: SunsetContext<'_>,
    #[description = "The member to look up (owner only)"] user: Option<User>,
) -> Result<(), Error> {
    let is_owner = ctx.framework().options.owners.contains(&ctx.author().id);

    let target = match user {
        Some(user) if is_owner => user,
        _ => ctx.author().clone(),
    };

    let account = ctx.data().db.get_account(target.id.get()).await?;

    let reply = ctx
        .send(
            CreateReply::default().embed(
                CreateEmbed::new()
                    .title(format!("{}'s Account Balance", target.name))
                    .description(format_coins(account.balance))
                    .colour(Colour::BLURPLE),
            ),
        )
        .await?;

    if target.id != ctx.author().id {
        let msg = reply.into_message().await?;
        message_handler::delete_later(ctx.serenity_context().http.clone(), msg, Duration::from_secs(10));
    }

    Ok(())
}

/// Adds coins to a user's balance.
///
/// The amount may be negative, which makes this the only way to force
/// a balance down past a withdrawal's floor check (the store still
/// refuses to go below zero).
#[poise::command(
    prefix_command,
    slash_command,
    owners_only,
    aliases("dep"),
    description_localized("en-US", "Adds coins to a user's balance.")
)]
pub async fn deposit(
    ctx: SunsetContext<'_>,
    #[description = "The recipient"] user: User,
    #[description = "The amount to add"] amount: i64,
    #[rest]
    #[description = "A note to include in the receipt"]
    note: Option<String>,
) -> Result<(), Error> {
    let data = ctx.data();

    let balance = {
        let _guard = data.locks.acquire(user.id.get()).await;
        data.db.deposit(user.id.get(), amount).await?
    };

    acknowledge(&ctx).await?;

    let mut embed = CreateEmbed::new()
        .title("DMC Deposited")
        .colour(Colour::DARK_GREEN)
        .field("Amount", format_coins(amount), true)
        .field("New Balance", format_coins(balance), true);

    if let Some(note) = note {
        embed = embed.description(note);
    }

    if let Err(ex) = user
        .direct_message(ctx.http(), CreateMessage::new().embed(embed))
        .await
    {
        warn!("Failed to DM a deposit receipt to {}: {}", user.id, ex);
    }

    Ok(())
}

/// Removes coins from a user's balance. Refused outright if the result
/// would be negative.
#[poise::command(
    prefix_command,
    slash_command,
    owners_only,
    aliases("with"),
    description_localized("en-US", "Removes coins from a user's balance.")
)]
pub async fn withdraw(
    ctx: SunsetContext<'_>,
    #[description = "The account holder"] user: User,
    #[description = "The amount to remove"] amount: i64,
    #[rest]
    #[description = "A note to include in the receipt"]
    note: Option<String>,
) -> Result<(), Error> {
    let data = ctx.data();

    let balance = {
        let _guard = data.locks.acquire(user.id.get()).await;
        data.db.withdraw(user.id.get(), amount).await?
    };

    acknowledge(&ctx).await?;

    let mut embed = CreateEmbed::new()
        .title("DMC Withdrawn")
        .colour(Colour::RED)
        .field("Amount", format_coins(amount), true)
        .field("New Balance", format_coins(balance), true);

    if let Some(note) = note {
        embed = embed.description(note);
    }

    if let Err(ex) = user
        .direct_message(ctx.http(), CreateMessage::new().embed(embed))
        .await
    {
        warn!("Failed to DM a withdrawal receipt to {}: {}", user.id, ex);
    }

    Ok(())
}

/// Transfers coins to another member.
///
/// Both parties get a receipt, in their DMs when possible and in the
/// channel otherwise.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    description_localized("en-US", "Transfers coins to another member.")
)]
pub async fn give(
    ctx: SunsetContext<'_>,
    #[description = "The recipient"] user: User,
    #[description = "The amount to send"] amount: i64,
    #[rest]
    #[description = "A note to include in the receipts"]
    note: Option<String>,
) -> Result<(), Error> {
    let data = ctx.data();
    let sender = ctx.author();

    let (from_balance, to_balance) = {
        let _guard = data.locks.acquire(sender.id.get()).await;

        let account = data.db.get_account(sender.id.get()).await?;
        validate_transfer(
            amount,
            sender.id.get(),
            user.id.get(),
            user.bot,
            account.balance,
        )?;

        data.db.transfer(sender.id.get(), user.id.get(), amount).await?
    };

    let mut from_embed = CreateEmbed::new()
        .title("Outgoing DMC Transfer")
        .colour(Colour::GOLD)
        .field("Amount", format_coins(amount), true)
        .field("New Balance", format_coins(from_balance), true)
        .field("Recipient", user.mention().to_string(), false);

    let mut to_embed = CreateEmbed::new()
        .title("Incoming DMC Transfer")
        .colour(Colour::GOLD)
        .field("Amount", format_coins(amount), true)
        .field("New Balance", format_coins(to_balance), true)
        .field("Sender", sender.mention().to_string(), false);

    if let Some(note) = &note {
        from_embed = from_embed.field("Note", note.clone(), false);
        to_embed = to_embed.field("Note from Sender", note.clone(), false);
    }

    if sender
        .direct_message(ctx.http(), CreateMessage::new().embed(from_embed.clone()))
        .await
        .is_err()
    {
        ctx.channel_id()
            .send_message(
                ctx.http(),
                CreateMessage::new()
                    .content(format!("{}, I wasn't able to DM you.", sender.mention()))
                    .embed(from_embed),
            )
            .await?;
    }

    if user
        .direct_message(ctx.http(), CreateMessage::new().embed(to_embed.clone()))
        .await
        .is_err()
    {
        ctx.channel_id()
            .send_message(
                ctx.http(),
                CreateMessage::new()
                    .content(format!("{}, I wasn't able to DM you.", user.mention()))
                    .embed(to_embed),
            )
            .await?;
    }

    acknowledge(&ctx).await?;
    Ok(())
}

/// Parses the wallet and bank figures out of an economy-bot balance
/// report. Returns `None` when the report doesn't look like one.
fn parse_balance_report(description: &str) -> Option<(i64, i64)> {
    static REPORT: OnceLock<Regex> = OnceLock::new();
    let report = REPORT.get_or_init(|| {
        Regex::new(r"\*\*Wallet\*\*: ⏣ ([\d,]+)\n\*\*Bank\*\*: ⏣ ([\d,]+)").unwrap()
    });

    let captures = report.captures(description)?;
    let wallet = captures[1].replace(',', "").parse().ok()?;
    let bank = captures[2].replace(',', "").parse().ok()?;

    Some((wallet, bank))
}

/// Checks how many of the owner's coins are not reserved by accounts or
/// the giveaway pool. Walks the owner through running the economy bot's
/// balance command and reads the report it posts.
#[poise::command(
    prefix_command,
    owners_only,
    guild_only,
    description_localized("en-US", "Checks how many coins are not reserved.")
)]
pub async fn extra(ctx: SunsetContext<'_>) -> Result<(), Error> {
    let data = ctx.data();

    let instruction = ctx
        .channel_id()
        .send_message(
            ctx.http(),
            CreateMessage::new().embed(
                CreateEmbed::new()
                    .title("Please check your balance here:")
                    .description("```\npls bal\n```")
                    .colour(Colour::BLURPLE),
            ),
        )
        .await?;

    let confirmation = MessageCollector::new(ctx.serenity_context())
        .channel_id(ctx.channel_id())
        .author_id(ctx.author().id)
        .filter(|message| message.content.trim() == "pls bal")
        .timeout(EXTRA_WAIT)
        .await;

    if confirmation.is_none() {
        instruction.delete(ctx.http()).await?;
        ctx.say("Timed out waiting for the balance check.").await?;
        return Ok(());
    }

    let economy_bot = data.config.users.dank_memer;
    let report = MessageCollector::new(ctx.serenity_context())
        .channel_id(ctx.channel_id())
        .filter(move |message| message.author.id.get() == economy_bot && !message.embeds.is_empty())
        .timeout(EXTRA_WAIT)
        .await;

    let Some(report) = report else {
        instruction.delete(ctx.http()).await?;
        ctx.say("Timed out waiting for the balance report.").await?;
        return Ok(());
    };

    let description = report.embeds[0].description.as_deref().unwrap_or_default();
    let Some((wallet, bank)) = parse_balance_report(description) else {
        instruction.delete(ctx.http()).await?;
        ctx.say("That doesn't look like a balance report.").await?;
        return Ok(());
    };

    let reserved = data.db.total_reserved().await?;
    let pool = data.db.pool_balance().await?;
    let leftover = wallet + bank - (reserved + pool);

    ctx.send(
        CreateReply::default().embed(
            CreateEmbed::new()
                .title("Leftover Coins")
                .colour(Colour::BLURPLE)
                .field("Reserved in Accounts", format_coins(reserved), true)
                .field("Reserved in Giveaway Pool", format_coins(pool), true)
                .field("Leftover", format!("**{}**", format_coins(leftover)), false),
        ),
    )
    .await?;

    instruction.delete(ctx.http()).await?;
    Ok(())
}

/// Shows the current giveaway pool balance.
#[poise::command(
    prefix_command,
    slash_command,
    subcommands("pool_donate", "pool_add"),
    description_localized("en-US", "Commands for the giveaway pool.")
)]
pub async fn pool(ctx: SunsetContext<'_>) -> Result<(), Error> {
    let balance = ctx.data().db.pool_balance().await?;

    ctx.send(
        CreateReply::default().embed(
            CreateEmbed::new()
                .title("Current giveaway pool balance")
                .description(format_coins(balance))
                .colour(Colour::BLURPLE),
        ),
    )
    .await?;

    Ok(())
}

/// Donates coins from the caller's account to the giveaway pool.
///
/// Re-applies any donation reward roles they now qualify for.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    rename = "donate",
    aliases("d"),
    description_localized("en-US", "Donates coins to the giveaway pool.")
)]
pub async fn pool_donate(
    ctx: SunsetContext<'_>,
    #[description = "The amount to donate"] amount: i64,
) -> Result<(), Error> {
    if amount <= 0 {
        return Err(DomainError::NonPositiveAmount.into());
    }

    let data = ctx.data();
    let author = ctx.author();

    let donated = {
        let _guard = data.locks.acquire(author.id.get()).await;
        data.db.donate_to_pool(author.id.get(), amount).await?
    };

    if let Some(guild_id) = ctx.guild_id() {
        let rewards = leveling::earned_rewards(donated, &data.config.guild.donation_roles);
        message_handler::apply_reward_roles(ctx.serenity_context(), guild_id, author.id, &rewards)
            .await;
    }

    ctx.send(
        CreateReply::default().embed(
            CreateEmbed::new()
                .title("Donation recorded!")
                .colour(Colour::DARK_GREEN),
        ),
    )
    .await?;

    Ok(())
}

/// Adjusts the giveaway pool balance by an arbitrary amount.
#[poise::command(
    prefix_command,
    slash_command,
    owners_only,
    rename = "add",
    aliases("a", "change", "c"),
    description_localized("en-US", "Changes the giveaway pool balance.")
)]
pub async fn pool_add(
    ctx: SunsetContext<'_>,
    #[description = "The amount to add (may be negative)"] amount: i64,
) -> Result<(), Error> {
    ctx.data().db.pool_add(amount).await?;

    ctx.send(
        CreateReply::default().embed(
            CreateEmbed::new()
                .title("Change recorded!")
                .colour(Colour::DARK_GREEN),
        ),
    )
    .await?;

    Ok(())
}

/// Credits a donation made outside the pool command.
///
/// For totals tracked elsewhere, and re-applies the reward roles.
#[poise::command(
    prefix_command,
    slash_command,
    owners_only,
    guild_only,
    description_localized("en-US", "Adds a donation amount to a user.")
)]
pub async fn donoadd(
    ctx: SunsetContext<'_>,
    #[description = "The donor"] user: User,
    #[description = "The donation amount"] amount: i64,
) -> Result<(), Error> {
    let data = ctx.data();

    let donated = {
        let _guard = data.locks.acquire(user.id.get()).await;
        data.db.add_donation(user.id.get(), amount).await?
    };

    if let Some(guild_id) = ctx.guild_id() {
        let rewards = leveling::earned_rewards(donated, &data.config.guild.donation_roles);
        message_handler::apply_reward_roles(ctx.serenity_context(), guild_id, user.id, &rewards)
            .await;
    }

    acknowledge(&ctx).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::parse_balance_report;

    #[test]
    fn parses_a_balance_report() {
        let description = "**Wallet**: ⏣ 1,234,567\n**Bank**: ⏣ 890";
        assert_eq!(parse_balance_report(description), Some((1_234_567, 890)));
    }

    #[test]
    fn parses_ungrouped_figures() {
        let description = "**Wallet**: ⏣ 42\n**Bank**: ⏣ 0";
        assert_eq!(parse_balance_report(description), Some((42, 0)));
    }

    #[test]
    fn rejects_an_unrelated_embed() {
        assert_eq!(parse_balance_report("**Inventory**: 3 items"), None);
    }
}
