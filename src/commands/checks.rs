//! Command guard predicates. All role gating goes through the single
//! capability predicate on `Config` rather than inline id checks.

use crate::models::permissions::Capability;
use crate::{Error, SunsetContext};

async fn has_capability(ctx: SunsetContext<'_>, capability: Capability) -> Result<bool, Error> {
    let Some(member) = ctx.author_member().await else {
        return Ok(false);
    };

    Ok(ctx.data().config.has_capability(&member.roles, capability))
}

pub async fn afk_access(ctx: SunsetContext<'_>) -> Result<bool, Error> {
    has_capability(ctx, Capability::Afk).await
}

pub async fn is_helper(ctx: SunsetContext<'_>) -> Result<bool, Error> {
    has_capability(ctx, Capability::Helper).await
}

pub async fn is_staff(ctx: SunsetContext<'_>) -> Result<bool, Error> {
    has_capability(ctx, Capability::Staff).await
}

pub async fn is_moderator(ctx: SunsetContext<'_>) -> Result<bool, Error> {
    has_capability(ctx, Capability::Moderator).await
}

pub async fn is_middleman(ctx: SunsetContext<'_>) -> Result<bool, Error> {
    has_capability(ctx, Capability::Middleman).await
}

/// Chat revival: helpers only, and only in the main chat channel.
pub async fn helper_in_chat(ctx: SunsetContext<'_>) -> Result<bool, Error> {
    if ctx.channel_id().get() != ctx.data().config.guild.channels.chat {
        return Ok(false);
    }

    has_capability(ctx, Capability::Helper).await
}

pub async fn giveaways_only(ctx: SunsetContext<'_>) -> Result<bool, Error> {
    Ok(ctx.channel_id().get() == ctx.data().config.guild.channels.giveaways)
}
