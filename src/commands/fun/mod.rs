use std::time::Duration;

use poise::CreateReply;
use serenity::{
    builder::{
        CreateActionRow, CreateButton, CreateEmbed, CreateEmbedFooter,
        CreateInteractionResponse, CreateInteractionResponseMessage, EditMessage,
    },
    collector::ComponentInteractionCollector,
    model::{application::ButtonStyle, colour::Colour},
};
use tracing::warn;

use crate::{models::account::Topic, services::leveling, Error, SunsetContext};

/// How long a photo-approval prompt stays clickable.
const APPROVAL_WAIT: Duration = Duration::from_secs(60);

/// Coins paid out for a submitted topic photo.
const PHOTO_REWARD: i64 = 20;

fn topic_embed(topic: &Topic, check_approval: bool) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title(topic.content.clone())
        .colour(Colour::BLURPLE)
        .footer(CreateEmbedFooter::new(format!(
            "Conversation starter {}",
            topic.id
        )));

    if let Some(thumbnail) = &topic.thumbnail {
        if topic.thumbnail_approved || !check_approval {
            embed = embed.thumbnail(thumbnail);

            if let Some(credit) = &topic.credit {
                embed = embed.description(credit);
            }
        }
    }

    embed
}

/// Displays a random conversation starter.
#[poise::command(
    prefix_command,
    slash_command,
    subcommands("topic_add", "topic_search", "topic_photo", "topic_unapproved"),
    description_localized("en-US", "Displays a conversation starter.")
)]
pub async fn topic(ctx: SunsetContext<'_>) -> Result<(), Error> {
    let Some(starter) = ctx.data().db.random_topic().await? else {
        ctx.say("There are no topics in the pool yet.").await?;
        return Ok(());
    };

    ctx.send(CreateReply::default().embed(topic_embed(&starter, true)))
        .await?;

    Ok(())
}

/// Adds one or more topics, one per line.
#[poise::command(
    prefix_command,
    owners_only,
    rename = "add",
    aliases("a", "+"),
    description_localized("en-US", "Adds one or more topics.")
)]
pub async fn topic_add(
    ctx: SunsetContext<'_>,
    #[rest]
    #[description = "The topics to add, one per line"]
    topics: String,
) -> Result<(), Error> {
    let lines: Vec<&str> = topics.lines().filter(|line| !line.trim().is_empty()).collect();

    for line in &lines {
        ctx.data().db.add_topic(line.trim()).await?;
    }

    ctx.send(
        CreateReply::default().embed(
            CreateEmbed::new()
                .title(format!("Created {} new topic(s)", lines.len()))
                .colour(Colour::BLURPLE),
        ),
    )
    .await?;

    Ok(())
}

/// Searches existing topics by content.
#[poise::command(
    prefix_command,
    slash_command,
    owners_only,
    rename = "search",
    aliases("s"),
    description_localized("en-US", "Searches existing topics.")
)]
pub async fn topic_search(
    ctx: SunsetContext<'_>,
    #[rest]
    #[description = "Text to look for"]
    query: String,
) -> Result<(), Error> {
    let results = ctx.data().db.search_topics(&query).await?;

    let mut embed = CreateEmbed::new()
        .title(format!("Search results for: {query}"))
        .colour(Colour::BLURPLE);

    for topic in &results {
        embed = embed.field(topic.content.clone(), format!("*{}*", topic.id), true);
    }

    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Submits a photo for a topic.
///
/// The photo waits for owner approval before it shows publicly; the
/// submitter is paid a small reward through the economy bot right away.
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    rename = "photo",
    aliases("p"),
    description_localized("en-US", "Submits a photo for a topic for approval.")
)]
pub async fn topic_photo(
    ctx: SunsetContext<'_>,
    #[description = "The topic to attach the photo to"] topic_id: i32,
    #[description = "The photo URL"] url: String,
    #[rest]
    #[description = "Who to credit for the photo"]
    credit: Option<String>,
) -> Result<(), Error> {
    let data = ctx.data();

    let account = data.db.get_account(ctx.author().id.get()).await?;
    if leveling::level_for(account.xp) < data.config.xp.photo_min_level {
        ctx.send(
            CreateReply::default().embed(
                CreateEmbed::new()
                    .title(format!(
                        "You need to be at least level {} to submit topic photos.",
                        data.config.xp.photo_min_level
                    ))
                    .colour(Colour::RED),
            ),
        )
        .await?;
        return Ok(());
    }

    let Some(topic) = data.db.get_topic(topic_id).await? else {
        ctx.send(
            CreateReply::default().embed(
                CreateEmbed::new()
                    .title("There's no topic with that number.")
                    .colour(Colour::RED),
            ),
        )
        .await?;
        return Ok(());
    };

    if topic.thumbnail.is_some() {
        ctx.send(
            CreateReply::default().embed(
                CreateEmbed::new()
                    .title("That topic already has a photo.")
                    .colour(Colour::RED),
            ),
        )
        .await?;
        return Ok(());
    }

    data.db
        .set_topic_photo(topic_id, &url, credit.as_deref())
        .await?;

    if let Err(ex) = data
        .unb
        .add_cash(ctx.author().id.get(), PHOTO_REWARD, "topic photo")
        .await
    {
        warn!("Failed to pay out a topic photo reward: {}", ex);
    }

    let updated = Topic {
        thumbnail: Some(url),
        credit,
        thumbnail_approved: false,
        ..topic
    };

    ctx.send(CreateReply::default().embed(topic_embed(&updated, false)))
        .await?;

    Ok(())
}

/// Pulls up a random topic with an unapproved photo and offers approve and reject buttons.
///
/// Rejecting clears the photo so the topic can take another submission.
#[poise::command(
    prefix_command,
    slash_command,
    owners_only,
    rename = "unapproved",
    aliases("u", "up"),
    description_localized("en-US", "Reviews a topic with an unapproved photo.")
)]
pub async fn topic_unapproved(ctx: SunsetContext<'_>) -> Result<(), Error> {
    let data = ctx.data();

    let Some(topic) = data.db.random_unapproved_topic().await? else {
        ctx.send(
            CreateReply::default().embed(
                CreateEmbed::new()
                    .title("No more unapproved photos!")
                    .colour(Colour::RED),
            ),
        )
        .await?;
        return Ok(());
    };

    let buttons = CreateActionRow::Buttons(vec![
        CreateButton::new("approve")
            .label("Approve")
            .style(ButtonStyle::Success),
        CreateButton::new("reject")
            .label("Reject")
            .style(ButtonStyle::Danger),
    ]);

    let reply = ctx
        .send(
            CreateReply::default()
                .embed(topic_embed(&topic, false))
                .components(vec![buttons]),
        )
        .await?;
    let mut prompt = reply.into_message().await?;

    let interaction = ComponentInteractionCollector::new(ctx.serenity_context())
        .message_id(prompt.id)
        .author_id(ctx.author().id)
        .timeout(APPROVAL_WAIT)
        .await;

    let Some(interaction) = interaction else {
        prompt
            .edit(ctx.serenity_context(), EditMessage::new().components(vec![]))
            .await?;
        return Ok(());
    };

    let verdict = if interaction.data.custom_id == "approve" {
        data.db.approve_topic_photo(topic.id).await?;
        CreateEmbed::new()
            .title("Photo approved")
            .colour(Colour::DARK_GREEN)
    } else {
        data.db.reject_topic_photo(topic.id).await?;
        CreateEmbed::new().title("Photo rejected").colour(Colour::RED)
    };

    interaction
        .create_response(
            ctx.http(),
            CreateInteractionResponse::UpdateMessage(
                CreateInteractionResponseMessage::new()
                    .embed(verdict)
                    .components(vec![]),
            ),
        )
        .await?;

    Ok(())
}
