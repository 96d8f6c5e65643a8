use std::sync::Mutex;
use std::time::{Duration, Instant};

use serenity::{
    builder::{CreateEmbed, CreateMessage},
    client::Context,
    model::{colour::Colour, guild::Member, id::ChannelId, mention::Mentionable, user::User},
};
use tracing::error;

use crate::Data;

/// How often the welcomer role may be pinged for new arrivals.
pub const WELCOME_PING_INTERVAL: Duration = Duration::from_secs(120);

/// Rate limit on welcomer-role pings. Lives in the shared `Data`
/// context; the join handler asks it whether this arrival earns a ping.
pub struct WelcomeThrottle {
    interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl WelcomeThrottle {
    pub fn new(interval: Duration) -> Self {
        WelcomeThrottle {
            interval,
            last: Mutex::new(None),
        }
    }

    /// Whether a ping is due now. A `true` answer claims the slot, so
    /// concurrent joins can't both ping.
    pub fn ping_due(&self) -> bool {
        self.ping_due_at(Instant::now())
    }

    fn ping_due_at(&self, now: Instant) -> bool {
        let mut last = self.last.lock().unwrap();

        match *last {
            Some(prev) if now.duration_since(prev) <= self.interval => false,
            _ => {
                *last = Some(now);
                true
            }
        }
    }
}

pub async fn on_join(ctx: &Context, new_member: &Member, data: &Data) {
    if new_member.user.bot {
        return;
    }

    let chat = ChannelId::new(data.config.guild.channels.chat);

    match data.db.is_scammer(new_member.user.id.get()).await {
        Ok(true) => {
            bounce_scammer(ctx, new_member, data, chat).await;
            return;
        }
        Ok(false) => {}
        Err(ex) => {
            // Let them in rather than locking the door on a DB blip.
            error!("Failed scammer lookup for {}: {}", new_member.user.id, ex);
        }
    }

    let channels = &data.config.guild.channels;

    let embed = CreateEmbed::new()
        .title("Welcome to Sunset City!")
        .description(format!(
            "We hope you enjoy your time here! Make sure to read through <#{}> so you \
             know about our __rules__, __channels__, and other __important information__.\n\n\
             React in <#{}> for pings and other roles.",
            channels.readme, channels.reaction_roles
        ))
        .field(
            "Contact staff:",
            format!(
                "Just send <@{}> a message! We'll get back to you as soon as possible.",
                data.config.users.contact
            ),
            true,
        )
        .field(
            "Information center:",
            format!(
                "**[Click here]({})** to access our server rules and more.",
                data.config.guild.appeals_url
            ),
            true,
        )
        .colour(Colour::from_rgb(158, 0, 89));

    let mut welcome_text = new_member.mention().to_string();

    if data.welcome.ping_due() {
        welcome_text += &format!(" **<@&{}>**", data.config.guild.roles.welcomer);
    }

    if let Err(ex) = chat
        .send_message(
            &ctx.http,
            CreateMessage::new().content(welcome_text).embed(embed),
        )
        .await
    {
        error!("Failed to welcome {}: {}", new_member.user.id, ex);
    }

    send_appeals_primer(ctx, &new_member.user, data, chat).await;
}

async fn bounce_scammer(ctx: &Context, member: &Member, data: &Data, chat: ChannelId) {
    let notice = format!(
        "Our records show that you have previously scammed another Dank Memer user. \
         Because of this, you are not currently allowed entry into our server. If this \
         is incorrect, you may appeal your punishment at {}.",
        data.config.guild.appeals_url
    );

    // Best effort; plenty of these accounts have DMs closed.
    let _ = member
        .user
        .dm(&ctx.http, CreateMessage::new().content(notice))
        .await;

    if let Err(ex) = chat
        .say(
            &ctx.http,
            format!(
                "{} tried to join us but doesn't belong here since we don't like scammers.",
                member.user.name
            ),
        )
        .await
    {
        error!("Failed to announce a scammer bounce: {}", ex);
    }

    if let Err(ex) = member
        .guild_id
        .ban_with_reason(&ctx.http, member.user.id, 2, "Known scammer")
        .await
    {
        error!("Failed to ban scammer {}: {}", member.user.id, ex);
    }
}

async fn send_appeals_primer(ctx: &Context, user: &User, data: &Data, chat: ChannelId) {
    let embed = CreateEmbed::new()
        .title("Sunset City Punishment Appeals")
        .description(
            "If you ever need to appeal a strike, mute, ban, or giveaway blacklist, \
             click the link above. Welcome to the server!",
        )
        .url(data.config.guild.appeals_url.clone())
        .colour(Colour::from_rgb(158, 0, 89));

    let primer = CreateMessage::new()
        .content("Welcome to Sunset City! Here's some information about our appeals system:")
        .embed(embed);

    if user.dm(&ctx.http, primer).await.is_err() {
        let fallback = format!(
            "I tried to DM you information about our appeals system but wasn't able to \
             reach you - you can always find it at {}.",
            data.config.guild.appeals_url
        );

        if let Err(ex) = chat.say(&ctx.http, fallback).await {
            error!("Failed to post the appeals fallback: {}", ex);
        }
    }
}

pub async fn on_leave(ctx: &Context, user: &User, data: &Data) {
    if user.bot {
        return;
    }

    let chat = ChannelId::new(data.config.guild.channels.chat);

    if let Err(ex) = chat
        .say(&ctx.http, format!("{} has left us.", user.name))
        .await
    {
        error!("Failed to announce a departure: {}", ex);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_join_earns_a_ping() {
        let throttle = WelcomeThrottle::new(WELCOME_PING_INTERVAL);

        assert!(throttle.ping_due_at(Instant::now()));
    }

    #[test]
    fn joins_within_the_interval_are_suppressed() {
        let throttle = WelcomeThrottle::new(WELCOME_PING_INTERVAL);
        let now = Instant::now();

        assert!(throttle.ping_due_at(now));
        assert!(!throttle.ping_due_at(now + Duration::from_secs(60)));
        assert!(!throttle.ping_due_at(now + WELCOME_PING_INTERVAL));
    }

    #[test]
    fn pings_resume_after_the_interval() {
        let throttle = WelcomeThrottle::new(WELCOME_PING_INTERVAL);
        let now = Instant::now();

        assert!(throttle.ping_due_at(now));
        assert!(throttle.ping_due_at(now + WELCOME_PING_INTERVAL + Duration::from_secs(1)));
    }

    #[test]
    fn a_suppressed_join_does_not_extend_the_window() {
        let throttle = WelcomeThrottle::new(WELCOME_PING_INTERVAL);
        let now = Instant::now();

        assert!(throttle.ping_due_at(now));
        assert!(!throttle.ping_due_at(now + Duration::from_secs(119)));
        // The window counts from the last ping, not the last join.
        assert!(throttle.ping_due_at(now + Duration::from_secs(121)));
    }
}
