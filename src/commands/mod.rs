pub mod afk;
pub mod bank;
pub mod checks;
pub mod fun;
pub mod general;
pub mod handling;
pub mod staff;
pub mod trading;
pub mod xp;

use poise::CreateReply;

use crate::{Data, Error, SunsetContext};

/// Owner-utility confirmation: a ✅ reaction on prefix invocations, a
/// quiet ephemeral reply on slash ones.
pub async fn acknowledge(ctx: &SunsetContext<'_>) -> Result<(), Error> {
    match ctx {
        poise::Context::Prefix(prefix) => {
            prefix.msg.react(ctx.http(), '✅').await?;
        }
        poise::Context::Application(_) => {
            ctx.send(CreateReply::default().content("Done!").ephemeral(true))
                .await?;
        }
    }

    Ok(())
}

/// The declarative command table plus dispatcher policy. Every command
/// the bot exposes is registered here at startup.
pub fn get_framework(prefix: &str) -> poise::FrameworkOptions<Data, Error> {
    poise::FrameworkOptions {
        commands: vec![
            general::info(),
            general::register(),
            general::ping(),
            general::guides(),
            general::user(),
            bank::bal(),
            bank::deposit(),
            bank::withdraw(),
            bank::give(),
            bank::extra(),
            bank::pool(),
            bank::donoadd(),
            xp::addxp(),
            xp::leaderboard(),
            xp::fixalllevels(),
            afk::afk(),
            afk::removeafk(),
            trading::middleman(),
            trading::ta(),
            trading::tr(),
            staff::leave(),
            staff::blacklisted(),
            staff::gawreqs(),
            staff::modnick(),
            staff::revive(),
            staff::claim(),
            staff::dankdown(),
            staff::dankup(),
            staff::say(),
            fun::topic(),
        ],
        prefix_options: poise::PrefixFrameworkOptions {
            prefix: Some(prefix.to_string()),
            mention_as_prefix: true,
            case_insensitive_commands: true,
            ..Default::default()
        },
        on_error: |error| Box::pin(handling::on_error(error)),
        event_handler: |ctx, event, framework, data| {
            Box::pin(crate::event_handler(ctx, event, framework, data))
        },
        ..Default::default()
    }
}
