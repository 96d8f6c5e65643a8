use serenity::{client::Context, gateway::ActivityData, model::gateway::Ready};
use tracing::info;

use crate::Data;

pub async fn ready(ctx: &Context, ready: &Ready, data: &Data) {
    ctx.set_activity(Some(ActivityData::watching(format!(
        "{}help in Sunset City",
        data.config.cmd_prefix
    ))));

    info!("Logged in as {}", ready.user.name);
}
