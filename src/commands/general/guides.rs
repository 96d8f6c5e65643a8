use poise::CreateReply;
use serenity::{builder::CreateEmbed, model::colour::Colour};

use crate::{Error, SunsetContext};

struct Guide {
    tag: &'static str,
    title: &'static str,
    content: &'static str,
    image: Option<&'static str>,
}

/// The guide table is static content; tags are sorted for the index.
const GUIDES: &[Guide] = &[
    Guide {
        tag: "earn",
        title: "How to earn money in our economy system",
        content: "**Be active in the server!** You'll get a random amount of coins between \
            5 and 25 per message every 5 minutes in the community channels.\n\n\
            **Win giveaways, lotteries, and events!** Coins and items will be given away \
            occasionally.\n\n\
            **Collect income!** Certain roles can collect special income! Check \
            **`!g income`** to see which roles this applies to.\n\n\
            **Work and commit crimes!** Try out the **`=work`** and **`=crime`** commands. \
            Note that you might end up paying a fine when you commit a crime.",
        image: None,
    },
    Guide {
        tag: "impersonation",
        title: "How to tell if a user is the real Dank Memer",
        content: "As a Dank Memer related server, we're highly susceptible to bot \
            impersonation scams.\n\n\
            If a user that appears to be Dank Memer fails any of the checks below, please \
            report them ASAP by messaging the mods.\n\n\
            **Check the role!** Dank Memer has a dedicated bot role here.\n\n\
            **Dank Memer is verified!** Dank Memer has a blurple tag with a checkmark and \
            the word BOT next to its name everywhere on Discord.",
        image: None,
    },
    Guide {
        tag: "income",
        title: "Roles that can use **`=collect-income`**",
        content: "Several supporter and reward roles collect a daily or twice-daily \
            income. Check the roles channel for the current list and amounts.",
        image: None,
    },
    Guide {
        tag: "xp",
        title: "Our XP and leveling system",
        content: "We have our own XP system here at Sunset City!\n\n\
            You'll earn one XP point per message you send in the community channels, with \
            a short cooldown between points.\n\n\
            You can check your current XP and level with the `!me` command.\n\n\
            The total amount of XP points you'll need to reach a specific level is \
            determined by the formula ` (level ^ 3) + (level * 15) `. This allows levels \
            to require more work as they go on.",
        image: Some("https://i.imgur.com/6Hpl8qr.png"),
    },
];

#[poise::command(
    prefix_command,
    slash_command,
    aliases("g", "guide"),
    description_localized("en-US", "Shows a guide (or the list of guides if not specified).")
)]
pub async fn guides(
    ctx: SunsetContext<'_>,
    #[description = "The guide tag to look up"] guide: Option<String>,
) -> Result<(), Error> {
    let Some(tag) = guide else {
        let mut embed = CreateEmbed::new()
            .title("List of guide tags")
            .colour(Colour::BLURPLE);

        for guide in GUIDES {
            embed = embed.field(
                format!("**`{}g {}`**", ctx.data().config.cmd_prefix, guide.tag),
                guide.title,
                false,
            );
        }

        ctx.send(CreateReply::default().embed(embed)).await?;
        return Ok(());
    };

    let tag = tag.trim().to_lowercase();

    let Some(guide) = GUIDES.iter().find(|g| g.tag == tag) else {
        let embed = CreateEmbed::new()
            .title("Guide not found")
            .description(
                "Run the command again without any arguments to view the list of guide tags.",
            )
            .colour(Colour::RED);

        ctx.send(CreateReply::default().embed(embed)).await?;
        return Ok(());
    };

    let mut embed = CreateEmbed::new()
        .title(guide.title)
        .description(guide.content)
        .colour(Colour::BLURPLE);

    if let Some(image) = guide.image {
        embed = embed.image(image);
    }

    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}
