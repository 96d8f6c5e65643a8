//! Profanity filtering through the PurgoMalum web service. The filter
//! guards outward-facing staff announcements only, so a filter outage
//! falls back to the raw text rather than blocking the announcement.

use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Deserialize)]
struct FilterResponse {
    result: String,
}

pub async fn censor(http: &reqwest::Client, text: &str) -> String {
    let request = http
        .get("https://www.purgomalum.com/service/json")
        .query(&[("text", text), ("fill_char", "•")]);

    match request.send().await {
        Ok(response) => match response.json::<FilterResponse>().await {
            Ok(filtered) => filtered.result,
            Err(ex) => {
                warn!("Profanity filter returned a malformed body: {}", ex);
                text.to_string()
            }
        },
        Err(ex) => {
            warn!("Profanity filter unreachable: {}", ex);
            text.to_string()
        }
    }
}
