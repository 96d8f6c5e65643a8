use crate::models::account::{Account, Afk};
use crate::services::database::{snowflake, Database};
use crate::Error;

impl Database {
    /// Fetches a user's account, creating the all-zero row on first
    /// access. Never returns absence; calling it twice for a new user
    /// yields the same zeroed record, not a duplicate.
    pub async fn get_account(&self, user_id: u64) -> Result<Account, Error> {
        let mut conn = self.pool.get().await?;
        let key = snowflake(user_id);

        let row = conn
            .query(
                "IF NOT EXISTS (SELECT 1 FROM [Sunset].[Account] WHERE user_id = @P1) \
                     INSERT INTO [Sunset].[Account] (user_id) VALUES (@P1); \
                 SELECT balance, donated, xp, afk_reason, afk_old_nick \
                 FROM [Sunset].[Account] WHERE user_id = @P1;",
                &[&key],
            )
            .await?
            .into_row()
            .await?
            .ok_or("account row missing after get-or-create")?;

        let balance: Option<i64> = row.get(0);
        let donated: Option<i64> = row.get(1);
        let xp: Option<i64> = row.get(2);
        let afk_reason: Option<&str> = row.get(3);
        let afk_old_nick: Option<&str> = row.get(4);

        Ok(Account {
            user_id,
            balance: balance.unwrap_or_default(),
            donated: donated.unwrap_or_default(),
            xp: xp.unwrap_or_default(),
            afk: afk_reason.map(|reason| Afk {
                reason: reason.to_string(),
                old_nick: afk_old_nick.map(str::to_string),
            }),
        })
    }
}
