use crate::models::account::{XpGrant, XpRanking};
use crate::services::database::{snowflake, snowflake_back, Database};
use crate::Error;
use rust_decimal::Decimal;

impl Database {
    /// Adds XP to a user and returns the counter before and after, read
    /// atomically from the same UPDATE so interleaved grants can't hide
    /// a level boundary.
    pub async fn add_xp(&self, user_id: u64, amount: i64) -> Result<XpGrant, Error> {
        self.get_account(user_id).await?;

        let mut conn = self.pool.get().await?;
        let key = snowflake(user_id);

        let row = conn
            .query(
                "UPDATE [Sunset].[Account] SET xp = xp + @P2 \
                 OUTPUT DELETED.xp, INSERTED.xp WHERE user_id = @P1;",
                &[&key, &amount],
            )
            .await?
            .into_row()
            .await?
            .ok_or("xp grant did not return a row")?;

        let xp_before: Option<i64> = row.get(0);
        let xp_after: Option<i64> = row.get(1);

        Ok(XpGrant {
            xp_before: xp_before.unwrap_or_default(),
            xp_after: xp_after.unwrap_or_default(),
        })
    }

    /// The top `limit` users by XP, highest first.
    pub async fn top_by_xp(&self, limit: i32) -> Result<Vec<XpRanking>, Error> {
        let mut conn = self.pool.get().await?;

        let rows = conn
            .query(
                "SELECT TOP (@P1) user_id, xp FROM [Sunset].[Account] ORDER BY xp DESC;",
                &[&limit],
            )
            .await?
            .into_first_result()
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let user_id: Option<Decimal> = row.get(0);
                let xp: Option<i64> = row.get(1);

                user_id.map(|id| XpRanking {
                    user_id: snowflake_back(id),
                    xp: xp.unwrap_or_default(),
                })
            })
            .collect())
    }
}
