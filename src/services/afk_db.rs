use crate::services::database::{snowflake, Database};
use crate::Error;

impl Database {
    pub async fn set_afk(
        &self,
        user_id: u64,
        reason: &str,
        old_nick: Option<&str>,
    ) -> Result<(), Error> {
        self.get_account(user_id).await?;

        let mut conn = self.pool.get().await?;
        let key = snowflake(user_id);

        conn.execute(
            "UPDATE [Sunset].[Account] SET afk_reason = @P2, afk_old_nick = @P3 \
             WHERE user_id = @P1;",
            &[&key, &reason, &old_nick],
        )
        .await?;

        Ok(())
    }

    /// Clears a user's AFK state. Returns whether anything was cleared,
    /// so callers only announce a transition that actually happened.
    pub async fn clear_afk(&self, user_id: u64) -> Result<bool, Error> {
        let mut conn = self.pool.get().await?;
        let key = snowflake(user_id);

        let result = conn
            .execute(
                "UPDATE [Sunset].[Account] SET afk_reason = NULL, afk_old_nick = NULL \
                 WHERE user_id = @P1 AND afk_reason IS NOT NULL;",
                &[&key],
            )
            .await?;

        Ok(result.total() > 0)
    }
}
