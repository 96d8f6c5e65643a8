use crate::services::database::{snowflake, Database};
use crate::Error;

impl Database {
    pub async fn is_scammer(&self, user_id: u64) -> Result<bool, Error> {
        let mut conn = self.pool.get().await?;
        let key = snowflake(user_id);

        let row = conn
            .query(
                "SELECT 1 FROM [Sunset].[ScammerBan] WHERE user_id = @P1;",
                &[&key],
            )
            .await?
            .into_row()
            .await?;

        Ok(row.is_some())
    }

    /// Records a scammer ban with its proof link. Recording the same
    /// user twice keeps the original proof.
    pub async fn add_scammer_ban(&self, user_id: u64, proof: &str) -> Result<(), Error> {
        let mut conn = self.pool.get().await?;
        let key = snowflake(user_id);

        conn.execute(
            "IF NOT EXISTS (SELECT 1 FROM [Sunset].[ScammerBan] WHERE user_id = @P1) \
                 INSERT INTO [Sunset].[ScammerBan] (user_id, proof) VALUES (@P1, @P2);",
            &[&key, &proof],
        )
        .await?;

        Ok(())
    }
}
