use crate::models::errors::DomainError;
use crate::services::database::{is_check_violation, snowflake, Database};
use crate::Error;

impl Database {
    /// Adds `amount` (which may be negative) to a user's balance and
    /// returns the new balance. The store's non-negative constraint is
    /// the only floor here; a violating write is rejected whole.
    pub async fn deposit(&self, user_id: u64, amount: i64) -> Result<i64, Error> {
        self.get_account(user_id).await?;

        let mut conn = self.pool.get().await?;
        let key = snowflake(user_id);

        let result = conn
            .query(
                "UPDATE [Sunset].[Account] SET balance = balance + @P2 \
                 OUTPUT INSERTED.balance WHERE user_id = @P1;",
                &[&key, &amount],
            )
            .await;

        let row = match result {
            Ok(stream) => stream.into_row().await?,
            Err(err) if is_check_violation(&err) => {
                return Err(DomainError::ConstraintViolation.into())
            }
            Err(err) => return Err(err.into()),
        };

        let balance: Option<i64> = row.and_then(|r| r.get(0));
        balance.ok_or_else(|| "deposit did not return a balance".into())
    }

    /// Removes `amount` from a user's balance and returns the new
    /// balance. Rejected, leaving the balance untouched, if the result
    /// would be negative.
    pub async fn withdraw(&self, user_id: u64, amount: i64) -> Result<i64, Error> {
        self.get_account(user_id).await?;

        let mut conn = self.pool.get().await?;
        let key = snowflake(user_id);

        let row = conn
            .query(
                "UPDATE [Sunset].[Account] SET balance = balance - @P2 \
                 OUTPUT INSERTED.balance \
                 WHERE user_id = @P1 AND balance >= @P2;",
                &[&key, &amount],
            )
            .await?
            .into_row()
            .await?;

        match row.and_then(|r| r.get(0)) {
            Some(balance) => Ok(balance),
            None => Err(DomainError::ConstraintViolation.into()),
        }
    }

    /// Moves `amount` from one account to the other in a single store
    /// transaction. Callers validate the amount and the parties first;
    /// the balance floor is re-checked here so a race cannot overdraw.
    /// Returns the senders's and recipient's new balances.
    pub async fn transfer(&self, from: u64, to: u64, amount: i64) -> Result<(i64, i64), Error> {
        self.get_account(from).await?;
        self.get_account(to).await?;

        let mut conn = self.pool.get().await?;
        let from_key = snowflake(from);
        let to_key = snowflake(to);

        let row = conn
            .query(
                "BEGIN TRANSACTION; \
                 UPDATE [Sunset].[Account] SET balance = balance - @P3 \
                     WHERE user_id = @P1 AND balance >= @P3 AND @P3 > 0; \
                 IF @@ROWCOUNT = 1 \
                 BEGIN \
                     UPDATE [Sunset].[Account] SET balance = balance + @P3 WHERE user_id = @P2; \
                     COMMIT TRANSACTION; \
                     SELECT CAST(1 AS BIT), \
                         (SELECT balance FROM [Sunset].[Account] WHERE user_id = @P1), \
                         (SELECT balance FROM [Sunset].[Account] WHERE user_id = @P2); \
                 END \
                 ELSE \
                 BEGIN \
                     ROLLBACK TRANSACTION; \
                     SELECT CAST(0 AS BIT), CAST(0 AS BIGINT), CAST(0 AS BIGINT); \
                 END;",
                &[&from_key, &to_key, &amount],
            )
            .await?
            .into_row()
            .await?
            .ok_or("transfer returned no status row")?;

        let ok: Option<bool> = row.get(0);

        if !ok.unwrap_or_default() {
            return Err(DomainError::InsufficientFunds.into());
        }

        let from_balance: Option<i64> = row.get(1);
        let to_balance: Option<i64> = row.get(2);

        Ok((
            from_balance.unwrap_or_default(),
            to_balance.unwrap_or_default(),
        ))
    }

    /// Moves `amount` from the donor's balance into the giveaway pool,
    /// bumping their monotonic donation total in the same transaction.
    /// Returns the new donation total.
    pub async fn donate_to_pool(&self, user_id: u64, amount: i64) -> Result<i64, Error> {
        self.get_account(user_id).await?;

        let mut conn = self.pool.get().await?;
        let key = snowflake(user_id);

        let row = conn
            .query(
                "BEGIN TRANSACTION; \
                 UPDATE [Sunset].[Account] \
                     SET balance = balance - @P2, donated = donated + @P2 \
                     WHERE user_id = @P1 AND balance >= @P2 AND @P2 > 0; \
                 IF @@ROWCOUNT = 1 \
                 BEGIN \
                     UPDATE [Sunset].[GiveawayPool] SET balance = balance + @P2 WHERE id = 1; \
                     COMMIT TRANSACTION; \
                     SELECT CAST(1 AS BIT), donated FROM [Sunset].[Account] WHERE user_id = @P1; \
                 END \
                 ELSE \
                 BEGIN \
                     ROLLBACK TRANSACTION; \
                     SELECT CAST(0 AS BIT), CAST(0 AS BIGINT); \
                 END;",
                &[&key, &amount],
            )
            .await?
            .into_row()
            .await?
            .ok_or("donation returned no status row")?;

        let ok: Option<bool> = row.get(0);

        if !ok.unwrap_or_default() {
            return Err(DomainError::InsufficientFunds.into());
        }

        let donated: Option<i64> = row.get(1);
        Ok(donated.unwrap_or_default())
    }

    /// Credits a donation recorded outside the pool (owner adjustment).
    /// Returns the new donation total.
    pub async fn add_donation(&self, user_id: u64, amount: i64) -> Result<i64, Error> {
        self.get_account(user_id).await?;

        let mut conn = self.pool.get().await?;
        let key = snowflake(user_id);

        let result = conn
            .query(
                "UPDATE [Sunset].[Account] SET donated = donated + @P2 \
                 OUTPUT INSERTED.donated WHERE user_id = @P1;",
                &[&key, &amount],
            )
            .await;

        let row = match result {
            Ok(stream) => stream.into_row().await?,
            Err(err) if is_check_violation(&err) => {
                return Err(DomainError::ConstraintViolation.into())
            }
            Err(err) => return Err(err.into()),
        };

        let donated: Option<i64> = row.and_then(|r| r.get(0));
        donated.ok_or_else(|| "donation update did not return a total".into())
    }

    pub async fn pool_balance(&self) -> Result<i64, Error> {
        let mut conn = self.pool.get().await?;

        let row = conn
            .query(
                "SELECT balance FROM [Sunset].[GiveawayPool] WHERE id = 1;",
                &[],
            )
            .await?
            .into_row()
            .await?;

        let balance: Option<i64> = row.and_then(|r| r.get(0));
        Ok(balance.unwrap_or_default())
    }

    pub async fn pool_add(&self, amount: i64) -> Result<i64, Error> {
        let mut conn = self.pool.get().await?;

        let row = conn
            .query(
                "UPDATE [Sunset].[GiveawayPool] SET balance = balance + @P1 \
                 OUTPUT INSERTED.balance WHERE id = 1;",
                &[&amount],
            )
            .await?
            .into_row()
            .await?;

        let balance: Option<i64> = row.and_then(|r| r.get(0));
        Ok(balance.unwrap_or_default())
    }

    /// Total coins currently reserved across all accounts.
    pub async fn total_reserved(&self) -> Result<i64, Error> {
        let mut conn = self.pool.get().await?;

        let row = conn
            .query("SELECT ISNULL(SUM(balance), 0) FROM [Sunset].[Account];", &[])
            .await?
            .into_row()
            .await?;

        let total: Option<i64> = row.and_then(|r| r.get(0));
        Ok(total.unwrap_or_default())
    }
}
