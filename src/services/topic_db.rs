use crate::models::account::Topic;
use crate::services::database::Database;
use crate::Error;

fn topic_from_row(row: &tiberius::Row) -> Option<Topic> {
    let id: Option<i32> = row.get(0);
    let content: Option<&str> = row.get(1);
    let thumbnail: Option<&str> = row.get(2);
    let credit: Option<&str> = row.get(3);
    let approved: Option<bool> = row.get(4);

    Some(Topic {
        id: id?,
        content: content?.to_string(),
        thumbnail: thumbnail.map(str::to_string),
        credit: credit.map(str::to_string),
        thumbnail_approved: approved.unwrap_or_default(),
    })
}

const TOPIC_COLUMNS: &str = "id, content, thumbnail, credit, thumbnail_approved";

impl Database {
    /// Store-side random sample of one conversation starter.
    pub async fn random_topic(&self) -> Result<Option<Topic>, Error> {
        let mut conn = self.pool.get().await?;

        let row = conn
            .query(
                format!("SELECT TOP 1 {TOPIC_COLUMNS} FROM [Sunset].[Topic] ORDER BY NEWID();"),
                &[],
            )
            .await?
            .into_row()
            .await?;

        Ok(row.as_ref().and_then(topic_from_row))
    }

    pub async fn get_topic(&self, id: i32) -> Result<Option<Topic>, Error> {
        let mut conn = self.pool.get().await?;

        let row = conn
            .query(
                format!("SELECT {TOPIC_COLUMNS} FROM [Sunset].[Topic] WHERE id = @P1;"),
                &[&id],
            )
            .await?
            .into_row()
            .await?;

        Ok(row.as_ref().and_then(topic_from_row))
    }

    pub async fn add_topic(&self, content: &str) -> Result<(), Error> {
        let mut conn = self.pool.get().await?;

        conn.execute(
            "INSERT INTO [Sunset].[Topic] (content) VALUES (@P1);",
            &[&content],
        )
        .await?;

        Ok(())
    }

    pub async fn search_topics(&self, query: &str) -> Result<Vec<Topic>, Error> {
        let mut conn = self.pool.get().await?;
        // Escape LIKE metacharacters so a literal search can't wildcard.
        let pattern = format!(
            "%{}%",
            query.replace('[', "[[]").replace('%', "[%]").replace('_', "[_]")
        );

        let rows = conn
            .query(
                format!("SELECT TOP 10 {TOPIC_COLUMNS} FROM [Sunset].[Topic] WHERE content LIKE @P1;"),
                &[&pattern],
            )
            .await?
            .into_first_result()
            .await?;

        Ok(rows.iter().filter_map(topic_from_row).collect())
    }

    pub async fn set_topic_photo(
        &self,
        id: i32,
        url: &str,
        credit: Option<&str>,
    ) -> Result<(), Error> {
        let mut conn = self.pool.get().await?;

        conn.execute(
            "UPDATE [Sunset].[Topic] \
             SET thumbnail = @P2, credit = @P3, thumbnail_approved = 0 \
             WHERE id = @P1;",
            &[&id, &url, &credit],
        )
        .await?;

        Ok(())
    }

    /// A random topic whose submitted photo is still awaiting review.
    pub async fn random_unapproved_topic(&self) -> Result<Option<Topic>, Error> {
        let mut conn = self.pool.get().await?;

        let row = conn
            .query(
                format!(
                    "SELECT TOP 1 {TOPIC_COLUMNS} FROM [Sunset].[Topic] \
                     WHERE thumbnail IS NOT NULL AND thumbnail_approved = 0 \
                     ORDER BY NEWID();"
                ),
                &[],
            )
            .await?
            .into_row()
            .await?;

        Ok(row.as_ref().and_then(topic_from_row))
    }

    pub async fn approve_topic_photo(&self, id: i32) -> Result<(), Error> {
        let mut conn = self.pool.get().await?;

        conn.execute(
            "UPDATE [Sunset].[Topic] SET thumbnail_approved = 1 WHERE id = @P1;",
            &[&id],
        )
        .await?;

        Ok(())
    }

    /// Rejecting a photo clears it so the topic can take another.
    pub async fn reject_topic_photo(&self, id: i32) -> Result<(), Error> {
        let mut conn = self.pool.get().await?;

        conn.execute(
            "UPDATE [Sunset].[Topic] \
             SET thumbnail = NULL, credit = NULL, thumbnail_approved = 0 \
             WHERE id = @P1;",
            &[&id],
        )
        .await?;

        Ok(())
    }
}
