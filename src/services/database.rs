use bb8::Pool;
use bb8_tiberius::ConnectionManager;
use rust_decimal::{prelude::ToPrimitive, Decimal};
use tiberius::AuthMethod;

use crate::Error;

/// Pooled SQL Server access. Per-domain queries live in the
/// `*_db` modules as further `impl Database` blocks.
pub struct Database {
    pub(crate) pool: Pool<ConnectionManager>,
}

impl Database {
    pub async fn new(host: &str, port: u16, username: &str, password: &str) -> Result<Self, Error> {
        let mut config = tiberius::Config::new();
        config.host(host);
        config.port(port);
        config.authentication(AuthMethod::sql_server(username, password));
        config.trust_cert();

        let manager = ConnectionManager::build(config)?;
        let pool = Pool::builder().max_size(8).build(manager).await?;

        Ok(Database { pool })
    }
}

/// Discord snowflakes are stored as NUMERIC(20, 0); BIGINT is one bit
/// too small for the top half of the id space.
pub(crate) fn snowflake(id: u64) -> Decimal {
    Decimal::from(id)
}

pub(crate) fn snowflake_back(value: Decimal) -> u64 {
    value.to_u64().unwrap_or_default()
}

/// Whether a store error is the server rejecting a CHECK constraint
/// (error 547), i.e. a numeric field would have gone negative.
pub(crate) fn is_check_violation(err: &tiberius::error::Error) -> bool {
    matches!(err, tiberius::error::Error::Server(token) if token.code() == 547)
}
