/// Per-user progress record. One row exists per user; first access
/// creates it with all-zero counters.
#[derive(Debug, Clone)]
pub struct Account {
    pub user_id: u64,
    pub balance: i64,
    pub donated: i64,
    pub xp: i64,
    pub afk: Option<Afk>,
}

/// Present only while the user is marked away.
#[derive(Debug, Clone)]
pub struct Afk {
    pub reason: String,
    pub old_nick: Option<String>,
}

/// Result of a single XP grant, captured atomically at the store.
#[derive(Debug, Clone, Copy)]
pub struct XpGrant {
    pub xp_before: i64,
    pub xp_after: i64,
}

#[derive(Debug, Clone)]
pub struct Topic {
    pub id: i32,
    pub content: String,
    pub thumbnail: Option<String>,
    pub credit: Option<String>,
    pub thumbnail_approved: bool,
}

/// One leaderboard row.
#[derive(Debug, Clone, Copy)]
pub struct XpRanking {
    pub user_id: u64,
    pub xp: i64,
}
