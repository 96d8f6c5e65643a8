pub mod account_db;
pub mod afk_db;
pub mod bank_db;
pub mod bot_init;
pub mod cooldown;
pub mod database;
pub mod leveling;
pub mod locks;
pub mod member_handler;
pub mod message_handler;
pub mod profanity;
pub mod scammer_db;
pub mod topic_db;
pub mod unbelievaboat;
pub mod xp_db;
