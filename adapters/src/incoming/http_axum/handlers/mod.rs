pub mod bans;
pub mod health;
