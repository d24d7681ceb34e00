pub mod ban_store;
pub mod clock;
