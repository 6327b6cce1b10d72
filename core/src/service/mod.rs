pub mod durability;
pub mod record_store;
