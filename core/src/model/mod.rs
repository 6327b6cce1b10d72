pub mod amount;
pub mod expense;
pub mod store;
pub mod todo;
