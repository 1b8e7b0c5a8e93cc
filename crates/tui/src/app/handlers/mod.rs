pub mod confirm;
pub mod records;
