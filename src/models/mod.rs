pub mod catalog;
pub mod discount;
