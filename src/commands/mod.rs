pub mod catalog_cmd;
pub mod discount_cmd;
pub mod function_cmd;
