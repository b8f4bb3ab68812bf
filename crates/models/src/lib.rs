pub mod errors;
pub mod db;
pub mod entry;
pub mod image;
