pub mod error;
pub mod polygon;
pub mod polygon_store;
