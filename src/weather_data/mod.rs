pub mod error;
pub mod open_meteo;
pub mod source;
