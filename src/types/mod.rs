pub mod lat_lon;
pub mod time_range;
pub mod variable;
