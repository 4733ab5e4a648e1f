//! SeaORM entities

pub mod prelude;

pub mod blend_log;
pub mod drink_name;
