//! SeaORM repository implementations

pub mod blend_log;
pub mod drink_name;
pub mod traits;

pub use blend_log::BlendLogSeaOrmRepository;
pub use drink_name::DrinkNameSeaOrmRepository;
pub use traits::BlendLogStore;
