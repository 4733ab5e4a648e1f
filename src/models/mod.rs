pub mod blend;
pub mod drink_name;

pub use blend::{Amount, BlendEntry, BlendEntryId, Recipe, Slot};
pub use drink_name::{CreateDrinkNameRequest, DrinkName};
