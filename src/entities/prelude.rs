pub use super::blend_log::Entity as BlendLog;
pub use super::drink_name::Entity as DrinkName;
