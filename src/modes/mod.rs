pub mod human;
pub mod script;

pub use human::HumanMode;
pub use script::ScriptMode;
