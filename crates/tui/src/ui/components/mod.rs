pub mod card;
pub mod field;
pub mod hints;
pub mod money;
pub mod tabs;
pub mod toast;
