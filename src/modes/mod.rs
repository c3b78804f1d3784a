pub mod headless;
pub mod human;

pub use headless::{Controller, HeadlessMode, RandomController};
pub use human::HumanMode;
