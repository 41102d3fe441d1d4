pub mod brigade;
pub mod history;
pub mod item;
pub mod location;
pub mod user;
pub mod write_off;
