pub mod brigade_repo;
pub mod history_repo;
pub mod item_repo;
pub mod location_repo;
pub mod user_repo;
pub mod write_off_repo;

pub use brigade_repo::BrigadeRepo;
pub use history_repo::HistoryRepo;
pub use item_repo::ItemRepo;
pub use location_repo::LocationRepo;
pub use user_repo::UserRepo;
pub use write_off_repo::WriteOffRepo;
