pub mod check_duplicates;
pub mod delete;
pub mod get;
pub mod laptop;
pub mod list;
pub mod login;
pub mod register;
pub mod search;
pub mod stats;
pub mod update;
pub mod verify;

pub use check_duplicates::check_duplicates;
pub use delete::delete;
pub use get::get;
pub use laptop::LaptopService;
pub use list::list;
pub use login::login;
pub use register::register;
pub use search::search;
pub use stats::stats;
pub use update::update;
pub use verify::verify;
