pub mod dtos;
pub mod laptop;

pub use laptop::{ConflictReport, IdentityField, LaptopEntity};
