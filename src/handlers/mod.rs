pub mod driver;
pub mod rides;
