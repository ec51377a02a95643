pub mod appointment;
pub mod datetime;
pub mod error;
pub mod schedule;
pub mod user;

pub use appointment::*;
pub use datetime::*;
pub use error::*;
pub use schedule::*;
pub use user::*;
