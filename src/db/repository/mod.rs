pub mod process;
pub mod user;

pub use process::*;
pub use user::*;
