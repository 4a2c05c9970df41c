pub mod signup;
pub mod admin;

pub use signup::*;
pub use admin::*;
