pub mod guides;
pub mod info;
pub mod user;

pub use guides::*;
pub use info::*;
pub use user::*;
