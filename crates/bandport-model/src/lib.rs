pub mod release;
pub mod session;

pub use release::*;
pub use session::*;
