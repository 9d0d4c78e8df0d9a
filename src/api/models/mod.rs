pub mod labels;
pub mod system;
pub mod users;

pub use labels::*;
pub use system::*;
pub use users::*;
