pub mod barcodes;
pub mod labels;
pub mod system;
pub mod users;

pub use barcodes::*;
pub use labels::*;
pub use system::*;
pub use users::*;

use crate::auth::session::AuthSettings;
use crate::db::repository::UserRepository;
use std::sync::Arc;

/// Shared application state for handlers
#[derive(Clone)]
pub struct AppState {
    pub user_repo: Arc<UserRepository>,
    pub auth: Arc<AuthSettings>,
}
