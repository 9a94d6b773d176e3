use crate::services::UserService;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
}
