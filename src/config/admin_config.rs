use serde::Deserialize;

/// Administrator credentials, compared verbatim at login. Loaded once at
/// startup and carried in the application state, never mutated afterwards.
#[derive(Deserialize, Debug, Clone)]
pub struct AdminConfig {
    pub email: String,
    pub password: String,
}
