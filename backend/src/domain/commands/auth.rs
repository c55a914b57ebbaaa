use crate::domain::models::user::User;

/// Input for creating a new account.
///
/// Required fields stay `Option` so the service owns the "all fields are
/// required" check and can report it as a validation error.
#[derive(Debug, Clone)]
pub struct SignupCommand {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SignupResult {
    pub user: User,
}

/// Input for authenticating an existing account.
#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LoginResult {
    pub token: String,
    pub user: User,
}
