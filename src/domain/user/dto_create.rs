use super::UserRole;

/// Fields for a new user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}
