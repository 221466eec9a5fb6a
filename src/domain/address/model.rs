//! Address domain entity

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub id: i32,
    pub city: String,
    /// Globally unique
    pub street: String,
}
