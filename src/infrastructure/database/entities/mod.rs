//! Database entities module

pub mod address;
pub mod reservation;
pub mod smoking_place;
pub mod user;

pub use address::Entity as Address;
pub use reservation::Entity as Reservation;
pub use smoking_place::Entity as SmokingPlace;
pub use user::Entity as User;
