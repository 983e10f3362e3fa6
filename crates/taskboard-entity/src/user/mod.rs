//! User domain entities.

pub mod model;
pub mod permission;
pub mod profile;
pub mod repository;

pub use model::{USER_PERSISTENCE, User};
pub use permission::{Permission, Role};
pub use profile::{PROFILE_PERSISTENCE, Profile};
pub use repository::{ProfileRepository, UserRepository};
