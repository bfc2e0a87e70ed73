//! # services
//!
//! The circleshare core: visibility authorization, the friend-request state
//! machine, and the user/content resource managers. Everything here talks to
//! the outside world through the ports defined in `domains`.

pub mod access;
pub mod content;
pub mod friends;
pub mod users;

pub use access::{permits, AccessGate};
pub use content::{ContentService, NewContent};
pub use friends::FriendService;
pub use users::{NewUser, ProfileUpdate, UserService};
