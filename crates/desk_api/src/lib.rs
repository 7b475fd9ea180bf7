pub mod affected_users;
pub mod assignment;
pub mod desk;
pub mod fetch;
pub mod http;
pub mod incidents;
pub mod singleflight;
pub mod users;

pub use desk::Desk;
