pub mod blogs;
pub mod categories;
pub mod client;
pub mod comments;
pub mod dashboard;
pub mod error;
pub mod guard;
pub mod list;
pub mod session;
pub mod uploads;
