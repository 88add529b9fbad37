#![deny(clippy::all, clippy::pedantic)]

pub mod auth;
pub mod blogs;
pub mod categories;
pub mod comments;
pub mod dashboard;
pub mod list;
pub mod route;
pub mod uploads;
