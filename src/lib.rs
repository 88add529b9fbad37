//! Headless administration console for the blog REST API.
//!
//! The session store owns authentication state, the authorized client routes
//! every admin call through it, the route guard gates protected screens and a
//! generic list controller drives the blog, category and comment screens.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
