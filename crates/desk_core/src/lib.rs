pub mod cache;
pub mod config;
pub mod demo;
pub mod domain;
pub mod email;
pub mod error;
pub mod logging;
pub mod normalize;
pub mod search;
pub mod validate;
pub mod views;
pub mod workspace;
