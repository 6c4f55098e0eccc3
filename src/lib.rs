pub mod agent;
pub mod compare;
pub mod config;
pub mod news;
pub mod tools;
