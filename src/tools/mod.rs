pub mod compare;
pub mod news;
