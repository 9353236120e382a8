pub mod chat;
pub mod map;
pub mod panels;
