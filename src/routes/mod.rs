pub mod chat;
pub mod download;
pub mod health;
