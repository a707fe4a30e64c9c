pub mod contacts;
pub mod health;
