pub mod health;
pub mod auth;
pub mod menu;
pub mod cart;
