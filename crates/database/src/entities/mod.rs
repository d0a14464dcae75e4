pub mod auth_token;
pub mod booking;
pub mod menu_item;
pub mod user;
