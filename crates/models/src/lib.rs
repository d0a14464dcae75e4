pub mod booking;
pub mod menu_item;
pub mod price;
pub mod validation;

pub use booking::{Booking, BookingChanges, BookingFields};
pub use menu_item::{MenuItem, MenuItemChanges, MenuItemFields};
pub use price::Price;
pub use validation::{Payload, ValidationErrors};
