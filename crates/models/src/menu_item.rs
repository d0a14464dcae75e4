use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::{
    price::Price,
    validation::{self, Payload, ValidationErrors},
};

/// Longest title a menu item may have, in characters
pub const TITLE_MAX_LENGTH: usize = 255;

/// A dish or drink on the menu, as stored and as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MenuItem {
    /// Assigned by the store on creation
    pub id: i32,
    pub title: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "12.99"))]
    pub price: Price,
    /// Units in stock
    pub inventory: i32,
}

impl Display for MenuItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} : {}", self.title, self.price)
    }
}

/// Every writable field of a menu item, validated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MenuItemFields {
    pub title: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "12.99"))]
    pub price: Price,
    pub inventory: i32,
}

impl MenuItemFields {
    /// Validates a payload that must carry every field (create, full update)
    pub fn from_payload(payload: Payload) -> Result<Self, ValidationErrors> {
        match MenuItemChanges::read(payload, true) {
            (
                MenuItemChanges {
                    title: Some(title),
                    price: Some(price),
                    inventory: Some(inventory),
                },
                errors,
            ) if errors.is_empty() => Ok(Self {
                title,
                price,
                inventory,
            }),
            (_, errors) => Err(errors),
        }
    }

    pub fn with_id(self, id: i32) -> MenuItem {
        MenuItem {
            id,
            title: self.title,
            price: self.price,
            inventory: self.inventory,
        }
    }
}

/// A validated partial update; `None` leaves the stored value alone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuItemChanges {
    pub title: Option<String>,
    pub price: Option<Price>,
    pub inventory: Option<i32>,
}

impl MenuItemChanges {
    pub fn from_payload(payload: Payload) -> Result<Self, ValidationErrors> {
        let (changes, errors) = Self::read(payload, false);
        if errors.is_empty() {
            Ok(changes)
        } else {
            Err(errors)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.price.is_none() && self.inventory.is_none()
    }

    pub fn apply(self, item: MenuItem) -> MenuItem {
        MenuItem {
            id: item.id,
            title: self.title.unwrap_or(item.title),
            price: self.price.unwrap_or(item.price),
            inventory: self.inventory.unwrap_or(item.inventory),
        }
    }

    fn read(mut payload: Payload, required: bool) -> (Self, ValidationErrors) {
        let mut errors = ValidationErrors::new();

        let title = payload.take("title", required, &mut errors, |v| {
            validation::text(v, TITLE_MAX_LENGTH)
        });
        let price = payload.take("price", required, &mut errors, Price::parse);
        let inventory = payload.take("inventory", required, &mut errors, |v| {
            validation::integer(v, 0)
        });

        (
            Self {
                title,
                price,
                inventory,
            },
            errors,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use std::str::FromStr;

    fn payload(value: Value) -> Payload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_from_payload() {
        let fields =
            MenuItemFields::from_payload(payload(json!({ "title": "IceCream", "price": 80, "inventory": 100 })))
                .unwrap();

        assert_eq!(fields.title, "IceCream");
        assert_eq!(fields.price.to_string(), "80.00");
        assert_eq!(fields.inventory, 100);
    }

    #[test]
    fn test_ignores_unknown_fields_and_client_id() {
        let fields = MenuItemFields::from_payload(payload(json!({
            "id": 99,
            "title": "Salad",
            "price": "6.99",
            "inventory": 120,
            "vegan": true
        })))
        .unwrap();

        assert_eq!(fields.with_id(4).id, 4);
    }

    #[test]
    fn test_missing_fields_are_all_named() {
        let errors = MenuItemFields::from_payload(payload(json!({}))).unwrap_err();
        let named: Vec<_> = errors.fields().collect();

        assert_eq!(named, vec!["inventory", "price", "title"]);
        assert_eq!(
            errors.field("title"),
            Some(&[validation::REQUIRED.to_string()][..])
        );
    }

    #[test]
    fn test_rejects_bad_values() {
        let errors = MenuItemFields::from_payload(payload(json!({
            "title": "Pizza",
            "price": "twelve",
            "inventory": -1
        })))
        .unwrap_err();

        assert_eq!(
            errors.field("price"),
            Some(&[validation::INVALID_NUMBER.to_string()][..])
        );
        assert_eq!(
            errors.field("inventory"),
            Some(&["Ensure this value is greater than or equal to 0.".to_string()][..])
        );
        assert_eq!(errors.field("title"), None);
    }

    #[test]
    fn test_rejects_negative_price_and_long_title() {
        let errors = MenuItemFields::from_payload(payload(json!({
            "title": "x".repeat(TITLE_MAX_LENGTH + 1),
            "price": -5,
            "inventory": 0
        })))
        .unwrap_err();

        assert!(errors.field("title").is_some());
        assert!(errors.field("price").is_some());
        assert!(errors.field("inventory").is_none());
    }

    #[test]
    fn test_changes_apply_only_present_fields() {
        let item = MenuItem {
            id: 1,
            title: "Pizza".to_string(),
            price: Price::from_str("12.99").unwrap(),
            inventory: 100,
        };

        let changes = MenuItemChanges::from_payload(payload(json!({ "inventory": 90 }))).unwrap();
        let updated = changes.apply(item.clone());

        assert_eq!(updated.inventory, 90);
        assert_eq!(updated.title, item.title);
        assert_eq!(updated.price, item.price);
        assert!(MenuItemChanges::from_payload(payload(json!({}))).unwrap().is_empty());
    }

    #[test]
    fn test_changes_still_validate() {
        let errors =
            MenuItemChanges::from_payload(payload(json!({ "inventory": -3 }))).unwrap_err();
        assert!(errors.field("inventory").is_some());
    }

    #[test]
    fn test_serialize_round_trip() {
        let item = MenuItem {
            id: 3,
            title: "Pasta".to_string(),
            price: Price::from_str("10.5").unwrap(),
            inventory: 80,
        };

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(
            value,
            json!({ "id": 3, "title": "Pasta", "price": "10.50", "inventory": 80 })
        );

        let back: MenuItem = serde_json::from_value(value).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_display() {
        let item = MenuItemFields::from_payload(payload(json!({
            "title": "IceCream",
            "price": 80,
            "inventory": 100
        })))
        .unwrap()
        .with_id(1);

        assert_eq!(item.to_string(), "IceCream : 80.00");
    }
}
