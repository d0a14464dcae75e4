use models::Booking;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub number_of_guests: i32,
    pub booking_date: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Booking {
    fn from(model: Model) -> Self {
        Booking {
            id: model.id,
            name: model.name,
            number_of_guests: model.number_of_guests,
            booking_date: model.booking_date,
        }
    }
}
