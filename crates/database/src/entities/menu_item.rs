use models::{MenuItem, Price};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "menu_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Price,
    pub inventory: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for MenuItem {
    fn from(model: Model) -> Self {
        MenuItem {
            id: model.id,
            title: model.title,
            price: model.price,
            inventory: model.inventory,
        }
    }
}
