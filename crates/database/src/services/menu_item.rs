use crate::entities::menu_item;
use log::debug;
use models::{MenuItem, MenuItemChanges, MenuItemFields};
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Set},
    DatabaseConnection, DbErr, EntityTrait, QueryOrder, TransactionTrait,
};

pub struct MenuItemService;

impl MenuItemService {
    /// All menu items in primary key order
    pub async fn list(db: &DatabaseConnection) -> Result<Vec<MenuItem>, DbErr> {
        let items = menu_item::Entity::find()
            .order_by_asc(menu_item::Column::Id)
            .all(db)
            .await?;

        Ok(items.into_iter().map(MenuItem::from).collect())
    }

    pub async fn get(db: &DatabaseConnection, id: i32) -> Result<Option<MenuItem>, DbErr> {
        let item = menu_item::Entity::find_by_id(id).one(db).await?;
        Ok(item.map(MenuItem::from))
    }

    pub async fn create(
        db: &DatabaseConnection,
        fields: MenuItemFields,
    ) -> Result<MenuItem, DbErr> {
        let model = menu_item::ActiveModel {
            id: NotSet,
            title: Set(fields.title),
            price: Set(fields.price),
            inventory: Set(fields.inventory),
        }
        .insert(db)
        .await?;

        debug!("Created menu item {}", model.id);
        Ok(model.into())
    }

    /// Replaces every field of the item; `None` if no item has `id`
    pub async fn update(
        db: &DatabaseConnection,
        id: i32,
        fields: MenuItemFields,
    ) -> Result<Option<MenuItem>, DbErr> {
        Self::edit(db, id, |item| fields.with_id(item.id)).await
    }

    /// Overwrites only the fields present in `changes`; `None` if no item has `id`
    pub async fn partial_update(
        db: &DatabaseConnection,
        id: i32,
        changes: MenuItemChanges,
    ) -> Result<Option<MenuItem>, DbErr> {
        Self::edit(db, id, |item| changes.apply(item)).await
    }

    /// Returns whether a row was removed
    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<bool, DbErr> {
        let result = menu_item::Entity::delete_by_id(id).exec(db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn edit(
        db: &DatabaseConnection,
        id: i32,
        edit: impl FnOnce(MenuItem) -> MenuItem,
    ) -> Result<Option<MenuItem>, DbErr> {
        let txn = db.begin().await?;

        let Some(existing) = menu_item::Entity::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };

        let edited = edit(MenuItem::from(existing.clone()));
        let mut active: menu_item::ActiveModel = existing.into();
        active.title = Set(edited.title);
        active.price = Set(edited.price);
        active.inventory = Set(edited.inventory);

        let model = active.update(&txn).await?;
        txn.commit().await?;

        debug!("Updated menu item {}", model.id);
        Ok(Some(model.into()))
    }
}
