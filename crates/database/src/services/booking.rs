use crate::entities::booking;
use log::debug;
use models::{Booking, BookingChanges, BookingFields};
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Set},
    DatabaseConnection, DbErr, EntityTrait, QueryOrder, TransactionTrait,
};

pub struct BookingService;

impl BookingService {
    /// All bookings in primary key order
    pub async fn list(db: &DatabaseConnection) -> Result<Vec<Booking>, DbErr> {
        let bookings = booking::Entity::find()
            .order_by_asc(booking::Column::Id)
            .all(db)
            .await?;

        Ok(bookings.into_iter().map(Booking::from).collect())
    }

    pub async fn get(db: &DatabaseConnection, id: i32) -> Result<Option<Booking>, DbErr> {
        let booking = booking::Entity::find_by_id(id).one(db).await?;
        Ok(booking.map(Booking::from))
    }

    pub async fn create(db: &DatabaseConnection, fields: BookingFields) -> Result<Booking, DbErr> {
        let model = booking::ActiveModel {
            id: NotSet,
            name: Set(fields.name),
            number_of_guests: Set(fields.number_of_guests),
            booking_date: Set(fields.booking_date),
        }
        .insert(db)
        .await?;

        debug!("Created booking {}", model.id);
        Ok(model.into())
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: i32,
        fields: BookingFields,
    ) -> Result<Option<Booking>, DbErr> {
        Self::edit(db, id, |booking| fields.with_id(booking.id)).await
    }

    pub async fn partial_update(
        db: &DatabaseConnection,
        id: i32,
        changes: BookingChanges,
    ) -> Result<Option<Booking>, DbErr> {
        Self::edit(db, id, |booking| changes.apply(booking)).await
    }

    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<bool, DbErr> {
        let result = booking::Entity::delete_by_id(id).exec(db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn edit(
        db: &DatabaseConnection,
        id: i32,
        edit: impl FnOnce(Booking) -> Booking,
    ) -> Result<Option<Booking>, DbErr> {
        let txn = db.begin().await?;

        let Some(existing) = booking::Entity::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };

        let edited = edit(Booking::from(existing.clone()));
        let mut active: booking::ActiveModel = existing.into();
        active.name = Set(edited.name);
        active.number_of_guests = Set(edited.number_of_guests);
        active.booking_date = Set(edited.booking_date);

        let model = active.update(&txn).await?;
        txn.commit().await?;

        debug!("Updated booking {}", model.id);
        Ok(Some(model.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_connection;
    use models::Payload;
    use serde_json::{Value, json};

    fn fields(value: Value) -> BookingFields {
        BookingFields::from_payload(serde_json::from_value::<Payload>(value).unwrap()).unwrap()
    }

    async fn seed(db: &DatabaseConnection) -> Vec<Booking> {
        let mut created = Vec::new();
        for (name, guests, date) in [
            ("John Doe", 4, "2025-04-01 18:30:00"),
            ("Jane Smith", 2, "2025-04-01 19:00:00"),
            ("Alice Johnson", 6, "2025-04-01 20:00:00"),
        ] {
            let booking = BookingService::create(
                db,
                fields(json!({ "name": name, "number_of_guests": guests, "booking_date": date })),
            )
            .await
            .unwrap();
            created.push(booking);
        }
        created
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let db = test_connection().await;
        let created = seed(&db).await;

        let listed = BookingService::list(&db).await.unwrap();
        assert_eq!(listed, created);

        let value = serde_json::to_value(&listed[0]).unwrap();
        assert_eq!(value["booking_date"], json!("2025-04-01T18:30:00"));
        assert_eq!(value["number_of_guests"], json!(4));
    }

    #[tokio::test]
    async fn test_update_and_partial_update() {
        let db = test_connection().await;
        let john = seed(&db).await.remove(0);

        let updated = BookingService::update(
            &db,
            john.id,
            fields(json!({
                "name": "Updated Bob Marley",
                "number_of_guests": 7,
                "booking_date": "2025-04-01 22:00:00"
            })),
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(updated.id, john.id);
        assert_eq!(updated.number_of_guests, 7);

        let changes = BookingChanges::from_payload(
            serde_json::from_value(json!({ "number_of_guests": 3 })).unwrap(),
        )
        .unwrap();
        let patched = BookingService::partial_update(&db, john.id, changes)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(patched.number_of_guests, 3);
        assert_eq!(patched.name, "Updated Bob Marley");
        assert_eq!(patched.booking_date, updated.booking_date);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = test_connection().await;
        let bookings = seed(&db).await;

        assert!(BookingService::delete(&db, bookings[1].id).await.unwrap());
        assert!(!BookingService::delete(&db, bookings[1].id).await.unwrap());
        assert_eq!(BookingService::get(&db, bookings[1].id).await.unwrap(), None);
        assert_eq!(BookingService::list(&db).await.unwrap().len(), 2);
    }
}
