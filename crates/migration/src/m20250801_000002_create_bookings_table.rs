use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bookings::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Bookings::NumberOfGuests)
                            .integer()
                            .not_null()
                            .check(Expr::col(Bookings::NumberOfGuests).gte(1)),
                    )
                    .col(ColumnDef::new(Bookings::BookingDate).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        // Bookings are usually looked up by day
        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_booking_date")
                    .table(Bookings::Table)
                    .col(Bookings::BookingDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Bookings {
    Table,
    Id,
    Name,
    NumberOfGuests,
    BookingDate,
}
