use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MenuItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MenuItems::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MenuItems::Title).string_len(255).not_null())
                    .col(
                        ColumnDef::new(MenuItems::Price)
                            .decimal_len(10, 2)
                            .not_null()
                            .check(Expr::col(MenuItems::Price).gte(0)),
                    )
                    .col(
                        ColumnDef::new(MenuItems::Inventory)
                            .integer()
                            .not_null()
                            .check(Expr::col(MenuItems::Inventory).gte(0)),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MenuItems::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum MenuItems {
    Table,
    Id,
    Title,
    Price,
    Inventory,
}
