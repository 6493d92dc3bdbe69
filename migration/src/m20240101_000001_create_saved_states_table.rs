use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SavedStates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SavedStates::Key)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SavedStates::Payload).text().not_null())
                    .col(
                        ColumnDef::new(SavedStates::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SavedStates::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SavedStates {
    Table,
    Key,
    Payload,
    UpdatedAt,
}
