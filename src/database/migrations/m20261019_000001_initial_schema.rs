use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        self.create_blend_log_table(manager).await?;
        self.create_drink_name_table(manager).await?;
        self.create_indexes(manager).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DrinkName::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BlendLog::Table).to_owned())
            .await?;
        Ok(())
    }
}

impl Migration {
    fn create_timestamp_column(&self, manager: &SchemaManager, column: impl IntoIden) -> ColumnDef {
        timestamp_column(manager.get_database_backend(), column)
    }

    async fn create_blend_log_table(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BlendLog::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BlendLog::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BlendLog::Recipe).text().not_null())
                    // hex SHA-256 of the canonical pair set
                    .col(ColumnDef::new(BlendLog::RecipeKey).string_len(64).not_null())
                    .col(self.create_timestamp_column(manager, BlendLog::CreatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn create_drink_name_table(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DrinkName::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DrinkName::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DrinkName::Name).text().not_null())
                    .col(ColumnDef::new(DrinkName::Sortname).text().not_null())
                    .col(
                        ColumnDef::new(DrinkName::IsCommon)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn create_indexes(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        // Rejects a second insert of an equivalent blend
        manager
            .create_index(
                Index::create()
                    .name("idx_blend_log_recipe_key")
                    .table(BlendLog::Table)
                    .col(BlendLog::RecipeKey)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_drink_name_is_common")
                    .table(DrinkName::Table)
                    .col(DrinkName::IsCommon)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

/// `created_at` column typed so each driver decodes it as `DateTimeUtc`
fn timestamp_column(backend: sea_orm::DatabaseBackend, column: impl IntoIden) -> ColumnDef {
    let mut col = ColumnDef::new(column);
    match backend {
        sea_orm::DatabaseBackend::Postgres => col.timestamp_with_time_zone().not_null(),
        sea_orm::DatabaseBackend::MySql => col.timestamp().not_null(),
        // SQLite keeps timestamps as RFC 3339 text
        _ => col.string().not_null(),
    };
    col
}

#[derive(DeriveIden)]
enum BlendLog {
    Table,
    Id,
    Recipe,
    RecipeKey,
    CreatedAt,
}

#[derive(DeriveIden)]
enum DrinkName {
    Table,
    Id,
    Name,
    Sortname,
    IsCommon,
}
