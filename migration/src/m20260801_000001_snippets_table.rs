use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Snippet::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Snippet::ShortId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Snippet::Title).string().null())
                    .col(ColumnDef::new(Snippet::Content).text().not_null())
                    .col(ColumnDef::new(Snippet::ContentNonce).string().null())
                    .col(ColumnDef::new(Snippet::Language).string().not_null())
                    .col(ColumnDef::new(Snippet::Theme).string().null())
                    .col(
                        ColumnDef::new(Snippet::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Snippet::ExpiresAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Snippet::ViewLimit).big_integer().null())
                    .col(
                        ColumnDef::new(Snippet::ViewCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Snippet::OwnerCodeHash).string().null())
                    .col(ColumnDef::new(Snippet::EditCodeHash).string().null())
                    .col(ColumnDef::new(Snippet::DeleteCodeHash).string().null())
                    .col(ColumnDef::new(Snippet::PasswordHash).string().null())
                    .col(ColumnDef::new(Snippet::UserId).string().null())
                    .to_owned(),
            )
            .await?;

        // 过期扫描依赖这个索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_snippets_expires_at")
                    .table(Snippet::Table)
                    .col(Snippet::ExpiresAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_snippets_created_at")
                    .table(Snippet::Table)
                    .col(Snippet::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_snippets_created_at").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_snippets_expires_at").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Snippet::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Snippet {
    #[sea_orm(iden = "snippets")]
    Table,
    ShortId,
    Title,
    Content,
    ContentNonce,
    Language,
    Theme,
    CreatedAt,
    ExpiresAt,
    ViewLimit,
    ViewCount,
    OwnerCodeHash,
    EditCodeHash,
    DeleteCodeHash,
    PasswordHash,
    UserId,
}
