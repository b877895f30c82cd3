use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKey, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
// Column names follow the original catalog schema.
#[derive(Iden)]
enum Users {
    Table,
    Uid,
    Name,
    Email,
    Pass,
}

#[derive(Iden)]
enum Books {
    Table,
    Bid,
    Lable,
    Author,
    Delete,
    Uid,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Uid).string().not_null().primary_key())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Pass).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Books::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Books::Bid).string().not_null().primary_key())
                    .col(ColumnDef::new(Books::Lable).string().not_null())
                    .col(ColumnDef::new(Books::Author).string().not_null())
                    .col(
                        ColumnDef::new(Books::Delete)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Books::Uid).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_books_uid")
                            .from(Books::Table, Books::Uid)
                            .to(Users::Table, Users::Uid)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_books_uid")
                    .table(Books::Table)
                    .col(Books::Uid)
                    .to_owned(),
            )
            .await?;

        // Purge scans by the logical delete flag.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_books_delete")
                    .table(Books::Table)
                    .col(Books::Delete)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Books::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await
    }
}
