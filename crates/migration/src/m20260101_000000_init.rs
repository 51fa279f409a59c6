//! Initial schema.
//!
//! - `accounts`: principals known to the identity provider
//! - `transactions`: shared expense headers
//! - `transaction_participants`: what each participant owes, per transaction

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
    Email,
    Name,
    Picture,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    PayerId,
    OccurredAt,
    SplitType,
    AmountMinor,
}

#[derive(Iden)]
enum TransactionParticipants {
    Table,
    TransactionId,
    AccountId,
    Position,
    AmountMinor,
    FractionalShare,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Accounts::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Accounts::Email).string().not_null())
                    .col(ColumnDef::new(Accounts::Name).string().not_null())
                    .col(ColumnDef::new(Accounts::Picture).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::PayerId).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::OccurredAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::SplitType).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-payer_id")
                            .from(Transactions::Table, Transactions::PayerId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-payer_id")
                    .table(Transactions::Table)
                    .col(Transactions::PayerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TransactionParticipants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TransactionParticipants::TransactionId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TransactionParticipants::AccountId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TransactionParticipants::Position)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TransactionParticipants::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TransactionParticipants::FractionalShare).integer())
                    .primary_key(
                        Index::create()
                            .col(TransactionParticipants::TransactionId)
                            .col(TransactionParticipants::AccountId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transaction_participants-transaction_id")
                            .from(
                                TransactionParticipants::Table,
                                TransactionParticipants::TransactionId,
                            )
                            .to(Transactions::Table, Transactions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transaction_participants-account_id")
                            .from(
                                TransactionParticipants::Table,
                                TransactionParticipants::AccountId,
                            )
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transaction_participants-account_id")
                    .table(TransactionParticipants::Table)
                    .col(TransactionParticipants::AccountId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(TransactionParticipants::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await
    }
}
