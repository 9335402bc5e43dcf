use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260712_093000_create_monitor_tables::Monitors;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Add the content-rule, SSL, latency, and retry columns to monitors.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Monitors::Table)
                    .add_column(
                        boolean(Alias::new("check_ssl"))
                            .default(false)
                            .to_owned(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Monitors::Table)
                    .add_column(
                        integer(Alias::new("ssl_expiry_threshold_days"))
                            .default(14)
                            .to_owned(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Monitors::Table)
                    .add_column(string_null(Alias::new("keyword_include")).to_owned())
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Monitors::Table)
                    .add_column(string_null(Alias::new("keyword_exclude")).to_owned())
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Monitors::Table)
                    .add_column(double_null(Alias::new("max_response_time")).to_owned())
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Monitors::Table)
                    .add_column(
                        integer(Alias::new("consecutive_checks"))
                            .default(1)
                            .to_owned(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for column in [
            "check_ssl",
            "ssl_expiry_threshold_days",
            "keyword_include",
            "keyword_exclude",
            "max_response_time",
            "consecutive_checks",
        ] {
            manager
                .alter_table(
                    Table::alter()
                        .table(Monitors::Table)
                        .drop_column(Alias::new(column))
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }
}
