use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(big_integer(Users::TelegramId).unique_key().to_owned())
                    .col(string_null(Users::Username))
                    .col(string_null(Users::Email))
                    .col(
                        boolean(Users::IsNotificationEnabled)
                            .default(true)
                            .to_owned(),
                    )
                    .col(
                        boolean(Users::IsEmailNotificationEnabled)
                            .default(false)
                            .to_owned(),
                    )
                    .col(integer(Users::EmailLimit).default(4).to_owned())
                    .col(integer(Users::EmailNotificationCount).default(0).to_owned())
                    .col(timestamp_with_time_zone_null(
                        Users::LastEmailNotificationDate,
                    ))
                    .col(
                        timestamp_with_time_zone(Users::JoinedAt)
                            .default(Expr::current_timestamp())
                            .to_owned(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Monitors::Table)
                    .if_not_exists()
                    .col(pk_auto(Monitors::Id))
                    .col(integer(Monitors::UserId))
                    .col(string(Monitors::Name))
                    .col(string(Monitors::Url))
                    .col(integer(Monitors::IntervalSeconds).default(300).to_owned())
                    .col(integer(Monitors::TimeoutSeconds).default(10).to_owned())
                    .col(integer_null(Monitors::ExpectedStatus))
                    .col(boolean(Monitors::IsActive).default(true).to_owned())
                    .col(boolean_null(Monitors::LastStatus))
                    .col(timestamp_with_time_zone_null(Monitors::LastCheckedAt))
                    .col(
                        timestamp_with_time_zone(Monitors::CreatedAt)
                            .default(Expr::current_timestamp())
                            .to_owned(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_monitors_user_id")
                            .from(Monitors::Table, Monitors::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MaintenanceWindows::Table)
                    .if_not_exists()
                    .col(pk_auto(MaintenanceWindows::Id))
                    .col(integer(MaintenanceWindows::MonitorId))
                    .col(timestamp_with_time_zone(MaintenanceWindows::StartTime))
                    .col(timestamp_with_time_zone(MaintenanceWindows::EndTime))
                    .col(string_null(MaintenanceWindows::Description))
                    .col(
                        timestamp_with_time_zone(MaintenanceWindows::CreatedAt)
                            .default(Expr::current_timestamp())
                            .to_owned(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_maintenance_windows_monitor_id")
                            .from(MaintenanceWindows::Table, MaintenanceWindows::MonitorId)
                            .to(Monitors::Table, Monitors::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CheckLogs::Table)
                    .if_not_exists()
                    .col(pk_auto(CheckLogs::Id))
                    .col(integer(CheckLogs::MonitorId))
                    .col(integer_null(CheckLogs::StatusCode))
                    .col(double(CheckLogs::ResponseTime).default(0.0).to_owned())
                    .col(boolean(CheckLogs::IsUp))
                    .col(string_null(CheckLogs::ErrorMessage))
                    .col(
                        timestamp_with_time_zone(CheckLogs::CheckedAt)
                            .default(Expr::current_timestamp())
                            .to_owned(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_check_logs_monitor_id")
                            .from(CheckLogs::Table, CheckLogs::MonitorId)
                            .to(Monitors::Table, Monitors::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_check_logs_monitor_checked_at")
                    .table(CheckLogs::Table)
                    .col(CheckLogs::MonitorId)
                    .col(CheckLogs::CheckedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_check_logs_monitor_checked_at")
                    .table(CheckLogs::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(CheckLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MaintenanceWindows::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Monitors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    TelegramId,
    Username,
    Email,
    IsNotificationEnabled,
    IsEmailNotificationEnabled,
    EmailLimit,
    EmailNotificationCount,
    LastEmailNotificationDate,
    JoinedAt,
}

#[derive(Iden)]
pub(crate) enum Monitors {
    Table,
    Id,
    UserId,
    Name,
    Url,
    IntervalSeconds,
    TimeoutSeconds,
    ExpectedStatus,
    IsActive,
    LastStatus,
    LastCheckedAt,
    CreatedAt,
}

#[derive(Iden)]
enum MaintenanceWindows {
    Table,
    Id,
    MonitorId,
    StartTime,
    EndTime,
    Description,
    CreatedAt,
}

#[derive(Iden)]
enum CheckLogs {
    Table,
    Id,
    MonitorId,
    StatusCode,
    ResponseTime,
    IsUp,
    ErrorMessage,
    CheckedAt,
}
