//! click_logs 表
//!
//! 每次成功解析短码的跳转写入一行：IP 与地理位置（city / region / country）。
//! 与 short_links 之间没有外键，仅通过 short_code 关联。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ClickLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClickLogs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ClickLogs::ShortCode)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ClickLogs::Ip).string_len(64).null())
                    .col(ColumnDef::new(ClickLogs::City).string_len(100).null())
                    .col(ColumnDef::new(ClickLogs::Region).string_len(100).null())
                    .col(ColumnDef::new(ClickLogs::Country).string_len(64).null())
                    .col(
                        ColumnDef::new(ClickLogs::ClickedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 复合索引（单链接按时间倒序读取日志）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_click_logs_code_time")
                    .table(ClickLogs::Table)
                    .col(ClickLogs::ShortCode)
                    .col(ClickLogs::ClickedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_click_logs_code_time")
                    .table(ClickLogs::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ClickLogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ClickLogs {
    #[sea_orm(iden = "click_logs")]
    Table,
    Id,
    ShortCode,
    Ip,
    City,
    Region,
    Country,
    ClickedAt,
}
