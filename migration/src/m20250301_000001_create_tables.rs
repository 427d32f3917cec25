use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建家庭表
        manager
            .create_table(
                Table::create()
                    .table(Families::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Families::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Families::FamilyName)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Families::ContactEmail).string().null())
                    .col(ColumnDef::new(Families::Notes).text().null())
                    .col(ColumnDef::new(Families::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Families::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建学生表
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Students::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Students::FamilyId).big_integer().not_null())
                    .col(ColumnDef::new(Students::DisplayName).string().not_null())
                    .col(ColumnDef::new(Students::EnrolledAt).big_integer().null())
                    .col(ColumnDef::new(Students::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Students::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Students::Table, Students::FamilyId)
                            .to(Families::Table, Families::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建家庭链接表（旧版 schema：token 以明文存储，
        // 由 m20250415_000001_seal_link_tokens 迁移为密文 + 查找索引）
        manager
            .create_table(
                Table::create()
                    .table(FamilyLinks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FamilyLinks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FamilyLinks::FamilyId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FamilyLinks::Label).string().null())
                    .col(
                        ColumnDef::new(FamilyLinks::Token)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(FamilyLinks::Status).string().not_null())
                    .col(ColumnDef::new(FamilyLinks::ExpiresAt).big_integer().null())
                    .col(ColumnDef::new(FamilyLinks::RotatedAt).big_integer().null())
                    .col(ColumnDef::new(FamilyLinks::RevokedAt).big_integer().null())
                    .col(
                        ColumnDef::new(FamilyLinks::LastUsedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(FamilyLinks::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FamilyLinks::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(FamilyLinks::Table, FamilyLinks::FamilyId)
                            .to(Families::Table, Families::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FamilyLinks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Families::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
pub enum Families {
    Table,
    Id,
    FamilyName,
    ContactEmail,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum Students {
    Table,
    Id,
    FamilyId,
    DisplayName,
    EnrolledAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum FamilyLinks {
    Table,
    Id,
    FamilyId,
    Label,
    Token,
    Status,
    ExpiresAt,
    RotatedAt,
    RevokedAt,
    LastUsedAt,
    CreatedAt,
    UpdatedAt,
}
