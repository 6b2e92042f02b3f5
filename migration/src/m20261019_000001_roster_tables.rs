use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 workers 表
        manager
            .create_table(
                Table::create()
                    .table(Worker::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Worker::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Worker::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Worker::Title).string_len(50).not_null())
                    .col(ColumnDef::new(Worker::Department).string_len(100).null())
                    .col(
                        ColumnDef::new(Worker::HardChoresCounter)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Worker::OuterPartnerCounter)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Worker::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Worker::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_workers_name")
                    .table(Worker::Table)
                    .col(Worker::Name)
                    .to_owned(),
            )
            .await?;

        // 创建 assignments 表（删除 worker 时置空）
        manager
            .create_table(
                Table::create()
                    .table(Assignment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Assignment::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Assignment::Date).date().not_null())
                    .col(ColumnDef::new(Assignment::TimeSlot).string_len(20).null())
                    .col(ColumnDef::new(Assignment::TaskType).string_len(50).not_null())
                    .col(ColumnDef::new(Assignment::WorkerId).integer().null())
                    .col(
                        ColumnDef::new(Assignment::IsCommander)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Assignment::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assignment::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_assignments_worker")
                            .from(Assignment::Table, Assignment::WorkerId)
                            .to(Worker::Table, Worker::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_assignments_date_task")
                    .table(Assignment::Table)
                    .col(Assignment::Date)
                    .col(Assignment::TaskType)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("uq_assignments_slot_worker")
                    .table(Assignment::Table)
                    .col(Assignment::Date)
                    .col(Assignment::TimeSlot)
                    .col(Assignment::TaskType)
                    .col(Assignment::WorkerId)
                    .to_owned(),
            )
            .await?;

        // 创建 task_queues 表（删除 worker 时级联删除）
        manager
            .create_table(
                Table::create()
                    .table(TaskQueue::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TaskQueue::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TaskQueue::WorkerId).integer().not_null())
                    .col(ColumnDef::new(TaskQueue::TaskType).string_len(50).not_null())
                    .col(
                        ColumnDef::new(TaskQueue::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_task_queues_worker")
                            .from(TaskQueue::Table, TaskQueue::WorkerId)
                            .to(Worker::Table, Worker::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("uq_task_queues_task_worker")
                    .table(TaskQueue::Table)
                    .col(TaskQueue::TaskType)
                    .col(TaskQueue::WorkerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_task_queues_task_position")
                    .table(TaskQueue::Table)
                    .col(TaskQueue::TaskType)
                    .col(TaskQueue::Position)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TaskQueue::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Assignment::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Worker::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Worker {
    #[sea_orm(iden = "workers")]
    Table,
    Id,
    Name,
    Title,
    Department,
    HardChoresCounter,
    OuterPartnerCounter,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Assignment {
    #[sea_orm(iden = "assignments")]
    Table,
    Id,
    Date,
    TimeSlot,
    TaskType,
    WorkerId,
    IsCommander,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TaskQueue {
    #[sea_orm(iden = "task_queues")]
    Table,
    Id,
    WorkerId,
    TaskType,
    Position,
}
