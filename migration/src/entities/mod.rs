pub mod assignment;
pub mod task_queue;
pub mod worker;

pub use assignment::Entity as AssignmentEntity;
pub use task_queue::Entity as TaskQueueEntity;
pub use worker::Entity as WorkerEntity;
