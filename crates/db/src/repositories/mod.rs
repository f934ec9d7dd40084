//! Table repositories.
//!
//! Each repository is a unit struct with associated async functions.
//! Functions that participate in multi-entity transactions take a
//! `&mut PgConnection` so the caller controls the transaction boundary;
//! read paths are generic over any `PgExecutor`.

pub mod assignment_repo;
pub mod designer_repo;
pub mod notification_repo;
pub mod project_repo;
pub mod subscription_repo;

pub use assignment_repo::AssignmentRepo;
pub use designer_repo::DesignerRepo;
pub use notification_repo::NotificationRepo;
pub use project_repo::ProjectRepo;
pub use subscription_repo::SubscriptionRepo;
