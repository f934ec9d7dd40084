pub mod designer;
pub mod notification;
pub mod project;
pub mod subscription;
