#![allow(dead_code)]

//! Shared fixtures for repository integration tests.

use atelier_core::types::DbId;
use atelier_db::models::designer::CreateDesigner;
use atelier_db::models::project::CreateProject;

pub fn new_project(name: &str) -> CreateProject {
    CreateProject {
        name: name.to_string(),
        description: None,
        priority: None,
    }
}

pub fn new_designer(user_id: DbId, max_capacity: i32) -> CreateDesigner {
    CreateDesigner {
        user_id,
        display_name: format!("Designer {user_id}"),
        max_capacity: Some(max_capacity),
    }
}
