#![allow(dead_code)]

use adel_core::{
    Decimal, GatewayError, GatewayResult, KeyValueStore, Project, ProjectGateway, ProjectId,
    ProjectUpdate, StoreError, StoreResult,
};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

/// In-process stand-in for the remote project API.
///
/// Successful updates are applied to the stored list so a refresh sees them.
#[derive(Default)]
pub struct FakeGateway {
    pub projects: RefCell<Vec<Project>>,
    pub sent_updates: RefCell<Vec<(ProjectId, ProjectUpdate)>>,
    pub deleted: RefCell<Vec<ProjectId>>,
    pub update_results: RefCell<VecDeque<GatewayResult<()>>>,
    pub delete_results: RefCell<VecDeque<GatewayResult<()>>>,
    pub list_fails: Cell<bool>,
}

impl FakeGateway {
    pub fn with_projects(projects: Vec<Project>) -> Self {
        Self {
            projects: RefCell::new(projects),
            ..Self::default()
        }
    }

    pub fn fail_next_update(&self) {
        self.update_results
            .borrow_mut()
            .push_back(Err(GatewayError::Network("connection reset".to_string())));
    }

    pub fn fail_next_delete(&self) {
        self.delete_results.borrow_mut().push_back(Err(GatewayError::Rejected {
            status: 500,
            message: "internal error".to_string(),
        }));
    }
}

impl ProjectGateway for FakeGateway {
    fn list_projects(&self) -> GatewayResult<Vec<Project>> {
        if self.list_fails.get() {
            return Err(GatewayError::Network("offline".to_string()));
        }
        Ok(self.projects.borrow().clone())
    }

    fn update_project(&self, id: ProjectId, update: &ProjectUpdate) -> GatewayResult<()> {
        self.sent_updates.borrow_mut().push((id, update.clone()));
        self.update_results.borrow_mut().pop_front().unwrap_or(Ok(()))?;

        let mut projects = self.projects.borrow_mut();
        let project = projects
            .iter_mut()
            .find(|project| project.id == id)
            .ok_or(GatewayError::NotFound(id))?;
        project.name = update.name.clone();
        project.progress = Some(i32::from(update.progress));
        project.description = update.description.clone();
        project.deadline = update.deadline.clone();
        project.budget = update.budget.map(Decimal::from);
        project.budget_used = Some(Decimal::from(update.budget_used));
        Ok(())
    }

    fn delete_project(&self, id: ProjectId) -> GatewayResult<()> {
        self.deleted.borrow_mut().push(id);
        self.delete_results.borrow_mut().pop_front().unwrap_or(Ok(()))?;
        self.projects.borrow_mut().retain(|project| project.id != id);
        Ok(())
    }
}

/// Store whose reads and/or writes always fail.
#[derive(Default)]
pub struct BrokenStore {
    pub fail_reads: bool,
    pub fail_writes: bool,
    pub write_attempts: Cell<usize>,
}

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> StoreResult<Option<String>> {
        if self.fail_reads {
            return Err(StoreError::Unavailable("storage disabled".to_string()));
        }
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> StoreResult<()> {
        self.write_attempts.set(self.write_attempts.get() + 1);
        if self.fail_writes {
            return Err(StoreError::Unavailable("quota exceeded".to_string()));
        }
        Ok(())
    }
}

pub fn sample_project(id: ProjectId) -> Project {
    let mut project = Project::new(id, format!("Project {id}"));
    project.description = Some("Clean water for the district".to_string());
    project.progress = Some(35);
    project.budget = Some(Decimal::from(10_000.0));
    project.budget_used = Some(Decimal::from(2_500.5));
    project.deadline = Some("2025-09-30T00:00:00.000Z".to_string());
    project
}
