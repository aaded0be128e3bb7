//! Scripted in-memory collaborators for poller tests

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use jobwatch_client::{ClientError, Result};
use jobwatch_core::domain::action::Action;
use jobwatch_core::domain::job::{JobId, JobSnapshot, JobSummary};
use jobwatch_core::dto::job::JobListQuery;

use crate::repository::{ClientDirectory, JobDirectory, JobResource};

/// Pops the next scripted value, repeating the last one forever
fn next_scripted<T: Clone>(script: &Mutex<VecDeque<T>>) -> Option<T> {
    let mut script = script.lock().unwrap();
    if script.len() > 1 {
        script.pop_front()
    } else {
        script.front().cloned()
    }
}

/// A job whose successive fetches follow a script
pub struct ScriptedJob {
    id: JobId,
    script: Mutex<VecDeque<JobSnapshot>>,
    fetches: AtomicUsize,
    actions: Mutex<Vec<(Action, bool)>>,
    applies_actions: bool,
    action_error: Option<String>,
    fetch_error: Option<String>,
}

impl ScriptedJob {
    /// Job reporting these statuses on successive fetches
    pub fn new(id: &str, statuses: &[&str]) -> Self {
        Self::from_snapshots(
            statuses
                .iter()
                .map(|status| JobSnapshot::new(id, *status))
                .collect(),
        )
    }

    pub fn from_snapshots(snapshots: Vec<JobSnapshot>) -> Self {
        let id = snapshots
            .first()
            .map(|snapshot| snapshot.id.clone())
            .unwrap_or_else(|| JobId::from("0"));
        Self {
            id,
            script: Mutex::new(snapshots.into()),
            fetches: AtomicUsize::new(0),
            actions: Mutex::new(Vec::new()),
            applies_actions: false,
            action_error: None,
            fetch_error: None,
        }
    }

    /// Actions move the job straight to the status they aim for
    pub fn applying_actions(mut self) -> Self {
        self.applies_actions = true;
        self
    }

    /// Actions are recorded, then rejected by the server with this message
    pub fn failing_actions(mut self, message: &str) -> Self {
        self.action_error = Some(message.to_string());
        self
    }

    /// Fetches fail with this message
    pub fn failing_fetch(mut self, message: &str) -> Self {
        self.fetch_error = Some(message.to_string());
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn actions(&self) -> Vec<(Action, bool)> {
        self.actions.lock().unwrap().clone()
    }

    fn apply(&self, action: Action, wait_for_completion: bool) -> Result<()> {
        self.actions
            .lock()
            .unwrap()
            .push((action, wait_for_completion));

        if let Some(message) = &self.action_error {
            return Err(ClientError::api_error(400, message.clone()));
        }

        if self.applies_actions {
            let mut script = self.script.lock().unwrap();
            let mut snapshot = script
                .back()
                .cloned()
                .unwrap_or_else(|| JobSnapshot::new(self.id.clone(), "running"));
            snapshot.status = action.expected_status();
            *script = VecDeque::from([snapshot]);
        }

        Ok(())
    }
}

#[async_trait]
impl JobResource for ScriptedJob {
    fn id(&self) -> &JobId {
        &self.id
    }

    async fn fetch(&self) -> Result<JobSnapshot> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.fetch_error {
            return Err(ClientError::api_error(503, message.clone()));
        }
        next_scripted(&self.script).ok_or_else(|| ClientError::NotFound(self.id.to_string()))
    }

    async fn suspend(&self, wait_for_completion: bool) -> Result<()> {
        self.apply(Action::Suspend, wait_for_completion)
    }

    async fn resume(&self, wait_for_completion: bool) -> Result<()> {
        self.apply(Action::Resume, wait_for_completion)
    }

    async fn kill(&self, wait_for_completion: bool) -> Result<()> {
        self.apply(Action::Kill, wait_for_completion)
    }
}

/// Job and client directory backed by scripted listings
#[derive(Default)]
pub struct MemoryDirectory {
    jobs: HashMap<JobId, Arc<ScriptedJob>>,
    clients: HashSet<String>,
    listings: Mutex<VecDeque<Vec<JobSummary>>>,
    active_listings: Mutex<VecDeque<Vec<JobSummary>>>,
    list_queries: Mutex<Vec<JobListQuery>>,
    active_queries: Mutex<Vec<(String, String)>>,
    bulk_actions: Mutex<Vec<Action>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_job(mut self, job: Arc<ScriptedJob>) -> Self {
        self.jobs.insert(job.id().clone(), job);
        self
    }

    pub fn with_client(mut self, name: &str) -> Self {
        self.clients.insert(name.to_string());
        self
    }

    /// Appends the answer to the next `all_jobs` call
    pub fn with_listing(self, jobs: Vec<JobSummary>) -> Self {
        self.listings.lock().unwrap().push_back(jobs);
        self
    }

    /// Appends the answer to the next `active_jobs` call
    pub fn with_active_listing(self, jobs: Vec<JobSummary>) -> Self {
        self.active_listings.lock().unwrap().push_back(jobs);
        self
    }

    pub fn listings(&self) -> usize {
        self.list_queries.lock().unwrap().len()
    }

    pub fn active_listings(&self) -> usize {
        self.active_queries.lock().unwrap().len()
    }

    /// Queries received by `all_jobs`, in call order
    pub fn list_queries(&self) -> Vec<JobListQuery> {
        self.list_queries.lock().unwrap().clone()
    }

    /// `(client, job_type_filter)` received by `active_jobs`, in call order
    pub fn active_queries(&self) -> Vec<(String, String)> {
        self.active_queries.lock().unwrap().clone()
    }

    pub fn bulk_actions(&self) -> Vec<Action> {
        self.bulk_actions.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobDirectory for MemoryDirectory {
    async fn get(&self, job_id: &JobId) -> Result<Arc<dyn JobResource>> {
        match self.jobs.get(job_id) {
            Some(job) => Ok(job.clone()),
            None => Err(ClientError::NotFound(format!("job {}", job_id))),
        }
    }

    async fn active_jobs(&self, client: &str, job_type_filter: &str) -> Result<Vec<JobSummary>> {
        self.active_queries
            .lock()
            .unwrap()
            .push((client.to_string(), job_type_filter.to_string()));
        Ok(next_scripted(&self.active_listings).unwrap_or_default())
    }

    async fn all_jobs(&self, query: &JobListQuery) -> Result<Vec<JobSummary>> {
        self.list_queries.lock().unwrap().push(query.clone());
        Ok(next_scripted(&self.listings).unwrap_or_default())
    }

    async fn suspend_all(&self) -> Result<()> {
        self.bulk_actions.lock().unwrap().push(Action::Suspend);
        Ok(())
    }

    async fn resume_all(&self) -> Result<()> {
        self.bulk_actions.lock().unwrap().push(Action::Resume);
        Ok(())
    }

    async fn kill_all(&self) -> Result<()> {
        self.bulk_actions.lock().unwrap().push(Action::Kill);
        Ok(())
    }
}

#[async_trait]
impl ClientDirectory for MemoryDirectory {
    async fn has_client(&self, name: &str) -> Result<bool> {
        Ok(self.clients.contains(name))
    }
}
