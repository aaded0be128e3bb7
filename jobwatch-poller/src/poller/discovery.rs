//! Discovering jobs through the job directory

use std::sync::Arc;

use jobwatch_core::domain::job::{JobId, JobSummary};
use tokio::time::sleep;
use tracing::{error, info};

use crate::error::{PollError, Result};
use crate::poller::{JobPoller, deadline_after, is_past};
use crate::poller::request::{ActiveJobWait, FilteredJobs, FilteredJobsRequest, PollRequest};
use crate::repository::{JobDirectory, JobResource};

impl JobPoller {
    /// Lists a client's jobs and waits for the ones currently in `current_states`
    ///
    /// In discovery mode (no expected states) the listing is returned at once.
    /// Otherwise the listing is retried until some job is in one of the current
    /// states, then each such job is waited on in turn.
    ///
    /// The returned flag is the outcome of the last job waited on, not of all of them.
    pub async fn get_filtered_jobs(
        &self,
        request: &FilteredJobsRequest,
    ) -> Result<(bool, FilteredJobs)> {
        let directory = self.require_directory()?;

        info!(
            "Getting [{}] jobs for client [{}] within the last [{}] hours, state {}, backup level [{}], options {:?}",
            request.job_type_filter,
            request.client,
            request.lookup_window_hours,
            request.current_states,
            request.backup_level.as_deref().unwrap_or("any"),
            request.options
        );

        let mut jobs = list_jobs(directory.as_ref(), request).await?;
        info!("Jobs fetched: {:?}", jobs);

        let Some(expected) = &request.expected_states else {
            return Ok((true, FilteredJobs::Listing(jobs)));
        };

        let deadline = deadline_after(request.time_limit);
        loop {
            if !jobs.is_empty() {
                let matched: Vec<JobId> = jobs
                    .iter()
                    .filter(|job| request.current_states.contains(&job.status))
                    .inspect(|job| info!("Job matching filtering criterion: {:?}", job))
                    .map(|job| job.id.clone())
                    .collect();

                if matched.is_empty() {
                    jobs.clear();
                    continue;
                }

                let wait = PollRequest::new(expected.clone())
                    .retry_interval(request.retry_interval)
                    .time_limit(request.time_limit)
                    .hardcheck(request.hardcheck);

                let mut reached = false;
                for job_id in &matched {
                    reached = self.for_job(job_id).await?.wait_for_state(&wait).await?;
                }

                return Ok((reached, FilteredJobs::Matched(matched)));
            }

            jobs = list_jobs(directory.as_ref(), request).await?;

            if is_past(deadline) {
                error!("Timed out waiting to get valid jobs which meet the filtered criterion");
                if request.hardcheck {
                    return Err(PollError::Timeout {
                        subject: format!("jobs of client [{}]", request.client),
                        target: format!("state {}", request.current_states),
                        observed: format!("{} listed job(s)", jobs.len()),
                    });
                }
                return Ok((false, FilteredJobs::Listing(jobs)));
            }

            info!("Waiting for [{:?}]", request.retry_interval);
            sleep(request.retry_interval).await;
        }
    }

    /// Waits for the client's first active job and returns a handle on it
    pub async fn get_active_job_object(
        &self,
        request: &ActiveJobWait,
    ) -> Result<Arc<dyn JobResource>> {
        let directory = self.require_directory()?;
        let deadline = deadline_after(request.time_limit);

        loop {
            let active = directory
                .active_jobs(&request.client, &request.job_type_filter)
                .await?;

            if let Some(first) = active.first() {
                info!(
                    "First active job for client [{}]: [{}]",
                    request.client, first.id
                );
                return Ok(directory.get(&first.id).await?);
            }

            if is_past(deadline) {
                return Err(PollError::Timeout {
                    subject: format!("client [{}]", request.client),
                    target: "an active job".to_string(),
                    observed: "no active jobs".to_string(),
                });
            }

            info!("Waiting for [{:?}]", request.retry_interval);
            sleep(request.retry_interval).await;
        }
    }
}

/// Lists jobs for the request and applies the backup level filter
async fn list_jobs(
    directory: &dyn JobDirectory,
    request: &FilteredJobsRequest,
) -> Result<Vec<JobSummary>> {
    let mut jobs = directory.all_jobs(&request.list_query()).await?;

    if let Some(level) = &request.backup_level {
        jobs.retain(|job| job.has_backup_level(level));
    }

    Ok(jobs)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use jobwatch_core::domain::job::{JobStatus, StateSet};
    use jobwatch_core::dto::job::{JobListQuery, ListingOptions};

    use super::*;
    use crate::testing::{MemoryDirectory, ScriptedJob};

    fn poller(directory: &Arc<MemoryDirectory>) -> JobPoller {
        JobPoller::detached().with_directory(directory.clone())
    }

    #[tokio::test]
    async fn test_discovery_mode_returns_listing() {
        let directory = Arc::new(MemoryDirectory::new().with_listing(vec![
            JobSummary::new("1", "completed").with_backup_level("Full"),
            JobSummary::new("2", "running").with_backup_level("Incremental"),
        ]));

        let (ok, jobs) = poller(&directory)
            .get_filtered_jobs(
                &FilteredJobsRequest::new("fs-client-01")
                    .discover_only()
                    .backup_level("full"),
            )
            .await
            .unwrap();

        assert!(ok);
        match jobs {
            FilteredJobs::Listing(jobs) => {
                assert_eq!(jobs.len(), 1);
                assert_eq!(jobs[0].id, JobId::from("1"));
            }
            other => panic!("expected listing, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_on_matching_jobs() {
        let first = Arc::new(ScriptedJob::new("1", &["running", "completed"]));
        let second = Arc::new(ScriptedJob::new("2", &["completed"]));
        let directory = Arc::new(
            MemoryDirectory::new()
                .with_job(first.clone())
                .with_job(second.clone())
                .with_listing(vec![
                    JobSummary::new("1", "running"),
                    JobSummary::new("2", "Waiting"),
                    JobSummary::new("3", "completed"),
                ]),
        );

        let (ok, jobs) = poller(&directory)
            .get_filtered_jobs(&FilteredJobsRequest::new("fs-client-01"))
            .await
            .unwrap();

        assert!(ok);
        match jobs {
            FilteredJobs::Matched(ids) => {
                assert_eq!(ids, vec![JobId::from("1"), JobId::from("2")]);
            }
            other => panic!("expected matched ids, got {:?}", other),
        }
        assert_eq!(first.fetch_count(), 2);
        assert_eq!(second.fetch_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_waited_job_decides_outcome() {
        let failed = Arc::new(ScriptedJob::new("1", &["failed"]));
        let completed = Arc::new(ScriptedJob::new("2", &["completed"]));
        let directory = Arc::new(
            MemoryDirectory::new()
                .with_job(failed)
                .with_job(completed)
                .with_listing(vec![
                    JobSummary::new("1", "running"),
                    JobSummary::new("2", "running"),
                ]),
        );

        let (ok, _) = poller(&directory)
            .get_filtered_jobs(&FilteredJobsRequest::new("fs-client-01").hardcheck(false))
            .await
            .unwrap();

        assert!(ok);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_listing_is_discarded_and_requeried() {
        let job = Arc::new(ScriptedJob::new("5", &["completed"]));
        let directory = Arc::new(
            MemoryDirectory::new()
                .with_job(job)
                .with_listing(vec![JobSummary::new("4", "completed")])
                .with_listing(vec![])
                .with_listing(vec![JobSummary::new("5", "running")]),
        );

        let (ok, jobs) = poller(&directory)
            .get_filtered_jobs(
                &FilteredJobsRequest::new("fs-client-01")
                    .retry_interval(Duration::from_secs(10)),
            )
            .await
            .unwrap();

        assert!(ok);
        assert!(matches!(jobs, FilteredJobs::Matched(ids) if ids == vec![JobId::from("5")]));
        assert_eq!(directory.listings(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_matching_jobs_soft_timeout() {
        let directory = Arc::new(MemoryDirectory::new().with_listing(vec![]));

        let (ok, jobs) = poller(&directory)
            .get_filtered_jobs(
                &FilteredJobsRequest::new("fs-client-01")
                    .expected_states(StateSet::from(JobStatus::Completed))
                    .time_limit(Duration::from_secs(30))
                    .retry_interval(Duration::from_secs(10))
                    .hardcheck(false),
            )
            .await
            .unwrap();

        assert!(!ok);
        assert!(jobs.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_matching_jobs_hard_timeout() {
        let directory = Arc::new(MemoryDirectory::new().with_listing(vec![]));

        let err = poller(&directory)
            .get_filtered_jobs(
                &FilteredJobsRequest::new("fs-client-01").time_limit(Duration::from_secs(30)),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, PollError::Timeout { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_active_job_object_waits_for_listing() {
        let job = Arc::new(ScriptedJob::new("77", &["running"]));
        let directory = Arc::new(
            MemoryDirectory::new()
                .with_job(job)
                .with_active_listing(vec![])
                .with_active_listing(vec![
                    JobSummary::new("77", "running"),
                    JobSummary::new("78", "running"),
                ]),
        );

        let found = poller(&directory)
            .get_active_job_object(&ActiveJobWait::new("fs-client-01"))
            .await
            .unwrap();

        assert_eq!(found.id(), &JobId::from("77"));
        assert_eq!(
            directory.active_queries(),
            vec![("fs-client-01".to_string(), "Backup".to_string()); 2]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_active_job_object_without_deadline() {
        let job = Arc::new(ScriptedJob::new("80", &["running"]));
        let directory = Arc::new(
            MemoryDirectory::new()
                .with_job(job)
                .with_active_listing(vec![])
                .with_active_listing(vec![JobSummary::new("80", "running")]),
        );

        let found = poller(&directory)
            .get_active_job_object(&ActiveJobWait::new("fs-client-01").time_limit(Duration::MAX))
            .await
            .unwrap();

        assert_eq!(found.id(), &JobId::from("80"));
    }

    #[tokio::test]
    async fn test_listing_query_forwards_filters() {
        let directory = Arc::new(MemoryDirectory::new().with_listing(vec![]));
        let options = ListingOptions {
            limit: 50,
            show_aged_jobs: true,
            clients: vec!["fs-client-02".to_string()],
            job_types: vec!["Restore".to_string()],
        };

        poller(&directory)
            .get_filtered_jobs(
                &FilteredJobsRequest::new("fs-client-01")
                    .discover_only()
                    .lookup_window_hours(24)
                    .job_type_filter("Backup,Restore")
                    .options(options.clone()),
            )
            .await
            .unwrap();

        assert_eq!(
            directory.list_queries(),
            vec![JobListQuery {
                client: "fs-client-01".to_string(),
                lookup_window_hours: 24,
                job_type_filter: "Backup,Restore".to_string(),
                options,
            }]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_active_job_object_times_out() {
        let directory = Arc::new(MemoryDirectory::new().with_active_listing(vec![]));

        let err = poller(&directory)
            .get_active_job_object(
                &ActiveJobWait::new("fs-client-01").time_limit(Duration::from_secs(5)),
            )
            .await
            .err()
            .unwrap();

        assert!(matches!(err, PollError::Timeout { .. }));
    }
}
