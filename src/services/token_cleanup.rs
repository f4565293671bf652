use tokio_cron_scheduler::{Job, JobScheduler};

use crate::error::{Error, Result};
use crate::services::auth_service::AuthService;

/// Every hour, on the hour.
const CLEANUP_SCHEDULE: &str = "0 0 * * * *";

/// Starts the scheduler that prunes expired auth tokens. The returned
/// scheduler must be kept alive for the job to keep running.
pub async fn start_token_cleanup(auth_service: AuthService) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await.map_err(scheduler_error)?;

    let job = Job::new_async(CLEANUP_SCHEDULE, move |_id, _scheduler| {
        let auth_service = auth_service.clone();
        Box::pin(async move {
            match auth_service.prune_expired_tokens().await {
                Ok(0) => {}
                Ok(removed) => tracing::info!(removed, "pruned expired auth tokens"),
                Err(e) => tracing::error!(error = ?e, "auth token cleanup failed"),
            }
        })
    })
    .map_err(scheduler_error)?;

    scheduler.add(job).await.map_err(scheduler_error)?;
    scheduler.start().await.map_err(scheduler_error)?;
    Ok(scheduler)
}

fn scheduler_error(err: tokio_cron_scheduler::JobSchedulerError) -> Error {
    Error::Internal(format!("Scheduler error: {:?}", err))
}
