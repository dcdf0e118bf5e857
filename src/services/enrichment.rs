use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::{models::MovieInfo, services::providers::MetadataProvider};

/// Most lookups in flight at once for a single batch
pub const MAX_CONCURRENT_LOOKUPS: usize = 8;

/// Fetches metadata for each title in parallel, preserving input order.
///
/// At most [`MAX_CONCURRENT_LOOKUPS`] requests run at the same time.
///
/// A failed or empty lookup yields `None` for that title only; errors are logged
/// and never returned to the caller.
pub async fn enrich_titles(
    provider: Arc<dyn MetadataProvider>,
    titles: &[String],
) -> Vec<Option<MovieInfo>> {
    let permits = Arc::new(Semaphore::new(MAX_CONCURRENT_LOOKUPS));
    let mut tasks = Vec::with_capacity(titles.len());

    for title in titles {
        let provider = provider.clone();
        let permits = permits.clone();
        let title = title.clone();
        let task = tokio::spawn(async move {
            // The semaphore is never closed
            let _permit = permits.acquire_owned().await.ok();
            provider.fetch_movie_info(&title).await
        });
        tasks.push(task);
    }

    let mut results = Vec::with_capacity(tasks.len());
    let mut error_count = 0;

    for (title, task) in titles.iter().zip(tasks) {
        match task.await {
            Ok(Ok(info)) => results.push(info),
            Ok(Err(e)) => {
                tracing::error!(
                    title = %title,
                    provider = provider.name(),
                    error = %e,
                    "Metadata fetch failed for title"
                );
                error_count += 1;
                results.push(None);
            }
            Err(e) => {
                tracing::error!(title = %title, error = %e, "Task join error");
                error_count += 1;
                results.push(None);
            }
        }
    }

    if error_count > 0 {
        tracing::warn!(
            success_count = titles.len() - error_count,
            error_count,
            "Partial metadata fetch failure"
        );
    }

    results
}

/// Like [`enrich_titles`], but tolerates a missing provider by returning all `None`
pub async fn enrich_titles_with(
    provider: Option<Arc<dyn MetadataProvider>>,
    titles: &[String],
) -> Vec<Option<MovieInfo>> {
    match provider {
        Some(provider) => enrich_titles(provider, titles).await,
        None => vec![None; titles.len()],
    }
}
