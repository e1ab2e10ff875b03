use std::collections::HashMap;

use models::CloudWatchParams;

use crate::clients::{CloudWatchClient, CloudWatchRequest};
use crate::error::AutoscaleError;

/// Requests the configured statistics for the window
/// `[now - period_seconds, now]`; fails with [`AutoscaleError::MetricsUnavailable`]
/// if no datapoint is returned. Reads the first datapoint and maps each
/// requested statistic's CloudWatch name to its configured alias.
pub async fn fetch_cloudwatch(
    client: &dyn CloudWatchClient,
    params: &CloudWatchParams,
) -> Result<HashMap<String, Option<f64>>, AutoscaleError> {
    let req = CloudWatchRequest {
        namespace: params.namespace.clone(),
        metric_name: params.metric_name.clone(),
        dimensions: params.dimensions.clone(),
        period_seconds: params.period_seconds,
        statistics: params.statistics.iter().map(|s| s.name.clone()).collect(),
    };

    let datapoints = client.get_metric_statistics(req).await?;

    let datapoint = datapoints.first().ok_or_else(|| AutoscaleError::MetricsUnavailable {
        namespace: params.namespace.clone(),
        metric_name: params.metric_name.clone(),
        dimensions: params.dimensions.clone(),
        period_seconds: params.period_seconds,
        statistics: params.statistics.iter().map(|s| s.name.clone()).collect(),
    })?;

    Ok(params
        .statistics
        .iter()
        .map(|stat| (stat.alias.clone(), datapoint.values.get(&stat.name).copied()))
        .collect())
}
