use models::Dimension;

/// All failure modes the control loop can hit, grouped by how far they
/// propagate: a `ConfigError` aborts the run before any cluster is
/// touched; `ClusterUnknown`/`NodeGroupUnknown` abort one cluster;
/// everything else demotes a single service to non-actionable for the
/// run and is logged, never retried (the next scheduled invocation
/// retries implicitly).
#[derive(Debug, thiserror::Error)]
pub enum AutoscaleError {
    #[error("cluster {0} not found among listed clusters")]
    ClusterUnknown(String),

    #[error("autoscaling group {0} not found")]
    NodeGroupUnknown(String),

    #[error("could not find {0} on container instance")]
    MissingResource(&'static str),

    #[error(
        "no datapoints found for CloudWatch metric:\n\
         => Namespace:  {namespace}\n\
         => MetricName: {metric_name}\n\
         => Dimensions: {dimensions:?}\n\
         => Period:     {period_seconds}\n\
         => Statistics: {statistics:?}"
    )]
    MetricsUnavailable {
        namespace: String,
        metric_name: String,
        dimensions: Vec<Dimension>,
        period_seconds: i64,
        statistics: Vec<String>,
    },

    #[error("upstream metrics request to {url} failed with status {status}")]
    UpstreamHttp { status: u16, url: String },

    #[error("failed to evaluate expression `{expr}`: {reason}")]
    Expression { expr: String, reason: String },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("cloud API call failed: {0}")]
    Cloud(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {0} referenced in configuration is not set")]
    MissingEnvVar(String),

    #[error("failed to parse {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{file}: {reason}")]
    Invalid { file: String, reason: String },

    #[error("failed to read configuration directory {dir}: {source}")]
    Io {
        dir: String,
        #[source]
        source: std::io::Error,
    },
}
