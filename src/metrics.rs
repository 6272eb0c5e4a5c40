use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Default)]
pub struct Metrics {
    pub requests_total: AtomicU64,
    pub requests_succeeded: AtomicU64,
    pub rate_limits_hit: AtomicU64,
    pub http_errors: AtomicU64,
    pub graphql_errors: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_requests(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_succeeded(&self) {
        self.requests_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_rate_limits(&self) {
        self.rate_limits_hit.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_http_errors(&self) {
        self.http_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_graphql_errors(&self) {
        self.graphql_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn format_prometheus(&self) -> String {
        format!(
            "# HELP monday_requests_total GraphQL requests sent\n\
             # TYPE monday_requests_total counter\n\
             monday_requests_total {}\n\
             # HELP monday_requests_succeeded GraphQL requests that returned data\n\
             # TYPE monday_requests_succeeded counter\n\
             monday_requests_succeeded {}\n\
             # HELP monday_rate_limits_hit Requests refused by the client-side rate limiter\n\
             # TYPE monday_rate_limits_hit counter\n\
             monday_rate_limits_hit {}\n\
             # HELP monday_http_errors Transport failures and non-success HTTP statuses\n\
             # TYPE monday_http_errors counter\n\
             monday_http_errors {}\n\
             # HELP monday_graphql_errors Responses carrying a GraphQL errors array\n\
             # TYPE monday_graphql_errors counter\n\
             monday_graphql_errors {}\n",
            self.requests_total.load(Ordering::Relaxed),
            self.requests_succeeded.load(Ordering::Relaxed),
            self.rate_limits_hit.load(Ordering::Relaxed),
            self.http_errors.load(Ordering::Relaxed),
            self.graphql_errors.load(Ordering::Relaxed),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prometheus_format() {
        let metrics = Metrics::new();
        metrics.inc_requests();
        metrics.inc_requests();
        metrics.inc_succeeded();
        metrics.inc_rate_limits();

        let text = metrics.format_prometheus();
        assert!(text.contains("monday_requests_total 2\n"));
        assert!(text.contains("monday_requests_succeeded 1\n"));
        assert!(text.contains("monday_rate_limits_hit 1\n"));
        assert!(text.contains("monday_graphql_errors 0\n"));
    }
}
