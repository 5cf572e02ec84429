//! PostHog client
//!
//! Binds resolved credentials, the event catalog and a transport. Every
//! query starts from [`PostHogClient::query`].

use super::transport::{HttpTransport, Transport};
use crate::catalog::EventCatalog;
use crate::config::{ConfigError, Credentials, PostHogConfig};
use crate::query::{QueryExecutor, TrendQuery};
use std::sync::Arc;

/// Entry point for building trends queries against one PostHog project
#[derive(Clone)]
pub struct PostHogClient {
    credentials: Credentials,
    catalog: Arc<EventCatalog>,
    executor: Arc<QueryExecutor>,
}

impl PostHogClient {
    /// Create a client, resolving missing credentials from the environment
    ///
    /// Fails if the API key or project id cannot be resolved from any source.
    pub fn new(config: &PostHogConfig, catalog: EventCatalog) -> Result<Self, ConfigError> {
        let credentials = config.resolve()?;
        let transport = HttpTransport::new()?;
        Ok(Self::with_transport(credentials, catalog, Arc::new(transport)))
    }

    /// Create a client over an arbitrary transport
    pub fn with_transport(
        credentials: Credentials,
        catalog: EventCatalog,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let executor = Arc::new(QueryExecutor::new(
            transport,
            credentials.api_key.clone(),
            credentials.base_url.clone(),
        ));
        tracing::debug!(
            project_id = %credentials.project_id,
            base_url = %executor.base_url(),
            events = catalog.len(),
            "PostHog client ready"
        );

        Self {
            credentials,
            catalog: Arc::new(catalog),
            executor,
        }
    }

    /// Start an empty query
    pub fn query(&self) -> TrendQuery {
        TrendQuery::new(self.executor.clone(), self.catalog.clone())
    }

    pub fn catalog(&self) -> &EventCatalog {
        &self.catalog
    }

    pub fn project_id(&self) -> &str {
        &self.credentials.project_id
    }

    pub fn base_url(&self) -> &str {
        self.executor.base_url()
    }
}

impl std::fmt::Debug for PostHogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostHogClient")
            .field("project_id", &self.credentials.project_id)
            .field("base_url", &self.credentials.base_url)
            .field("events", &self.catalog.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EventDescriptor;
    use crate::chart::ChartData;
    use crate::posthog::mock::MockTransport;
    use crate::query::{ChartType, ExecuteOptions, Sampling, SeriesSpec};

    fn credentials() -> Credentials {
        PostHogConfig::new("phx_test", "5")
            .resolve_with(|_| None)
            .unwrap()
    }

    #[test]
    fn test_new_with_explicit_credentials() {
        let client = PostHogClient::new(
            &PostHogConfig::new("phx_test", "5").url("https://eu.posthog.com/api/projects/5/"),
            EventCatalog::default(),
        )
        .unwrap();
        assert_eq!(client.project_id(), "5");
        assert_eq!(client.base_url(), "https://eu.posthog.com/api/projects/5");
    }

    #[test]
    fn test_debug_hides_api_key() {
        let client = PostHogClient::with_transport(
            credentials(),
            EventCatalog::default(),
            Arc::new(MockTransport::ok("{}")),
        );
        assert!(!format!("{:?}", client).contains("phx_test"));
    }

    #[tokio::test]
    async fn test_query_round_trip() {
        let transport = Arc::new(MockTransport::ok(
            r#"{"type":"Trends","result":[{"label":"$pageview","action":{"id":"$pageview"},"aggregated_value":42}]}"#,
        ));
        let client = PostHogClient::with_transport(
            credentials(),
            EventCatalog::new([EventDescriptor::new("$pageview")]),
            transport.clone(),
        );

        let pageview = client.catalog().event("$pageview").unwrap();
        let chart = client
            .query()
            .add_series(&pageview, SeriesSpec::new(Sampling::Total))
            .execute(ExecuteOptions::new(ChartType::BarTotal))
            .await
            .unwrap();

        match chart {
            ChartData::BarTotal(bars) => {
                assert_eq!(bars.data[0].name, "$pageview");
                assert_eq!(bars.data[0].value, 42.0);
            }
            other => panic!("expected bar-total chart, got {:?}", other),
        }

        let (url, key) = &transport.requests()[0];
        assert_eq!(key, "phx_test");
        assert!(url.starts_with("https://app.posthog.com/api/projects/5/insights/trend/?"));
    }
}
