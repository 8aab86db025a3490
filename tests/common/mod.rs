//! Shared fixtures for integration tests
//!
//! Every test gets its own SQLite file in a fresh temp dir.

#![allow(dead_code, unused_macros)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use linkping::config::{DatabaseConfig, StaticConfig};
use linkping::errors::Result;
use linkping::services::{
    GeoIpLookup, GeoIpProvider, LinkService, PingService, ProbeOutcome, ReachabilityProbe,
};
use linkping::storage::{GeoLocation, SeaOrmStorage, StorageFactory};

pub const TEST_ADMIN_TOKEN: &str = "test-admin-token";

pub const LINUX_PING_REPLY: &str = "PING example.com (93.184.216.34) 56(84) bytes of data.\n\
64 bytes from 93.184.216.34: icmp_seq=1 ttl=56 time=11.4 ms\n\
\n\
--- example.com ping statistics ---\n\
1 packets transmitted, 1 received, 0% packet loss, time 0ms\n";

/// Geo lookup answering from a fixed table
#[derive(Default)]
pub struct StubGeoLookup {
    table: HashMap<String, GeoLocation>,
}

impl StubGeoLookup {
    pub fn with(mut self, ip: &str, city: &str, region: &str, country: &str) -> Self {
        self.table.insert(
            ip.to_string(),
            GeoLocation {
                city: Some(city.to_string()),
                region: Some(region.to_string()),
                country: Some(country.to_string()),
            },
        );
        self
    }

    pub fn into_provider(self) -> GeoIpProvider {
        GeoIpProvider::from_lookup(Arc::new(self))
    }
}

#[async_trait]
impl GeoIpLookup for StubGeoLookup {
    async fn lookup(&self, ip: &str) -> Option<GeoLocation> {
        self.table.get(ip).cloned()
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

/// Probe returning a canned outcome and remembering which hosts it saw
pub struct StubProbe {
    outcome: Result<ProbeOutcome>,
    pub hosts: Mutex<Vec<String>>,
}

impl StubProbe {
    pub fn reachable() -> Self {
        Self::returning(Ok(ProbeOutcome {
            success: true,
            output: LINUX_PING_REPLY.to_string(),
        }))
    }

    pub fn unreachable() -> Self {
        Self::returning(Ok(ProbeOutcome {
            success: false,
            output: "1 packets transmitted, 0 received, 100% packet loss, time 0ms\n".to_string(),
        }))
    }

    pub fn returning(outcome: Result<ProbeOutcome>) -> Self {
        Self {
            outcome,
            hosts: Mutex::new(Vec::new()),
        }
    }

    pub fn seen_hosts(&self) -> Vec<String> {
        self.hosts.lock().map(|h| h.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ReachabilityProbe for StubProbe {
    async fn probe(&self, host: &str, _timeout: Duration) -> Result<ProbeOutcome> {
        if let Ok(mut hosts) = self.hosts.lock() {
            hosts.push(host.to_string());
        }
        self.outcome.clone()
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

pub struct TestOptions {
    pub admin_token: String,
    pub public_base_url: Option<String>,
    pub geo: GeoIpProvider,
    pub probe: Arc<StubProbe>,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            admin_token: TEST_ADMIN_TOKEN.to_string(),
            public_base_url: None,
            geo: GeoIpProvider::disabled(),
            probe: Arc::new(StubProbe::reachable()),
        }
    }
}

pub struct TestContext {
    pub storage: Arc<SeaOrmStorage>,
    pub links: Arc<LinkService>,
    pub ping: Arc<PingService>,
    pub probe: Arc<StubProbe>,
    pub config: Arc<StaticConfig>,
    _dir: TempDir,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_options(TestOptions::default()).await
    }

    pub async fn with_options(options: TestOptions) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = dir.path().join("linkping_test.db");

        let mut config = StaticConfig::default();
        config.database = DatabaseConfig {
            database_url: format!("sqlite://{}?mode=rwc", db_path.display()),
            ..Default::default()
        };
        config.admin.token = options.admin_token;
        config.server.public_base_url = options.public_base_url;

        let storage = StorageFactory::create(&config.database)
            .await
            .expect("Failed to create storage");
        let links = Arc::new(LinkService::new(storage.clone(), options.geo));
        let ping = Arc::new(PingService::new(options.probe.clone()));

        Self {
            storage,
            links,
            ping,
            probe: options.probe,
            config: Arc::new(config),
            _dir: dir,
        }
    }
}

/// Build the full application the way the server does, minus CORS and logging
macro_rules! linkping_app {
    ($ctx:expr) => {{
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($ctx.links.clone()))
                .app_data(actix_web::web::Data::new($ctx.ping.clone()))
                .app_data(actix_web::web::Data::new($ctx.config.clone()))
                .configure(linkping::api::configure),
        )
        .await
    }};
}
