//! In-memory fakes shared by the crate's tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use namecard_core::error::{NamecardError, Result};
use namecard_core::traits::{ChainClient, ContentFetcher};
use namecard_core::types::{ResolverHandle, ViewFunction};

/// Scripted chain client that records every call it receives.
#[derive(Default)]
pub struct MockChain {
    pub domain: Option<String>,
    pub domain_error: bool,
    pub resolver: Option<ResolverHandle>,
    pub resolver_error: bool,
    /// key -> Ok(value) or Err(message)
    pub texts: HashMap<String, std::result::Result<Option<String>, String>>,
    /// "contract/function/arg" -> Ok(uri) or Err(message)
    pub views: HashMap<String, std::result::Result<Option<String>, String>>,
    /// key -> time `get_text` waits before answering
    pub delays: HashMap<String, Duration>,
    pub calls: Mutex<Vec<String>>,
}

impl MockChain {
    pub fn with_domain(domain: &str) -> Self {
        Self {
            domain: Some(domain.to_string()),
            resolver: Some(ResolverHandle {
                address: "0x231b0Ee14048e9dCcD1d247744d114a4EB5E8E63".into(),
                domain: domain.to_string(),
                node: format!("0x{}", "11".repeat(32)),
            }),
            ..Default::default()
        }
    }

    pub fn text(mut self, key: &str, value: Option<&str>) -> Self {
        self.texts.insert(key.to_string(), Ok(value.map(str::to_string)));
        self
    }

    pub fn slow_text(mut self, key: &str, value: Option<&str>, delay: Duration) -> Self {
        self.delays.insert(key.to_string(), delay);
        self.text(key, value)
    }

    pub fn failing_text(mut self, key: &str) -> Self {
        self.texts.insert(key.to_string(), Err("execution reverted".into()));
        self
    }

    pub fn view(mut self, contract: &str, function: &str, arg: &str, value: Option<&str>) -> Self {
        self.views.insert(
            format!("{}/{}/{}", contract, function, arg),
            Ok(value.map(str::to_string)),
        );
        self
    }

    pub fn failing_view(mut self, contract: &str, function: &str, arg: &str) -> Self {
        self.views.insert(
            format!("{}/{}/{}", contract, function, arg),
            Err("call exception".into()),
        );
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn lookup_domain(&self, address: &str) -> Result<Option<String>> {
        self.record(format!("lookup_domain:{}", address));
        if self.domain_error {
            return Err(NamecardError::ChainQuery("connection refused".into()));
        }
        Ok(self.domain.clone())
    }

    async fn get_resolver(&self, domain: &str) -> Result<Option<ResolverHandle>> {
        self.record(format!("get_resolver:{}", domain));
        if self.resolver_error {
            return Err(NamecardError::ChainQuery("connection reset".into()));
        }
        Ok(self.resolver.clone())
    }

    async fn get_text(&self, _resolver: &ResolverHandle, key: &str) -> Result<Option<String>> {
        self.record(format!("get_text:{}", key));
        if let Some(delay) = self.delays.get(key) {
            tokio::time::sleep(*delay).await;
        }
        match self.texts.get(key) {
            Some(Ok(value)) => Ok(value.clone()),
            Some(Err(msg)) => Err(NamecardError::ChainQuery(msg.clone())),
            None => Ok(None),
        }
    }

    async fn call_view_function(
        &self,
        contract: &str,
        function: &ViewFunction,
        args: &[String],
    ) -> Result<Option<String>> {
        let key = format!("{}/{}/{}", contract, function.name, args.join(","));
        self.record(format!("call:{}", key));
        match self.views.get(&key) {
            Some(Ok(value)) => Ok(value.clone()),
            Some(Err(msg)) => Err(NamecardError::ContractCall {
                contract: contract.to_string(),
                function: function.name.to_string(),
                reason: msg.clone(),
            }),
            None => Ok(None),
        }
    }
}

/// Fetcher serving canned bodies by URL and recording requests.
#[derive(Default)]
pub struct MockFetcher {
    pub bodies: HashMap<String, Vec<u8>>,
    pub requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn body(mut self, url: &str, body: &str) -> Self {
        self.bodies.insert(url.to_string(), body.as_bytes().to_vec());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.requests.lock().unwrap().push(url.to_string());
        self.bodies.get(url).cloned().ok_or_else(|| NamecardError::Fetch {
            url: url.to_string(),
            reason: "HTTP 404 Not Found".into(),
        })
    }
}
