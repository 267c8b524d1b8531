//! Etherscan source - verified contract ABIs from a block explorer.
//!
//! Uses the `module=contract&action=getabi` endpoint that Etherscan and its
//! per-network deployments share. The response looks like
//! `{"status": "1", "message": "OK", "result": "<ABI JSON>"}`.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;
use url::Url;

use crate::core::Abi;
use crate::resolver::errors::AddError;
use crate::sources::AbiSource;
use crate::util::config::ExplorerConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct GetAbiResponse {
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: String,
}

/// Client for Etherscan-compatible explorer APIs.
#[derive(Debug, Clone, Default)]
pub struct EtherscanSource {
    api_key: Option<String>,
    /// network -> API endpoint
    urls: BTreeMap<String, String>,
}

impl EtherscanSource {
    pub fn new(config: &ExplorerConfig) -> Self {
        EtherscanSource {
            api_key: config.api_key.clone(),
            urls: config.urls.clone(),
        }
    }

    /// API endpoint for a network.
    ///
    /// `mainnet` is served by `api.etherscan.io`, other networks by
    /// `api-<network>.etherscan.io`, unless configured otherwise.
    pub fn endpoint(&self, network: &str) -> String {
        match self.urls.get(network) {
            Some(url) => url.clone(),
            None if network == "mainnet" => "https://api.etherscan.io/api".to_string(),
            None => format!("https://api-{}.etherscan.io/api", network),
        }
    }

    /// Full `getabi` request URL.
    pub fn request_url(&self, network: &str, address: &str) -> Result<Url, AddError> {
        let endpoint = self.endpoint(network);
        let mut url = Url::parse(&endpoint).map_err(|e| AddError::ExternalFetch {
            network: network.to_string(),
            address: address.to_string(),
            message: format!("invalid explorer URL `{}`: {}", endpoint, e),
        })?;

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("module", "contract")
                .append_pair("action", "getabi")
                .append_pair("address", address);
            if let Some(ref key) = self.api_key {
                query.append_pair("apikey", key);
            }
        }

        Ok(url)
    }

    fn fetch(&self, network: &str, address: &str) -> Result<String, AddError> {
        let fetch_error = |message: String| AddError::ExternalFetch {
            network: network.to_string(),
            address: address.to_string(),
            message,
        };

        let url = self.request_url(network, address)?;
        tracing::debug!("GET {}", self.endpoint(network));

        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("graft/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| fetch_error(e.to_string()))?;

        let response = client
            .get(url)
            .send()
            .map_err(|e| fetch_error(e.to_string()))?;

        if !response.status().is_success() {
            return Err(fetch_error(format!("HTTP {}", response.status())));
        }

        let body = response.text().map_err(|e| fetch_error(e.to_string()))?;
        parse_response(&body).map_err(fetch_error)
    }
}

/// Extract the ABI JSON from a `getabi` response body.
fn parse_response(body: &str) -> Result<String, String> {
    let response: GetAbiResponse = serde_json::from_str(body)
        .map_err(|e| format!("unexpected explorer response: {}", e))?;

    if response.status == "1" {
        Ok(response.result)
    } else if response.result.is_empty() {
        Err(response.message)
    } else {
        Err(format!("{}: {}", response.message, response.result))
    }
}

impl AbiSource for EtherscanSource {
    fn name(&self) -> &str {
        "etherscan"
    }

    fn load_abi(&self, contract_name: &str, network: &str, address: &str) -> Result<Abi> {
        let json = self.fetch(network, address)?;
        let abi = Abi::parse(contract_name, &json).map_err(|e| AddError::ExternalFetch {
            network: network.to_string(),
            address: address.to_string(),
            message: format!("explorer returned an unusable ABI: {:#}", e),
        })?;
        tracing::info!(
            "fetched ABI of `{}` ({} events) from {}",
            contract_name,
            abi.events().len(),
            self.endpoint(network)
        );
        Ok(abi)
    }
}
