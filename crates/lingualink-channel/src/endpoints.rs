//! Ordered cyclic list of backend endpoints.

use url::Url;

use crate::error::ChannelError;

#[derive(Debug, Clone)]
pub struct EndpointRing {
    endpoints: Vec<Url>,
    index: usize,
}

impl EndpointRing {
    /// Parse and validate `ws`/`wss` endpoints. The ring starts at index 0.
    pub fn new<S: AsRef<str>>(endpoints: &[S]) -> Result<Self, ChannelError> {
        if endpoints.is_empty() {
            return Err(ChannelError::NoEndpoints);
        }
        let endpoints = endpoints
            .iter()
            .map(|e| parse_endpoint(e.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            endpoints,
            index: 0,
        })
    }

    pub fn current(&self) -> &Url {
        &self.endpoints[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Move to the next endpoint, wrapping around. Returns the new index.
    pub fn advance(&mut self) -> usize {
        self.index = (self.index + 1) % self.endpoints.len();
        self.index
    }
}

/// Validate a single backend endpoint URL.
pub fn parse_endpoint(endpoint: &str) -> Result<Url, ChannelError> {
    let url = Url::parse(endpoint).map_err(|e| ChannelError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "ws" | "wss" => Ok(url),
        other => Err(ChannelError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: format!("unsupported scheme '{other}', expected ws or wss"),
        }),
    }
}
