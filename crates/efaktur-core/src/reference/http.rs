use std::time::Duration;

use tracing::{debug, info};

use crate::error::ReferenceError;
use crate::invoice::rules::RuleContext;
use crate::models::config::ReferenceConfig;

use super::{parse_reference_document, ReferenceDocument, ReferenceResolver};

/// Resolves lookup URLs over HTTP.
#[derive(Debug, Clone)]
pub struct HttpReferenceResolver {
    client: reqwest::Client,
    context: RuleContext,
}

impl HttpReferenceResolver {
    /// Build a resolver with the configured user agent and timeout.
    pub fn new(config: &ReferenceConfig) -> Result<Self, ReferenceError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            context: RuleContext::default(),
        })
    }

    /// Set how many trailing digits of `nomorFaktur` form the invoice number.
    pub fn with_invoice_number_digits(mut self, digits: usize) -> Self {
        self.context.invoice_number_digits = digits;
        self
    }
}

impl ReferenceResolver for HttpReferenceResolver {
    async fn resolve(&self, url: &str) -> Result<ReferenceDocument, ReferenceError> {
        info!("Fetching reference record from {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ReferenceError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        debug!("Reference response: {} bytes", body.len());

        parse_reference_document(&body, &self.context)
    }
}
