use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, ACCEPT, USER_AGENT},
    Client, ClientBuilder,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogClient {
    async fn fetch_product_info(&self) -> Result<String>;
}

pub struct CatalogClientImpl {
    client: Client,
    source_url: String,
}

impl CatalogClientImpl {
    pub fn new(source_url: impl Into<String>) -> Result<Self> {
        let user_agent = format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, "application/json".try_into()?);
        headers.insert(USER_AGENT, user_agent.try_into()?);

        let client = ClientBuilder::new().default_headers(headers).build()?;
        Ok(Self {
            client,
            source_url: source_url.into(),
        })
    }
}

#[async_trait]
impl CatalogClient for CatalogClientImpl {
    async fn fetch_product_info(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.source_url)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            return Err(anyhow!("Server returned status {}", response.status()));
        }

        response
            .text()
            .await
            .context("Failed to read the response body")
    }
}
