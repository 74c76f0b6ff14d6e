use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, ACCEPT, USER_AGENT},
    Client, ClientBuilder,
};

use super::{TagPage, TagRecord};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistryClient {
    async fn get_tag_page(&self, image: &str, page: u32, page_size: u32)
        -> Result<Vec<TagRecord>>;
}

pub struct RegistryClientImpl {
    client: Client,
    api_base_url: String,
}

impl RegistryClientImpl {
    pub fn new(api_base_url: impl Into<String>) -> Result<Self> {
        let user_agent = format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, "application/json".try_into()?);
        headers.insert(USER_AGENT, user_agent.try_into()?);

        let client = ClientBuilder::new().default_headers(headers).build()?;
        Ok(Self {
            client,
            api_base_url: api_base_url.into(),
        })
    }
}

#[async_trait]
impl RegistryClient for RegistryClientImpl {
    async fn get_tag_page(
        &self,
        image: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<TagRecord>> {
        let response = self
            .client
            .get(format!(
                "{base}/{image}/tags?page_size={page_size}&page={page}",
                base = self.api_base_url,
            ))
            .send()
            .await
            .context("Failed to send request")?;

        if response.status().as_u16() == 404 {
            return Err(anyhow!("Image {} does not exist", image));
        } else if !response.status().is_success() {
            return Err(anyhow!("Server returned status {}", response.status()));
        }

        let tag_page: TagPage = response
            .json()
            .await
            .context("Failed to parse reply as json")?;

        Ok(tag_page.results)
    }
}
