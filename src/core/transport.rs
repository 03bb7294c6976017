use crate::config::ClientConfig;
use crate::core::request::{RawResponse, API_KEY_HEADER};
use crate::utils::error::Result;
use reqwest::Client;
use url::Url;

pub fn http_client(config: &ClientConfig) -> Result<Client> {
    Ok(Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout())
        .build()?)
}

/// GET `url`, reading the whole body so the outcome can be interpreted
/// without touching the network again.
pub async fn get(
    client: &Client,
    url: &Url,
    api_key: Option<&str>,
) -> std::result::Result<RawResponse, reqwest::Error> {
    let mut request = client.get(url.clone());
    if let Some(key) = api_key {
        request = request.header(API_KEY_HEADER, key);
    }

    let response = request.send().await?;
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.text().await?;
    Ok(RawResponse {
        status,
        headers,
        body,
    })
}

#[cfg(feature = "blocking")]
pub mod blocking {
    use super::*;
    use reqwest::blocking::Client;

    pub fn http_client(config: &ClientConfig) -> Result<Client> {
        Ok(Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()?)
    }

    pub fn get(
        client: &Client,
        url: &Url,
        api_key: Option<&str>,
    ) -> std::result::Result<RawResponse, reqwest::Error> {
        let mut request = client.get(url.clone());
        if let Some(key) = api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send()?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text()?;
        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}
