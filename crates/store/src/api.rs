use reqwest::StatusCode;
use serde::Deserialize;

/// Error body the remote API uses for every non-2xx response.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{status}: {message}")]
    Server { status: StatusCode, message: String },
}

/// Single configured HTTP transport shared by every data operation.
///
/// The cookie store is enabled so the identity provider's session cookie
/// rides on every request, auth and data alike. Clones share the underlying
/// connection pool and cookie jar.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) async fn get_json<TResp: for<'de> serde::Deserialize<'de>>(
        &self,
        path: &str,
    ) -> Result<TResp, ApiError> {
        let resp = self.client.get(self.url(path)).send().await?;
        decode(resp).await
    }

    pub(crate) async fn post_json<TReq: serde::Serialize + ?Sized, TResp>(
        &self,
        path: &str,
        body: &TReq,
    ) -> Result<TResp, ApiError>
    where
        TResp: for<'de> serde::Deserialize<'de>,
    {
        let resp = self.client.post(self.url(path)).json(body).send().await?;
        decode(resp).await
    }

    pub(crate) async fn put_json<TReq: serde::Serialize + ?Sized, TResp>(
        &self,
        path: &str,
        body: &TReq,
    ) -> Result<TResp, ApiError>
    where
        TResp: for<'de> serde::Deserialize<'de>,
    {
        let resp = self.client.put(self.url(path)).json(body).send().await?;
        decode(resp).await
    }

    /// POST with a JSON body whose response body is not trusted; only the
    /// status matters.
    pub(crate) async fn post_json_unit<TReq: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &TReq,
    ) -> Result<(), ApiError> {
        let resp = self.client.post(self.url(path)).json(body).send().await?;
        discard(resp).await
    }

    /// Bodiless POST (sign-out and friends).
    pub(crate) async fn post_unit(&self, path: &str) -> Result<(), ApiError> {
        let resp = self.client.post(self.url(path)).send().await?;
        discard(resp).await
    }

    pub(crate) async fn delete_unit(&self, path: &str) -> Result<(), ApiError> {
        let resp = self.client.delete(self.url(path)).send().await?;
        discard(resp).await
    }
}

async fn decode<TResp: for<'de> serde::Deserialize<'de>>(
    resp: reqwest::Response,
) -> Result<TResp, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json::<TResp>().await?);
    }
    Err(server_error(status, resp).await)
}

async fn discard(resp: reqwest::Response) -> Result<(), ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(());
    }
    Err(server_error(status, resp).await)
}

async fn server_error(status: StatusCode, resp: reqwest::Response) -> ApiError {
    let message = match resp.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => "server error".to_string(),
    };
    ApiError::Server { status, message }
}
