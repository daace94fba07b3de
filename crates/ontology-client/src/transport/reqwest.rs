use std::sync::Arc;

use super::{HttpPostClient, HttpPostError, HttpTextResponse};

impl From<reqwest::Error> for HttpPostError<reqwest::Error> {
    fn from(e: reqwest::Error) -> Self {
        HttpPostError::Client(e)
    }
}

impl HttpPostClient for reqwest::Client {
    type Error = reqwest::Error;

    async fn post_text(
        &self,
        uri: Arc<str>,
        body: String,
    ) -> Result<HttpTextResponse, HttpPostError<Self::Error>> {
        let response = self.post(uri.as_ref()).body(body).send().await?;
        let status = response.status();
        let body = match response.text().await {
            Ok(text) => Some(text),
            Err(e) if status.is_success() => return Err(e.into()),
            Err(e) => {
                tracing::debug!(%status, "failed to read error response body: {e}");
                None
            }
        };
        Ok(HttpTextResponse::new(status, body))
    }
}
