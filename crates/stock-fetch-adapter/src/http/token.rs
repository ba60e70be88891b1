/*
[INPUT]:  Data-provider API token
[OUTPUT]: Masked token status
[POS]:    HTTP layer - token configuration endpoints
[UPDATE]: When token endpoints change
*/

use crate::http::{FetchClient, Result};
use crate::types::{SetTokenResponse, TokenRequest, TokenStatus};
use reqwest::Method;

impl FetchClient {
    /// Whether the service has a data-provider token configured
    ///
    /// GET /api/token
    pub async fn token_status(&self) -> Result<TokenStatus> {
        let builder = self.request(Method::GET, "/api/token")?;
        self.send_json(builder).await
    }

    /// Store the data-provider token on the service
    ///
    /// POST /api/token
    pub async fn set_token(&self, token: &str) -> Result<SetTokenResponse> {
        let req = TokenRequest {
            token: token.trim().to_string(),
        };
        let builder = self.request(Method::POST, "/api/token")?.json(&req);
        self.send_json(builder).await
    }
}
