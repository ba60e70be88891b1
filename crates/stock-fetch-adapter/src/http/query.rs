/*
[INPUT]:  Query parameters (stock codes, date range, look-back years)
[OUTPUT]: Accepted task id and server-side task status
[POS]:    HTTP layer - task submission endpoints
[UPDATE]: When the task submission contract changes
*/

use crate::http::{FetchClient, Result};
use crate::types::{QueryRequest, QueryResponse, TaskStatus};
use reqwest::Method;
use tracing::info;

impl FetchClient {
    /// Start a background fetch task
    ///
    /// POST /api/query
    pub async fn start_query(&self, req: &QueryRequest) -> Result<QueryResponse> {
        let builder = self.request(Method::POST, "/api/query")?.json(req);
        let response: QueryResponse = self.send_json(builder).await?;
        info!(task_id = %response.task_id, codes = %req.codes, "fetch task accepted");
        Ok(response)
    }

    /// Snapshot of the server's current task
    ///
    /// GET /api/status
    pub async fn task_status(&self) -> Result<TaskStatus> {
        let builder = self.request(Method::GET, "/api/status")?;
        self.send_json(builder).await
    }
}
