/*
[INPUT]:  Relative paths of generated workbook files
[OUTPUT]: File listings, deletion acknowledgements, downloaded bytes
[POS]:    HTTP layer - output file endpoints
[UPDATE]: When file endpoints or path handling change
*/

use crate::http::{FetchClient, Result};
use crate::types::{FileEntry, OkResponse};
use reqwest::Method;

impl FetchClient {
    /// List generated files, newest first
    ///
    /// GET /api/files
    pub async fn list_files(&self) -> Result<Vec<FileEntry>> {
        let builder = self.request(Method::GET, "/api/files")?;
        self.send_json(builder).await
    }

    /// Delete a generated file
    ///
    /// DELETE /api/files/{path}
    pub async fn delete_file(&self, file_path: &str) -> Result<OkResponse> {
        let endpoint = format!("/api/files/{}", file_path.trim_start_matches('/'));
        let builder = self.request(Method::DELETE, &endpoint)?;
        self.send_json(builder).await
    }

    /// Download a generated file
    ///
    /// GET /api/download/{path}
    pub async fn download_file(&self, file_path: &str) -> Result<Vec<u8>> {
        let endpoint = format!("/api/download/{}", file_path.trim_start_matches('/'));
        let builder = self.request(Method::GET, &endpoint)?;
        let response = self.send_checked(builder).await?;
        Ok(response.bytes().await?.to_vec())
    }
}
