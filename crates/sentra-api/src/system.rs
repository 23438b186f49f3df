// System action endpoints
//
// Pause/flush/clear are bodyless POSTs. Config import is a multipart
// upload of an .xlsx workbook; the template download is a raw binary
// response the caller persists locally.

use std::path::Path;

use tracing::{debug, info};

use crate::client::GatewayClient;
use crate::error::Error;

impl GatewayClient {
    /// Pause gateway acquisition.
    ///
    /// `POST /api/system/pause`
    pub async fn system_pause(&self) -> Result<(), Error> {
        self.post_empty(self.api_url("system/pause")).await
    }

    /// Flush gateway buffers.
    ///
    /// `POST /api/system/flush`
    pub async fn system_flush(&self) -> Result<(), Error> {
        self.post_empty(self.api_url("system/flush")).await
    }

    /// Clear accumulated data.
    ///
    /// `POST /api/data/clear`
    pub async fn data_clear(&self) -> Result<(), Error> {
        self.post_empty(self.api_url("data/clear")).await
    }

    /// Upload an .xlsx configuration workbook.
    ///
    /// `POST /api/config/import` (multipart form, field name `file`)
    pub async fn import_config(&self, path: &Path) -> Result<(), Error> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map_or_else(|| "config.xlsx".to_owned(), |n| n.to_string_lossy().into_owned());
        info!(file = %file_name, size = bytes.len(), "importing config workbook");

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
        let form = reqwest::multipart::Form::new().part("file", part);
        self.post_multipart(self.api_url("config/import"), form)
            .await
    }

    /// Download the configuration template workbook and save it to `dest`.
    ///
    /// `GET /api/config/template`
    pub async fn download_template(&self, dest: &Path) -> Result<(), Error> {
        let bytes = self.get_bytes(self.api_url("config/template")).await?;
        tokio::fs::write(dest, &bytes).await?;
        debug!(dest = %dest.display(), size = bytes.len(), "template saved");
        Ok(())
    }
}
