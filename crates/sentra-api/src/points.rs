// Point endpoints
//
// The point list is the only paged collection on the gateway; it returns
// `{points: [...], totalCount}` and accepts optional device filters.

use tracing::debug;

use crate::client::GatewayClient;
use crate::error::Error;
use crate::models::{Point, PointPage, PointQuery};

impl GatewayClient {
    /// List points, paged and optionally scoped to a device and/or mark.
    ///
    /// `GET /api/points?page=&pageSize=&deviceId=&deviceMark=`
    pub async fn list_points(&self, query: &PointQuery) -> Result<PointPage, Error> {
        let mut url = self.api_url("points");
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("page", &query.page.to_string());
            pairs.append_pair("pageSize", &query.page_size.to_string());
            if let Some(ref device_id) = query.device_id {
                pairs.append_pair("deviceId", device_id);
            }
            if let Some(ref mark) = query.device_mark {
                pairs.append_pair("deviceMark", mark);
            }
        }
        self.get(url).await
    }

    /// Fetch a single point by id.
    ///
    /// `GET /api/points/{id}`
    pub async fn get_point(&self, id: &str) -> Result<Point, Error> {
        let url = self.api_url(&format!("points/{id}"));
        self.get(url).await
    }

    /// Create a point. The gateway assigns the id.
    ///
    /// `POST /api/points`
    pub async fn create_point(&self, point: &Point) -> Result<(), Error> {
        let url = self.api_url("points");
        debug!(tag = %point.tag, "creating point");
        self.post(url, point).await
    }

    /// Update an existing point.
    ///
    /// `PUT /api/points/{id}`
    pub async fn update_point(&self, id: &str, point: &Point) -> Result<(), Error> {
        let url = self.api_url(&format!("points/{id}"));
        debug!(id, "updating point");
        self.put(url, point).await
    }

    /// Delete a point.
    ///
    /// `DELETE /api/points/{id}`
    pub async fn delete_point(&self, id: &str) -> Result<(), Error> {
        let url = self.api_url(&format!("points/{id}"));
        debug!(id, "deleting point");
        self.delete(url).await
    }
}
