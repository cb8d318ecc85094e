use reqwest::Method;

use domain::models::catalog::{CategoriesResponse, DepartmentsResponse};

use super::ApiClient;
use crate::error::ClientError;

impl ApiClient {
    /// Event categories offered by the filter and form selects.
    pub async fn categories(&self) -> Result<Vec<String>, ClientError> {
        let request = self.request(Method::GET, "categories", None)?;
        let response: CategoriesResponse = self.send(request).await?;
        Ok(response.categories)
    }

    pub async fn departments(&self) -> Result<Vec<String>, ClientError> {
        let request = self.request(Method::GET, "departments", None)?;
        let response: DepartmentsResponse = self.send(request).await?;
        Ok(response.departments)
    }
}
