use tracing::{debug, instrument};

use shared_api_client::PortalApiClient;
use shared_config::AppConfig;
use shared_models::AppError;

use crate::models::Hospital;

pub struct HospitalService {
    api: PortalApiClient,
}

impl HospitalService {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        Ok(Self::with_client(PortalApiClient::new(config)?))
    }

    pub fn with_client(api: PortalApiClient) -> Self {
        Self { api }
    }

    #[instrument(skip(self))]
    pub async fn get_hospitals(&self) -> Result<Vec<Hospital>, AppError> {
        let hospitals: Vec<Hospital> = self.api.get_list("/hospitals/", &[]).await?;
        debug!("Fetched {} hospitals", hospitals.len());
        Ok(hospitals)
    }
}
