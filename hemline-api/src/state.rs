use std::sync::Arc;

use hemline_core::repository::{GarmentTypeRepository, PriceListRepository, ServiceRepository};

#[derive(Clone)]
pub struct AppState {
    pub services: Arc<dyn ServiceRepository>,
    pub garments: Arc<dyn GarmentTypeRepository>,
    pub price_lists: Arc<dyn PriceListRepository>,
}
