pub mod garment;
pub mod service;
pub mod pricelist;
pub mod pricing;

pub use garment::GarmentType;
pub use service::Service;
pub use pricelist::{PriceList, PriceListError, PriceListItem};
pub use pricing::{PriceResolution, QualifyingItem, BASE_PRICE_SOURCE};
