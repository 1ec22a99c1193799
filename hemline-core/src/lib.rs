pub mod repository;

pub use repository::{
    GarmentTypeRepository, PriceListRepository, RepoResult, ServiceRepository,
};
