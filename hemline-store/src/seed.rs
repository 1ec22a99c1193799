use rust_decimal::Decimal;
use tracing::info;

use hemline_catalog::{GarmentType, Service};
use hemline_core::repository::{GarmentTypeRepository, RepoResult, ServiceRepository};

/// Idempotent catalog bootstrap, invoked once at process start. Each step
/// is guarded by an existence check so restarts and multi-instance
/// deployments never duplicate the defaults.
pub async fn seed_catalog(
    garments: &dyn GarmentTypeRepository,
    services: &dyn ServiceRepository,
) -> RepoResult<()> {
    seed_garment_types(garments).await?;
    seed_services(garments, services).await?;
    Ok(())
}

async fn seed_garment_types(garments: &dyn GarmentTypeRepository) -> RepoResult<()> {
    if garments.count_garment_types().await? > 0 {
        return Ok(());
    }

    let defaults = [
        ("Pants", "Trousers, Jeans, Chinos"),
        ("Shirt", "Dress Shirt, T-Shirt, Polo"),
        ("Jacket", "Suit Jacket, Blazer, Coat"),
        ("Dress", "Casual, Formal"),
        ("Skirt", "Mini, Midi, Maxi"),
        ("Suit", "2-Piece, 3-Piece"),
    ];

    for (name, description) in defaults {
        let garment = GarmentType::new(name.to_string(), Some(description.to_string()));
        garments.create_garment_type(&garment).await?;
    }

    info!("Seeded garment types");
    Ok(())
}

async fn seed_services(
    garments: &dyn GarmentTypeRepository,
    services: &dyn ServiceRepository,
) -> RepoResult<()> {
    if services.count_services().await? > 0 {
        return Ok(());
    }

    let pants = garments.find_garment_type_by_name("Pants").await?;
    let shirt = garments.find_garment_type_by_name("Shirt").await?;
    let jacket = garments.find_garment_type_by_name("Jacket").await?;
    let suit = garments.find_garment_type_by_name("Suit").await?;

    // Garment seeding must have run first; bail rather than seed orphans.
    let Some(pants) = pants else {
        return Ok(());
    };

    let defaults = [
        ("Hemming", "Shorten length", 15, Decimal::new(1200, 2), Some(pants.id)),
        ("Tapering", "Slim down fit", 30, Decimal::new(2500, 2), Some(pants.id)),
        ("Zipper Replace", "New zipper install", 45, Decimal::new(2000, 2), jacket.map(|g| g.id)),
        ("Patching", "Repair hole or tear", 20, Decimal::new(1000, 2), Some(pants.id)),
        ("Button Replace", "Sew on new button", 5, Decimal::new(200, 2), shirt.map(|g| g.id)),
        ("Dry Clean", "Standard dry cleaning", 1440, Decimal::new(800, 2), suit.map(|g| g.id)),
    ];

    for (name, description, duration_min, base_price, garment_type_id) in defaults {
        let service = Service::new(
            name.to_string(),
            Some(description.to_string()),
            duration_min,
            base_price,
            garment_type_id,
        );
        services.create_service(&service).await?;
    }

    info!("Seeded services");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn seeds_defaults_into_an_empty_store() {
        let store = MemoryStore::new();
        seed_catalog(&store, &store).await.unwrap();

        assert_eq!(store.count_garment_types().await.unwrap(), 6);
        assert_eq!(store.count_services().await.unwrap(), 6);

        let services = store.list_services().await.unwrap();
        let hemming = services.iter().find(|s| s.name == "Hemming").unwrap();
        assert_eq!(hemming.base_price, dec!(12.00));
        assert_eq!(hemming.default_duration_min, 15);
        assert!(hemming.garment_type_id.is_some());
    }

    #[tokio::test]
    async fn reseeding_is_a_no_op() {
        let store = MemoryStore::new();
        seed_catalog(&store, &store).await.unwrap();
        seed_catalog(&store, &store).await.unwrap();

        assert_eq!(store.count_garment_types().await.unwrap(), 6);
        assert_eq!(store.count_services().await.unwrap(), 6);
    }

    #[tokio::test]
    async fn existing_catalog_rows_suppress_seeding() {
        let store = MemoryStore::new();
        let garment = GarmentType::new("Curtains".into(), None);
        store.create_garment_type(&garment).await.unwrap();

        seed_catalog(&store, &store).await.unwrap();

        // Garments untouched; service seeding bails without the default
        // "Pants" anchor rather than creating orphans.
        assert_eq!(store.count_garment_types().await.unwrap(), 1);
        assert_eq!(store.count_services().await.unwrap(), 0);
    }
}
