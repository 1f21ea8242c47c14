//! House aggregate service: houses with their attribute links, images, and
//! apartments, plus the attribute lookup catalog.

use std::sync::Arc;

use kvartal_core::error::CoreError;
use kvartal_core::types::DbId;
use kvartal_db::models::attribute::{Attribute, CreateAttribute, UpdateAttribute};
use kvartal_db::models::house::{CreateHouse, House, HouseFilter, UpdateHouse};
use kvartal_db::models::image::HouseImage;
use kvartal_db::models::link::LinkValue;
use kvartal_db::repositories::{
    ApartmentRepo, AttributeRepo, HouseAttributeLinkRepo, HouseImageRepo, HouseRepo,
};
use kvartal_db::DbPool;
use serde::Serialize;
use sqlx::PgConnection;

use crate::apartments::{self, ApartmentAggregate};
use crate::error::ServiceResult;
use crate::storage::{ImageKind, ImageStore, NewImageUpload};

/// Creation payload: the house row plus its desired attribute links.
#[derive(Debug, Clone)]
pub struct CreateHouseData {
    pub house: CreateHouse,
    pub attributes: Vec<LinkValue>,
}

/// Update payload. Scalar fields and links travel separately; an empty
/// `attributes` list leaves existing links untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateHouseData {
    pub house: UpdateHouse,
    pub attributes: Vec<LinkValue>,
}

/// A resolved attribute link: the catalog entity plus this house's value.
#[derive(Debug, Clone, Serialize)]
pub struct HouseAttributeValue {
    pub attribute: Attribute,
    pub value: String,
}

/// A house with its dependents resolved for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct HouseAggregate {
    #[serde(flatten)]
    pub house: House,
    pub images: Vec<HouseImage>,
    pub attributes: Vec<HouseAttributeValue>,
    pub apartments: Vec<ApartmentAggregate>,
}

/// Resolve a house row into its aggregate.
async fn load_house_aggregate(
    conn: &mut PgConnection,
    house: House,
) -> Result<HouseAggregate, sqlx::Error> {
    let images = HouseImageRepo::list_by_house(conn, house.id).await?;

    let links = HouseAttributeLinkRepo::list_by_house(conn, house.id).await?;
    let mut attributes = Vec::with_capacity(links.len());
    for link in links {
        if let Some(attribute) = AttributeRepo::find_by_id(conn, link.id_attribute).await? {
            attributes.push(HouseAttributeValue {
                attribute,
                value: link.value,
            });
        }
    }

    let apartment_rows = ApartmentRepo::list_by_house(conn, house.id).await?;
    let mut apartments = Vec::with_capacity(apartment_rows.len());
    for apartment in apartment_rows {
        apartments.push(apartments::load_apartment_aggregate(conn, apartment).await?);
    }

    Ok(HouseAggregate {
        house,
        images,
        attributes,
        apartments,
    })
}

/// Delete everything hanging off a house, in dependency order: each
/// apartment's links and images, the apartments themselves, then the
/// house's own links and image rows. Returns the stored image references
/// (apartment images, house gallery, main image) for post-commit cleanup.
async fn delete_house_dependents(
    conn: &mut PgConnection,
    house: &House,
) -> Result<Vec<String>, sqlx::Error> {
    let mut stored = Vec::new();
    if let Some(main) = &house.image {
        stored.push(main.clone());
    }

    let apartments = ApartmentRepo::list_by_house(conn, house.id).await?;
    for apartment in &apartments {
        stored.extend(apartments::delete_apartment_dependents(conn, apartment.id).await?);
    }
    ApartmentRepo::delete_by_house(conn, house.id).await?;

    HouseAttributeLinkRepo::delete_by_house(conn, house.id).await?;

    let images = HouseImageRepo::list_by_house(conn, house.id).await?;
    stored.extend(images.into_iter().map(|row| row.image));
    HouseImageRepo::delete_by_house(conn, house.id).await?;

    Ok(stored)
}

/// Orchestrates house CRUD across the house, link, image, apartment, and
/// attribute repositories.
pub struct HouseService {
    pool: DbPool,
    images: Arc<dyn ImageStore>,
}

impl HouseService {
    pub fn new(pool: DbPool, images: Arc<dyn ImageStore>) -> Self {
        Self { pool, images }
    }

    // -----------------------------------------------------------------------
    // Houses
    // -----------------------------------------------------------------------

    /// Create a house together with its attribute links.
    pub async fn create_house(&self, data: CreateHouseData) -> ServiceResult<House> {
        let mut tx = self.pool.begin().await?;
        let house = HouseRepo::create(&mut tx, &data.house).await?;
        HouseAttributeLinkRepo::reconcile(&mut tx, house.id, &data.attributes).await?;
        tx.commit().await?;

        tracing::info!(house_id = house.id, "Created house");
        Ok(house)
    }

    /// Apply a partial scalar update and reconcile the supplied links.
    pub async fn update_house(&self, id: DbId, data: UpdateHouseData) -> ServiceResult<House> {
        let mut tx = self.pool.begin().await?;

        HouseRepo::find_by_id(&mut tx, id)
            .await?
            .ok_or(CoreError::NotFound { entity: "house", id })?;

        let updated = HouseRepo::update(&mut tx, id, &data.house)
            .await?
            .ok_or(CoreError::NotFound { entity: "house", id })?;
        HouseAttributeLinkRepo::reconcile(&mut tx, id, &data.attributes).await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Delete a house and everything under it: apartments with their links
    /// and images, attribute links, gallery rows, and stored files.
    pub async fn delete_house(&self, id: DbId) -> ServiceResult<()> {
        let mut tx = self.pool.begin().await?;

        let house = HouseRepo::find_by_id(&mut tx, id)
            .await?
            .ok_or(CoreError::NotFound { entity: "house", id })?;

        let stored = delete_house_dependents(&mut tx, &house).await?;
        HouseRepo::delete(&mut tx, id).await?;
        tx.commit().await?;

        self.delete_stored_files(stored).await;
        tracing::info!(house_id = id, "Deleted house");
        Ok(())
    }

    /// Fetch a single house aggregate.
    pub async fn get_house(&self, id: DbId) -> ServiceResult<HouseAggregate> {
        let mut conn = self.pool.acquire().await?;
        let house = HouseRepo::find_by_id(&mut conn, id)
            .await?
            .ok_or(CoreError::NotFound { entity: "house", id })?;
        Ok(load_house_aggregate(&mut conn, house).await?)
    }

    /// List house aggregates matching the filter, including the optional
    /// (attribute, value) narrowing.
    pub async fn list_houses(&self, filter: &HouseFilter) -> ServiceResult<Vec<HouseAggregate>> {
        let mut conn = self.pool.acquire().await?;
        let houses = HouseRepo::list(&mut conn, filter).await?;
        let mut aggregates = Vec::with_capacity(houses.len());
        for house in houses {
            aggregates.push(load_house_aggregate(&mut conn, house).await?);
        }
        Ok(aggregates)
    }

    // -----------------------------------------------------------------------
    // Images
    // -----------------------------------------------------------------------

    /// Store uploaded images and register them in the house's gallery.
    pub async fn add_images(
        &self,
        id: DbId,
        uploads: Vec<NewImageUpload>,
    ) -> ServiceResult<Vec<HouseImage>> {
        let mut tx = self.pool.begin().await?;

        HouseRepo::find_by_id(&mut tx, id)
            .await?
            .ok_or(CoreError::NotFound { entity: "house", id })?;

        let mut rows = Vec::with_capacity(uploads.len());
        for upload in &uploads {
            let stored = self
                .images
                .save(&upload.bytes, &upload.original_name, ImageKind::House)
                .await?;
            rows.push(HouseImageRepo::create(&mut tx, id, &stored).await?);
        }

        tx.commit().await?;
        Ok(rows)
    }

    /// Delete gallery rows by id and their stored files. Ids that do not
    /// resolve to an image of this house are skipped.
    pub async fn delete_images(&self, id: DbId, image_ids: Vec<DbId>) -> ServiceResult<()> {
        let mut tx = self.pool.begin().await?;

        HouseRepo::find_by_id(&mut tx, id)
            .await?
            .ok_or(CoreError::NotFound { entity: "house", id })?;

        let mut stored = Vec::new();
        for image_id in image_ids {
            let Some(row) = HouseImageRepo::find_by_id(&mut tx, image_id).await? else {
                continue;
            };
            if row.id_house != id {
                continue;
            }
            HouseImageRepo::delete(&mut tx, image_id).await?;
            stored.push(row.image);
        }

        tx.commit().await?;
        self.delete_stored_files(stored).await;
        Ok(())
    }

    /// Replace the house's main image: persist the new file, update the
    /// filename reference, then drop the old stored file.
    pub async fn set_main_image(&self, id: DbId, upload: NewImageUpload) -> ServiceResult<House> {
        let mut conn = self.pool.acquire().await?;

        let house = HouseRepo::find_by_id(&mut conn, id)
            .await?
            .ok_or(CoreError::NotFound { entity: "house", id })?;

        let stored = self
            .images
            .save(&upload.bytes, &upload.original_name, ImageKind::House)
            .await?;

        let updated = HouseRepo::update(
            &mut conn,
            id,
            &UpdateHouse {
                image: Some(stored),
                ..Default::default()
            },
        )
        .await?
        .ok_or(CoreError::NotFound { entity: "house", id })?;

        if let Some(old) = house.image {
            if let Err(e) = self.images.delete(&old).await {
                tracing::warn!(error = %e, reference = old, "Failed to delete old main image");
            }
        }

        Ok(updated)
    }

    // -----------------------------------------------------------------------
    // Attribute catalog
    // -----------------------------------------------------------------------

    pub async fn create_attribute(&self, input: CreateAttribute) -> ServiceResult<Attribute> {
        let mut conn = self.pool.acquire().await?;
        Ok(AttributeRepo::create(&mut conn, &input).await?)
    }

    pub async fn list_attributes(&self, name: Option<&str>) -> ServiceResult<Vec<Attribute>> {
        let mut conn = self.pool.acquire().await?;
        Ok(AttributeRepo::list(&mut conn, name).await?)
    }

    pub async fn update_attribute(
        &self,
        id: DbId,
        input: UpdateAttribute,
    ) -> ServiceResult<Attribute> {
        let mut conn = self.pool.acquire().await?;
        let updated = AttributeRepo::update(&mut conn, id, &input).await?.ok_or(
            CoreError::NotFound {
                entity: "attribute",
                id,
            },
        )?;
        Ok(updated)
    }

    /// Delete an attribute, removing every link that references it first.
    pub async fn delete_attribute(&self, id: DbId) -> ServiceResult<()> {
        let mut tx = self.pool.begin().await?;

        AttributeRepo::find_by_id(&mut tx, id).await?.ok_or(
            CoreError::NotFound {
                entity: "attribute",
                id,
            },
        )?;

        HouseAttributeLinkRepo::delete_by_attribute(&mut tx, id).await?;
        AttributeRepo::delete(&mut tx, id).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Best-effort removal of stored files after a successful commit.
    async fn delete_stored_files(&self, stored: Vec<String>) {
        for reference in stored {
            if let Err(e) = self.images.delete(&reference).await {
                tracing::warn!(error = %e, reference, "Failed to delete stored image");
            }
        }
    }
}
