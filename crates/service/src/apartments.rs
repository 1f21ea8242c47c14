//! Apartment aggregate service: apartments with their category, parameter
//! links, and images, plus the parameter/category lookup catalogs.

use std::sync::Arc;

use kvartal_core::error::CoreError;
use kvartal_core::types::DbId;
use kvartal_db::models::apartment::{
    Apartment, ApartmentFilter, CreateApartment, UpdateApartment,
};
use kvartal_db::models::category::{ApartmentCategory, CreateCategory, UpdateCategory};
use kvartal_db::models::image::ApartmentImage;
use kvartal_db::models::link::LinkValue;
use kvartal_db::models::parameter::{CreateParameter, Parameter, UpdateParameter};
use kvartal_db::repositories::{
    ApartmentImageRepo, ApartmentParameterLinkRepo, ApartmentRepo, CategoryRepo, ParameterRepo,
};
use kvartal_db::DbPool;
use serde::Serialize;
use sqlx::PgConnection;

use crate::error::ServiceResult;
use crate::storage::{ImageKind, ImageStore, NewImageUpload};

/// Creation payload: the apartment row plus its desired parameter links.
#[derive(Debug, Clone)]
pub struct CreateApartmentData {
    pub apartment: CreateApartment,
    pub parameters: Vec<LinkValue>,
}

/// Update payload. Scalar fields and links travel separately; an empty
/// `parameters` list leaves existing links untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateApartmentData {
    pub apartment: UpdateApartment,
    pub parameters: Vec<LinkValue>,
}

/// A resolved parameter link: the catalog entity plus this apartment's value.
#[derive(Debug, Clone, Serialize)]
pub struct ApartmentParameterValue {
    pub parameter: Parameter,
    pub value: String,
}

/// An apartment with its dependents resolved for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct ApartmentAggregate {
    #[serde(flatten)]
    pub apartment: Apartment,
    pub category: Option<ApartmentCategory>,
    pub parameters: Vec<ApartmentParameterValue>,
    pub images: Vec<ApartmentImage>,
}

/// Resolve an apartment row into its aggregate.
pub(crate) async fn load_apartment_aggregate(
    conn: &mut PgConnection,
    apartment: Apartment,
) -> Result<ApartmentAggregate, sqlx::Error> {
    let category = CategoryRepo::find_by_id(conn, apartment.id_category).await?;
    let images = ApartmentImageRepo::list_by_apartment(conn, apartment.id).await?;

    let links = ApartmentParameterLinkRepo::list_by_apartment(conn, apartment.id).await?;
    let mut parameters = Vec::with_capacity(links.len());
    for link in links {
        if let Some(parameter) = ParameterRepo::find_by_id(conn, link.id_parameter).await? {
            parameters.push(ApartmentParameterValue {
                parameter,
                value: link.value,
            });
        }
    }

    Ok(ApartmentAggregate {
        apartment,
        category,
        parameters,
        images,
    })
}

/// Delete an apartment's link and image rows, returning the stored image
/// references so the caller can clean up files after commit.
pub(crate) async fn delete_apartment_dependents(
    conn: &mut PgConnection,
    id_apartment: DbId,
) -> Result<Vec<String>, sqlx::Error> {
    let images = ApartmentImageRepo::list_by_apartment(conn, id_apartment).await?;
    let stored: Vec<String> = images.into_iter().map(|row| row.image).collect();

    ApartmentParameterLinkRepo::delete_by_apartment(conn, id_apartment).await?;
    ApartmentImageRepo::delete_by_apartment(conn, id_apartment).await?;
    Ok(stored)
}

/// Orchestrates apartment CRUD across the apartment, link, image, and
/// catalog repositories.
pub struct ApartmentService {
    pool: DbPool,
    images: Arc<dyn ImageStore>,
}

impl ApartmentService {
    pub fn new(pool: DbPool, images: Arc<dyn ImageStore>) -> Self {
        Self { pool, images }
    }

    // -----------------------------------------------------------------------
    // Apartments
    // -----------------------------------------------------------------------

    /// Create an apartment together with its parameter links.
    pub async fn create_apartment(&self, data: CreateApartmentData) -> ServiceResult<Apartment> {
        let mut tx = self.pool.begin().await?;
        let apartment = ApartmentRepo::create(&mut tx, &data.apartment).await?;
        ApartmentParameterLinkRepo::reconcile(&mut tx, apartment.id, &data.parameters).await?;
        tx.commit().await?;

        tracing::info!(apartment_id = apartment.id, "Created apartment");
        Ok(apartment)
    }

    /// Apply a partial scalar update and reconcile the supplied links.
    pub async fn update_apartment(
        &self,
        id: DbId,
        data: UpdateApartmentData,
    ) -> ServiceResult<Apartment> {
        let mut tx = self.pool.begin().await?;

        ApartmentRepo::find_by_id(&mut tx, id).await?.ok_or(
            CoreError::NotFound {
                entity: "apartment",
                id,
            },
        )?;

        let updated = ApartmentRepo::update(&mut tx, id, &data.apartment)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "apartment",
                id,
            })?;
        ApartmentParameterLinkRepo::reconcile(&mut tx, id, &data.parameters).await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Delete an apartment and its dependents (links, image rows, files).
    pub async fn delete_apartment(&self, id: DbId) -> ServiceResult<()> {
        let mut tx = self.pool.begin().await?;

        ApartmentRepo::find_by_id(&mut tx, id).await?.ok_or(
            CoreError::NotFound {
                entity: "apartment",
                id,
            },
        )?;

        let stored = delete_apartment_dependents(&mut tx, id).await?;
        ApartmentRepo::delete(&mut tx, id).await?;
        tx.commit().await?;

        self.delete_stored_files(stored).await;
        tracing::info!(apartment_id = id, "Deleted apartment");
        Ok(())
    }

    /// Fetch a single apartment aggregate.
    pub async fn get_apartment(&self, id: DbId) -> ServiceResult<ApartmentAggregate> {
        let mut conn = self.pool.acquire().await?;
        let apartment = ApartmentRepo::find_by_id(&mut conn, id).await?.ok_or(
            CoreError::NotFound {
                entity: "apartment",
                id,
            },
        )?;
        Ok(load_apartment_aggregate(&mut conn, apartment).await?)
    }

    /// List apartment aggregates matching the filter.
    pub async fn list_apartments(
        &self,
        filter: &ApartmentFilter,
    ) -> ServiceResult<Vec<ApartmentAggregate>> {
        let mut conn = self.pool.acquire().await?;
        let apartments = ApartmentRepo::list(&mut conn, filter).await?;
        let mut aggregates = Vec::with_capacity(apartments.len());
        for apartment in apartments {
            aggregates.push(load_apartment_aggregate(&mut conn, apartment).await?);
        }
        Ok(aggregates)
    }

    // -----------------------------------------------------------------------
    // Images
    // -----------------------------------------------------------------------

    /// Store uploaded images and register them under the apartment.
    pub async fn add_images(
        &self,
        id: DbId,
        uploads: Vec<NewImageUpload>,
    ) -> ServiceResult<Vec<ApartmentImage>> {
        let mut tx = self.pool.begin().await?;

        ApartmentRepo::find_by_id(&mut tx, id).await?.ok_or(
            CoreError::NotFound {
                entity: "apartment",
                id,
            },
        )?;

        let mut rows = Vec::with_capacity(uploads.len());
        for upload in &uploads {
            let stored = self
                .images
                .save(&upload.bytes, &upload.original_name, ImageKind::Apartment)
                .await?;
            rows.push(ApartmentImageRepo::create(&mut tx, id, &stored).await?);
        }

        tx.commit().await?;
        Ok(rows)
    }

    /// Delete image rows by id and their stored files. Ids that do not
    /// resolve to an image of this apartment are skipped.
    pub async fn delete_images(&self, id: DbId, image_ids: Vec<DbId>) -> ServiceResult<()> {
        let mut tx = self.pool.begin().await?;

        ApartmentRepo::find_by_id(&mut tx, id).await?.ok_or(
            CoreError::NotFound {
                entity: "apartment",
                id,
            },
        )?;

        let mut stored = Vec::new();
        for image_id in image_ids {
            let Some(row) = ApartmentImageRepo::find_by_id(&mut tx, image_id).await? else {
                continue;
            };
            if row.id_apartment != id {
                continue;
            }
            ApartmentImageRepo::delete(&mut tx, image_id).await?;
            stored.push(row.image);
        }

        tx.commit().await?;
        self.delete_stored_files(stored).await;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Parameter catalog
    // -----------------------------------------------------------------------

    pub async fn create_parameter(&self, input: CreateParameter) -> ServiceResult<Parameter> {
        let mut conn = self.pool.acquire().await?;
        Ok(ParameterRepo::create(&mut conn, &input).await?)
    }

    pub async fn list_parameters(&self, name: Option<&str>) -> ServiceResult<Vec<Parameter>> {
        let mut conn = self.pool.acquire().await?;
        Ok(ParameterRepo::list(&mut conn, name).await?)
    }

    pub async fn update_parameter(
        &self,
        id: DbId,
        input: UpdateParameter,
    ) -> ServiceResult<Parameter> {
        let mut conn = self.pool.acquire().await?;
        let updated = ParameterRepo::update(&mut conn, id, &input).await?.ok_or(
            CoreError::NotFound {
                entity: "parameter",
                id,
            },
        )?;
        Ok(updated)
    }

    /// Delete a parameter, removing every link that references it first.
    pub async fn delete_parameter(&self, id: DbId) -> ServiceResult<()> {
        let mut tx = self.pool.begin().await?;

        ParameterRepo::find_by_id(&mut tx, id).await?.ok_or(
            CoreError::NotFound {
                entity: "parameter",
                id,
            },
        )?;

        ApartmentParameterLinkRepo::delete_by_parameter(&mut tx, id).await?;
        ParameterRepo::delete(&mut tx, id).await?;
        tx.commit().await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Category catalog
    // -----------------------------------------------------------------------

    pub async fn create_category(&self, input: CreateCategory) -> ServiceResult<ApartmentCategory> {
        let mut conn = self.pool.acquire().await?;
        Ok(CategoryRepo::create(&mut conn, &input).await?)
    }

    pub async fn list_categories(
        &self,
        name: Option<&str>,
    ) -> ServiceResult<Vec<ApartmentCategory>> {
        let mut conn = self.pool.acquire().await?;
        Ok(CategoryRepo::list(&mut conn, name).await?)
    }

    pub async fn update_category(
        &self,
        id: DbId,
        input: UpdateCategory,
    ) -> ServiceResult<ApartmentCategory> {
        let mut conn = self.pool.acquire().await?;
        let updated = CategoryRepo::update(&mut conn, id, &input).await?.ok_or(
            CoreError::NotFound {
                entity: "category",
                id,
            },
        )?;
        Ok(updated)
    }

    /// Delete a category. No link table references categories, so this is a
    /// plain pass-through; apartments still referencing it keep the FK error.
    pub async fn delete_category(&self, id: DbId) -> ServiceResult<()> {
        let mut conn = self.pool.acquire().await?;
        CategoryRepo::find_by_id(&mut conn, id).await?.ok_or(
            CoreError::NotFound {
                entity: "category",
                id,
            },
        )?;
        CategoryRepo::delete(&mut conn, id).await?;
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
