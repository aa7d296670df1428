//! Flat administration

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::domain::{Flat, FlatDetail, Society, User};
use crate::error::DomainError;
use crate::repositories::{FlatFilter, FlatRepository, Repositories, SocietyRepository, UserRepository};
use crate::validation::{ValidationReport, Violation};

/// Submitted flat form.
#[derive(Debug, Clone)]
pub struct FlatAssignment {
    pub society_id: Uuid,
    pub flat_number: String,
    pub owner_id: Option<Uuid>,
}

pub struct FlatService {
    flats: Arc<dyn FlatRepository>,
    societies: Arc<dyn SocietyRepository>,
    users: Arc<dyn UserRepository>,
}

impl FlatService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            flats: repos.flats.clone(),
            societies: repos.societies.clone(),
            users: repos.users.clone(),
        }
    }

    pub async fn list(&self) -> Result<Vec<FlatDetail>, DomainError> {
        self.flats.list(&FlatFilter::default()).await
    }

    /// Societies offered by the flat form.
    pub async fn societies(&self) -> Result<Vec<Society>, DomainError> {
        self.societies.list().await
    }

    pub async fn find(&self, id: &Uuid) -> Result<Flat, DomainError> {
        self.flats
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Flat not found.".into()))
    }

    pub async fn create(&self, input: FlatAssignment) -> Result<(Flat, Society), DomainError> {
        let (society, owner) = self.resolve(&input).await?;
        let flat = Flat::new(society.id, input.flat_number, owner.as_ref())?;
        self.ensure_unique(&flat).await?;

        let created = self
            .flats
            .create(&flat)
            .await
            .map_err(|e| e.on_conflict(format!("Flat {} already exists in this society.", flat.flat_number)))?;
        info!("Flat {} created in society {}", created.flat_number, society.id);
        Ok((created, society))
    }

    pub async fn update(&self, id: &Uuid, input: FlatAssignment) -> Result<Flat, DomainError> {
        let mut flat = self.find(id).await?;
        let (society, owner) = self.resolve(&input).await?;
        flat.assign(society.id, input.flat_number, owner.as_ref())?;
        self.ensure_unique(&flat).await?;

        self.flats
            .update(&flat)
            .await
            .map_err(|e| e.on_conflict("A flat with this number already exists in the selected society."))
    }

    /// Refused while the flat has tenants or bills.
    pub async fn delete(&self, id: &Uuid) -> Result<Flat, DomainError> {
        let flat = self.find(id).await?;
        self.flats
            .delete(&flat.id)
            .await
            .map_err(|e| e.on_conflict("Cannot delete this flat because it has associated bills or tenants."))?;
        info!("Flat deleted: {}", flat.id);
        Ok(flat)
    }

    async fn resolve(&self, input: &FlatAssignment) -> Result<(Society, Option<User>), DomainError> {
        let society = self
            .societies
            .find_by_id(&input.society_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Invalid Society selected.".into()))?;
        let owner = match &input.owner_id {
            Some(owner_id) => Some(
                self.users
                    .find_by_id(owner_id)
                    .await?
                    .ok_or_else(|| DomainError::NotFound("The selected owner does not exist.".into()))?,
            ),
            None => None,
        };
        Ok((society, owner))
    }

    async fn ensure_unique(&self, flat: &Flat) -> Result<(), DomainError> {
        match self.flats.find_by_number(&flat.society_id, &flat.flat_number).await? {
            Some(existing) if existing.id != flat.id => Err(ValidationReport::single(Violation::general(
                "Flat with this society and flat number already exists.",
            ))
            .into()),
            _ => Ok(()),
        }
    }
}
