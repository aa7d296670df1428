//! Society administration

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::domain::{Society, SocietySummary};
use crate::error::DomainError;
use crate::repositories::SocietyRepository;

pub struct SocietyService {
    societies: Arc<dyn SocietyRepository>,
}

impl SocietyService {
    pub fn new(societies: Arc<dyn SocietyRepository>) -> Self {
        Self { societies }
    }

    pub async fn list(&self) -> Result<Vec<SocietySummary>, DomainError> {
        self.societies.list_with_flat_counts().await
    }

    pub async fn find(&self, id: &Uuid) -> Result<Society, DomainError> {
        self.societies
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Society not found.".into()))
    }

    pub async fn create(&self, name: String, address: String) -> Result<Society, DomainError> {
        let society = Society::new(name, address)?;
        let created = self.societies.create(&society).await?;
        info!("Society created: {}", created.id);
        Ok(created)
    }

    pub async fn update(&self, id: &Uuid, name: String, address: String) -> Result<Society, DomainError> {
        let mut society = self.find(id).await?;
        society.rename(name, address)?;
        self.societies.update(&society).await
    }

    /// Refused while the society still contains flats.
    pub async fn delete(&self, id: &Uuid) -> Result<Society, DomainError> {
        let society = self.find(id).await?;
        self.societies.delete(&society.id).await.map_err(|e| {
            e.on_conflict(format!("Cannot delete Society \"{}\" because it contains flats.", society.name))
        })?;
        info!("Society deleted: {}", society.id);
        Ok(society)
    }
}
