//! Maintenance bill administration

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::domain::{BillDetail, BillTerms, Flat, FlatDetail, MaintenanceBill};
use crate::error::DomainError;
use crate::repositories::{BillFilter, BillRepository, FlatFilter, FlatRepository, Repositories};
use crate::validation::{ValidationReport, Violation};

pub struct BillService {
    bills: Arc<dyn BillRepository>,
    flats: Arc<dyn FlatRepository>,
}

impl BillService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            bills: repos.bills.clone(),
            flats: repos.flats.clone(),
        }
    }

    pub async fn list(&self) -> Result<Vec<BillDetail>, DomainError> {
        self.bills.list(&BillFilter::default()).await
    }

    /// Flats a bill can be raised for: those with an owner.
    pub async fn billable_flats(&self) -> Result<Vec<FlatDetail>, DomainError> {
        self.flats.list(&FlatFilter::assigned()).await
    }

    pub async fn find(&self, id: &Uuid) -> Result<MaintenanceBill, DomainError> {
        self.bills
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Bill not found.".into()))
    }

    pub async fn create(&self, terms: BillTerms) -> Result<(MaintenanceBill, Flat), DomainError> {
        let flat = self.flat(&terms.flat_id).await?;
        let bill = MaintenanceBill::new(&flat, terms)?;
        self.ensure_unique(&bill).await?;

        let created = self
            .bills
            .create(&bill)
            .await
            .map_err(|e| e.on_conflict("A bill for this flat, month, and year already exists."))?;
        info!("Bill {} generated for flat {}", created.period(), flat.flat_number);
        Ok((created, flat))
    }

    pub async fn update(&self, id: &Uuid, terms: BillTerms) -> Result<MaintenanceBill, DomainError> {
        let mut bill = self.find(id).await?;
        let flat = self.flat(&terms.flat_id).await?;
        bill.apply_terms(&flat, terms)?;
        self.ensure_unique(&bill).await?;

        self.bills
            .update(&bill)
            .await
            .map_err(|e| e.on_conflict("A bill with these details already exists."))
    }

    pub async fn delete(&self, id: &Uuid) -> Result<(), DomainError> {
        let bill = self.find(id).await?;
        self.bills.delete(&bill.id).await?;
        info!("Bill deleted: {}", bill.id);
        Ok(())
    }

    /// Flips PAID/UNPAID and returns the bill with its flat.
    pub async fn toggle_status(&self, id: &Uuid) -> Result<(MaintenanceBill, Flat), DomainError> {
        let mut bill = self.find(id).await?;
        bill.toggle_status();
        let bill = self.bills.update(&bill).await?;
        let flat = self.flat(&bill.flat_id).await?;
        Ok((bill, flat))
    }

    async fn flat(&self, id: &Uuid) -> Result<Flat, DomainError> {
        self.flats
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Invalid Flat selected.".into()))
    }

    async fn ensure_unique(&self, bill: &MaintenanceBill) -> Result<(), DomainError> {
        match self.bills.find_by_period(&bill.flat_id, bill.month, bill.year).await? {
            Some(existing) if existing.id != bill.id => Err(ValidationReport::single(Violation::general(
                "A bill for this flat, month and year already exists",
            ))
            .into()),
            _ => Ok(()),
        }
    }
}
