//! Refetch-and-reclassify car overview.
//!
//! Owns the fetched car and its renewal history per kind, computing the
//! per-kind renewal status with the core classifier. Every mutation
//! reloads the affected collection rather than merging optimistically
//! (read-after-write by reload), and all fetched state flows through
//! [`Sequenced`] so a stale in-flight response cannot overwrite a fresher
//! one.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use uuid::Uuid;

use cartrack_core::model::{Car, CarUpdate, RenewalCreate, RenewalKind, RenewalRecord};
use cartrack_core::status::{classify_with_issues, RenewalStatus};

use crate::client::ApiClient;
use crate::error::ClientResult;
use crate::sync::{SequenceToken, Sequenced};

/// Client-side state for one car's compliance tracks.
pub struct CarOverview {
    client: ApiClient,
    car_id: Uuid,
    car: Sequenced<Car>,
    renewals: BTreeMap<RenewalKind, Sequenced<Vec<RenewalRecord>>>,
}

impl CarOverview {
    /// Create an overview for one car. Call [`refresh`](Self::refresh) to
    /// load it.
    pub fn new(client: ApiClient, car_id: Uuid) -> Self {
        let renewals = RenewalKind::ALL
            .iter()
            .map(|&kind| (kind, Sequenced::new()))
            .collect();
        Self {
            client,
            car_id,
            car: Sequenced::new(),
            renewals,
        }
    }

    /// The car this overview tracks.
    pub fn car_id(&self) -> Uuid {
        self.car_id
    }

    /// The car row, once loaded.
    pub fn car(&self) -> Option<&Car> {
        self.car.get()
    }

    /// Renewal history for one kind (latest applied fetch).
    pub fn records(&self, kind: RenewalKind) -> &[RenewalRecord] {
        self.renewals
            .get(&kind)
            .and_then(|cell| cell.get())
            .map_or(&[], Vec::as_slice)
    }

    /// Classify one kind against the given reference date.
    ///
    /// Date-quality problems found along the way are logged; the
    /// classification itself degrades as the classifier specifies.
    pub fn status(&self, kind: RenewalKind, reference_date: NaiveDate) -> RenewalStatus {
        let (status, issues) = classify_with_issues(self.records(kind), reference_date);
        for issue in &issues {
            tracing::warn!(
                record_id = %issue.record_id,
                field = issue.field.as_str(),
                error = %issue.error,
                "Skipping renewal date that does not parse",
            );
        }
        status
    }

    /// Statuses for every kind.
    pub fn statuses(&self, reference_date: NaiveDate) -> BTreeMap<RenewalKind, RenewalStatus> {
        RenewalKind::ALL
            .iter()
            .map(|&kind| (kind, self.status(kind, reference_date)))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    /// Fetch the car and every kind's history concurrently.
    pub async fn refresh(&mut self) -> ClientResult<()> {
        // Issue every token before the fetches start, so a refresh that
        // begins later supersedes all of these responses at once.
        let car_token = self.car.begin();
        let mut kind_tokens = BTreeMap::new();
        for kind in RenewalKind::ALL {
            kind_tokens.insert(kind, self.cell_mut(kind).begin());
        }

        let (car, insurance, mot, tax) = tokio::try_join!(
            self.client.get_car(self.car_id),
            self.client.list_renewals(self.car_id, Some(RenewalKind::Insurance)),
            self.client.list_renewals(self.car_id, Some(RenewalKind::Mot)),
            self.client.list_renewals(self.car_id, Some(RenewalKind::Tax)),
        )?;

        self.apply_car(car_token, car);
        self.apply_records(RenewalKind::Insurance, kind_tokens[&RenewalKind::Insurance], insurance);
        self.apply_records(RenewalKind::Mot, kind_tokens[&RenewalKind::Mot], mot);
        self.apply_records(RenewalKind::Tax, kind_tokens[&RenewalKind::Tax], tax);
        Ok(())
    }

    /// Reload one kind's history (after a write).
    pub async fn refresh_kind(&mut self, kind: RenewalKind) -> ClientResult<()> {
        let token = self.cell_mut(kind).begin();
        let rows = self.client.list_renewals(self.car_id, Some(kind)).await?;
        self.apply_records(kind, token, rows);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Mutations (read-after-write by reload)
    // -----------------------------------------------------------------------

    /// Update car fields and apply the returned row.
    pub async fn save_car(&mut self, payload: &CarUpdate) -> ClientResult<()> {
        let token = self.car.begin();
        let car = self.client.update_car(self.car_id, payload).await?;
        self.apply_car(token, car);
        Ok(())
    }

    /// Archive or unarchive the car.
    pub async fn set_archived(&mut self, archived: bool) -> ClientResult<()> {
        let token = self.car.begin();
        let car = if archived {
            self.client.archive_car(self.car_id).await?
        } else {
            self.client.unarchive_car(self.car_id).await?
        };
        self.apply_car(token, car);
        Ok(())
    }

    /// Create a renewal record, then reload that kind's history.
    pub async fn add_renewal(&mut self, payload: &RenewalCreate) -> ClientResult<RenewalRecord> {
        let created = self.client.create_renewal(self.car_id, payload).await?;
        self.refresh_kind(payload.kind).await?;
        Ok(created)
    }

    /// Soft-delete a renewal record, then reload that kind's history.
    pub async fn remove_renewal(&mut self, kind: RenewalKind, renewal_id: Uuid) -> ClientResult<()> {
        self.client.delete_renewal(renewal_id).await?;
        self.refresh_kind(kind).await
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn apply_car(&mut self, token: SequenceToken, car: Car) {
        if !self.car.accept(token, car) {
            tracing::debug!(car_id = %self.car_id, "Discarded stale car response");
        }
    }

    fn apply_records(
        &mut self,
        kind: RenewalKind,
        token: SequenceToken,
        rows: Vec<RenewalRecord>,
    ) {
        if !self.cell_mut(kind).accept(token, rows) {
            tracing::debug!(kind = kind.as_str(), "Discarded stale renewal list response");
        }
    }

    fn cell_mut(&mut self, kind: RenewalKind) -> &mut Sequenced<Vec<RenewalRecord>> {
        self.renewals
            .get_mut(&kind)
            .expect("every kind is initialised at construction")
    }
}
