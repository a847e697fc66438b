//! Balance and stock recalculation.
//!
//! Rebuilds every derived aggregate from the full transaction history:
//!
//! ```text
//! for kind in [customers, suppliers, battery types]:
//!   list ids
//!     ↓
//!   for each id: fetch history rows → decode → replay → write aggregate
//! ```
//!
//! Entities are processed one at a time. A failure while fetching, decoding,
//! replaying or writing one entity is recorded in the report and the pass moves on; the
//! failed entity keeps whatever value it had before. Only a failure to list
//! the first collection aborts the pass, since it means the store is not
//! reachable at all.

pub mod report;

pub use report::{AggregateValue, EntityFailure, EntityOutcome, KindReport, RecalculationReport};

use chrono::Utc;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use battstock_accounting::{DeferralPolicy, Voucher, replay_balance};
use battstock_core::{DomainError, Entity, EntityKind, RecordId};
use battstock_inventory::{BatteryType, BatteryTypeId, Quantity, replay_on_hand};
use battstock_parties::{Customer, CustomerId, PartyRole, Supplier, SupplierId};
use battstock_purchasing::{Purchase, PurchaseItem};
use battstock_sales::{Sale, SaleItem};

use crate::store::{RecordStore, StoreError, Table, columns};

/// Failure confined to a single entity.
#[derive(Debug, Error)]
pub enum EntityError {
    #[error("fetch from {table} failed: {source}")]
    Fetch {
        table: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("undecodable row in {table}: {reason}")]
    Decode { table: &'static str, reason: String },

    #[error("write to {table} failed: {source}")]
    Write {
        table: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("replay into {table} failed: {source}")]
    Replay {
        table: &'static str,
        #[source]
        source: DomainError,
    },
}

impl EntityError {
    pub fn table(&self) -> &'static str {
        match self {
            Self::Fetch { table, .. }
            | Self::Decode { table, .. }
            | Self::Write { table, .. }
            | Self::Replay { table, .. } => table,
        }
    }
}

/// Failure of the pass as a whole.
#[derive(Debug, Error)]
pub enum RecalculationError {
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),

    #[error("no entity kinds selected")]
    NoKindsSelected,
}

/// Which passes to run and whether to write results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecalculationOptions {
    pub kinds: Vec<EntityKind>,
    /// Compute and report without writing anything back.
    pub dry_run: bool,
}

impl Default for RecalculationOptions {
    fn default() -> Self {
        Self {
            kinds: EntityKind::ALL.to_vec(),
            dry_run: false,
        }
    }
}

impl RecalculationOptions {
    pub fn only(kinds: impl IntoIterator<Item = EntityKind>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
            dry_run: false,
        }
    }

    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }
}

/// Replays transaction history into customer balances, supplier balances and
/// battery-type quantities.
///
/// Passes on the same recalculator are serialised, so two concurrent
/// `recalculate_all` calls never interleave reads and writes of one entity.
#[derive(Debug)]
pub struct BalanceRecalculator<S> {
    store: S,
    policy: DeferralPolicy,
    pass_lock: Mutex<()>,
}

impl<S> BalanceRecalculator<S>
where
    S: RecordStore,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            policy: DeferralPolicy::default(),
            pass_lock: Mutex::new(()),
        }
    }

    pub fn with_policy(mut self, policy: DeferralPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Recompute and write every aggregate of every kind.
    pub async fn recalculate_all(&self) -> Result<RecalculationReport, RecalculationError> {
        self.recalculate(RecalculationOptions::default()).await
    }

    pub async fn recalculate(
        &self,
        options: RecalculationOptions,
    ) -> Result<RecalculationReport, RecalculationError> {
        let mut kinds = options.kinds;
        kinds.sort();
        kinds.dedup();
        if kinds.is_empty() {
            return Err(RecalculationError::NoKindsSelected);
        }

        let _pass = self.pass_lock.lock().await;
        let started_at = Utc::now();
        info!(kinds = ?kinds, dry_run = options.dry_run, "recalculation started");

        let mut reports = Vec::with_capacity(kinds.len());
        for (idx, kind) in kinds.into_iter().enumerate() {
            let ids = match self.store.list_ids(kind).await {
                Ok(ids) => ids,
                Err(e) if idx == 0 => {
                    warn!(kind = %kind, error = %e, "store unreachable; aborting recalculation");
                    return Err(RecalculationError::StoreUnavailable(e));
                }
                Err(e) => {
                    warn!(kind = %kind, error = %e, "could not list entities; skipping kind");
                    let mut report = KindReport::new(kind);
                    report.listing_error = Some(e.to_string());
                    reports.push(report);
                    continue;
                }
            };

            reports.push(self.run_kind(kind, ids, options.dry_run).await);
        }

        let report = RecalculationReport {
            started_at,
            finished_at: Utc::now(),
            dry_run: options.dry_run,
            kinds: reports,
        };

        info!(
            written = report.written_count(),
            failures = report.failure_count(),
            "recalculation finished"
        );

        Ok(report)
    }

    async fn run_kind(&self, kind: EntityKind, ids: Vec<RecordId>, dry_run: bool) -> KindReport {
        let mut report = KindReport::new(kind);

        for id in ids {
            match self.recalculate_entity(kind, id, dry_run).await {
                Ok(value) => report.outcomes.push(EntityOutcome {
                    entity_id: id,
                    value,
                }),
                Err(e) => {
                    warn!(kind = %kind, entity_id = %id, table = e.table(), error = %e, "entity skipped");
                    report.failures.push(EntityFailure {
                        kind,
                        entity_id: id,
                        table: e.table().to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            kind = %kind,
            recomputed = report.outcomes.len(),
            failed = report.failures.len(),
            "kind recalculated"
        );
        report
    }

    async fn recalculate_entity(
        &self,
        kind: EntityKind,
        id: RecordId,
        dry_run: bool,
    ) -> Result<AggregateValue, EntityError> {
        match kind {
            EntityKind::Customer => {
                let customer = Customer::with_balance(CustomerId(id), self.customer_balance(id).await?);
                let value = AggregateValue::Balance(customer.balance);
                self.commit(&customer, value, dry_run).await?;
                Ok(value)
            }
            EntityKind::Supplier => {
                let supplier = Supplier::with_balance(SupplierId(id), self.supplier_balance(id).await?);
                let value = AggregateValue::Balance(supplier.balance);
                self.commit(&supplier, value, dry_run).await?;
                Ok(value)
            }
            EntityKind::BatteryType => {
                let battery = BatteryType::with_quantity(BatteryTypeId(id), self.on_hand(id).await?);
                let value = AggregateValue::Quantity(battery.current_quantity);
                self.commit(&battery, value, dry_run).await?;
                Ok(value)
            }
        }
    }

    async fn customer_balance(&self, id: RecordId) -> Result<Decimal, EntityError> {
        let sales: Vec<Sale> = self.fetch(Table::Sales, columns::CUSTOMER_ID, id).await?;
        let vouchers: Vec<Voucher> = self.fetch(Table::Vouchers, columns::ENTITY_ID, id).await?;
        replay_balance(PartyRole::Customer, id, &self.policy, &sales, &vouchers)
            .map_err(|source| replay_error(EntityKind::Customer, source))
    }

    async fn supplier_balance(&self, id: RecordId) -> Result<Decimal, EntityError> {
        let purchases: Vec<Purchase> = self.fetch(Table::Purchases, columns::SUPPLIER_ID, id).await?;
        let vouchers: Vec<Voucher> = self.fetch(Table::Vouchers, columns::ENTITY_ID, id).await?;
        replay_balance(PartyRole::Supplier, id, &self.policy, &purchases, &vouchers)
            .map_err(|source| replay_error(EntityKind::Supplier, source))
    }

    async fn on_hand(&self, id: RecordId) -> Result<Quantity, EntityError> {
        let bought: Vec<PurchaseItem> = self
            .fetch(Table::PurchaseItems, columns::BATTERY_TYPE_ID, id)
            .await?;
        let sold: Vec<SaleItem> = self
            .fetch(Table::SaleItems, columns::BATTERY_TYPE_ID, id)
            .await?;

        let on_hand = replay_on_hand(BatteryTypeId(id), &bought, &sold)
            .map_err(|source| replay_error(EntityKind::BatteryType, source))?;
        debug!(
            battery_type_id = %id,
            purchase_items = bought.len(),
            sale_items = sold.len(),
            %on_hand,
            "stock replayed"
        );
        Ok(on_hand)
    }

    async fn fetch<T>(&self, table: Table, column: &'static str, id: RecordId) -> Result<Vec<T>, EntityError>
    where
        T: DeserializeOwned,
    {
        let rows = self
            .store
            .query_by_foreign_key(table, column, id)
            .await
            .map_err(|source| EntityError::Fetch {
                table: table.name(),
                source,
            })?;

        rows.into_iter()
            .map(|row| {
                serde_json::from_value(row).map_err(|e| EntityError::Decode {
                    table: table.name(),
                    reason: e.to_string(),
                })
            })
            .collect()
    }

    async fn commit<E>(&self, entity: &E, value: AggregateValue, dry_run: bool) -> Result<(), EntityError>
    where
        E: Entity + Sync,
    {
        let kind = E::KIND;
        let table = Table::for_kind(kind);
        let id: RecordId = (*entity.id()).into();

        if dry_run {
            debug!(kind = %kind, entity_id = %id, value = ?value, "dry run; not written");
            return Ok(());
        }

        self.store
            .update_field(table, id, kind.aggregate_field(), value.as_field_value())
            .await
            .map_err(|source| EntityError::Write {
                table: table.name(),
                source,
            })?;

        debug!(kind = %kind, entity_id = %id, value = ?value, "aggregate written");
        Ok(())
    }
}

fn replay_error(kind: EntityKind, source: DomainError) -> EntityError {
    EntityError::Replay {
        table: Table::for_kind(kind).name(),
        source,
    }
}
