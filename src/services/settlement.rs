use std::collections::{BTreeMap, BTreeSet, HashMap};

use bigdecimal::{BigDecimal, Zero};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::database::models::{
    Adjustment, NewRemittance, RemittanceStatus, TimeSegment, WorkLog,
};
use crate::database::repositories::{
    adjustment as adjustment_repo, remittance as remittance_repo,
    time_segment as time_segment_repo, worklog as worklog_repo,
};
use crate::database::transaction::DatabaseTransaction;
use crate::error::AppError;
use crate::services::money;
use crate::services::period::{self, SettlementPeriod};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateRemittancesInput {
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub dry_run: bool,
    pub payout_status: Option<RemittanceStatus>,
}

/// One worker's batch as reported back to the caller. For dry runs the id is
/// freshly generated and not durable.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemittanceSummary {
    pub id: Uuid,
    pub worker_id: Uuid,
    pub gross_amount: BigDecimal,
    pub net_amount: BigDecimal,
    pub status: RemittanceStatus,
    pub worklogs_count: usize,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRemittancesSummary {
    pub remittances_created: usize,
    pub total_gross_amount: BigDecimal,
    pub total_net_amount: BigDecimal,
    pub remittances: Vec<RemittanceSummary>,
    pub dry_run: bool,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    /// Units skipped because their worklog could not be resolved. Non-zero
    /// values point at referential corruption upstream.
    pub skipped_units: usize,
}

impl GenerateRemittancesSummary {
    fn empty(period: SettlementPeriod, dry_run: bool, skipped_units: usize) -> Self {
        GenerateRemittancesSummary {
            remittances_created: 0,
            total_gross_amount: BigDecimal::zero(),
            total_net_amount: BigDecimal::zero(),
            remittances: Vec::new(),
            dry_run,
            period_start: period.start,
            period_end: period.end,
            skipped_units,
        }
    }

    fn push(&mut self, summary: RemittanceSummary) {
        self.total_gross_amount += summary.gross_amount.clone();
        self.total_net_amount += summary.net_amount.clone();
        self.remittances.push(summary);
        self.remittances_created = self.remittances.len();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Segment,
    Adjustment,
}

/// One priced payable unit scheduled into a batch.
#[derive(Debug, Clone)]
pub struct BatchUnit {
    pub id: Uuid,
    pub worklog_id: Uuid,
    pub amount: BigDecimal,
    pub kind: UnitKind,
}

/// Draft of one worker's payout: every unpaid unit of theirs, priced, with
/// gross (positive amounts only) and net (signs included) totals.
#[derive(Debug, Clone)]
pub struct WorkerBatch {
    pub worker_id: Uuid,
    pub gross_amount: BigDecimal,
    pub net_amount: BigDecimal,
    pub units: Vec<BatchUnit>,
    pub worklog_ids: BTreeSet<Uuid>,
}

#[derive(Debug, Clone)]
pub struct BatchPlan {
    pub batches: Vec<WorkerBatch>,
    pub skipped_units: usize,
}

/// Group the fetched unpaid units by worker and price them. Pure computation
/// over already-fetched rows; persistence happens in `generate_remittances`.
///
/// A unit whose worklog is missing from the map is skipped and counted, not
/// fatal. A segment with negative duration aborts the whole draft.
pub fn draft_batches(
    segments: Vec<TimeSegment>,
    adjustments: Vec<Adjustment>,
    worklogs: &HashMap<Uuid, WorkLog>,
) -> Result<BatchPlan, AppError> {
    let mut grouped: BTreeMap<Uuid, WorkerBatch> = BTreeMap::new();
    let mut skipped_units = 0usize;

    for segment in &segments {
        let Some(worklog) = worklogs.get(&segment.worklog_id) else {
            log::warn!(
                "Skipping segment {}: worklog {} not found",
                segment.id,
                segment.worklog_id
            );
            skipped_units += 1;
            continue;
        };

        let amount = money::segment_amount(segment, &worklog.hourly_rate)?;
        push_unit(
            &mut grouped,
            worklog,
            BatchUnit {
                id: segment.id,
                worklog_id: worklog.id,
                amount,
                kind: UnitKind::Segment,
            },
        );
    }

    for adjustment in &adjustments {
        let Some(worklog) = worklogs.get(&adjustment.worklog_id) else {
            log::warn!(
                "Skipping adjustment {}: worklog {} not found",
                adjustment.id,
                adjustment.worklog_id
            );
            skipped_units += 1;
            continue;
        };

        push_unit(
            &mut grouped,
            worklog,
            BatchUnit {
                id: adjustment.id,
                worklog_id: worklog.id,
                amount: adjustment.amount.clone(),
                kind: UnitKind::Adjustment,
            },
        );
    }

    // A worker whose units sum to exactly nothing is left alone; their units
    // stay unremitted for a future run.
    let batches = grouped
        .into_values()
        .filter(|batch| !(batch.gross_amount.is_zero() && batch.net_amount.is_zero()))
        .collect();

    Ok(BatchPlan {
        batches,
        skipped_units,
    })
}

fn push_unit(grouped: &mut BTreeMap<Uuid, WorkerBatch>, worklog: &WorkLog, unit: BatchUnit) {
    let batch = grouped
        .entry(worklog.worker_id)
        .or_insert_with(|| WorkerBatch {
            worker_id: worklog.worker_id,
            gross_amount: BigDecimal::zero(),
            net_amount: BigDecimal::zero(),
            units: Vec::new(),
            worklog_ids: BTreeSet::new(),
        });

    batch.net_amount += unit.amount.clone();
    if unit.amount > BigDecimal::zero() {
        batch.gross_amount += unit.amount.clone();
    }
    batch.worklog_ids.insert(worklog.id);
    batch.units.push(unit);
}

/// Generate remittances for every worker with outstanding unpaid units.
///
/// The selection is system-wide, not period-filtered: everything owed gets
/// paid, and the resolved period labels the produced remittances. Real runs
/// execute select, insert and unit mutation in one transaction with the
/// selected rows locked, so a concurrent run cannot settle the same unit
/// twice. Dry runs read outside any transaction and mutate nothing.
pub async fn generate_remittances(
    input: GenerateRemittancesInput,
) -> Result<GenerateRemittancesSummary, AppError> {
    let resolved = period::resolve(input.period_start, input.period_end)?;
    let status = input.payout_status.unwrap_or(RemittanceStatus::Completed);

    if input.dry_run {
        return preview(resolved, status).await;
    }

    let failure_reason = failure_reason_for(status);

    DatabaseTransaction::run(move |tx| {
        Box::pin(async move {
            let segments = time_segment_repo::find_unremitted_active_for_update(tx).await?;
            let adjustments = adjustment_repo::find_unremitted_for_update(tx).await?;
            let worklogs = load_worklogs_locked(tx, &segments, &adjustments).await?;

            let plan = draft_batches(segments, adjustments, &worklogs)?;
            let now = Utc::now();
            let mut summary = GenerateRemittancesSummary::empty(resolved, false, plan.skipped_units);

            for batch in plan.batches {
                let remittance = remittance_repo::create_remittance(
                    tx,
                    NewRemittance {
                        worker_id: batch.worker_id,
                        gross_amount: money::round2(&batch.gross_amount),
                        net_amount: money::round2(&batch.net_amount),
                        status,
                        failure_reason: failure_reason.clone(),
                        period_start: resolved.starts_at(),
                        period_end: resolved.ends_at(),
                        processed_at: (status == RemittanceStatus::Completed).then_some(now),
                    },
                )
                .await?;

                // Units move to REMITTED only on a COMPLETED outcome. Any
                // other status keeps the money unpaid and re-batchable.
                if status == RemittanceStatus::Completed {
                    for unit in &batch.units {
                        match unit.kind {
                            UnitKind::Segment => {
                                time_segment_repo::mark_remitted(tx, unit.id, remittance.id).await?
                            }
                            UnitKind::Adjustment => {
                                adjustment_repo::mark_remitted(tx, unit.id, remittance.id).await?
                            }
                        }
                        worklog_repo::apply_settlement(tx, unit.worklog_id, &unit.amount, remittance.id)
                            .await?;
                    }
                }

                summary.push(RemittanceSummary {
                    id: remittance.id,
                    worker_id: batch.worker_id,
                    gross_amount: remittance.gross_amount.clone(),
                    net_amount: remittance.net_amount.clone(),
                    status,
                    worklogs_count: batch.worklog_ids.len(),
                    period_start: resolved.start,
                    period_end: resolved.end,
                });
            }

            log::info!(
                "Generated {} remittances (gross {}, net {})",
                summary.remittances_created,
                summary.total_gross_amount,
                summary.total_net_amount
            );

            Ok(summary)
        })
    })
    .await
}

/// Dry run: same drafting and totals as a real run, zero writes.
async fn preview(
    resolved: SettlementPeriod,
    status: RemittanceStatus,
) -> Result<GenerateRemittancesSummary, AppError> {
    let segments = time_segment_repo::find_unremitted_active().await?;
    let adjustments = adjustment_repo::find_unremitted().await?;
    let worklogs = load_worklogs(&segments, &adjustments).await?;

    let plan = draft_batches(segments, adjustments, &worklogs)?;
    let mut summary = GenerateRemittancesSummary::empty(resolved, true, plan.skipped_units);

    for batch in plan.batches {
        summary.push(RemittanceSummary {
            id: Uuid::new_v4(),
            worker_id: batch.worker_id,
            gross_amount: money::round2(&batch.gross_amount),
            net_amount: money::round2(&batch.net_amount),
            status,
            worklogs_count: batch.worklog_ids.len(),
            period_start: resolved.start,
            period_end: resolved.end,
        });
    }

    Ok(summary)
}

fn failure_reason_for(status: RemittanceStatus) -> Option<String> {
    matches!(
        status,
        RemittanceStatus::Failed | RemittanceStatus::Cancelled
    )
    .then(|| format!("Payout marked as {} by request", status))
}

fn worklog_ids<'a>(
    segments: &'a [TimeSegment],
    adjustments: &'a [Adjustment],
) -> impl Iterator<Item = Uuid> + 'a {
    segments
        .iter()
        .map(|s| s.worklog_id)
        .chain(adjustments.iter().map(|a| a.worklog_id))
}

/// Resolve every referenced worklog once, inside the settlement transaction,
/// locking the rows whose running totals will be bumped.
async fn load_worklogs_locked(
    tx: &mut Transaction<'_, Postgres>,
    segments: &[TimeSegment],
    adjustments: &[Adjustment],
) -> Result<HashMap<Uuid, WorkLog>, AppError> {
    let mut cache: HashMap<Uuid, WorkLog> = HashMap::new();
    for id in worklog_ids(segments, adjustments) {
        if cache.contains_key(&id) {
            continue;
        }
        if let Some(worklog) = worklog_repo::find_by_id_for_update(tx, id).await? {
            cache.insert(id, worklog);
        }
    }
    Ok(cache)
}

async fn load_worklogs(
    segments: &[TimeSegment],
    adjustments: &[Adjustment],
) -> Result<HashMap<Uuid, WorkLog>, AppError> {
    let mut cache: HashMap<Uuid, WorkLog> = HashMap::new();
    for id in worklog_ids(segments, adjustments) {
        if cache.contains_key(&id) {
            continue;
        }
        if let Some(worklog) = worklog_repo::find_by_id(id).await? {
            cache.insert(id, worklog);
        }
    }
    Ok(cache)
}
