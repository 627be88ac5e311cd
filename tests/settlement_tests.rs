mod common;

use std::collections::HashMap;

use bigdecimal::{BigDecimal, Zero};
use pretty_assertions::assert_eq;
use uuid::Uuid;

use common::{dec, MockData};
use paylog::database::models::{
    Adjustment, AdjustmentType, SettlementStatus, TimeSegment, TimeSegmentStatus, WorkLog,
};
use paylog::services::ledger::{self, WorkLogSettlement};
use paylog::services::settlement::{draft_batches, BatchPlan, UnitKind};

/// The batcher's selection predicate: ACTIVE + UNREMITTED segments and
/// UNREMITTED adjustments, system-wide.
fn select_unpaid(
    segments: &[TimeSegment],
    adjustments: &[Adjustment],
) -> (Vec<TimeSegment>, Vec<Adjustment>) {
    let segments = segments
        .iter()
        .filter(|s| {
            s.status == TimeSegmentStatus::Active
                && s.settlement_status == SettlementStatus::Unremitted
        })
        .cloned()
        .collect();
    let adjustments = adjustments
        .iter()
        .filter(|a| a.settlement_status == SettlementStatus::Unremitted)
        .cloned()
        .collect();
    (segments, adjustments)
}

/// Apply a COMPLETED outcome the way the settlement transaction does: mark
/// every drafted unit REMITTED, link it to its batch and bump the parent
/// worklog's running total.
fn apply_completed(
    plan: &BatchPlan,
    segments: &mut [TimeSegment],
    adjustments: &mut [Adjustment],
    worklogs: &mut HashMap<Uuid, WorkLog>,
) {
    for batch in &plan.batches {
        let remittance_id = Uuid::new_v4();
        for unit in &batch.units {
            match unit.kind {
                UnitKind::Segment => {
                    let segment = segments.iter_mut().find(|s| s.id == unit.id).unwrap();
                    segment.settlement_status = SettlementStatus::Remitted;
                    segment.remittance_id = Some(remittance_id);
                }
                UnitKind::Adjustment => {
                    let adjustment = adjustments.iter_mut().find(|a| a.id == unit.id).unwrap();
                    adjustment.settlement_status = SettlementStatus::Remitted;
                    adjustment.remittance_id = Some(remittance_id);
                }
            }
            let worklog = worklogs.get_mut(&unit.worklog_id).unwrap();
            worklog.total_remitted_amount += unit.amount.clone();
            worklog.remittance_id = Some(remittance_id);
        }
    }
}

#[test]
fn rerun_with_no_new_work_drafts_nothing() {
    let worker = Uuid::new_v4();
    let wl = MockData::worklog(worker, "25.00");
    let mut worklogs: HashMap<Uuid, WorkLog> = HashMap::from([(wl.id, wl.clone())]);

    let mut segments = vec![MockData::segment(&wl, 7200), MockData::segment(&wl, 3600)];
    let mut adjustments = vec![MockData::adjustment(&wl, "10.00", AdjustmentType::Bonus)];

    let (unpaid_segments, unpaid_adjustments) = select_unpaid(&segments, &adjustments);
    let plan = draft_batches(unpaid_segments, unpaid_adjustments, &worklogs).unwrap();
    assert_eq!(plan.batches.len(), 1);
    assert_eq!(plan.batches[0].net_amount, dec("85.00"));

    apply_completed(&plan, &mut segments, &mut adjustments, &mut worklogs);

    // Second run straight after: the selection comes back empty.
    let (unpaid_segments, unpaid_adjustments) = select_unpaid(&segments, &adjustments);
    assert!(unpaid_segments.is_empty());
    assert!(unpaid_adjustments.is_empty());

    let rerun = draft_batches(unpaid_segments, unpaid_adjustments, &worklogs).unwrap();
    assert!(rerun.batches.is_empty());
}

#[test]
fn settled_units_are_never_selected_again_and_totals_bump_once() {
    let worker = Uuid::new_v4();
    let wl = MockData::worklog(worker, "20.00");
    let mut worklogs: HashMap<Uuid, WorkLog> = HashMap::from([(wl.id, wl.clone())]);

    let mut segments = vec![MockData::segment(&wl, 5400)];
    let mut adjustments = Vec::new();

    let (unpaid_segments, unpaid_adjustments) = select_unpaid(&segments, &adjustments);
    let plan = draft_batches(unpaid_segments, unpaid_adjustments, &worklogs).unwrap();
    apply_completed(&plan, &mut segments, &mut adjustments, &mut worklogs);

    let settled = worklogs.get(&wl.id).unwrap();
    assert_eq!(settled.total_remitted_amount, dec("30.00"));
    assert_eq!(segments[0].settlement_status, SettlementStatus::Remitted);
    assert!(segments[0].remittance_id.is_some());

    // Log more work: only the new segment is selected, and the running total
    // grows by exactly its amount.
    segments.push(MockData::segment(&wl, 3600));

    let (unpaid_segments, unpaid_adjustments) = select_unpaid(&segments, &adjustments);
    assert_eq!(unpaid_segments.len(), 1);

    let plan = draft_batches(unpaid_segments, unpaid_adjustments, &worklogs).unwrap();
    assert_eq!(plan.batches[0].net_amount, dec("20.00"));

    apply_completed(&plan, &mut segments, &mut adjustments, &mut worklogs);
    assert_eq!(
        worklogs.get(&wl.id).unwrap().total_remitted_amount,
        dec("50.00")
    );
}

#[test]
fn retroactive_adjustment_reopens_and_settles_alone() {
    let worker = Uuid::new_v4();
    let wl = MockData::worklog(worker, "20.00");
    let mut worklogs: HashMap<Uuid, WorkLog> = HashMap::from([(wl.id, wl.clone())]);

    let mut segments = vec![MockData::segment(&wl, 8 * 3600)];
    let mut adjustments = Vec::new();

    let (unpaid_segments, unpaid_adjustments) = select_unpaid(&segments, &adjustments);
    let plan = draft_batches(unpaid_segments, unpaid_adjustments, &worklogs).unwrap();
    apply_completed(&plan, &mut segments, &mut adjustments, &mut worklogs);

    let amounts = ledger::worklog_amounts(&worklogs[&wl.id], &segments, &adjustments).unwrap();
    assert_eq!(amounts.unremitted_amount, BigDecimal::zero());
    assert_eq!(amounts.classification(), WorkLogSettlement::Remitted);

    // A bonus lands after the payout went out.
    adjustments.push(MockData::adjustment(&wl, "40.00", AdjustmentType::Bonus));

    let amounts = ledger::worklog_amounts(&worklogs[&wl.id], &segments, &adjustments).unwrap();
    assert_eq!(amounts.classification(), WorkLogSettlement::Unremitted);
    assert_eq!(amounts.unremitted_amount, dec("40.00"));

    // The next run pays exactly the adjustment, touching nothing settled.
    let previously_settled_id = segments[0].remittance_id;
    let (unpaid_segments, unpaid_adjustments) = select_unpaid(&segments, &adjustments);
    let plan = draft_batches(unpaid_segments, unpaid_adjustments, &worklogs).unwrap();
    assert_eq!(plan.batches.len(), 1);
    assert_eq!(plan.batches[0].units.len(), 1);
    assert_eq!(plan.batches[0].net_amount, dec("40.00"));

    apply_completed(&plan, &mut segments, &mut adjustments, &mut worklogs);
    assert_eq!(segments[0].remittance_id, previously_settled_id);
    assert_eq!(
        worklogs.get(&wl.id).unwrap().total_remitted_amount,
        dec("200.00")
    );
}

#[test]
fn deduction_after_payout_nets_against_nothing_else() {
    let worker = Uuid::new_v4();
    let wl = MockData::worklog(worker, "30.00");
    let mut worklogs: HashMap<Uuid, WorkLog> = HashMap::from([(wl.id, wl.clone())]);

    let mut segments = vec![MockData::segment(&wl, 3600)];
    let mut adjustments = Vec::new();

    let (s, a) = select_unpaid(&segments, &adjustments);
    let plan = draft_batches(s, a, &worklogs).unwrap();
    apply_completed(&plan, &mut segments, &mut adjustments, &mut worklogs);

    adjustments.push(MockData::adjustment(&wl, "-12.50", AdjustmentType::Deduction));

    let (s, a) = select_unpaid(&segments, &adjustments);
    let plan = draft_batches(s, a, &worklogs).unwrap();

    // Gross counts only positive amounts; the deduction-only batch is all net.
    assert_eq!(plan.batches.len(), 1);
    assert_eq!(plan.batches[0].gross_amount, BigDecimal::zero());
    assert_eq!(plan.batches[0].net_amount, dec("-12.50"));
}

#[test]
fn disputed_work_is_left_out_until_resolved() {
    let worker = Uuid::new_v4();
    let wl = MockData::worklog(worker, "20.00");
    let worklogs: HashMap<Uuid, WorkLog> = HashMap::from([(wl.id, wl.clone())]);

    let mut disputed = MockData::segment(&wl, 3600);
    disputed.status = TimeSegmentStatus::Disputed;
    let segments = vec![disputed, MockData::segment(&wl, 1800)];

    let (unpaid_segments, unpaid_adjustments) = select_unpaid(&segments, &[]);
    assert_eq!(unpaid_segments.len(), 1);

    let plan = draft_batches(unpaid_segments, unpaid_adjustments, &worklogs).unwrap();
    assert_eq!(plan.batches[0].net_amount, dec("10.00"));
}

#[test]
fn worklog_totals_always_reconcile_with_the_ledger_view() {
    let worker = Uuid::new_v4();
    let wl = MockData::worklog(worker, "41.75");
    let mut worklogs: HashMap<Uuid, WorkLog> = HashMap::from([(wl.id, wl.clone())]);

    let mut segments = vec![
        MockData::segment(&wl, 3601),
        MockData::segment(&wl, 127),
        MockData::segment(&wl, 86400),
    ];
    let mut adjustments = vec![
        MockData::adjustment(&wl, "-3.33", AdjustmentType::Deduction),
        MockData::adjustment(&wl, "7.01", AdjustmentType::Correction),
    ];

    let (s, a) = select_unpaid(&segments, &adjustments);
    let plan = draft_batches(s, a, &worklogs).unwrap();
    apply_completed(&plan, &mut segments, &mut adjustments, &mut worklogs);

    let settled = &worklogs[&wl.id];
    let amounts = ledger::worklog_amounts(settled, &segments, &adjustments).unwrap();

    // The cached running total matches the recomputed remitted bucket, and
    // total = remitted + unremitted holds with nothing left unpaid.
    assert_eq!(settled.total_remitted_amount, amounts.remitted_amount);
    assert_eq!(amounts.unremitted_amount, BigDecimal::zero());
    assert_eq!(amounts.total_amount, amounts.remitted_amount);
}
