use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Duration, TimeZone, Utc};
use fake::faker::lorem::en::Sentence;
use fake::Fake;
use uuid::Uuid;

use paylog::config::Config;
use paylog::database::models::{
    Adjustment, AdjustmentType, SettlementStatus, TimeSegment, TimeSegmentStatus, WorkLog,
};

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://@localhost:5432/paylog_test".to_string(),
        jwt_secret: "test-jwt-secret-key-that-is-long-enough".to_string(),
        jwt_expiration_days: 1,
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
    }
}

pub fn dec(s: &str) -> BigDecimal {
    s.parse().expect("valid decimal literal")
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
}

/// In-memory row builders for exercising the settlement engine without
/// storage.
pub struct MockData;

impl MockData {
    pub fn worklog(worker_id: Uuid, hourly_rate: &str) -> WorkLog {
        WorkLog {
            id: Uuid::new_v4(),
            task_id: Uuid::new_v4(),
            worker_id,
            hourly_rate: dec(hourly_rate),
            total_remitted_amount: BigDecimal::zero(),
            remittance_id: None,
            created_at: base_time(),
        }
    }

    pub fn segment(worklog: &WorkLog, seconds: i64) -> TimeSegment {
        TimeSegment {
            id: Uuid::new_v4(),
            worklog_id: worklog.id,
            start_time: base_time(),
            end_time: base_time() + Duration::seconds(seconds),
            status: TimeSegmentStatus::Active,
            settlement_status: SettlementStatus::Unremitted,
            remittance_id: None,
            created_at: base_time(),
        }
    }

    pub fn remitted_segment(worklog: &WorkLog, seconds: i64, remittance_id: Uuid) -> TimeSegment {
        let mut segment = Self::segment(worklog, seconds);
        segment.settlement_status = SettlementStatus::Remitted;
        segment.remittance_id = Some(remittance_id);
        segment
    }

    pub fn adjustment(worklog: &WorkLog, amount: &str, adjustment_type: AdjustmentType) -> Adjustment {
        Adjustment {
            id: Uuid::new_v4(),
            worklog_id: worklog.id,
            amount: dec(amount),
            reason: Sentence(3..6).fake(),
            adjustment_type,
            settlement_status: SettlementStatus::Unremitted,
            remittance_id: None,
            created_at: base_time(),
        }
    }
}
