//! Release rule and grouping tests.

use alianza_shared::types::ClientId;
use chrono::NaiveDate;
use proptest::prelude::*;

use super::grouping::ClientNameIndex;
use super::rule::{ReleaseRule, ReleaseState, normalize_client_name};
use crate::commission::{CommissionPeriod, PaymentStatus};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn march_2024() -> CommissionPeriod {
    CommissionPeriod::new(3, 2024).unwrap()
}

#[test]
fn test_released_after_month_end_when_all_paid() {
    let state = ReleaseRule::evaluate(&march_2024(), date(2024, 4, 2), [PaymentStatus::Paid]);
    assert_eq!(state, ReleaseState::Released);
}

#[test]
fn test_held_when_any_transfer_pending() {
    let state = ReleaseRule::evaluate(
        &march_2024(),
        date(2024, 4, 2),
        [PaymentStatus::Paid, PaymentStatus::Pending],
    );
    assert_eq!(state, ReleaseState::Held);
}

#[test]
fn test_held_before_month_end() {
    let state = ReleaseRule::evaluate(&march_2024(), date(2024, 3, 31), [PaymentStatus::Paid]);
    assert_eq!(state, ReleaseState::Held);
}

#[test]
fn test_released_on_threshold_day() {
    let state = ReleaseRule::evaluate(&march_2024(), date(2024, 4, 1), [PaymentStatus::Paid]);
    assert_eq!(state, ReleaseState::Released);
}

#[test]
fn test_empty_period_is_held() {
    let state = ReleaseRule::evaluate(&march_2024(), date(2025, 1, 1), []);
    assert_eq!(state, ReleaseState::Held);
}

#[test]
fn test_regression_flips_back_to_held() {
    let period = march_2024();
    let today = date(2024, 5, 1);
    assert_eq!(
        ReleaseRule::evaluate(&period, today, [PaymentStatus::Paid, PaymentStatus::Paid]),
        ReleaseState::Released
    );
    assert_eq!(
        ReleaseRule::evaluate(&period, today, [PaymentStatus::Paid, PaymentStatus::Pending]),
        ReleaseState::Held
    );
}

#[test]
fn test_release_state_flags() {
    assert!(ReleaseState::Released.is_released());
    assert!(!ReleaseState::Held.is_released());
    assert_eq!(ReleaseState::from_flag(true), ReleaseState::Released);
    assert_eq!(ReleaseState::from_flag(false), ReleaseState::Held);
}

#[test]
fn test_normalize_client_name() {
    assert_eq!(normalize_client_name("  acme corp "), "ACME CORP");
    assert_eq!(normalize_client_name("ACME   CORP"), "ACME CORP");
    assert_eq!(normalize_client_name("acme\tcorp\n"), "ACME CORP");
    assert_eq!(normalize_client_name(""), "");
}

#[test]
fn test_same_name_clients_share_group() {
    let first = ClientId::new();
    let second = ClientId::new();
    let other = ClientId::new();
    let index = ClientNameIndex::new([
        (first, "  acme corp "),
        (second, "ACME CORP"),
        (other, "GLOBEX"),
    ]);

    let mut group = index.group_of(first);
    group.sort();
    let mut expected = vec![first, second];
    expected.sort();
    assert_eq!(group, expected);
    assert_eq!(index.group_of(other), vec![other]);
    assert_eq!(index.members("ACME CORP").len(), 2);
    assert!(index.members("INITECH").is_empty());
}

#[test]
fn test_unknown_client_is_its_own_group() {
    let index = ClientNameIndex::default();
    let lonely = ClientId::new();
    assert_eq!(index.group_of(lonely), vec![lonely]);
}

#[test]
fn test_release_keys_collapse_duplicate_names() {
    let first = ClientId::new();
    let second = ClientId::new();
    let other = ClientId::new();
    let index = ClientNameIndex::new([
        (first, "  acme corp "),
        (second, "ACME CORP"),
        (other, "GLOBEX"),
    ]);
    let march = march_2024();
    let april = CommissionPeriod::new(4, 2024).unwrap();

    let keys = index.release_keys([
        (first, march),
        (second, march),
        (other, march),
        (first, april),
        (ClientId::new(), march),
    ]);

    assert_eq!(keys.len(), 3);
    assert!(
        keys.iter()
            .any(|k| k.client_name == "ACME CORP" && k.period == march)
    );
    assert!(
        keys.iter()
            .any(|k| k.client_name == "ACME CORP" && k.period == april)
    );
    assert!(keys.iter().any(|k| k.client_name == "GLOBEX"));
}

fn status() -> impl Strategy<Value = PaymentStatus> {
    prop_oneof![Just(PaymentStatus::Pending), Just(PaymentStatus::Paid)]
}

proptest! {
    /// Before the threshold nothing is ever released.
    #[test]
    fn prop_never_released_before_threshold(
        statuses in prop::collection::vec(status(), 0..20),
        day in 1u32..=31,
    ) {
        let today = date(2024, 3, day);
        prop_assert_eq!(
            ReleaseRule::evaluate(&march_2024(), today, statuses),
            ReleaseState::Held
        );
    }

    /// After the threshold the rule reduces to "non-empty and all paid".
    #[test]
    fn prop_after_threshold_matches_all_paid(
        statuses in prop::collection::vec(status(), 0..20),
        days_after in 0i64..400,
    ) {
        let today = date(2024, 4, 1) + chrono::Duration::days(days_after);
        let expected = !statuses.is_empty() && statuses.iter().all(|s| s.is_paid());
        let state = ReleaseRule::evaluate(&march_2024(), today, statuses);
        prop_assert_eq!(state.is_released(), expected);
    }

    /// Re-evaluating with unchanged inputs never changes the outcome.
    #[test]
    fn prop_evaluation_is_stable(
        statuses in prop::collection::vec(status(), 0..20),
        days_after in 0i64..400,
    ) {
        let today = date(2024, 4, 1) + chrono::Duration::days(days_after);
        let first = ReleaseRule::evaluate(&march_2024(), today, statuses.clone());
        let second = ReleaseRule::evaluate(&march_2024(), today, statuses);
        prop_assert_eq!(first, second);
    }
}
