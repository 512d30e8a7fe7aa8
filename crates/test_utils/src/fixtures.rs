//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for the bill split domain. These fixtures
//! are consistent and predictable so tests can compare against literals.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use core_kernel::{AccountId, AccountTypeKey, Money, Percentage, TimeWindow, Timezone};
use domain_feature::{FeatureFlagState, FlagSnapshot};
use rust_decimal_macros::dec;
use uuid::Uuid;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// A typical bill total
    pub fn bill_total() -> Money {
        Money::display(dec!(100.00))
    }

    /// The explicit share in the 100/40/60 scenario
    pub fn explicit_share() -> Money {
        Money::display(dec!(40.00))
    }

    /// The residual in the 100/40/60 scenario
    pub fn residual_share() -> Money {
        Money::display(dec!(60.00))
    }

    pub fn zero() -> Money {
        Money::zero()
    }

    /// An internally computed amount with four fractional digits
    pub fn storage_third() -> Money {
        Money::new(dec!(33.3333))
    }

    /// A negative amount for rejection tests
    pub fn negative() -> Money {
        Money::display(dec!(-5.00))
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Standard due date (Mar 15, 2024 17:00 UTC)
    pub fn due_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 17, 0, 0).unwrap()
    }

    /// Local wall-clock due time used with [`TemporalFixtures::new_york`]
    pub fn local_due() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    pub fn new_york() -> Timezone {
        "America/New_York".parse().unwrap()
    }

    /// Launch window covering all of 2024
    pub fn launch_window() -> TimeWindow {
        TimeWindow::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        )
        .unwrap()
    }

    /// Inside [`TemporalFixtures::launch_window`]
    pub fn mid_launch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    /// After [`TemporalFixtures::launch_window`]
    pub fn after_launch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap()
    }
}

/// Fixture for account type keys
pub struct AccountTypeFixtures;

impl AccountTypeFixtures {
    pub fn checking() -> AccountTypeKey {
        AccountTypeKey::new("checking")
    }

    pub fn savings() -> AccountTypeKey {
        AccountTypeKey::new("savings")
    }

    pub fn credit() -> AccountTypeKey {
        AccountTypeKey::new("credit")
    }

    pub fn bnpl() -> AccountTypeKey {
        AccountTypeKey::new("bnpl")
    }

    pub fn ewa() -> AccountTypeKey {
        AccountTypeKey::new("ewa")
    }

    pub fn payment_app() -> AccountTypeKey {
        AccountTypeKey::new("payment_app")
    }

    /// A key no registry knows about
    pub fn unregistered() -> AccountTypeKey {
        AccountTypeKey::new("crypto_wallet")
    }

    /// Types that split generically, without a specialized module
    pub fn generic_splitters() -> Vec<AccountTypeKey> {
        ["checking", "savings", "credit", "brokerage", "hsa"]
            .into_iter()
            .map(AccountTypeKey::new)
            .collect()
    }

    /// Types that split only through their specialized module
    pub fn gated_splitters() -> Vec<AccountTypeKey> {
        vec![Self::bnpl(), Self::ewa()]
    }
}

/// Fixture for deterministic identifiers
pub struct IdFixtures;

impl IdFixtures {
    /// Creates a deterministic account ID for snapshot-style assertions
    pub fn account_id(n: u128) -> AccountId {
        AccountId::from_uuid(Uuid::from_u128(n))
    }

    pub fn primary_account() -> AccountId {
        Self::account_id(1)
    }

    pub fn secondary_account() -> AccountId {
        Self::account_id(2)
    }
}

/// Fixture for feature flag snapshots
pub struct FlagFixtures;

impl FlagFixtures {
    pub const SPLIT: &'static str = "split_allocation";
    pub const BALANCE: &'static str = "typed_balance_validation";
    pub const AUTOPAY: &'static str = "autopay";

    fn all(enabled: bool) -> FlagSnapshot {
        FlagSnapshot::new([
            FeatureFlagState::boolean(Self::SPLIT, enabled),
            FeatureFlagState::boolean(Self::BALANCE, enabled),
            FeatureFlagState::boolean(Self::AUTOPAY, enabled),
        ])
        .unwrap()
    }

    /// Every gated operation on
    pub fn all_on() -> FlagSnapshot {
        Self::all(true)
    }

    /// Every gated operation off
    pub fn all_off() -> FlagSnapshot {
        Self::all(false)
    }

    /// Specialized splitting enabled only for the given account types
    pub fn split_scoped_to(account_types: &[&str]) -> FlagSnapshot {
        FlagSnapshot::new([
            FeatureFlagState::boolean(Self::SPLIT, true).for_account_types(account_types.iter().copied()),
        ])
        .unwrap()
    }

    /// Specialized splitting rolled out to a percentage of subjects
    pub fn split_rollout(percentage: u32) -> FlagSnapshot {
        FlagSnapshot::new([FeatureFlagState::percentage(
            Self::SPLIT,
            Percentage::new(percentage.into()).unwrap(),
        )])
        .unwrap()
    }

    /// Specialized splitting on for the `beta` segment
    pub fn split_for_beta() -> FlagSnapshot {
        FlagSnapshot::new([FeatureFlagState::segment(Self::SPLIT, ["beta"])]).unwrap()
    }

    /// Specialized splitting on during [`TemporalFixtures::launch_window`]
    pub fn split_during_launch() -> FlagSnapshot {
        FlagSnapshot::new([FeatureFlagState::time_window(
            Self::SPLIT,
            TemporalFixtures::launch_window(),
        )])
        .unwrap()
    }

    /// The JSON document form of [`FlagFixtures::all_on`]
    pub fn all_on_json() -> String {
        serde_json::to_string(&Self::all_on().to_document()).unwrap()
    }
}
