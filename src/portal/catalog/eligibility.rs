//! Eligibility matching: the predicate deciding whether one catalog entry
//! admits one citizen profile, and the order-preserving filter built on it.
//!
//! The rule-set is a conjunction of independent criteria. The evaluator is
//! strict about missing data: a profile field left unset fails any non-empty
//! constraint on that field, and an unset age fails any present age bound.
//! Missing data therefore narrows results instead of widening them, and the
//! evaluator never errors; a malformed entry simply does not match.

use super::domain::{CatalogEntry, CitizenProfile, EligibilityRules};

/// Membership test for one set-valued criterion. An empty set places no
/// restriction; a non-empty set requires a declared, contained value.
fn admits<T: PartialEq>(allowed: &[T], declared: Option<&T>) -> bool {
    if allowed.is_empty() {
        return true;
    }
    match declared {
        Some(value) => allowed.contains(value),
        None => false,
    }
}

/// Inclusive age-window test. A present bound cannot be verified without a
/// declared age, so an unset age fails it.
fn within_age_window(rules: &EligibilityRules, age: Option<u8>) -> bool {
    if rules.age_min.is_none() && rules.age_max.is_none() {
        return true;
    }
    let Some(age) = age else {
        return false;
    };
    if rules.age_min.is_some_and(|min| age < min) {
        return false;
    }
    if rules.age_max.is_some_and(|max| age > max) {
        return false;
    }
    true
}

/// Decide whether `profile` satisfies every criterion in `rules`.
///
/// Pure and total: no I/O, no panics, deterministic for any input. The
/// criteria short-circuit, but the outcome is order-independent.
pub fn matches(rules: &EligibilityRules, profile: &CitizenProfile) -> bool {
    admits(&rules.category, profile.category.as_ref())
        && admits(&rules.gender, profile.gender.as_ref())
        && admits(&rules.state, profile.state.as_ref())
        && admits(&rules.education, profile.education.as_ref())
        && admits(&rules.income, profile.income.as_ref())
        && admits(&rules.marital_status, profile.marital_status.as_ref())
        && admits(&rules.occupation, profile.occupation.as_ref())
        && admits(&rules.disability, profile.disability.as_ref())
        && within_age_window(rules, profile.age)
}

/// Keep the entries whose rule-set admits `profile`, in their original
/// relative order. Stateless and restartable; an empty catalog yields an
/// empty result.
pub fn filter_eligible(
    entries: impl IntoIterator<Item = CatalogEntry>,
    profile: &CitizenProfile,
) -> Vec<CatalogEntry> {
    entries
        .into_iter()
        .filter(|entry| matches(&entry.eligibility, profile))
        .collect()
}

/// Post-filter hook for re-ordering or scoring an eligible set.
///
/// Implementations receive only entries that already passed [`matches`] and
/// may rearrange or trim them; they cannot widen the set, so filtering
/// semantics stay fixed no matter what ranker is installed.
pub trait MatchRanker: Send + Sync {
    fn rank(&self, eligible: Vec<CatalogEntry>, profile: &CitizenProfile) -> Vec<CatalogEntry>;
}

/// Run the filter, then hand the survivors to `ranker` when one is present.
pub fn filter_and_rank(
    entries: impl IntoIterator<Item = CatalogEntry>,
    profile: &CitizenProfile,
    ranker: Option<&dyn MatchRanker>,
) -> Vec<CatalogEntry> {
    let eligible = filter_eligible(entries, profile);
    match ranker {
        Some(ranker) => ranker.rank(eligible, profile),
        None => eligible,
    }
}
