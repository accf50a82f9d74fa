//! Usage gate bound to a key-value store.
//!
//! Every transition is written to the store before the in-memory state moves,
//! so a failed write leaves both sides where they were.

use fx_types::ports::keys;
use fx_types::{AppError, Feature, KeyValueStore, LoginRequest, Plan, StoreError, UsageState};

/// Holds the session's usage state and keeps it in sync with `K`.
pub struct UsageGate<K: KeyValueStore> {
    store: K,
    state: UsageState,
}

impl<K: KeyValueStore> UsageGate<K> {
    /// Reads the persisted session. Missing or garbled values start at their
    /// defaults.
    pub fn load(store: K) -> Result<Self, StoreError> {
        let state = read_state(&store)?;
        tracing::debug!(
            logged_in = state.is_authenticated,
            subscribed = state.is_subscribed,
            conversions = state.conversion_count,
            charts = state.chart_open_count,
            "usage state loaded"
        );
        Ok(Self { store, state })
    }

    pub fn state(&self) -> &UsageState {
        &self.state
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    /// Would one more `feature` action be admitted? Nothing is recorded.
    pub fn check(&self, feature: Feature) -> Result<(), AppError> {
        self.state.check(feature)?;
        Ok(())
    }

    /// Admits and records one `feature` action.
    pub fn admit(&mut self, feature: Feature) -> Result<(), AppError> {
        let consumption = self.state.check(feature)?;
        if consumption.new_count != self.state.count(feature) {
            self.store
                .set(counter_key(feature), &consumption.new_count.to_string())?;
        }

        let mut next = self.state.clone();
        next.consume(feature)?;
        self.state = next;

        tracing::debug!(?feature, count = self.state.count(feature), "usage recorded");
        Ok(())
    }

    /// Validates the form, then marks the session authenticated with fresh
    /// counters.
    pub fn login(&mut self, req: &LoginRequest) -> Result<(), AppError> {
        req.validate()?;

        let mut next = self.state.clone();
        next.login(req.email.trim());
        write_state(&self.store, &next)?;
        self.state = next;

        tracing::info!(email = %req.email.trim(), "logged in");
        Ok(())
    }

    pub fn subscribe(&mut self, plan: Plan) -> Result<(), AppError> {
        let mut next = self.state.clone();
        next.subscribe(plan);
        write_state(&self.store, &next)?;
        self.state = next;

        tracing::info!(%plan, "subscribed");
        Ok(())
    }

    pub fn logout(&mut self) -> Result<(), AppError> {
        let next = UsageState::default();
        write_state(&self.store, &next)?;
        self.state = next;

        tracing::info!("logged out");
        Ok(())
    }
}

fn counter_key(feature: Feature) -> &'static str {
    match feature {
        Feature::Convert => keys::USAGE_COUNT,
        Feature::Chart => keys::CHART_USAGE_COUNT,
    }
}

fn read_flag<K: KeyValueStore>(store: &K, key: &str) -> Result<bool, StoreError> {
    Ok(store.get(key)?.is_some_and(|v| v.trim() == "true"))
}

fn read_count<K: KeyValueStore>(store: &K, key: &str) -> Result<u32, StoreError> {
    Ok(store
        .get(key)?
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0))
}

fn read_state<K: KeyValueStore>(store: &K) -> Result<UsageState, StoreError> {
    Ok(UsageState {
        is_authenticated: read_flag(store, keys::IS_LOGGED_IN)?,
        is_subscribed: read_flag(store, keys::HAS_SUBSCRIPTION)?,
        conversion_count: read_count(store, keys::USAGE_COUNT)?,
        chart_open_count: read_count(store, keys::CHART_USAGE_COUNT)?,
        user_email: store.get(keys::USER_EMAIL)?.filter(|e| !e.trim().is_empty()),
        plan: store.get(keys::PLAN)?.and_then(|p| p.parse().ok()),
    })
}

fn write_state<K: KeyValueStore>(store: &K, state: &UsageState) -> Result<(), StoreError> {
    let logged_in = state.is_authenticated.to_string();
    let subscribed = state.is_subscribed.to_string();
    let conversions = state.conversion_count.to_string();
    let charts = state.chart_open_count.to_string();

    store.apply(&[
        (keys::IS_LOGGED_IN, Some(logged_in.as_str())),
        (keys::HAS_SUBSCRIPTION, Some(subscribed.as_str())),
        (keys::USAGE_COUNT, Some(conversions.as_str())),
        (keys::CHART_USAGE_COUNT, Some(charts.as_str())),
        (keys::USER_EMAIL, state.user_email.as_deref()),
        (keys::PLAN, state.plan.map(|plan| plan.id())),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use fx_store::MemoryStore;
    use fx_types::{GateDenial, Quota};

    /// Memory store whose writes start failing once `broken` is set.
    struct FlakyStore {
        inner: MemoryStore,
        broken: AtomicBool,
        write_calls: AtomicUsize,
    }

    impl FlakyStore {
        fn new() -> Self {
            Self {
                inner: MemoryStore::new(),
                broken: AtomicBool::new(false),
                write_calls: AtomicUsize::new(0),
            }
        }

        fn break_writes(&self) {
            self.broken.store(true, Ordering::SeqCst);
            self.write_calls.store(0, Ordering::SeqCst);
        }

        fn write(&self) -> Result<(), StoreError> {
            self.write_calls.fetch_add(1, Ordering::SeqCst);
            if self.broken.load(Ordering::SeqCst) {
                return Err(StoreError::Io("disk full".into()));
            }
            Ok(())
        }
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            self.write()?;
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StoreError> {
            self.write()?;
            self.inner.remove(key)
        }

        fn apply(&self, changes: &[(&str, Option<&str>)]) -> Result<(), StoreError> {
            self.write()?;
            self.inner.apply(changes)
        }
    }

    fn login_form() -> LoginRequest {
        LoginRequest {
            email: "john@gmail.com".into(),
            password: "123456".into(),
        }
    }

    #[test]
    fn test_fresh_store_is_anonymous() {
        let gate = UsageGate::load(MemoryStore::new()).unwrap();
        assert_eq!(gate.state(), &UsageState::default());
        assert_eq!(gate.state().quota(), Quota::Limited(1));
    }

    #[test]
    fn test_garbled_values_read_as_defaults() {
        let store = MemoryStore::new();
        store.set(keys::IS_LOGGED_IN, "yes please").unwrap();
        store.set(keys::USAGE_COUNT, "-4").unwrap();
        store.set(keys::CHART_USAGE_COUNT, "lots").unwrap();
        store.set(keys::PLAN, "weekly").unwrap();

        let gate = UsageGate::load(store).unwrap();
        assert_eq!(gate.state(), &UsageState::default());
    }

    #[test]
    fn test_admit_persists_counter() {
        let mut gate = UsageGate::load(MemoryStore::new()).unwrap();
        gate.admit(Feature::Convert).unwrap();

        assert_eq!(
            gate.store().get(keys::USAGE_COUNT).unwrap().as_deref(),
            Some("1")
        );
        assert!(gate.store().get(keys::CHART_USAGE_COUNT).unwrap().is_none());
    }

    #[test]
    fn test_denied_admit_changes_nothing() {
        let mut gate = UsageGate::load(MemoryStore::new()).unwrap();
        gate.admit(Feature::Chart).unwrap();

        let err = gate.admit(Feature::Chart).unwrap_err();
        assert!(matches!(
            err,
            AppError::QuotaExceeded(GateDenial::LoginRequired(Feature::Chart))
        ));
        assert_eq!(gate.state().chart_open_count, 1);
        assert_eq!(
            gate.store().get(keys::CHART_USAGE_COUNT).unwrap().as_deref(),
            Some("1")
        );
    }

    #[test]
    fn test_state_survives_reload() {
        let store = std::sync::Arc::new(MemoryStore::new());
        {
            let mut gate = UsageGate::load(store.clone()).unwrap();
            gate.login(&login_form()).unwrap();
            gate.admit(Feature::Convert).unwrap();
            gate.admit(Feature::Convert).unwrap();
        }

        let gate = UsageGate::load(store).unwrap();
        assert!(gate.state().is_authenticated);
        assert_eq!(gate.state().conversion_count, 2);
        assert_eq!(gate.state().user_email.as_deref(), Some("john@gmail.com"));
    }

    #[test]
    fn test_invalid_login_leaves_state_alone() {
        let mut gate = UsageGate::load(MemoryStore::new()).unwrap();
        let err = gate
            .login(&LoginRequest {
                email: "john@gmail.com".into(),
                password: "123".into(),
            })
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(!gate.state().is_authenticated);
        assert!(gate.store().get(keys::IS_LOGGED_IN).unwrap().is_none());
    }

    #[test]
    fn test_subscribe_persists_plan() {
        let mut gate = UsageGate::load(MemoryStore::new()).unwrap();
        gate.login(&login_form()).unwrap();
        gate.subscribe(Plan::Yearly).unwrap();

        assert_eq!(
            gate.store().get(keys::HAS_SUBSCRIPTION).unwrap().as_deref(),
            Some("true")
        );
        assert_eq!(
            gate.store().get(keys::PLAN).unwrap().as_deref(),
            Some("yearly")
        );
        assert_eq!(gate.state().quota(), Quota::Unlimited);
    }

    #[test]
    fn test_unlimited_admit_does_not_touch_counter() {
        let mut gate = UsageGate::load(MemoryStore::new()).unwrap();
        gate.login(&login_form()).unwrap();
        gate.subscribe(Plan::Monthly).unwrap();

        for _ in 0..10 {
            gate.admit(Feature::Convert).unwrap();
        }
        assert_eq!(gate.state().conversion_count, 0);
    }

    #[test]
    fn test_failed_logout_leaves_session_whole() {
        let store = std::sync::Arc::new(FlakyStore::new());
        let mut gate = UsageGate::load(store.clone()).unwrap();
        gate.login(&login_form()).unwrap();
        gate.subscribe(Plan::Monthly).unwrap();
        let before = gate.state().clone();

        store.break_writes();
        let err = gate.logout().unwrap_err();

        assert!(matches!(err, AppError::Storage(_)));
        assert_eq!(store.write_calls.load(Ordering::SeqCst), 1);
        assert_eq!(gate.state(), &before);
        assert_eq!(read_state(&store.inner).unwrap(), before);
    }

    #[test]
    fn test_logout_clears_session_keys() {
        let mut gate = UsageGate::load(MemoryStore::new()).unwrap();
        gate.login(&login_form()).unwrap();
        gate.subscribe(Plan::Monthly).unwrap();
        gate.admit(Feature::Chart).unwrap();

        gate.logout().unwrap();

        assert_eq!(gate.state(), &UsageState::default());
        let store = gate.store();
        assert_eq!(store.get(keys::IS_LOGGED_IN).unwrap().as_deref(), Some("false"));
        assert_eq!(store.get(keys::CHART_USAGE_COUNT).unwrap().as_deref(), Some("0"));
        assert!(store.get(keys::USER_EMAIL).unwrap().is_none());
        assert!(store.get(keys::PLAN).unwrap().is_none());
    }
}
