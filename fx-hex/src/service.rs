//! Converter Application Service
//!
//! Holds the converter's form state and turns user intents into rate fetches,
//! gated conversions and chart loads. Contains NO infrastructure logic.

use chrono::{Local, NaiveDate};

use exchange_rates::{convert, rate_badge, search_by_country};
use fx_types::{
    AppError, AsOf, ConversionResult, CurrencyCode, Feature, HistoricalSample, KeyValueStore,
    LoginRequest, Plan, RateSource, RateTable, UsageState,
};

use crate::freshness::{Generation, Ticket};
use crate::gate::UsageGate;
use crate::history;

/// An outstanding request for the rates of one base currency and snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateRequest {
    pub ticket: Ticket,
    pub base: CurrencyCode,
    pub as_of: AsOf,
}

/// An outstanding request for twelve months of one pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub ticket: Ticket,
    pub from: CurrencyCode,
    pub to: CurrencyCode,
}

/// What pressing the chart button did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartToggle {
    Opened,
    Closed,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Application service for the converter.
///
/// Generic over `S: RateSource` and `K: KeyValueStore`; adapters are injected
/// at compile time so tests can swap in scripted sources and in-memory stores.
pub struct ConverterService<S: RateSource, K: KeyValueStore> {
    source: S,
    gate: UsageGate<K>,
    clock: fn() -> NaiveDate,

    amount: f64,
    from: CurrencyCode,
    to: CurrencyCode,
    as_of: AsOf,

    rates: RateTable,
    rates_gen: Generation,
    result: Option<ConversionResult>,

    chart_open: bool,
    history: Vec<HistoricalSample>,
    history_gen: Generation,
}

impl<S: RateSource, K: KeyValueStore> ConverterService<S, K> {
    /// Creates a service starting at `1 USD -> INR, latest`, with the usage
    /// state read from `store`.
    pub fn new(source: S, store: K) -> Result<Self, AppError> {
        let gate = UsageGate::load(store)?;
        let from = CurrencyCode::usd();
        let as_of = AsOf::Latest;

        Ok(Self {
            source,
            gate,
            clock: local_today,
            amount: 1.0,
            rates: RateTable::empty(from.clone(), as_of),
            from,
            to: CurrencyCode::inr(),
            as_of,
            rates_gen: Generation::default(),
            result: None,
            chart_open: false,
            history: Vec::new(),
            history_gen: Generation::default(),
        })
    }

    /// Replaces the wall clock used for "today".
    pub fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn from(&self) -> &CurrencyCode {
        &self.from
    }

    pub fn to(&self) -> &CurrencyCode {
        &self.to
    }

    pub fn as_of(&self) -> AsOf {
        self.as_of
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// The last successful conversion, while the inputs it used still stand.
    pub fn result(&self) -> Option<&ConversionResult> {
        self.result.as_ref()
    }

    pub fn has_converted(&self) -> bool {
        self.result.is_some()
    }

    pub fn chart_open(&self) -> bool {
        self.chart_open
    }

    pub fn history(&self) -> &[HistoricalSample] {
        &self.history
    }

    pub fn usage(&self) -> &UsageState {
        self.gate.state()
    }

    /// Currencies offered in both selectors: whatever the current table has.
    pub fn currency_options(&self) -> Vec<&CurrencyCode> {
        self.rates.codes().collect()
    }

    /// Unit-rate line for the current pair, once a conversion is shown.
    pub fn badge(&self) -> Option<String> {
        self.result.as_ref()?;
        rate_badge(&self.rates, &self.to)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Form Inputs
    // ─────────────────────────────────────────────────────────────────────────────

    /// Sets the amount. A shown result stays until the next conversion.
    pub fn set_amount(&mut self, amount: f64) -> Result<(), AppError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(AppError::BadRequest(
                "Amount must be a non-negative number".into(),
            ));
        }
        self.amount = amount;
        Ok(())
    }

    pub fn select_from(&mut self, code: CurrencyCode) {
        if code == self.from {
            return;
        }
        self.from = code;
        self.result = None;
        self.supersede_rates();
        self.supersede_history();
    }

    pub fn select_to(&mut self, code: CurrencyCode) {
        if code == self.to {
            return;
        }
        self.to = code;
        self.result = None;
        self.supersede_history();
    }

    /// Accepts `""`, `"latest"` or a `YYYY-MM-DD` date between the earliest
    /// supported snapshot and today.
    pub fn select_date(&mut self, input: &str) -> Result<(), AppError> {
        let as_of = AsOf::parse_bounded(input, self.today())?;
        if as_of == self.as_of {
            return Ok(());
        }
        self.as_of = as_of;
        self.result = None;
        self.supersede_rates();
        Ok(())
    }

    /// Exchanges source and target. A shown result becomes the new amount.
    pub fn swap(&mut self) {
        if let Some(value) = self.result.take().and_then(|r| r.value_f64()) {
            self.amount = value;
        }
        std::mem::swap(&mut self.from, &mut self.to);
        self.supersede_rates();
        self.supersede_history();
    }

    fn supersede_rates(&mut self) {
        self.rates_gen.invalidate();
        self.rates = RateTable::empty(self.from.clone(), self.as_of);
    }

    fn supersede_history(&mut self) {
        self.history_gen.invalidate();
        self.history.clear();
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Rates
    // ─────────────────────────────────────────────────────────────────────────────

    /// Starts a rate fetch for the current inputs, superseding any earlier one.
    pub fn rate_request(&mut self) -> RateRequest {
        RateRequest {
            ticket: self.rates_gen.issue(),
            base: self.from.clone(),
            as_of: self.as_of,
        }
    }

    /// Installs a fetched table unless its request has been superseded.
    /// Returns whether the table was applied.
    pub fn apply_rates(&mut self, req: &RateRequest, table: RateTable) -> bool {
        if !self.rates_gen.is_current(req.ticket) || table.base() != &req.base {
            tracing::debug!(base = %req.base, as_of = %req.as_of, "discarding stale rates");
            return false;
        }
        tracing::debug!(base = %req.base, as_of = %req.as_of, count = table.len(), "rates applied");
        self.rates = table;
        true
    }

    /// Fetches and applies rates for the current inputs.
    pub async fn refresh_rates(&mut self) -> &RateTable {
        let req = self.rate_request();
        let table = self.source.fetch_rates(&req.base, req.as_of).await;
        self.apply_rates(&req, table);
        &self.rates
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Conversion
    // ─────────────────────────────────────────────────────────────────────────────

    /// Converts the current amount, consuming one conversion.
    ///
    /// The quota is checked before anything else. A missing rate is reported
    /// without being counted.
    pub fn convert(&mut self) -> Result<ConversionResult, AppError> {
        self.gate.check(Feature::Convert)?;

        let result = convert(self.amount, &self.rates, &self.to);
        if !result.is_valid() {
            return Err(AppError::NoRate {
                from: self.from.clone(),
                to: self.to.clone(),
            });
        }

        self.gate.admit(Feature::Convert)?;
        tracing::info!(
            amount = result.amount,
            from = %result.from,
            to = %result.to,
            value = %result,
            "converted"
        );
        self.result = Some(result.clone());
        Ok(result)
    }

    /// Fetches the current table and converts against it. A session that is
    /// out of conversions is turned away before the request goes out.
    pub async fn refresh_and_convert(&mut self) -> Result<ConversionResult, AppError> {
        self.gate.check(Feature::Convert)?;
        self.refresh_rates().await;
        self.convert()
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Chart
    // ─────────────────────────────────────────────────────────────────────────────

    /// Opens the chart (gated) or closes it (always free).
    pub fn toggle_chart(&mut self) -> Result<ChartToggle, AppError> {
        if self.chart_open {
            self.chart_open = false;
            self.supersede_history();
            return Ok(ChartToggle::Closed);
        }

        self.gate.admit(Feature::Chart)?;
        self.chart_open = true;
        Ok(ChartToggle::Opened)
    }

    /// Starts a history load for the current pair, superseding any earlier one.
    pub fn history_request(&mut self) -> HistoryRequest {
        HistoryRequest {
            ticket: self.history_gen.issue(),
            from: self.from.clone(),
            to: self.to.clone(),
        }
    }

    /// Installs loaded samples unless the chart was closed or the pair changed
    /// since `req` was issued.
    pub fn apply_history(&mut self, req: &HistoryRequest, samples: Vec<HistoricalSample>) -> bool {
        if !self.chart_open || !self.history_gen.is_current(req.ticket) {
            tracing::debug!(from = %req.from, to = %req.to, "discarding stale history");
            return false;
        }
        self.history = samples;
        true
    }

    /// Loads twelve months for the current pair into the open chart.
    pub async fn load_history(&mut self) -> Result<&[HistoricalSample], AppError> {
        if !self.chart_open {
            return Err(AppError::BadRequest("Chart is not open".into()));
        }

        let req = self.history_request();
        let today = self.today();
        let samples = history::fetch_history(&self.source, &req.from, &req.to, today).await?;
        self.apply_history(&req, samples);
        Ok(&self.history)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Session
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn login(&mut self, req: &LoginRequest) -> Result<(), AppError> {
        self.gate.login(req)
    }

    /// Subscribing is offered to logged-in users only.
    pub fn subscribe(&mut self, plan: Plan) -> Result<(), AppError> {
        if !self.gate.state().is_authenticated {
            return Err(AppError::BadRequest("Please login before subscribing".into()));
        }
        self.gate.subscribe(plan)
    }

    pub fn logout(&mut self) -> Result<(), AppError> {
        self.gate.logout()
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Lookup
    // ─────────────────────────────────────────────────────────────────────────────

    /// Currencies in the current table whose country matches `query`.
    pub fn search(&self, query: &str) -> Vec<CurrencyCode> {
        search_by_country(query, self.rates.codes())
    }
}
