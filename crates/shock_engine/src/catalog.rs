//! Event resolution and preset scenarios.
//!
//! Free text resolves to an [`EventSpec`] through an ordered keyword table:
//! the first keyword contained in the lowercased text wins. Unknown text gets
//! a synthetic event in the recent past.
//!
//! Preset scenarios are fixed windows used by the portfolio simulation.

use rand::Rng;
use serde::Serialize;
use shock_core::types::{Date, DateRange, EventSpec, ShockError};
use tracing::debug;

/// Calendar date held as components so tables can be `const`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Ymd(i32, u32, u32);

impl Ymd {
    fn date(self) -> Result<Date, ShockError> {
        Date::from_ymd(self.0, self.1, self.2)
    }
}

/// A known historical event matched by keyword.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeywordEvent {
    keyword: &'static str,
    name: &'static str,
    date: Ymd,
    severity: f64,
}

impl KeywordEvent {
    /// Lowercase substring that selects this event.
    pub fn keyword(&self) -> &'static str {
        self.keyword
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Fractional peak decline.
    pub fn severity(&self) -> f64 {
        self.severity
    }

    /// Date the event hit the market.
    pub fn event_date(&self) -> Result<Date, ShockError> {
        self.date.date()
    }

    /// Resolved event.
    pub fn to_event(&self) -> Result<EventSpec, ShockError> {
        EventSpec::new(self.name, self.event_date()?, self.severity)
    }
}

/// Known events in match priority order.
pub const KEYWORD_EVENTS: [KeywordEvent; 6] = [
    KeywordEvent {
        keyword: "covid",
        name: "COVID-19 Pandemic",
        date: Ymd(2020, 2, 15),
        severity: 0.35,
    },
    KeywordEvent {
        keyword: "financial crisis",
        name: "2008 Financial Crisis",
        date: Ymd(2008, 9, 15),
        severity: 0.40,
    },
    KeywordEvent {
        keyword: "dot com",
        name: "Dot-com Bubble Burst",
        date: Ymd(2000, 3, 10),
        severity: 0.30,
    },
    KeywordEvent {
        keyword: "brexit",
        name: "Brexit Referendum",
        date: Ymd(2016, 6, 23),
        severity: 0.15,
    },
    KeywordEvent {
        keyword: "ukraine",
        name: "Russia-Ukraine Conflict",
        date: Ymd(2022, 2, 24),
        severity: 0.12,
    },
    KeywordEvent {
        keyword: "inflation",
        name: "Inflation Spike",
        date: Ymd(2021, 10, 1),
        severity: 0.10,
    },
];

/// Severity range of synthetic events.
pub const SYNTHETIC_SEVERITY_RANGE: (f64, f64) = (0.10, 0.25);

/// Synthetic events are placed 1 to this many years before today.
pub const SYNTHETIC_MAX_YEARS_BACK: i64 = 10;

/// Resolves free-text event descriptions.
///
/// # Examples
///
/// ```
/// use shock_engine::catalog::ScenarioCatalog;
///
/// let catalog = ScenarioCatalog::new();
/// let event = catalog.resolve("Impact of the COVID outbreak").unwrap();
/// assert_eq!(event.name(), "COVID-19 Pandemic");
/// assert_eq!(event.severity(), 0.35);
///
/// assert!(catalog.resolve("   ").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioCatalog {
    entries: Vec<KeywordEvent>,
}

impl ScenarioCatalog {
    /// Catalog with the built-in keyword table.
    pub fn new() -> Self {
        Self {
            entries: KEYWORD_EVENTS.to_vec(),
        }
    }

    /// Keyword entries in priority order.
    pub fn entries(&self) -> &[KeywordEvent] {
        &self.entries
    }

    /// First entry whose keyword appears in `text` (case-insensitive).
    pub fn lookup(&self, text: &str) -> Option<&KeywordEvent> {
        let lowered = text.to_lowercase();
        self.entries.iter().find(|e| lowered.contains(e.keyword))
    }

    /// Resolve `text` against today's date and the thread-local RNG.
    pub fn resolve(&self, text: &str) -> Result<EventSpec, ShockError> {
        self.resolve_with(text, Date::today(), &mut rand::thread_rng())
    }

    /// Resolve `text`, synthesising an event relative to `today` when no
    /// keyword matches.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when `text` is empty or whitespace only.
    pub fn resolve_with<R: Rng + ?Sized>(
        &self,
        text: &str,
        today: Date,
        rng: &mut R,
    ) -> Result<EventSpec, ShockError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ShockError::InvalidInput(
                "event description must not be empty".to_string(),
            ));
        }

        if let Some(entry) = self.lookup(text) {
            debug!(keyword = entry.keyword, name = entry.name, "matched catalog event");
            return entry.to_event();
        }

        let years_back = rng.gen_range(1..=SYNTHETIC_MAX_YEARS_BACK);
        let event_date = today.sub_days(365 * years_back);
        let severity = rng.gen_range(SYNTHETIC_SEVERITY_RANGE.0..=SYNTHETIC_SEVERITY_RANGE.1);
        debug!(%event_date, severity, "synthesised event for unmatched text");

        EventSpec::new(format!("Market Event: {}", text), event_date, severity)
    }
}

impl Default for ScenarioCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Preset portfolio scenarios.
///
/// Unknown keys fall back to [`PresetKind::Covid`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetKind {
    /// 2020 pandemic sell-off
    Covid,
    /// 2008 credit crisis
    FinancialCrisis,
    /// 2000 technology bubble
    DotCom,
    /// 2022 inflation shock
    Inflation,
}

impl PresetKind {
    /// All presets.
    pub const ALL: [PresetKind; 4] = [
        PresetKind::Covid,
        PresetKind::FinancialCrisis,
        PresetKind::DotCom,
        PresetKind::Inflation,
    ];

    /// Lookup key.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Covid => "covid",
            Self::FinancialCrisis => "financial_crisis",
            Self::DotCom => "dot_com",
            Self::Inflation => "inflation",
        }
    }

    /// Preset matching `key`, if any.
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_lowercase();
        Self::ALL.into_iter().find(|p| p.key() == key)
    }

    /// Preset matching `key`, falling back to covid.
    pub fn from_key_or_default(key: &str) -> Self {
        Self::from_key(key).unwrap_or(Self::Covid)
    }

    /// Display name derived from the key ("financial_crisis" → "Financial Crisis").
    pub fn display_name(&self) -> String {
        key_display_name(self.key())
    }

    /// Short description.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Covid => "Pandemic lockdown crash, February to June 2020",
            Self::FinancialCrisis => "Lehman collapse and credit freeze, August to December 2008",
            Self::DotCom => "Technology bubble deflation, March to July 2000",
            Self::Inflation => "Rate-hike driven sell-off, January to May 2022",
        }
    }

    fn definition(&self) -> (Ymd, Ymd, Ymd, f64) {
        match self {
            Self::Covid => (Ymd(2020, 2, 1), Ymd(2020, 6, 1), Ymd(2020, 3, 1), 0.30),
            Self::FinancialCrisis => (Ymd(2008, 8, 1), Ymd(2008, 12, 31), Ymd(2008, 9, 15), 0.35),
            Self::DotCom => (Ymd(2000, 3, 1), Ymd(2000, 7, 31), Ymd(2000, 4, 14), 0.25),
            Self::Inflation => (Ymd(2022, 1, 1), Ymd(2022, 5, 31), Ymd(2022, 2, 15), 0.20),
        }
    }

    /// Resolved window, impact date and severity.
    pub fn scenario(&self) -> Result<PresetScenario, ShockError> {
        let (start, end, impact, severity) = self.definition();
        Ok(PresetScenario {
            kind: *self,
            range: DateRange::new(start.date()?, end.date()?),
            impact_date: impact.date()?,
            severity,
        })
    }
}

/// Title-cases a scenario key, treating underscores as spaces.
///
/// ```
/// use shock_engine::catalog::key_display_name;
///
/// assert_eq!(key_display_name("dot_com"), "Dot Com");
/// assert_eq!(key_display_name("BLACK_monday"), "Black Monday");
/// ```
pub fn key_display_name(key: &str) -> String {
    key.replace('_', " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// A preset scenario with concrete dates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PresetScenario {
    /// Which preset
    pub kind: PresetKind,
    /// Simulation window
    pub range: DateRange,
    /// Date of the shock
    pub impact_date: Date,
    /// Shock severity
    pub severity: f64,
}

impl PresetScenario {
    /// Resolved event for this preset.
    pub fn to_event(&self) -> Result<EventSpec, ShockError> {
        EventSpec::new(self.kind.display_name(), self.impact_date, self.severity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_keyword_table_dates_are_valid() {
        for entry in KEYWORD_EVENTS {
            assert!(entry.to_event().is_ok(), "{}", entry.keyword());
        }
    }

    #[test]
    fn test_resolve_known_events() {
        let catalog = ScenarioCatalog::new();
        let mut rng = StdRng::seed_from_u64(1);
        let today = d(2026, 1, 1);

        let cases = [
            ("the 2008 Financial Crisis", "2008 Financial Crisis", d(2008, 9, 15), 0.40),
            ("Dot com crash", "Dot-com Bubble Burst", d(2000, 3, 10), 0.30),
            ("BREXIT vote", "Brexit Referendum", d(2016, 6, 23), 0.15),
            ("war in Ukraine", "Russia-Ukraine Conflict", d(2022, 2, 24), 0.12),
            ("inflation shock", "Inflation Spike", d(2021, 10, 1), 0.10),
        ];
        for (text, name, date, severity) in cases {
            let event = catalog.resolve_with(text, today, &mut rng).unwrap();
            assert_eq!(event.name(), name);
            assert_eq!(event.event_date(), date);
            assert_eq!(event.severity(), severity);
        }
    }

    #[test]
    fn test_first_keyword_wins() {
        let catalog = ScenarioCatalog::new();
        let entry = catalog.lookup("covid driven inflation").unwrap();
        assert_eq!(entry.name(), "COVID-19 Pandemic");
    }

    #[test]
    fn test_synthetic_event() {
        let catalog = ScenarioCatalog::new();
        let today = d(2026, 1, 1);
        let mut rng = StdRng::seed_from_u64(99);

        for _ in 0..50 {
            let event = catalog.resolve_with(" alien landing ", today, &mut rng).unwrap();
            assert_eq!(event.name(), "Market Event: alien landing");
            assert!((0.10..=0.25).contains(&event.severity()));

            let days_back = today - event.event_date();
            assert_eq!(days_back % 365, 0);
            assert!((365..=3650).contains(&days_back));
        }
    }

    #[test]
    fn test_empty_text_rejected() {
        let catalog = ScenarioCatalog::new();
        let mut rng = StdRng::seed_from_u64(1);
        let result = catalog.resolve_with("", d(2026, 1, 1), &mut rng);
        assert!(matches!(result, Err(ShockError::InvalidInput(_))));
    }

    #[test]
    fn test_preset_lookup_and_fallback() {
        assert_eq!(PresetKind::from_key("dot_com"), Some(PresetKind::DotCom));
        assert_eq!(PresetKind::from_key("Financial_Crisis"), Some(PresetKind::FinancialCrisis));
        assert_eq!(PresetKind::from_key("tulips"), None);
        assert_eq!(PresetKind::from_key_or_default("tulips"), PresetKind::Covid);
    }

    #[test]
    fn test_preset_display_names() {
        assert_eq!(PresetKind::Covid.display_name(), "Covid");
        assert_eq!(PresetKind::FinancialCrisis.display_name(), "Financial Crisis");
        assert_eq!(PresetKind::DotCom.display_name(), "Dot Com");
    }

    #[test]
    fn test_preset_scenarios_resolve() {
        let fc = PresetKind::FinancialCrisis.scenario().unwrap();
        assert_eq!(fc.range.start(), d(2008, 8, 1));
        assert_eq!(fc.range.end(), d(2008, 12, 31));
        assert_eq!(fc.impact_date, d(2008, 9, 15));
        assert_eq!(fc.severity, 0.35);

        for kind in PresetKind::ALL {
            let scenario = kind.scenario().unwrap();
            assert!(scenario.range.contains(scenario.impact_date));
            assert!(scenario.to_event().is_ok());
        }
    }
}
