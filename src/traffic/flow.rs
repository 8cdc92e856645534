use std::{fmt::Display, str::FromStr};

use thiserror::Error;

use crate::traffic::StationTraffic;

/// Style value used for stations without any traffic.
/// It is the same value as [`FlowClass::Balanced`], only the meaning differs.
pub const NEUTRAL_FLOW: f64 = 0.5;

const LOWER_THRESHOLD: f64 = 1.0 / 3.0;
const UPPER_THRESHOLD: f64 = 2.0 / 3.0;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown flow class: {0}")]
pub struct UnknownFlowClass(pub String);

/// Departure ratio of a station quantized into three equal parts of `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowClass {
    /// Ratio in `[0, 1/3)`, mostly arrivals.
    ArrivalDominant,
    /// Ratio in `[1/3, 2/3)`.
    Balanced,
    /// Ratio in `[2/3, 1]`, mostly departures.
    DepartureDominant,
}

impl FlowClass {
    /// Quantizes a departure ratio. Values outside `[0, 1]` clamp to the
    /// nearest class.
    pub fn classify(ratio: f64) -> Self {
        if ratio < LOWER_THRESHOLD {
            Self::ArrivalDominant
        } else if ratio < UPPER_THRESHOLD {
            Self::Balanced
        } else {
            Self::DepartureDominant
        }
    }

    /// Class of `departures / total`, None when there is no traffic.
    pub fn from_counts(departures: u32, total: u32) -> Option<Self> {
        if total == 0 {
            return None;
        }
        Some(Self::classify(f64::from(departures) / f64::from(total)))
    }

    /// The quantized ratio: 0, 0.5 or 1.
    pub const fn value(&self) -> f64 {
        match self {
            Self::ArrivalDominant => 0.0,
            Self::Balanced => 0.5,
            Self::DepartureDominant => 1.0,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::ArrivalDominant => "arrivals",
            Self::Balanced => "balanced",
            Self::DepartureDominant => "departures",
        }
    }
}

impl Display for FlowClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FlowClass {
    type Err = UnknownFlowClass;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "arrivals" => Ok(Self::ArrivalDominant),
            "balanced" => Ok(Self::Balanced),
            "departures" => Ok(Self::DepartureDominant),
            other => Err(UnknownFlowClass(other.to_string())),
        }
    }
}

/// The legend toggles.
///
/// With nothing selected every station is shown. Once a class is selected
/// only stations with traffic in a selected class are shown.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FlowSelection {
    pub departures: bool,
    pub balanced: bool,
    pub arrivals: bool,
}

impl FlowSelection {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with(mut self, class: FlowClass) -> Self {
        *self.slot(class) = true;
        self
    }

    pub fn toggle(&mut self, class: FlowClass) {
        let slot = self.slot(class);
        *slot = !*slot;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub const fn is_active(&self) -> bool {
        self.departures || self.balanced || self.arrivals
    }

    pub const fn contains(&self, class: FlowClass) -> bool {
        match class {
            FlowClass::ArrivalDominant => self.arrivals,
            FlowClass::Balanced => self.balanced,
            FlowClass::DepartureDominant => self.departures,
        }
    }

    pub fn matches(&self, traffic: &StationTraffic) -> bool {
        if !self.is_active() {
            return true;
        }
        traffic.flow.is_some_and(|class| self.contains(class))
    }

    fn slot(&mut self, class: FlowClass) -> &mut bool {
        match class {
            FlowClass::ArrivalDominant => &mut self.arrivals,
            FlowClass::Balanced => &mut self.balanced,
            FlowClass::DepartureDominant => &mut self.departures,
        }
    }
}

/// Comma separated class names, e.g. `departures,arrivals`. Empty selects nothing.
impl FromStr for FlowSelection {
    type Err = UnknownFlowClass;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .filter(|part| !part.trim().is_empty())
            .try_fold(Self::default(), |selection, part| {
                part.parse().map(|class| selection.with(class))
            })
    }
}

#[test]
fn classify_thresholds() {
    assert_eq!(FlowClass::classify(0.0), FlowClass::ArrivalDominant);
    assert_eq!(FlowClass::classify(0.2), FlowClass::ArrivalDominant);
    assert_eq!(FlowClass::classify(1.0 / 3.0), FlowClass::Balanced);
    assert_eq!(FlowClass::classify(0.5), FlowClass::Balanced);
    assert_eq!(FlowClass::classify(2.0 / 3.0), FlowClass::DepartureDominant);
    assert_eq!(FlowClass::classify(0.9), FlowClass::DepartureDominant);
    assert_eq!(FlowClass::classify(1.0), FlowClass::DepartureDominant);
}

#[test]
fn classify_values() {
    assert_eq!(FlowClass::classify(0.2).value(), 0.0);
    assert_eq!(FlowClass::classify(0.5).value(), 0.5);
    assert_eq!(FlowClass::classify(0.9).value(), 1.0);
}

#[test]
fn from_counts_thirds() {
    assert_eq!(FlowClass::from_counts(0, 0), None);
    assert_eq!(FlowClass::from_counts(1, 3), Some(FlowClass::Balanced));
    assert_eq!(FlowClass::from_counts(2, 3), Some(FlowClass::DepartureDominant));
    assert_eq!(FlowClass::from_counts(0, 5), Some(FlowClass::ArrivalDominant));
}

#[test]
fn selection_from_str() {
    let selection: FlowSelection = "departures, arrivals".parse().unwrap();
    assert!(selection.departures);
    assert!(!selection.balanced);
    assert!(selection.arrivals);
    assert_eq!("".parse::<FlowSelection>(), Ok(FlowSelection::default()));
    assert_eq!(
        "sideways".parse::<FlowSelection>(),
        Err(UnknownFlowClass("sideways".into()))
    );
}

#[test]
fn selection_toggle() {
    let mut selection = FlowSelection::new();
    selection.toggle(FlowClass::Balanced);
    assert!(selection.is_active());
    selection.toggle(FlowClass::Balanced);
    assert!(!selection.is_active());

    let mut selection = FlowSelection::new()
        .with(FlowClass::ArrivalDominant)
        .with(FlowClass::DepartureDominant);
    selection.clear();
    assert_eq!(selection, FlowSelection::default());
}
