//! Vendor status codes decoded into closed enums.
//!
//! Each code table is a fixed mapping from a market code to a typed value.
//! Decoding is pure and total: an absent code is [`DecodeError::Missing`]
//! (incomplete data), a present but unknown one is [`DecodeError::Invalid`]
//! (inconsistent data).
//!
//! | Table | Codes |
//! |-------|-------|
//! | [`ApplicationMode`] | A18, A19, A27, A20 |
//! | [`Availability`] | A39, A38 |
//! | [`OptimizationStatus`] | A52, A49 |
//! | [`MarketObjectStatus`] | A26, A25, A24, A21, A22, A23 |
//! | [`PsrType`] | A06, B22, A04, A05, A01, B21, B24, A03, A02 |
//! | [`UnitSymbol`] | MAW, AMP, P1, C62 |
//! | [`MeasurementType`] | A01, A07, A12, A13 |
//! | [`FlowDirection`] | A01, A02 |

use gat_secmodel::{FlowSide, Instant, TapRangeKind, ThresholdUnit};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Missing {table}")]
    Missing { table: &'static str },
    #[error("Wrong {table}: {code}")]
    Invalid { table: &'static str, code: String },
}

/// A closed mapping from vendor codes to values.
pub trait CodeTable: Sized + Copy + PartialEq + 'static {
    /// Name used in audit details.
    const NAME: &'static str;
    const ENTRIES: &'static [(&'static str, Self)];

    fn code(self) -> &'static str {
        Self::ENTRIES
            .iter()
            .find(|(_, value)| *value == self)
            .map(|(code, _)| *code)
            .unwrap_or("")
    }
}

/// Decode a present code.
pub fn decode<T: CodeTable>(code: &str) -> Result<T, DecodeError> {
    T::ENTRIES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, value)| *value)
        .ok_or_else(|| DecodeError::Invalid {
            table: T::NAME,
            code: code.to_string(),
        })
}

/// Decode a required code.
pub fn decode_required<T: CodeTable>(code: Option<&str>) -> Result<T, DecodeError> {
    match code {
        Some(code) => decode(code),
        None => Err(DecodeError::Missing { table: T::NAME }),
    }
}

/// Decode an optional code that has a documented default.
pub fn decode_or<T: CodeTable>(code: Option<&str>, default: T) -> Result<T, DecodeError> {
    code.map_or(Ok(default), decode)
}

// ============================================================================
// Tables
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationMode {
    Preventive,
    Curative,
    PreventiveAndCurative,
    Auto,
}

impl CodeTable for ApplicationMode {
    const NAME: &'static str = "applicationMode_MarketObjectStatus";
    const ENTRIES: &'static [(&'static str, Self)] = &[
        ("A18", ApplicationMode::Preventive),
        ("A19", ApplicationMode::Curative),
        ("A27", ApplicationMode::PreventiveAndCurative),
        ("A20", ApplicationMode::Auto),
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    MightBeUsed,
    /// Recognized but unsupported.
    ShallBeUsed,
}

impl CodeTable for Availability {
    const NAME: &'static str = "availability_MarketObjectStatus";
    const ENTRIES: &'static [(&'static str, Self)] = &[
        ("A39", Availability::MightBeUsed),
        ("A38", Availability::ShallBeUsed),
    ];
}

/// Market-object kind of a monitored element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationStatus {
    Optimized,
    Monitored,
}

impl CodeTable for OptimizationStatus {
    const NAME: &'static str = "optimization_MarketObjectStatus";
    const ENTRIES: &'static [(&'static str, Self)] = &[
        ("A52", OptimizationStatus::Optimized),
        ("A49", OptimizationStatus::Monitored),
    ];
}

/// Market-object status of a registered resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketObjectStatus {
    Absolute,
    RelativeToInitialNetwork,
    RelativeToPreviousInstant,
    Open,
    Close,
    Stop,
}

impl CodeTable for MarketObjectStatus {
    const NAME: &'static str = "marketObjectStatus";
    const ENTRIES: &'static [(&'static str, Self)] = &[
        ("A26", MarketObjectStatus::Absolute),
        ("A25", MarketObjectStatus::RelativeToInitialNetwork),
        ("A24", MarketObjectStatus::RelativeToPreviousInstant),
        ("A21", MarketObjectStatus::Open),
        ("A22", MarketObjectStatus::Close),
        ("A23", MarketObjectStatus::Stop),
    ];
}

impl MarketObjectStatus {
    pub fn tap_range_kind(self) -> Option<TapRangeKind> {
        match self {
            MarketObjectStatus::Absolute => Some(TapRangeKind::Absolute),
            MarketObjectStatus::RelativeToInitialNetwork => {
                Some(TapRangeKind::RelativeToInitialNetwork)
            }
            MarketObjectStatus::RelativeToPreviousInstant => {
                Some(TapRangeKind::RelativeToPreviousInstant)
            }
            MarketObjectStatus::Open | MarketObjectStatus::Close | MarketObjectStatus::Stop => None,
        }
    }
}

/// Physical resource kind of a registered resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PsrType {
    Pst,
    Hvdc,
    Generation,
    Load,
    Circuit,
    TieLine,
    Line,
    Transformer,
    DeprecatedLine,
}

impl CodeTable for PsrType {
    const NAME: &'static str = "psrType";
    const ENTRIES: &'static [(&'static str, Self)] = &[
        ("A06", PsrType::Pst),
        ("B22", PsrType::Hvdc),
        ("A04", PsrType::Generation),
        ("A05", PsrType::Load),
        ("A01", PsrType::Circuit),
        ("B21", PsrType::TieLine),
        ("B24", PsrType::Line),
        ("A03", PsrType::Transformer),
        ("A02", PsrType::DeprecatedLine),
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSymbol {
    Megawatt,
    Ampere,
    PercentImax,
    /// Dimensionless, used for PST taps.
    Dimensionless,
}

impl CodeTable for UnitSymbol {
    const NAME: &'static str = "unit symbol";
    const ENTRIES: &'static [(&'static str, Self)] = &[
        ("MAW", UnitSymbol::Megawatt),
        ("AMP", UnitSymbol::Ampere),
        ("P1", UnitSymbol::PercentImax),
        ("C62", UnitSymbol::Dimensionless),
    ];
}

impl UnitSymbol {
    pub fn threshold_unit(self) -> Option<ThresholdUnit> {
        match self {
            UnitSymbol::Megawatt => Some(ThresholdUnit::Megawatt),
            UnitSymbol::Ampere => Some(ThresholdUnit::Ampere),
            UnitSymbol::PercentImax => Some(ThresholdUnit::PercentImax),
            UnitSymbol::Dimensionless => None,
        }
    }
}

/// Instant a flow measurement applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasurementType(pub Instant);

impl CodeTable for MeasurementType {
    const NAME: &'static str = "measurementType";
    const ENTRIES: &'static [(&'static str, Self)] = &[
        ("A01", MeasurementType(Instant::Preventive)),
        ("A07", MeasurementType(Instant::Outage)),
        ("A12", MeasurementType(Instant::Auto)),
        ("A13", MeasurementType(Instant::Curative)),
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowDirection(pub FlowSide);

impl CodeTable for FlowDirection {
    const NAME: &'static str = "direction";
    const ENTRIES: &'static [(&'static str, Self)] = &[
        ("A01", FlowDirection(FlowSide::Direct)),
        ("A02", FlowDirection(FlowSide::Opposite)),
    ];
}
