//! Safety classification and route-length sanity checks.
//!
//! The tier table is deliberately simple and evaluated in order:
//!
//! | Condition                                | Tier    |
//! |------------------------------------------|---------|
//! | risk_count == 0                          | High    |
//! | risk_count ≤ 2 and max_consecutive ≤ 2   | Medium  |
//! | max_consecutive > 3 or risk_count > 5    | Low     |
//! | otherwise                                | Medium  |
//!
//! `risk_ratio_pct` is reported for display only; it never drives the tier.

use evac_spatial::RiskStats;

// ── SafetyTier ────────────────────────────────────────────────────────────────

/// Qualitative safety classification of a chosen route.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SafetyTier {
    /// No risky nodes on the route.
    High,
    /// Some scattered risk, still a reasonable walk.
    Medium,
    /// A dangerous route: many risky nodes or a long hazardous stretch.
    Low,
    /// No route statistics available (empty node sequence).
    Unknown,
}

impl SafetyTier {
    /// Map-marker color used by display layers.
    pub fn color(self) -> &'static str {
        match self {
            SafetyTier::High    => "green",
            SafetyTier::Medium  => "orange",
            SafetyTier::Low     => "red",
            SafetyTier::Unknown => "gray",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SafetyTier::High    => "high",
            SafetyTier::Medium  => "medium",
            SafetyTier::Low     => "low",
            SafetyTier::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for SafetyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── SafetyAssessment ──────────────────────────────────────────────────────────

/// Human-interpretable safety report for the winning route.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SafetyAssessment {
    pub tier: SafetyTier,
    /// Display color matching the tier.
    pub color: &'static str,
    /// Risky nodes as a percentage of all route nodes, one decimal.
    /// Display only — the tier decision never reads it.
    pub risk_ratio_pct: f64,
    pub max_consecutive_risk: usize,
    pub description: &'static str,
}

/// Classify a route from the same statistics that drove candidate selection.
pub fn assess(stats: RiskStats, total_nodes: usize) -> SafetyAssessment {
    if total_nodes == 0 {
        return SafetyAssessment {
            tier: SafetyTier::Unknown,
            color: SafetyTier::Unknown.color(),
            risk_ratio_pct: 0.0,
            max_consecutive_risk: 0,
            description: "safety could not be assessed",
        };
    }

    let tier = if stats.risk_count == 0 {
        SafetyTier::High
    } else if stats.risk_count <= 2 && stats.max_consecutive <= 2 {
        SafetyTier::Medium
    } else if stats.max_consecutive > 3 || stats.risk_count > 5 {
        SafetyTier::Low
    } else {
        SafetyTier::Medium
    };

    let description = match tier {
        SafetyTier::High    => "safe route, no hazard zones crossed",
        SafetyTier::Medium  => "moderately safe route",
        SafetyTier::Low     => "dangerous route, prefer another shelter if possible",
        SafetyTier::Unknown => "safety could not be assessed",
    };

    let ratio = stats.risk_count as f64 / total_nodes as f64;

    SafetyAssessment {
        tier,
        color: tier.color(),
        risk_ratio_pct: (ratio * 1_000.0).round() / 10.0,
        max_consecutive_risk: stats.max_consecutive,
        description,
    }
}

// ── Length sanity correction ──────────────────────────────────────────────────

/// A route length after the plausibility check, with the substitution flag.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CorrectedLength {
    pub length_m: f64,
    /// `true` when the graph-derived length was implausibly short and the
    /// straight-line estimate was substituted.
    pub estimated: bool,
}

/// Guard against pathological graph slices: a walking route shorter than
/// 0.8× the straight-line distance is not credible, so substitute
/// `straight_line × 1.2` as an engineering estimate and flag it.
pub fn corrected_length(raw_m: f64, straight_line_m: f64) -> CorrectedLength {
    if raw_m < straight_line_m * 0.8 {
        let estimate = straight_line_m * 1.2;
        tracing::warn!(
            raw_m,
            straight_line_m,
            estimate,
            "route length implausibly short; substituting straight-line estimate"
        );
        CorrectedLength { length_m: estimate, estimated: true }
    } else {
        CorrectedLength { length_m: raw_m, estimated: false }
    }
}

/// Warning text for routes that cross hazard zones; `None` on clean routes.
pub fn warning_text(stats: RiskStats) -> Option<String> {
    if stats.risk_count == 0 {
        return None;
    }
    if stats.max_consecutive > 3 {
        Some(format!(
            "High risk: route crosses {} hazard-zone nodes ({} consecutive)",
            stats.risk_count, stats.max_consecutive
        ))
    } else {
        Some(format!(
            "Moderate risk: route crosses {} hazard-zone nodes",
            stats.risk_count
        ))
    }
}
