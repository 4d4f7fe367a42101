//! ROI calculator widget.
//!
//! Estimates the extra revenue a visitor would see from the promised
//! conversion uplift, against the monthly plan price.

use crate::events::{EventName, EventSink};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::OnceLock;

fn int_prefix() -> &'static Regex {
    static INT: OnceLock<Regex> = OnceLock::new();
    INT.get_or_init(|| Regex::new(r"^[+-]?\d+").expect("integer pattern compiles"))
}

fn float_prefix() -> &'static Regex {
    static FLOAT: OnceLock<Regex> = OnceLock::new();
    FLOAT.get_or_init(|| {
        Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").expect("float pattern compiles")
    })
}

/// Lenient integer parse: leading whitespace skipped, the longest integer
/// prefix is used, anything unparseable is `0`.
#[must_use]
pub fn parse_int_lenient(input: &str) -> i64 {
    int_prefix()
        .find(input.trim_start())
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Lenient float parse with the same rules as [`parse_int_lenient`].
/// Non-finite results are `0`.
#[must_use]
pub fn parse_float_lenient(input: &str) -> f64 {
    float_prefix()
        .find(input.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Round half up, matching the page's display rounding.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Calculator inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiInputs {
    /// Monthly visitors.
    pub visitors: i64,
    /// Current conversion rate in percent.
    pub current_rate: f64,
    /// Average revenue per customer.
    pub revenue: i64,
}

impl RoiInputs {
    /// Parse raw field contents the way the form inputs are read.
    #[must_use]
    pub fn parse(visitors: &str, current_rate: &str, revenue: &str) -> Self {
        Self {
            visitors: parse_int_lenient(visitors),
            current_rate: parse_float_lenient(current_rate),
            revenue: parse_int_lenient(revenue),
        }
    }
}

/// Calculator output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoiEstimate {
    /// Extra customers per month.
    pub additional_customers: i64,
    /// Extra revenue per month.
    pub additional_revenue: i64,
    /// Return on the plan price in percent, possibly negative.
    pub roi_percent: i64,
}

impl RoiEstimate {
    /// ROI as displayed: never below zero.
    #[must_use]
    pub fn display_roi(&self) -> i64 {
        self.roi_percent.max(0)
    }
}

/// Pure ROI model.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn estimate(inputs: &RoiInputs, uplift: f64, plan_price: f64) -> RoiEstimate {
    let visitors = inputs.visitors as f64;
    let current_customers = visitors * (inputs.current_rate / 100.0);
    let improved_rate = inputs.current_rate * uplift;
    let new_customers = visitors * (improved_rate / 100.0);

    let additional_customers = round_half_up(new_customers - current_customers);
    let additional_revenue = additional_customers.saturating_mul(inputs.revenue);
    let roi_percent =
        round_half_up((additional_revenue as f64 - plan_price) / plan_price * 100.0);

    RoiEstimate {
        additional_customers,
        additional_revenue,
        roi_percent,
    }
}

/// ROI widget: recomputes on every input change and records it.
#[derive(Debug)]
pub struct RoiCalculator<E> {
    sink: E,
    uplift: f64,
    plan_price: f64,
}

impl<E: EventSink> RoiCalculator<E> {
    /// Create the widget with the given uplift multiplier and plan price.
    pub const fn new(sink: E, uplift: f64, plan_price: f64) -> Self {
        Self {
            sink,
            uplift,
            plan_price,
        }
    }

    /// Compute the estimate and record `roi_calculated`.
    pub fn calculate(&self, inputs: &RoiInputs) -> RoiEstimate {
        let result = estimate(inputs, self.uplift, self.plan_price);
        self.sink.record(
            EventName::RoiCalculated,
            json!({
                "visitors": inputs.visitors,
                "currentRate": inputs.current_rate,
                "revenue": inputs.revenue,
                "additionalRev": result.additional_revenue,
            }),
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MemoryEventSink;
    use quickcheck::quickcheck;

    #[test]
    fn test_lenient_parsing() {
        assert_eq!(parse_int_lenient("10000"), 10000);
        assert_eq!(parse_int_lenient("  42 visitors"), 42);
        assert_eq!(parse_int_lenient("12.9"), 12);
        assert_eq!(parse_int_lenient("-5"), -5);
        assert_eq!(parse_int_lenient("abc"), 0);
        assert_eq!(parse_int_lenient(""), 0);

        assert!((parse_float_lenient("2.5%") - 2.5).abs() < f64::EPSILON);
        assert!((parse_float_lenient(".5") - 0.5).abs() < f64::EPSILON);
        assert!((parse_float_lenient("1e2") - 100.0).abs() < f64::EPSILON);
        assert!(parse_float_lenient("x1").abs() < f64::EPSILON);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(2.49), 2);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.51), -3);
    }

    #[test]
    fn test_estimate_reference_numbers() {
        // 10k visitors at 2% → 200 customers; +22% → 244; 44 extra at 150
        let inputs = RoiInputs::parse("10000", "2", "150");
        let result = estimate(&inputs, 1.22, 79.0);

        assert_eq!(result.additional_customers, 44);
        assert_eq!(result.additional_revenue, 6600);
        assert_eq!(result.roi_percent, 8254);
    }

    #[test]
    fn test_negative_roi_display_clamped() {
        let result = estimate(&RoiInputs::parse("0", "0", "0"), 1.22, 79.0);

        assert_eq!(result.roi_percent, -100);
        assert_eq!(result.display_roi(), 0);
    }

    #[test]
    fn test_calculate_records_event() {
        let sink = MemoryEventSink::new();
        let calculator = RoiCalculator::new(&sink, 1.22, 79.0);

        calculator.calculate(&RoiInputs::parse("10000", "2.5", "100"));

        assert_eq!(
            sink.events()[0].payload,
            json!({ "visitors": 10000, "currentRate": 2.5, "revenue": 100, "additionalRev": 5500 })
        );
    }

    quickcheck! {
        fn prop_display_roi_never_negative(visitors: u16, rate: u8, revenue: u16) -> bool {
            let inputs = RoiInputs {
                visitors: i64::from(visitors),
                current_rate: f64::from(rate),
                revenue: i64::from(revenue),
            };
            estimate(&inputs, 1.22, 79.0).display_roi() >= 0
        }
    }
}
