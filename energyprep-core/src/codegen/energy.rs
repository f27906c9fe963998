//! `energyData.js`: state records first, then the national series

use super::{finish, js_string, separator};
use crate::series::{StateRecord, YearValue};

pub const STATE_EXPORT: &str = "ENERGY_DATA_SEDS";
pub const NATIONAL_EXPORT: &str = "NATIONAL_ENERGY_DATA";

fn state_line(record: &StateRecord, suffix: &str) -> String {
    format!(
        "  {{ year: {}, state: {}, sector: {}, consumption: {:.3} }}{suffix}",
        record.year,
        js_string(&record.state),
        js_string(record.sector),
        record.consumption,
    )
}

fn national_line(entry: &YearValue, suffix: &str) -> String {
    format!(
        "  {{ year: {}, consumption: {:.6} }}{suffix}",
        entry.year, entry.consumption
    )
}

/// Render both tables. Inputs are emitted in the order given, so callers
/// pass them already sorted.
pub fn render_energy_module(states: &[StateRecord], national: &[YearValue]) -> String {
    let mut lines = Vec::with_capacity(states.len() + national.len() + 4);

    lines.push(format!("export const {STATE_EXPORT} = ["));
    for (idx, record) in states.iter().enumerate() {
        lines.push(state_line(record, separator(idx, states.len())));
    }
    lines.push("];".to_string());

    lines.push(format!("export const {NATIONAL_EXPORT} = ["));
    for (idx, entry) in national.iter().enumerate() {
        lines.push(national_line(entry, separator(idx, national.len())));
    }
    lines.push("];".to_string());

    finish(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(year: i32, code: &str, consumption: f64) -> StateRecord {
        StateRecord {
            year,
            state: code.to_string(),
            sector: "All",
            consumption,
        }
    }

    #[test]
    fn test_render_layout() {
        let out = render_energy_module(
            &[state(2000, "CA", 1234.5), state(2001, "CA", 1200.0)],
            &[
                YearValue {
                    year: 1973,
                    consumption: 70.561,
                },
                YearValue {
                    year: 2025,
                    consumption: 56.270816,
                },
            ],
        );
        let expected = "\
export const ENERGY_DATA_SEDS = [
  { year: 2000, state: \"CA\", sector: \"All\", consumption: 1234.500 },
  { year: 2001, state: \"CA\", sector: \"All\", consumption: 1200.000 }
];
export const NATIONAL_ENERGY_DATA = [
  { year: 1973, consumption: 70.561000 },
  { year: 2025, consumption: 56.270816 }
];
";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_render_empty_tables() {
        let out = render_energy_module(&[], &[]);
        assert_eq!(
            out,
            "export const ENERGY_DATA_SEDS = [\n];\nexport const NATIONAL_ENERGY_DATA = [\n];\n"
        );
    }

    #[test]
    fn test_precision_rounds() {
        let out = render_energy_module(
            &[state(1990, "WY", 0.12345)],
            &[YearValue {
                year: 1990,
                consumption: 84.4853216,
            }],
        );
        assert!(out.contains("consumption: 0.123 }"));
        assert!(out.contains("consumption: 84.485322 }"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let states = vec![state(2000, "CA", 1.0), state(2000, "TX", 2.0)];
        let national = vec![YearValue {
            year: 2000,
            consumption: 98.8,
        }];
        assert_eq!(
            render_energy_module(&states, &national),
            render_energy_module(&states, &national)
        );
    }
}
