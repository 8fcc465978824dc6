//! Calibration wire formats.
//!
//! The primary format is the driver's legacy ASCII form: three
//! semicolon-separated sections — integer X breakpoints, integer Y
//! breakpoints, then `nx * ny` comma-separated unit-value pairs listed
//! row-major with x fastest. Capture tools emit `", "` and `";\n"`
//! separators, so tokens are whitespace-trimmed. A serde-derived
//! [`GridData`] value is the parsed intermediate and doubles as a JSON
//! persistence format.

use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::grid::CalibrationGrid;

/// Largest accepted per-axis breakpoint count. Inputs beyond this are
/// rejected instead of truncated.
pub const MAX_AXIS_POINTS: usize = 1000;

/// A parsed control-point list: the serializable form of a calibration
/// grid. `points` holds `nx * ny` unit-value pairs, row-major, x fastest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridData {
    pub breakpoints_x: Vec<i32>,
    pub breakpoints_y: Vec<i32>,
    pub points: Vec<[f32; 2]>,
}

impl GridData {
    /// Parse the legacy text form.
    ///
    /// Fails on a non-numeric or missing token, an empty breakpoint
    /// section, a breakpoint count above [`MAX_AXIS_POINTS`], or fewer
    /// than `nx * ny` value pairs. Surplus values beyond `nx * ny` pairs
    /// are ignored. Semicolons inside the value section are treated as
    /// plain separators, matching the row-per-line layout capture tools
    /// produce.
    pub fn parse(text: &str) -> Result<Self, GridError> {
        let (x_section, rest) = text
            .split_once(';')
            .ok_or_else(|| GridError::Parse("missing X breakpoint section".into()))?;
        let (y_section, value_section) = rest
            .split_once(';')
            .ok_or_else(|| GridError::Parse("missing Y breakpoint section".into()))?;

        let breakpoints_x = parse_breakpoints(x_section, "x")?;
        let breakpoints_y = parse_breakpoints(y_section, "y")?;

        let wanted = breakpoints_x.len() * breakpoints_y.len();
        let mut flat = Vec::with_capacity(2 * wanted);
        for token in value_section.split([',', ';']) {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            let value: f32 = token
                .parse()
                .map_err(|_| GridError::Parse(format!("bad unit value {token:?}")))?;
            flat.push(value);
            if flat.len() == 2 * wanted {
                break;
            }
        }
        if flat.len() < 2 * wanted {
            return Err(GridError::Parse(format!(
                "expected {} unit values, got {}",
                2 * wanted,
                flat.len()
            )));
        }

        Ok(Self {
            breakpoints_x,
            breakpoints_y,
            points: flat.chunks_exact(2).map(|p| [p[0], p[1]]).collect(),
        })
    }

    /// Render the legacy text form, one section per line as the capture
    /// tools do. Inverse of [`GridData::parse`].
    pub fn serialize(&self) -> String {
        let ints = |row: &[i32]| {
            row.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        let nx = self.breakpoints_x.len();
        let mut lines = vec![ints(&self.breakpoints_x), ints(&self.breakpoints_y)];
        for row in self.points.chunks(nx.max(1)) {
            lines.push(
                row.iter()
                    .map(|[x, y]| format!("{x}, {y}"))
                    .collect::<Vec<_>>()
                    .join(", "),
            );
        }
        lines.join(";\n") + ";\n"
    }

    /// Encode as JSON.
    pub fn to_json(&self) -> Result<String, GridError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from JSON.
    pub fn from_json(text: &str) -> Result<Self, GridError> {
        Ok(serde_json::from_str(text)?)
    }
}

fn parse_breakpoints(section: &str, axis: &str) -> Result<Vec<i32>, GridError> {
    let mut breaks = Vec::new();
    for token in section.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let value: i32 = token
            .parse()
            .map_err(|_| GridError::Parse(format!("bad {axis} breakpoint {token:?}")))?;
        breaks.push(value);
        if breaks.len() > MAX_AXIS_POINTS {
            return Err(GridError::Parse(format!(
                "more than {MAX_AXIS_POINTS} {axis} breakpoints"
            )));
        }
    }
    if breaks.is_empty() {
        return Err(GridError::Parse(format!("empty {axis} breakpoint section")));
    }
    Ok(breaks)
}

impl CalibrationGrid {
    /// Build a grid from the legacy text form. Any parse failure aborts
    /// construction; no partially initialized grid is ever returned.
    pub fn parse(extent_x: i32, extent_y: i32, text: &str) -> Result<Self, GridError> {
        let data = GridData::parse(text)?;
        Self::from_data(extent_x, extent_y, &data)
    }

    /// Render the grid back to the legacy text form. A grid parsed from
    /// this output reproduces the original's lookups exactly.
    pub fn serialize(&self) -> String {
        self.to_data().serialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "0, 10, 20;\n0, 30;\n\
        0.0, 0.0, 0.5, 0.0, 1.0, 0.0;\n\
        0.0, 1.0, 0.5, 1.0, 1.0, 1.0;\n";

    #[test]
    fn test_parse_sections() {
        let data = GridData::parse(SAMPLE).unwrap();
        assert_eq!(data.breakpoints_x, vec![0, 10, 20]);
        assert_eq!(data.breakpoints_y, vec![0, 30]);
        assert_eq!(data.points.len(), 6);
        assert_eq!(data.points[1], [0.5, 0.0]);
        assert_eq!(data.points[5], [1.0, 1.0]);
    }

    #[test]
    fn test_parse_tolerates_compact_form() {
        let data = GridData::parse("0,10;0,10;0,0,1,0,0,1,1,1").unwrap();
        assert_eq!(data.points.len(), 4);
    }

    #[test]
    fn test_parse_rejects_non_numeric_breakpoint() {
        let err = GridData::parse("0, ten, 20;0, 30;0, 0;").unwrap_err();
        assert!(matches!(err, GridError::Parse(_)), "got {err:?}");
        assert!(GridData::parse("0, 10;0, 3.5;0, 0, 1, 1;").is_err());
    }

    #[test]
    fn test_parse_rejects_short_value_section() {
        // 3 x 2 grid but only 5 of the 6 required pairs.
        let err = GridData::parse(
            "0, 10, 20;0, 30;0, 0, 0.5, 0, 1, 0, 0, 1, 0.5, 1;",
        )
        .unwrap_err();
        assert!(matches!(err, GridError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn test_parse_rejects_missing_sections() {
        assert!(GridData::parse("").is_err());
        assert!(GridData::parse("0, 10").is_err());
        assert!(GridData::parse("0, 10;0, 20").is_err());
        assert!(GridData::parse(";0, 20;0, 0;").is_err());
    }

    #[test]
    fn test_parse_rejects_axis_overflow() {
        let huge = (0..=MAX_AXIS_POINTS as i32)
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let text = format!("{huge};0, 10;0, 0;");
        assert!(matches!(
            GridData::parse(&text),
            Err(GridError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_ignores_surplus_values() {
        let data = GridData::parse("0, 10;0, 10;0, 0, 1, 0, 0, 1, 1, 1, 9, 9, 9;").unwrap();
        assert_eq!(data.points.len(), 4);
        assert_eq!(data.points[3], [1.0, 1.0]);
    }

    #[test]
    fn test_text_roundtrip_is_lossless() {
        let data = GridData::parse(SAMPLE).unwrap();
        let again = GridData::parse(&data.serialize()).unwrap();
        assert_eq!(data, again);
    }

    #[test]
    fn test_json_roundtrip() {
        let data = GridData::parse(SAMPLE).unwrap();
        let json = data.to_json().unwrap();
        assert_eq!(GridData::from_json(&json).unwrap(), data);
    }

    #[test]
    fn test_grid_parse_rejects_degenerate_axis() {
        // Single Y breakpoint parses as text but cannot form a grid.
        let err = CalibrationGrid::parse(20, 0, "0, 10, 20;0;0, 0, 0.5, 0, 1, 0;").unwrap_err();
        assert!(matches!(err, GridError::Config(_)), "got {err:?}");
    }
}
