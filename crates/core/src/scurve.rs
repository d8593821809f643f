//! S-curve series: cumulative planned vs. actual completions over time.
//!
//! The planned series accumulates demands by their planned due date; the
//! actual series accumulates by actual due date, falling back to the
//! completion date for Done demands. Demands without a parseable date
//! simply do not contribute to the respective series.

use chrono::NaiveDate;
use serde::Serialize;

use crate::dates::parse_date;
use crate::model::{Demand, Status};

/// One point of a cumulative series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SCurvePoint {
    pub date: NaiveDate,
    pub cumulative: usize,
}

/// Planned and actual cumulative completion series.
#[derive(Debug, Clone, Serialize)]
pub struct SCurve {
    pub planned: Vec<SCurvePoint>,
    pub actual: Vec<SCurvePoint>,
}

/// Turn a list of completion dates into an ordered cumulative series.
/// Demands completing on the same day collapse into a single point.
fn cumulative(mut dates: Vec<NaiveDate>) -> Vec<SCurvePoint> {
    dates.sort_unstable();
    let mut points: Vec<SCurvePoint> = Vec::new();
    for (index, date) in dates.into_iter().enumerate() {
        let cumulative = index + 1;
        match points.last_mut() {
            Some(last) if last.date == date => last.cumulative = cumulative,
            _ => points.push(SCurvePoint { date, cumulative }),
        }
    }
    points
}

/// Build the S-curve series for the given demands.
pub fn scurve(demands: &[Demand]) -> SCurve {
    let planned: Vec<NaiveDate> = demands
        .iter()
        .filter_map(|d| parse_date(d.planned_due.as_deref()))
        .collect();

    let actual: Vec<NaiveDate> = demands
        .iter()
        .filter_map(|d| {
            parse_date(d.actual_due.as_deref()).or_else(|| {
                if d.status == Status::Done {
                    parse_date(d.completed_at.as_deref())
                } else {
                    None
                }
            })
        })
        .collect();

    SCurve {
        planned: cumulative(planned),
        actual: cumulative(actual),
    }
}
