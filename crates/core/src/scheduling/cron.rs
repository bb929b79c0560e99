// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Five-field cron expressions
//!
//! Fields are minute, hour, day-of-month, month and day-of-week, evaluated
//! in UTC by [`saffron`]. Weekdays are numbered `0`-`7` with both ends
//! meaning Sunday, and names are accepted in any case. The `@hourly` style
//! macros expand to their five-field form.
//!
//! When both day-of-month and day-of-week are restricted, a day matches if
//! either field matches.

use super::occurrence::Occurrence;
use crate::error::{EventError, Result};
use chrono::{DateTime, Timelike, Utc};
use saffron::Cron;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

const WEEKDAYS: [&str; 8] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT", "SUN"];

/// A parsed cron expression
///
/// Restricting both day fields compiles into two schedules, one per day
/// field, and the earlier match wins.
#[derive(Clone)]
pub struct CronExpression {
    source: String,
    schedules: Arc<[Cron]>,
}

impl CronExpression {
    pub fn parse(expression: &str) -> Result<Self> {
        expression.parse()
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl Occurrence for CronExpression {
    fn next_after(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let minute = now.with_second(0)?.with_nanosecond(0)?;
        self.schedules
            .iter()
            .filter_map(|cron| cron.next_after(minute))
            .filter(|next| *next > now)
            .min()
    }
}

impl FromStr for CronExpression {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: String| EventError::InvalidCronExpression {
            expression: s.to_string(),
            reason,
        };

        let trimmed = s.trim();
        let body = if trimmed.starts_with('@') {
            expand_macro(trimmed)
                .ok_or_else(|| invalid(format!("unknown macro {}", trimmed)))?
        } else {
            trimmed
        };

        let fields: Vec<&str> = body.split_whitespace().collect();
        let [minute, hour, dom, month, dow] = fields[..] else {
            return Err(invalid(format!("expected 5 fields, found {}", fields.len())));
        };
        let dow = name_weekdays(dow).map_err(invalid)?;

        let variants = if !dom.starts_with('*') && !dow.starts_with('*') {
            vec![
                format!("{minute} {hour} {dom} {month} *"),
                format!("{minute} {hour} * {month} {dow}"),
            ]
        } else {
            vec![format!("{minute} {hour} {dom} {month} {dow}")]
        };
        let schedules = variants
            .iter()
            .map(|variant| {
                variant
                    .to_ascii_uppercase()
                    .parse::<Cron>()
                    .map_err(|error| invalid(error.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            source: trimmed.to_string(),
            schedules: schedules.into(),
        })
    }
}

impl fmt::Display for CronExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl fmt::Debug for CronExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CronExpression").field(&self.source).finish()
    }
}

impl PartialEq for CronExpression {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for CronExpression {}

fn expand_macro(name: &str) -> Option<&'static str> {
    let expanded = match name.to_ascii_lowercase().as_str() {
        "@yearly" | "@annually" => "0 0 1 1 *",
        "@monthly" => "0 0 1 * *",
        "@weekly" => "0 0 * * 0",
        "@daily" | "@midnight" => "0 0 * * *",
        "@hourly" => "0 * * * *",
        _ => return None,
    };
    Some(expanded)
}

/// Rewrite numeric weekdays as names, leaving step sizes untouched
fn name_weekdays(field: &str) -> std::result::Result<String, String> {
    let items = field
        .split(',')
        .map(|item| -> std::result::Result<String, String> {
            let (range, step) = match item.split_once('/') {
                Some((range, step)) => (range, Some(step)),
                None => (item, None),
            };
            let range = range
                .split('-')
                .map(|value| match value.parse::<usize>() {
                    Ok(day) => WEEKDAYS
                        .get(day)
                        .map(|name| name.to_string())
                        .ok_or_else(|| format!("{day} is out of range for day-of-week (0-7)")),
                    Err(_) => Ok(value.to_string()),
                })
                .collect::<std::result::Result<Vec<_>, _>>()?
                .join("-");
            Ok(match step {
                Some(step) => format!("{range}/{step}"),
                None => range,
            })
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(items.join(","))
}

#[cfg(test)]
#[path = "cron_tests.rs"]
mod tests;
