// src/specs/section_listing.rs
//! Shaping for the class-search section listing.
//!
//! The scraped listing has one row per meeting line. A section that meets at
//! more than one time continues on rows with an empty CRN; those rows fold into
//! the section above. Time and date cells become structured ranges.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::core::sanitize::normalize_ws;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SectionError {
    #[error("row {row} has no CRN and no section above it to continue")]
    OrphanContinuation { row: usize },

    #[error("row {row}: class count overflows the section above")]
    ClassCountOverflow { row: usize },

    #[error("bad meeting time '{value}'")]
    BadTime { value: String },

    #[error("bad date range '{value}'")]
    BadDate { value: String },

    #[error("section {crn}: {source}")]
    Row {
        crn: String,
        #[source]
        source: Box<SectionError>,
    },
}

/// One row as scraped. Missing or null cells read as empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSection {
    #[serde(deserialize_with = "or_default")]
    pub classes: u32,
    #[serde(deserialize_with = "or_default")]
    pub crn: String,
    #[serde(deserialize_with = "or_default")]
    pub subject: String,
    #[serde(deserialize_with = "or_default")]
    pub course: String,
    #[serde(deserialize_with = "or_default")]
    pub section: String,
    #[serde(deserialize_with = "or_default")]
    pub campus: String,
    #[serde(deserialize_with = "or_default")]
    pub title: String,
    #[serde(deserialize_with = "or_default")]
    pub capacity: String,
    #[serde(deserialize_with = "cells")]
    pub days: Vec<String>,
    #[serde(deserialize_with = "cells")]
    pub time: Vec<String>,
    #[serde(deserialize_with = "cells")]
    pub instructor: Vec<String>,
    #[serde(deserialize_with = "cells")]
    pub date: Vec<String>,
    #[serde(deserialize_with = "cells")]
    pub location: Vec<String>,
    #[serde(deserialize_with = "cells")]
    pub attribute: Vec<String>,
}

fn or_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

fn cells<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<String>, D::Error> {
    let raw = Option::<Vec<Option<String>>>::deserialize(de)?.unwrap_or_default();
    Ok(raw.into_iter().map(Option::unwrap_or_default).collect())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockTime {
    pub hour: u8,
    pub minute: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthDay {
    pub month: u8,
    pub day: u8,
}

/// A parsed cell: either a `start`/`end` range or text kept as-is
/// (`""`, `"TBA"`, `"WEB"`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Slot<T> {
    Range { start: T, end: T },
    Text(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub classes: u32,
    pub crn: String,
    pub subject: String,
    pub course: String,
    pub section: String,
    pub campus: String,
    pub title: String,
    pub capacity: String,
    pub days: Vec<String>,
    pub time: Vec<Slot<ClockTime>>,
    pub instructor: Vec<String>,
    pub date: Vec<Slot<MonthDay>>,
    pub location: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

/// Fold every CRN-less row into the section above it.
pub fn merge_continuations(rows: Vec<RawSection>) -> Result<Vec<RawSection>, SectionError> {
    let mut out: Vec<RawSection> = Vec::with_capacity(rows.len());
    for (row, cur) in rows.into_iter().enumerate() {
        if !cur.crn.is_empty() {
            out.push(cur);
            continue;
        }
        let prev = out.last_mut().ok_or(SectionError::OrphanContinuation { row })?;
        prev.classes = prev
            .classes
            .checked_add(cur.classes)
            .ok_or(SectionError::ClassCountOverflow { row })?;
        prev.days.extend(cur.days);
        prev.time.extend(cur.time);
        prev.date.extend(cur.date);
        prev.location.extend(cur.location);
        prev.instructor.extend(cur.instructor);
        prev.attribute.extend(cur.attribute);
    }
    Ok(out)
}

/// `"10:20 am-11:10 am"` → 10:20 to 11:10; `"01:50 pm-..."` → 13:50.
pub fn parse_time(value: &str) -> Result<Slot<ClockTime>, SectionError> {
    let value = value.trim();
    if value.is_empty() || value == "TBA" || value == "WEB" {
        return Ok(Slot::Text(s!(value)));
    }
    let bad = || SectionError::BadTime { value: s!(value) };

    let (start, end) = value.split_once('-').ok_or_else(bad)?;
    Ok(Slot::Range {
        start: clock(start).ok_or_else(bad)?,
        end: clock(end).ok_or_else(bad)?,
    })
}

fn clock(part: &str) -> Option<ClockTime> {
    let (hm, period) = part.trim().split_once(' ')?;
    let (h, m) = hm.split_once(':')?;
    let hour: u8 = h.trim().parse().ok()?;
    let minute: u8 = m.trim().parse().ok()?;
    if !(1..=12).contains(&hour) || minute > 59 {
        return None;
    }
    let hour = match period.trim().to_ascii_lowercase().as_str() {
        "am" => hour % 12,
        "pm" => hour % 12 + 12,
        _ => return None,
    };
    Some(ClockTime { hour, minute })
}

/// `"01/16-05/01"` → Jan 16 to May 1.
pub fn parse_date(value: &str) -> Result<Slot<MonthDay>, SectionError> {
    let value = value.trim();
    if value.is_empty() || value == "TBA" {
        return Ok(Slot::Text(s!(value)));
    }
    let bad = || SectionError::BadDate { value: s!(value) };

    let (start, end) = value.split_once('-').ok_or_else(bad)?;
    Ok(Slot::Range {
        start: month_day(start).ok_or_else(bad)?,
        end: month_day(end).ok_or_else(bad)?,
    })
}

fn month_day(part: &str) -> Option<MonthDay> {
    let (m, d) = part.trim().split_once('/')?;
    let month: u8 = m.parse().ok()?;
    let day: u8 = d.parse().ok()?;
    ((1..=12).contains(&month) && (1..=31).contains(&day)).then_some(MonthDay { month, day })
}

pub fn parse_days(value: &str) -> String {
    if value.trim().is_empty() { s!("TBA") } else { s!(value) }
}

pub fn format_sections(rows: Vec<RawSection>) -> Result<Vec<Section>, SectionError> {
    merge_continuations(rows)?
        .into_iter()
        .map(|raw| {
            let crn = raw.crn.clone();
            format_one(raw).map_err(|e| SectionError::Row { crn, source: Box::new(e) })
        })
        .collect()
}

fn format_one(raw: RawSection) -> Result<Section, SectionError> {
    let time = raw.time.iter().map(|t| parse_time(t)).collect::<Result<Vec<_>, _>>()?;
    let date = raw.date.iter().map(|d| parse_date(d)).collect::<Result<Vec<_>, _>>()?;
    let days = raw.days.iter().map(|d| parse_days(d)).collect();
    let attribute = raw.attribute.into_iter().find(|a| !a.trim().is_empty());

    Ok(Section {
        classes: raw.classes,
        crn: raw.crn,
        subject: raw.subject,
        course: raw.course,
        section: raw.section,
        campus: raw.campus,
        title: normalize_ws(&raw.title),
        capacity: raw.capacity,
        days,
        time,
        instructor: raw.instructor,
        date,
        location: raw.location,
        attribute,
    })
}
