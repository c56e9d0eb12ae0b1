// Wed Jan 15 2026 - Alex

use crate::filter::{FilterError, SizeOfFilter};
use crate::heap::{FieldRef, Marker, TypeRef};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

/// Marker names matching this are treated as "ignore when sizing".
pub const DEFAULT_MARKER_PATTERN: &str = r"^.*cache\..*IgnoreSizeOf$";

static DEFAULT_MARKER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(DEFAULT_MARKER_PATTERN).expect("default marker pattern is valid"));

/// Recognizes exclusion markers.
pub trait MarkerMatcher: Send + Sync {
    fn matches(&self, marker: &Marker) -> bool;
}

#[derive(Debug, Clone)]
pub struct RegexMarkerMatcher {
    pattern: Regex,
}

impl RegexMarkerMatcher {
    pub fn new(pattern: &str) -> Result<Self, FilterError> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Default for RegexMarkerMatcher {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_MARKER_REGEX.clone(),
        }
    }
}

impl MarkerMatcher for RegexMarkerMatcher {
    fn matches(&self, marker: &Marker) -> bool {
        let found = self.pattern.is_match(&marker.name);
        if found {
            debug!("{} matched exclusion marker pattern {}", marker.name, self.pattern);
        }
        found
    }
}

/// Excludes fields, types and packages carrying an exclusion marker.
///
/// A marker on a type excludes that type; it excludes subtypes too only when
/// the marker is `inherited`. A marked package excludes all of its types.
pub struct DeclarativeExclusionFilter {
    matcher: Arc<dyn MarkerMatcher>,
}

impl DeclarativeExclusionFilter {
    pub fn new(matcher: Arc<dyn MarkerMatcher>) -> Self {
        Self { matcher }
    }

    pub fn with_pattern(pattern: &str) -> Result<Self, FilterError> {
        Ok(Self::new(Arc::new(RegexMarkerMatcher::new(pattern)?)))
    }

    fn matching_marker<'a>(&self, element: &dyn std::fmt::Display, markers: &'a [Marker]) -> Result<Option<&'a Marker>, FilterError> {
        let mut matching = markers.iter().filter(|m| self.matcher.matches(m));
        let first = matching.next();
        if first.is_some() && matching.next().is_some() {
            return Err(FilterError::AmbiguousMarker {
                element: element.to_string(),
                markers: markers
                    .iter()
                    .filter(|m| self.matcher.matches(m))
                    .map(|m| m.name.clone())
                    .collect(),
            });
        }
        Ok(first)
    }

    fn marked_or_inherited(&self, ty: &TypeRef) -> Result<bool, FilterError> {
        for (depth, class) in ty.ancestors().enumerate() {
            if let Some(marker) = self.matching_marker(class, class.markers())? {
                if depth == 0 || marker.inherited {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }
}

impl Default for DeclarativeExclusionFilter {
    fn default() -> Self {
        Self::new(Arc::new(RegexMarkerMatcher::default()))
    }
}

impl SizeOfFilter for DeclarativeExclusionFilter {
    fn filter_class(&self, ty: &TypeRef) -> Result<bool, FilterError> {
        if self.marked_or_inherited(ty)? {
            return Ok(false);
        }
        let package_marked = match ty.package() {
            Some(package) => self.matching_marker(&package.name, &package.markers)?.is_some(),
            None => false,
        };
        Ok(!package_marked)
    }

    fn filter_fields(&self, _ty: &TypeRef, fields: Vec<FieldRef>) -> Result<Vec<FieldRef>, FilterError> {
        let mut kept = Vec::with_capacity(fields.len());
        for field in fields {
            if self.matching_marker(&field, field.markers())?.is_none() {
                kept.push(field);
            }
        }
        Ok(kept)
    }
}
