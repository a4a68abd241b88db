//! VARK learning-style extraction.
//!
//! Profiles were persisted in two shapes over time. [`StoredProfile`]
//! classifies a record once at read time; everything downstream only sees
//! the resolved [`LearningStyle`].

use serde::Deserialize;

use crate::error::ProfileDecodeError;
use crate::model::{CognitiveProfile, LearningStyle, VarkAxis};
use crate::snapshot::VarkProfile;

/// The persisted shape of a cognitive profile.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredProfile<'a> {
    /// Structured fields with at least one positive axis.
    Structured(LearningStyle),
    /// Only a legacy serialized blob carries the data.
    Legacy {
        blob: &'a str,
        fallback: Option<LearningStyle>,
    },
    /// Structured fields present but all zero, and no blob.
    Zeroed(LearningStyle),
    /// Nothing usable.
    Absent,
}

impl<'a> StoredProfile<'a> {
    pub fn classify(profile: &'a CognitiveProfile) -> Self {
        match (profile.learning_style, profile.legacy_blob.as_deref()) {
            (Some(style), _) if !style.is_empty() => StoredProfile::Structured(style),
            (fallback, Some(blob)) if !blob.trim().is_empty() => {
                StoredProfile::Legacy { blob, fallback }
            }
            (Some(style), _) => StoredProfile::Zeroed(style),
            (None, _) => StoredProfile::Absent,
        }
    }
}

#[derive(Deserialize)]
struct LegacyEnvelope {
    #[serde(default)]
    profile: Option<LegacyProfile>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LegacyProfile {
    Wrapped {
        #[serde(rename = "learningStyle", alias = "learning_style")]
        learning_style: LearningStyle,
    },
    Flat(LearningStyle),
}

/// Resolve the learning style from either persisted shape.
pub fn resolve_learning_style(
    profile: &CognitiveProfile,
) -> Result<Option<LearningStyle>, ProfileDecodeError> {
    match StoredProfile::classify(profile) {
        StoredProfile::Structured(style) | StoredProfile::Zeroed(style) => Ok(Some(style)),
        StoredProfile::Legacy { blob, fallback } => {
            let envelope: LegacyEnvelope =
                serde_json::from_str(blob).map_err(|source| ProfileDecodeError {
                    user_id: profile.user_id.clone(),
                    source,
                })?;
            let style = envelope.profile.map(|p| match p {
                LegacyProfile::Wrapped { learning_style } => learning_style,
                LegacyProfile::Flat(style) => style,
            });
            Ok(style.or(fallback))
        }
        StoredProfile::Absent => Ok(None),
    }
}

/// The axis with the highest value. Ties go to the earlier axis in VARK
/// order; `None` unless some axis is positive.
pub fn primary_style(style: &LearningStyle) -> Option<VarkAxis> {
    let mut best: Option<(VarkAxis, f64)> = None;
    for (axis, value) in style.axes() {
        if value <= 0.0 {
            continue;
        }
        match best {
            Some((_, top)) if value <= top => {}
            _ => best = Some((axis, value)),
        }
    }
    best.map(|(axis, _)| axis)
}

/// Build the snapshot's VARK section from a stored profile.
pub fn extract_vark_profile(
    profile: &CognitiveProfile,
) -> Result<Option<VarkProfile>, ProfileDecodeError> {
    let Some(style) = resolve_learning_style(profile)? else {
        return Ok(None);
    };
    Ok(Some(VarkProfile {
        visual: style.visual,
        auditory: style.auditory,
        reading_writing: style.reading_writing,
        kinesthetic: style.kinesthetic,
        primary_style: primary_style(&style),
        updated_at: profile.updated_at,
    }))
}
