//! Day / night / rain scene classification by substring matching on a
//! free-text scene description.
//!
//! Only two predicates are read from the text: whether it contains `"night"`
//! and whether it contains `"rain"`. A scene without `"night"` counts as day.
use std::str::FromStr;

use tracing::warn;

use crate::error::{Error, Result};
use crate::types::SceneCondition;

/// A non-empty subset of {day, night, rain}.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PassFilter {
    day: bool,
    night: bool,
    rain: bool,
}

impl Default for PassFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl PassFilter {
    /// Retains every scene.
    pub const fn all() -> Self {
        Self {
            day: true,
            night: true,
            rain: true,
        }
    }

    /// Build from raw tokens. Anything other than exactly `day`, `night` or
    /// `rain` is dropped; duplicates collapse.
    pub fn from_tokens<I, S>(tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = Vec::new();
        let mut conditions = Vec::new();
        for token in tokens {
            let token = token.as_ref();
            seen.push(token.to_string());
            match SceneCondition::from_str(token) {
                Ok(condition) => conditions.push(condition),
                Err(_) => warn!("Discarding unrecognized pass filter {:?}", token),
            }
        }
        if conditions.is_empty() {
            return Err(Error::InvalidArgument {
                arg: "pass_filters",
                value: format!("{:?}", seen),
            });
        }
        Self::from_conditions(&conditions)
    }

    pub fn from_conditions(conditions: &[SceneCondition]) -> Result<Self> {
        if conditions.is_empty() {
            return Err(Error::InvalidArgument {
                arg: "pass_filters",
                value: "[]".to_string(),
            });
        }
        let mut filter = Self {
            day: false,
            night: false,
            rain: false,
        };
        for condition in conditions {
            match condition {
                SceneCondition::Day => filter.day = true,
                SceneCondition::Night => filter.night = true,
                SceneCondition::Rain => filter.rain = true,
            }
        }
        Ok(filter)
    }

    pub fn contains(&self, condition: SceneCondition) -> bool {
        match condition {
            SceneCondition::Day => self.day,
            SceneCondition::Night => self.night,
            SceneCondition::Rain => self.rain,
        }
    }

    pub fn conditions(&self) -> Vec<SceneCondition> {
        [SceneCondition::Day, SceneCondition::Night, SceneCondition::Rain]
            .into_iter()
            .filter(|c| self.contains(*c))
            .collect()
    }

    /// Whether a scene with this description is retained.
    pub fn passes(&self, description: &str) -> bool {
        let description = description.to_lowercase();
        let night = description.contains("night");
        let rain = description.contains("rain");

        match (self.day, self.night, self.rain) {
            (true, true, true) => true,
            // day + night: any time of day, not rainy
            (true, true, false) => !rain,
            // day + rain: rainy daytime
            (true, false, true) => !night && rain,
            // day: daytime, not rainy
            (true, false, false) => !night && !rain,
            // night + rain: rainy nighttime
            (false, true, true) => night && rain,
            // night: nighttime, not rainy
            (false, true, false) => night && !rain,
            // rain: rainy, day or night
            (false, false, true) => rain,
            (false, false, false) => false,
        }
    }
}

/// One-shot form of [`PassFilter::from_tokens`] followed by [`PassFilter::passes`].
pub fn passes_filter<I, S>(description: &str, pass_filters: I) -> Result<bool>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Ok(PassFilter::from_tokens(pass_filters)?.passes(description))
}

/// Keep the descriptions that pass `filter`, in input order.
pub fn filter_scenes<'a, S: AsRef<str>>(descriptions: &'a [S], filter: &PassFilter) -> Vec<&'a str> {
    descriptions
        .iter()
        .map(|d| d.as_ref())
        .filter(|d| filter.passes(d))
        .collect()
}
