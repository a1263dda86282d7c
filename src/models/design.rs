use crate::error::{InkError, Result};
use serde::de::{value::StrDeserializer, IntoDeserializer};
use serde::{Deserialize, Deserializer, Serialize};

/// `Both` and `Mixed` describe the same scheme; both spellings are kept so a
/// request echoes back the way it was sent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorPreference {
    Black,
    Color,
    Both,
    Mixed,
}

/// A blank `colorPreference`, as sent by a form with nothing selected, means
/// no preference.
fn blank_color_as_none<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<ColorPreference>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(name) => {
            let name: StrDeserializer<D::Error> = name.into_deserializer();
            ColorPreference::deserialize(name).map(Some)
        }
    }
}

/// Design request exactly as it arrived over the wire. Every field is
/// optional here so that missing ones can be reported together.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawDesignRequest {
    pub style: Option<String>,
    pub size: Option<String>,
    pub location: Option<String>,
    pub theme: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "blank_color_as_none")]
    pub color_preference: Option<ColorPreference>,
    pub mood: Option<String>,
}

/// A validated design request. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DesignRequest {
    pub style: String,
    pub size: String,
    pub location: String,
    pub theme: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "blank_color_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub color_preference: Option<ColorPreference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
}

impl RawDesignRequest {
    /// Required fields that are absent or blank, in declaration order.
    pub fn missing_fields(&self) -> Vec<String> {
        [
            ("style", &self.style),
            ("size", &self.size),
            ("location", &self.location),
            ("theme", &self.theme),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
        .map(|(name, _)| name.to_string())
        .collect()
    }

    pub fn validate(self) -> Result<DesignRequest> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(InkError::Validation { missing });
        }

        Ok(DesignRequest {
            style: self.style.unwrap_or_default(),
            size: self.size.unwrap_or_default(),
            location: self.location.unwrap_or_default(),
            theme: self.theme.unwrap_or_default(),
            description: self.description,
            color_preference: self.color_preference,
            mood: self.mood,
        })
    }
}

impl DesignRequest {
    pub fn new(
        style: impl Into<String>,
        size: impl Into<String>,
        location: impl Into<String>,
        theme: impl Into<String>,
    ) -> Self {
        Self {
            style: style.into(),
            size: size.into(),
            location: location.into(),
            theme: theme.into(),
            description: None,
            color_preference: None,
            mood: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_color(mut self, color: ColorPreference) -> Self {
        self.color_preference = Some(color);
        self
    }

    pub fn with_mood(mut self, mood: impl Into<String>) -> Self {
        self.mood = Some(mood.into());
        self
    }
}

impl From<DesignRequest> for RawDesignRequest {
    fn from(request: DesignRequest) -> Self {
        RawDesignRequest {
            style: Some(request.style),
            size: Some(request.size),
            location: Some(request.location),
            theme: Some(request.theme),
            description: request.description,
            color_preference: request.color_preference,
            mood: request.mood,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_and_absent_fields_are_both_missing() {
        let raw: RawDesignRequest = serde_json::from_value(json!({
            "style": "line art",
            "size": "  ",
            "location": "wrist"
        }))
        .unwrap();
        assert_eq!(raw.missing_fields(), vec!["size", "theme"]);

        match raw.validate() {
            Err(InkError::Validation { missing }) => assert_eq!(missing, vec!["size", "theme"]),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn mixed_survives_a_round_trip_through_validation() {
        let raw: RawDesignRequest = serde_json::from_value(json!({
            "style": "watercolor",
            "size": "medium",
            "location": "shoulder",
            "theme": "nature",
            "colorPreference": "mixed"
        }))
        .unwrap();
        assert_eq!(raw.color_preference, Some(ColorPreference::Mixed));

        let echoed = serde_json::to_value(raw.validate().unwrap()).unwrap();
        assert_eq!(echoed["colorPreference"], "mixed");
    }

    #[test]
    fn blank_color_preference_means_none() {
        let raw: RawDesignRequest =
            serde_json::from_value(json!({ "colorPreference": "" })).unwrap();
        assert_eq!(raw.color_preference, None);

        let raw: RawDesignRequest =
            serde_json::from_value(json!({ "colorPreference": null })).unwrap();
        assert_eq!(raw.color_preference, None);

        let raw: RawDesignRequest = serde_json::from_value(json!({ "style": "tribal" })).unwrap();
        assert_eq!(raw.color_preference, None);

        let unknown =
            serde_json::from_value::<RawDesignRequest>(json!({ "colorPreference": "sepia" }));
        assert!(unknown.is_err());
    }

    #[test]
    fn validated_request_serializes_in_camel_case_without_absent_fields() {
        let request = DesignRequest::new("tribal", "large", "back", "cultural")
            .with_color(ColorPreference::Black);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "style": "tribal",
                "size": "large",
                "location": "back",
                "theme": "cultural",
                "colorPreference": "black"
            })
        );
    }
}
