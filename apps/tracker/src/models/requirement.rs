use serde::{Deserialize, Serialize};

/// Fields the backend proposes after reading a job description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestedRequirement {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub skills_required: Option<String>,
    #[serde(default)]
    pub experience_required: Option<String>,
    #[serde(default)]
    pub ctc_range: Option<String>,
}

/// A requirement being drafted before it is submitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequirementDraft {
    pub title: String,
    pub description: String,
    pub location: String,
    pub skills_required: String,
    pub experience_required: String,
    pub ctc_range: String,
}

impl RequirementDraft {
    /// Overwrites each field for which the suggestion has a non-blank value;
    /// everything else keeps what the user already typed.
    pub fn merge_suggestion(&mut self, suggestion: &SuggestedRequirement) {
        let pairs = [
            (&mut self.title, &suggestion.title),
            (&mut self.description, &suggestion.description),
            (&mut self.location, &suggestion.location),
            (&mut self.skills_required, &suggestion.skills_required),
            (&mut self.experience_required, &suggestion.experience_required),
            (&mut self.ctc_range, &suggestion.ctc_range),
        ];
        for (field, value) in pairs {
            if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                *field = v.to_string();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_existing_fields_when_suggestion_blank() {
        let mut draft = RequirementDraft {
            title: "Data Engineer".to_string(),
            location: "Hyderabad".to_string(),
            ..Default::default()
        };
        draft.merge_suggestion(&SuggestedRequirement {
            title: Some("Senior Data Engineer".to_string()),
            location: Some("   ".to_string()),
            skills_required: Some("Spark, Airflow".to_string()),
            ..Default::default()
        });
        assert_eq!(draft.title, "Senior Data Engineer");
        assert_eq!(draft.location, "Hyderabad");
        assert_eq!(draft.skills_required, "Spark, Airflow");
        assert_eq!(draft.ctc_range, "");
    }
}
