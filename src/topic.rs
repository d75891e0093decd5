use crate::grader::{Report, Submission};
use crate::instance::{Difficulty, HungarianQuestion, Mode};
use crate::layout::StageLayout;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// Common interface of every exercise type.
pub trait Question {
    fn generate(&self) -> Vec<StageLayout>;
    fn evaluate(&self, input: &Submission) -> Report;
}

impl Question for HungarianQuestion {
    fn generate(&self) -> Vec<StageLayout> {
        HungarianQuestion::generate(self)
    }

    fn evaluate(&self, input: &Submission) -> Report {
        HungarianQuestion::evaluate(self, input)
    }
}

/// Request parameters of a new exercise, as sent by the client.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct QuestionSettings {
    pub seed: Option<u64>,
    pub difficulty: Difficulty,
    pub mode: Mode,
}

#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Open,
    Hidden,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SettingKind {
    Select {
        options: Vec<&'static str>,
        default: &'static str,
    },
    Number,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Setting {
    #[serde(flatten)]
    pub kind: SettingKind,
    pub visibility: Visibility,
}

/// Catalogue entry shown to clients before an exercise is started.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TopicMetadata {
    pub title: &'static str,
    #[serde(rename = "mode")]
    pub modes: Vec<Mode>,
    pub desc: &'static str,
    pub tags: Vec<&'static str>,
    pub settings: BTreeMap<&'static str, Setting>,
}

/// Closed set of available exercise types.
#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    HungarianMethod,
}

impl Topic {
    pub const ALL: [Topic; 1] = [Topic::HungarianMethod];

    pub fn name(self) -> &'static str {
        match self {
            Topic::HungarianMethod => "hungarian_method",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        match Topic::ALL.iter().find(|t| t.name() == name) {
            Some(topic) => Ok(*topic),
            None => bail!("unknown topic '{}'", name),
        }
    }

    pub fn metadata(self) -> TopicMetadata {
        match self {
            Topic::HungarianMethod => {
                let mut settings = BTreeMap::new();
                settings.insert(
                    "difficulty",
                    Setting {
                        kind: SettingKind::Select {
                            options: vec!["easy", "medium", "hard"],
                            default: "easy",
                        },
                        visibility: Visibility::Open,
                    },
                );
                settings.insert(
                    "seed",
                    Setting {
                        kind: SettingKind::Number,
                        visibility: Visibility::Hidden,
                    },
                );
                TopicMetadata {
                    title: "Hungarian Method",
                    modes: vec![Mode::Steps, Mode::Exam],
                    desc: "Practice the Hungarian method for optimal schema matching.",
                    tags: vec!["arithmetic"],
                    settings,
                }
            }
        }
    }

    pub fn build(self, settings: &QuestionSettings) -> Result<Box<dyn Question>> {
        info!("building {} with {:?}", self.name(), settings);
        let question: Box<dyn Question> = match self {
            Topic::HungarianMethod => Box::new(HungarianQuestion::new(
                settings.seed,
                settings.difficulty,
                settings.mode,
            )?),
        };
        Ok(question)
    }
}

#[cfg(test)]
mod tests {
    use super::{Question, QuestionSettings, Topic};
    use crate::grader::Submission;
    use crate::instance::{Difficulty, Mode};
    use crate::stage::Stage;
    use serde_json::json;

    #[test]
    fn test_settings_deserialize_leniently() {
        let settings: QuestionSettings =
            serde_json::from_value(json!({"seed": 7, "difficulty": "HARD", "mode": "Exam"})).unwrap();
        assert_eq!(
            settings,
            QuestionSettings {
                seed: Some(7),
                difficulty: Difficulty::Hard,
                mode: Mode::Exam,
            }
        );

        let settings: QuestionSettings = serde_json::from_value(json!({"difficulty": "extreme"})).unwrap();
        assert_eq!(settings, QuestionSettings::default());
        assert_eq!(settings.difficulty, Difficulty::Easy);
        assert_eq!(settings.mode, Mode::Steps);
    }

    #[test]
    fn test_registry_lookup() {
        assert_eq!(Topic::from_name("hungarian_method").unwrap(), Topic::HungarianMethod);
        assert!(Topic::from_name("simplex").is_err());
    }

    #[test]
    fn test_metadata_serializes() {
        let json = serde_json::to_value(Topic::HungarianMethod.metadata()).unwrap();
        assert_eq!(json["title"], "Hungarian Method");
        assert_eq!(json["mode"], json!(["steps", "exam"]));
        assert_eq!(json["settings"]["difficulty"]["kind"], "select");
        assert_eq!(json["settings"]["difficulty"]["default"], "easy");
        assert_eq!(json["settings"]["seed"], json!({"kind": "number", "visibility": "hidden"}));
    }

    #[test]
    fn test_build_through_trait_object() {
        let settings = QuestionSettings {
            seed: Some(3),
            difficulty: Difficulty::Medium,
            mode: Mode::Exam,
        };
        let question = Topic::HungarianMethod.build(&settings).unwrap();
        let layout = question.generate();
        assert_eq!(layout.len(), 2);
        assert_eq!(layout[1].stage, Stage::ExamAssignment);

        let report = question.evaluate(&Submission::new());
        assert_eq!(report.len(), layout[1].fields.len());
        assert!(report.values().all(|v| !v.correct));
    }
}
