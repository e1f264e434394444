use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub id: Uuid,
    pub school: String,
    pub degree: String,
    #[serde(rename = "fieldofstudy")]
    pub field_of_study: String,
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewEducation {
    #[validate(length(min = 1, message = "School is required"))]
    pub school: String,

    #[validate(length(min = 1, message = "Degree is required"))]
    pub degree: String,

    #[serde(rename = "fieldofstudy")]
    #[validate(length(min = 1, message = "Field of study is required"))]
    pub field_of_study: String,

    pub from: NaiveDate,
    pub to: Option<NaiveDate>,

    #[serde(default)]
    pub current: bool,

    pub description: Option<String>,
}

impl NewEducation {
    pub fn prepare_for_insert(&self) -> Education {
        Education {
            id: Uuid::new_v4(),
            school: self.school.clone(),
            degree: self.degree.clone(),
            field_of_study: self.field_of_study.clone(),
            from: self.from,
            to: self.to,
            current: self.current,
            description: self.description.clone(),
        }
    }
}
