use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewExperience {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, message = "Company is required"))]
    pub company: String,

    pub location: Option<String>,
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,

    #[serde(default)]
    pub current: bool,

    pub description: Option<String>,
}

impl NewExperience {
    /// Each entry gets its own identifier at insert time.
    pub fn prepare_for_insert(&self) -> Experience {
        Experience {
            id: Uuid::new_v4(),
            title: self.title.clone(),
            company: self.company.clone(),
            location: self.location.clone(),
            from: self.from,
            to: self.to,
            current: self.current,
            description: self.description.clone(),
        }
    }
}
