use crate::dtos::ParamValue;
use crate::models::Record;
use crate::services::dataset::{DatasetError, DatasetLoader};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Form not found")]
    FormNotFound,

    #[error("Question not found")]
    QuestionNotFound,

    #[error(transparent)]
    Dataset(DatasetError),
}

impl From<DatasetError> for LookupError {
    fn from(err: DatasetError) -> Self {
        match err {
            DatasetError::NotFound(_) => LookupError::FormNotFound,
            other => LookupError::Dataset(other),
        }
    }
}

/// Finds the first record whose match key equals the requested question
/// number. Uniqueness within a dataset is assumed, not checked.
#[derive(Debug, Clone)]
pub struct QuestionResolver {
    loader: DatasetLoader,
}

impl QuestionResolver {
    pub fn new(loader: DatasetLoader) -> Self {
        Self { loader }
    }

    pub fn resolve(
        &self,
        form_id: &str,
        question_number: &ParamValue,
    ) -> Result<Record, LookupError> {
        let records = self.loader.load(form_id)?;
        find_question(records, &question_number.to_string()).ok_or(LookupError::QuestionNotFound)
    }
}

fn find_question(records: Vec<Record>, question_number: &str) -> Option<Record> {
    records
        .into_iter()
        .find(|record| record.match_key() == Some(question_number))
}
