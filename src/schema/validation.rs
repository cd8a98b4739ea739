use tracing::{debug, instrument};

use crate::{Request, Schema, ValidationError};

mod input_value;
mod overlapping_fields;
mod pair_set;

pub use overlapping_fields::{OverlappingFieldsValidator, validate_overlapping_fields};

impl Schema {
    #[instrument(level = "trace", skip(self, request))]
    pub fn validate<'a>(&self, request: &'a Request) -> ValidationRequestOrErrors<'a> {
        let errors = validate_overlapping_fields(self, &request.document);
        if !errors.is_empty() {
            debug!(count = errors.len(), "request failed validation");
            return errors.into();
        }

        ValidatedRequest::new(request).into()
    }
}

#[derive(Debug)]
pub struct ValidatedRequest<'a> {
    pub request: &'a Request,
}

impl<'a> ValidatedRequest<'a> {
    pub fn new(request: &'a Request) -> Self {
        Self { request }
    }
}

#[derive(Debug)]
pub enum ValidationRequestOrErrors<'a> {
    Request(ValidatedRequest<'a>),
    Errors(Vec<ValidationError<'a>>),
}

impl<'a> ValidationRequestOrErrors<'a> {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Request(_))
    }

    pub fn into_errors(self) -> Vec<ValidationError<'a>> {
        match self {
            Self::Errors(errors) => errors,
            _ => panic!("Expected errors"),
        }
    }
}

impl<'a> From<ValidatedRequest<'a>> for ValidationRequestOrErrors<'a> {
    fn from(value: ValidatedRequest<'a>) -> Self {
        Self::Request(value)
    }
}

impl<'a> From<Vec<ValidationError<'a>>> for ValidationRequestOrErrors<'a> {
    fn from(value: Vec<ValidationError<'a>>) -> Self {
        Self::Errors(value)
    }
}
