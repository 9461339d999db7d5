//! Form schema core: questions, forms, answer handling and statistics.
//!
//! Nothing in here touches the database or the network. Handlers load and
//! store these types through `crate::models` and feed them back in.

pub mod form;
pub mod question;
pub mod response;
pub mod stats;
pub mod validate;

use std::fmt;

pub use form::{Form, FormState};
pub use question::{Question, QuestionKind, QuestionOption, QuestionType};
pub use response::{AnswerPayload, AnswerValue, Answers, StoredResponse, SubmissionPayload};

/// Misuse of the schema model: edits that do not apply to the value they
/// were made on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Option edits on a question whose type carries no options.
    NotChoiceType(QuestionType),
    /// A non-choice question arrived with options attached.
    OptionsNotAllowed(QuestionType),
    OptionIndex { index: usize, len: usize },
    QuestionIndex { index: usize, len: usize },
    /// Publishing a form that has never been saved.
    NotSaved,
    NotPublishable(Vec<String>),
    /// Published forms stay public.
    Unpublish,
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::NotChoiceType(t) => {
                write!(f, "Options can only be edited on multiple or checkbox questions, not {t}")
            }
            SchemaError::OptionsNotAllowed(t) => {
                write!(f, "Questions of type {t} cannot have options")
            }
            SchemaError::OptionIndex { index, len } => {
                write!(f, "Option index {index} out of range ({len} options)")
            }
            SchemaError::QuestionIndex { index, len } => {
                write!(f, "Question index {index} out of range ({len} questions)")
            }
            SchemaError::NotSaved => write!(f, "Form must be saved before it can be published"),
            SchemaError::NotPublishable(errors) => {
                write!(f, "Form cannot be published: {}", errors.join("; "))
            }
            SchemaError::Unpublish => write!(f, "Published forms cannot be made private"),
        }
    }
}

impl std::error::Error for SchemaError {}
