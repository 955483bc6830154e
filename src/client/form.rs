use crate::client::api::{CheckApi, ClientError};
use crate::domain::model::CheckResult;

/// What the form is currently showing. Exactly one of these holds at a time,
/// so "loading with an error" cannot be represented.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormState {
    #[default]
    Idle,
    Loading,
    Success(CheckResult),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Input was empty or whitespace-only; nothing was sent.
    Blank,
    /// A request is already outstanding; nothing was sent.
    Busy,
    /// A request was sent and the form left the loading state.
    Completed,
}

#[derive(Debug, Clone, Default)]
pub struct Form {
    input: String,
    state: FormState,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            state: FormState::Idle,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, FormState::Loading)
    }

    pub fn can_submit(&self) -> bool {
        !self.is_loading() && !self.input.trim().is_empty()
    }

    /// Enters `Loading` and hands back the text to send, dropping any previous
    /// result or error. Refuses blank input and resubmission while loading.
    pub fn begin(&mut self) -> Result<String, Submission> {
        if self.is_loading() {
            return Err(Submission::Busy);
        }
        if self.input.trim().is_empty() {
            return Err(Submission::Blank);
        }
        self.state = FormState::Loading;
        Ok(self.input.clone())
    }

    /// Leaves `Loading` with the outcome of the request.
    pub fn finish(&mut self, outcome: Result<CheckResult, ClientError>) {
        self.state = match outcome {
            Ok(result) => FormState::Success(result),
            Err(e) => {
                tracing::error!("Grammar check failed: {}", e);
                FormState::Error(e.user_message())
            }
        };
    }

    pub async fn submit<A: CheckApi + ?Sized>(&mut self, api: &A) -> Submission {
        let text = match self.begin() {
            Ok(text) => text,
            Err(refused) => return refused,
        };
        let outcome = api.check_grammar(&text).await;
        self.finish(outcome);
        Submission::Completed
    }
}
