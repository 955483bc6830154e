// Client side of the grammar check: the form state machine, the HTTP client
// it talks through, and a plain-text rendering of its panels.

pub mod api;
pub mod form;
pub mod render;

pub use api::{CheckApi, ClientError, HttpCheckClient};
pub use form::{Form, FormState, Submission};
pub use render::{RenderOptions, ScoreTier};
