/// Update classification into outbound actions
pub mod dispatch;

pub use dispatch::{dispatch, Action};

use crate::telegram::{ApiError, PlatformApi};

/// Performs one outbound action against the platform API.
///
/// # Errors
///
/// Propagates the `ApiError` of the underlying call.
pub async fn execute(api: &dyn PlatformApi, action: &Action) -> Result<(), ApiError> {
    match action {
        Action::AnswerInlineQuery {
            inline_query_id,
            results,
        } => api.answer_inline_query(inline_query_id, results).await,
        Action::SendMessage { chat_id, text } => api.send_message(*chat_id, text).await,
    }
}
