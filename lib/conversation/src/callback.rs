//! Phone callback requests.

use crate::error::{InputError, InputField};
use crate::message::Message;
use crate::script;
use crate::state::ConversationState;

/// A validated callback request.
///
/// Any non-blank text is accepted as the number; it is contact information
/// typed by the user, not a dialable format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackRequest {
    phone_number: String,
}

impl CallbackRequest {
    /// Builds a request from user input, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::Empty`] if `phone_number` is blank.
    pub fn new(phone_number: &str) -> Result<Self, InputError> {
        let phone_number = phone_number.trim();
        if phone_number.is_empty() {
            return Err(InputError::Empty {
                field: InputField::PhoneNumber,
            });
        }
        Ok(Self {
            phone_number: phone_number.to_string(),
        })
    }

    /// The number to call back.
    #[must_use]
    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    /// Desk confirmation text for this request.
    #[must_use]
    pub fn confirmation(&self) -> String {
        script::callback_scheduled(&self.phone_number)
    }
}

/// Records a callback request as a single desk message.
///
/// # Errors
///
/// Returns [`InputError::Empty`] if `phone_number` is blank; nothing is
/// appended in that case.
pub fn request_callback(
    state: &mut ConversationState,
    phone_number: &str,
) -> Result<Message, InputError> {
    let request = CallbackRequest::new(phone_number)?;
    Ok(state.append_system_message(request.confirmation()))
}
