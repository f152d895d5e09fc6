//! Tagged outcome for expected business results.
//!
//! A success always carries data and no message; a failure always carries a
//! message and no data. The enum makes any other combination unrepresentable.

use serde::ser::{Serialize, SerializeStruct, Serializer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationResult<T> {
    Success(T),
    Failure(String),
}

impl<T> OperationResult<T> {
    pub fn success(data: T) -> Self { Self::Success(data) }

    pub fn failure(message: impl Into<String>) -> Self { Self::Failure(message.into()) }

    pub fn is_success(&self) -> bool { matches!(self, Self::Success(_)) }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            Self::Failure(_) => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure(message) => Some(message),
        }
    }

    pub fn into_result(self) -> Result<T, String> {
        match self {
            Self::Success(data) => Ok(data),
            Self::Failure(message) => Err(message),
        }
    }
}

/// Wire shape `{ "success": bool, "data"?: T, "message"?: string }`.
impl<T: Serialize> Serialize for OperationResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut st = serializer.serialize_struct("OperationResult", 2)?;
        match self {
            Self::Success(data) => {
                st.serialize_field("success", &true)?;
                st.serialize_field("data", data)?;
                st.skip_field("message")?;
            }
            Self::Failure(message) => {
                st.serialize_field("success", &false)?;
                st.skip_field("data")?;
                st.serialize_field("message", message)?;
            }
        }
        st.end()
    }
}
