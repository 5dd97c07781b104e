//! Standard message types exchanged by the chatter nodes
//!
//! Payloads travel as JSON, the same codec the Zenoh backend has always used.
//! Each type carries its ROS type name so subscribers can report what failed
//! to decode.

use crate::core::LogSummary;
use crate::error::{ChatterError, ChatterResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A message that can be published on a topic
pub trait Message: Serialize + DeserializeOwned + LogSummary + Clone + fmt::Debug + Send + 'static {
    /// ROS type name, e.g. `std_msgs/String`
    const TYPE_NAME: &'static str;

    fn encode(&self) -> ChatterResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| {
            ChatterError::Serialization(format!("Failed to serialize {}: {}", Self::TYPE_NAME, e))
        })
    }

    fn decode(payload: &[u8]) -> ChatterResult<Self> {
        serde_json::from_slice(payload).map_err(|e| ChatterError::Deserialization {
            type_name: Self::TYPE_NAME.to_string(),
            message: e.to_string(),
        })
    }
}

/// `std_msgs/String`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StringMsg {
    pub data: String,
}

impl StringMsg {
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }
}

impl Message for StringMsg {
    const TYPE_NAME: &'static str = "std_msgs/String";
}

impl LogSummary for StringMsg {
    fn log_summary(&self) -> String {
        self.data.clone()
    }
}

impl fmt::Display for StringMsg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data: {:?}", self.data)
    }
}

impl From<String> for StringMsg {
    fn from(data: String) -> Self {
        Self { data }
    }
}

impl From<&str> for StringMsg {
    fn from(data: &str) -> Self {
        Self::new(data)
    }
}

/// `std_msgs/Bool`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoolMsg {
    pub data: bool,
}

impl BoolMsg {
    pub fn new(data: bool) -> Self {
        Self { data }
    }
}

impl Message for BoolMsg {
    const TYPE_NAME: &'static str = "std_msgs/Bool";
}

impl LogSummary for BoolMsg {
    fn log_summary(&self) -> String {
        self.data.to_string()
    }
}

impl fmt::Display for BoolMsg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data: {}", self.data)
    }
}

impl From<bool> for BoolMsg {
    fn from(data: bool) -> Self {
        Self { data }
    }
}
