pub mod openai;
pub mod retry;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    error::{Result, oracle_error::OracleError},
    message::Message,
    tools::ToolInfo,
};

pub use openai::OpenAiOracle;
pub use retry::with_backoff;

/// JSON schema for a typed oracle reply.
#[derive(Debug, Clone)]
pub struct OutputSchema {
    pub name: &'static str,
    pub schema: Value,
}

/// Records the oracle can be asked to return instead of free text.
pub trait StructuredOutput: DeserializeOwned {
    fn output_schema() -> OutputSchema;
}

/// The external multimodal decision maker.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// One conversational round; the reply may request tool calls.
    async fn chat(
        &self,
        messages: &[Message],
        tools: &[ToolInfo],
    ) -> core::result::Result<Message, OracleError>;

    /// A reply constrained to the given schema.
    async fn structured(
        &self,
        messages: &[Message],
        schema: &OutputSchema,
    ) -> core::result::Result<Value, OracleError>;
}

pub async fn invoke_structured<T: StructuredOutput>(
    oracle: &dyn Oracle,
    messages: &[Message],
) -> Result<T> {
    let schema = T::output_schema();
    let value = oracle.structured(messages, &schema).await?;
    serde_json::from_value(value).map_err(|e| {
        OracleError::InvalidResponse(format!("reply does not match `{}`: {e}", schema.name)).into()
    })
}
