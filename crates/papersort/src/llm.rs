//! Client for OpenAI-compatible chat completion APIs.
//!
//! The defaults point at DeepSeek (`https://api.deepseek.com`, model
//! `deepseek-chat`), but any service that speaks the `/chat/completions`
//! protocol with bearer authentication works.
//!
//! Requests are assembled with the [`ChatRequest`] builder and sent through an
//! [`LlmClient`], which owns the HTTP connection pool, endpoint, and key.
//!
//! # Examples
//!
//! ```no_run
//! use papersort::llm::LlmClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = LlmClient::new("https://api.deepseek.com", "sk-...", "deepseek-chat", 60)?;
//! let request = client
//!   .request()
//!   .with_system("Answer in one word.")
//!   .with_message("What is the capital of France?");
//!
//! let answer = client.complete(&request).await?;
//! println!("{answer}");
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use super::*;

/// Path of the chat completions endpoint relative to the base URL.
const CHAT_COMPLETIONS: &str = "chat/completions";

/// Role of a message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  /// Instructions framing the conversation
  System,
  /// Input from the caller
  User,
  /// Replies from the model
  Assistant,
}

/// A single chat message.
///
/// ```
/// use papersort::llm::{Message, Role};
///
/// let message = Message { role: Role::User, content: "What is the speed of light?".to_string() };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
  /// Who wrote the message
  pub role:    Role,
  /// The message text
  pub content: String,
}

/// Asks the API to constrain the reply to a JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseFormat {
  /// Always `json_object`
  #[serde(rename = "type")]
  pub kind: String,
}

/// Request builder for chat completions.
///
/// # Examples
///
/// ```
/// use papersort::llm::ChatRequest;
///
/// let request = ChatRequest::new()
///   .with_model("deepseek-chat")
///   .with_system("Reply with JSON.")
///   .with_message("Describe this paper")
///   .with_json_mode();
/// assert_eq!(request.messages.len(), 2);
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChatRequest {
  /// The model to use. Sending without one is an error.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub model:           Option<String>,
  /// Conversation so far, in order. Must not be empty when sent.
  pub messages:        Vec<Message>,
  /// Streaming is not supported, so this stays `false`.
  pub stream:          bool,
  /// Sampling temperature; `0.0` keeps extraction as repeatable as the API
  /// allows.
  pub temperature:     f64,
  /// Optional reply format constraint
  #[serde(skip_serializing_if = "Option::is_none")]
  pub response_format: Option<ResponseFormat>,
}

impl ChatRequest {
  /// Creates an empty request.
  pub fn new() -> Self { Self::default() }

  /// Sets the model.
  pub fn with_model(mut self, model: &str) -> Self {
    self.model.replace(model.to_string());
    self
  }

  /// Appends a system message.
  pub fn with_system(mut self, content: &str) -> Self {
    self.messages.push(Message { role: Role::System, content: content.to_string() });
    self
  }

  /// Appends a user message.
  pub fn with_message(mut self, content: &str) -> Self {
    self.messages.push(Message { role: Role::User, content: content.to_string() });
    self
  }

  /// Sets the sampling temperature, clamped to `[0, 2]`.
  pub fn with_temperature(mut self, temperature: f64) -> Self {
    if !(0.0..=2.0).contains(&temperature) {
      warn!("Temperature {temperature} is outside [0, 2], clamping");
    }
    self.temperature = temperature.clamp(0.0, 2.0);
    self
  }

  /// Requests a JSON object reply.
  pub fn with_json_mode(mut self) -> Self {
    self.response_format = Some(ResponseFormat { kind: "json_object".to_string() });
    self
  }

  /// Checks the request can be sent.
  fn validate(&self) -> Result<()> {
    if self.model.as_deref().map_or(true, str::is_empty) {
      return Err(PapersortError::LLMMissingModel);
    }
    if self.messages.is_empty() {
      return Err(PapersortError::LLMMissingMessage);
    }
    Ok(())
  }
}

/// Reply from the chat completions endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
  /// Model that produced the reply
  #[serde(default)]
  pub model:   String,
  /// Candidate replies; only the first is used
  pub choices: Vec<Choice>,
  /// Token accounting, when the API reports it
  #[serde(default)]
  pub usage:   Option<Usage>,
}

/// One candidate reply.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
  /// The generated message
  pub message:       ResponseMessage,
  /// Why generation stopped
  #[serde(default)]
  pub finish_reason: Option<String>,
}

/// Message inside a [`Choice`]; `content` may be null.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
  /// Generated text
  #[serde(default)]
  pub content: Option<String>,
}

/// Token usage for a request.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Usage {
  /// Tokens in the prompt
  #[serde(default)]
  pub prompt_tokens:     u64,
  /// Tokens generated
  #[serde(default)]
  pub completion_tokens: u64,
  /// Sum of both
  #[serde(default)]
  pub total_tokens:      u64,
}

impl ChatResponse {
  /// Content of the first choice.
  ///
  /// # Errors
  ///
  /// [`PapersortError::ApiError`] when there is no choice or it has no text.
  pub fn first_content(&self) -> Result<&str> {
    self
      .choices
      .first()
      .and_then(|choice| choice.message.content.as_deref())
      .ok_or_else(|| PapersortError::ApiError("Response contained no message content".into()))
  }
}

/// Connection to a chat completions API.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone)]
pub struct LlmClient {
  /// Pooled HTTP client
  http:     reqwest::Client,
  /// Fully resolved `/chat/completions` URL
  endpoint: Url,
  /// Bearer token
  api_key:  String,
  /// Model used by [`LlmClient::request`]
  model:    String,
}

impl std::fmt::Debug for LlmClient {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("LlmClient")
      .field("endpoint", &self.endpoint.as_str())
      .field("model", &self.model)
      .field("api_key", &"<redacted>")
      .finish()
  }
}

impl LlmClient {
  /// Creates a client for `base_url` with a per-request timeout in seconds.
  pub fn new(base_url: &str, api_key: &str, model: &str, timeout_secs: u64) -> Result<Self> {
    let http = reqwest::Client::builder().timeout(Duration::from_secs(timeout_secs)).build()?;
    Ok(Self {
      http,
      endpoint: chat_endpoint(base_url)?,
      api_key: api_key.to_string(),
      model: model.to_string(),
    })
  }

  /// Creates a client from the API options of a [`Config`].
  pub fn from_config(config: &Config) -> Result<Self> {
    Self::new(
      &config.api_base_url,
      &config.resolved_api_key()?,
      &config.model,
      config.request_timeout_secs,
    )
  }

  /// A new request already set to this client's model.
  pub fn request(&self) -> ChatRequest { ChatRequest::new().with_model(&self.model) }

  /// The resolved chat completions URL.
  pub fn endpoint(&self) -> &Url { &self.endpoint }

  /// Sends a request and returns the full response.
  ///
  /// # Errors
  ///
  /// This function will return an error if:
  /// - No model is specified
  /// - No messages are provided
  /// - The network request fails or times out
  /// - The API answers with a non-success status
  /// - The response cannot be parsed
  pub async fn send(&self, request: &ChatRequest) -> Result<ChatResponse> {
    request.validate()?;

    debug!("Sending {} message(s) to {}", request.messages.len(), self.endpoint);
    let response =
      self.http.post(self.endpoint.clone()).bearer_auth(&self.api_key).json(request).send().await?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(PapersortError::ApiError(format!("{status}: {body}")));
    }

    let chat_response: ChatResponse = response.json().await?;
    if let Some(usage) = chat_response.usage {
      debug!("Request used {} tokens", usage.total_tokens);
    }
    Ok(chat_response)
  }

  /// Sends a request and returns the text of the first choice.
  pub async fn complete(&self, request: &ChatRequest) -> Result<String> {
    let response = self.send(request).await?;
    let content = response.first_content()?;
    trace!("Model reply: {content}");
    Ok(content.to_string())
  }
}

/// Joins the chat completions path onto `base_url`, keeping any path prefix
/// such as `/v1`.
fn chat_endpoint(base_url: &str) -> Result<Url> {
  let mut base = Url::parse(base_url)?;
  if !base.path().ends_with('/') {
    let path = format!("{}/", base.path());
    base.set_path(&path);
  }
  Ok(base.join(CHAT_COMPLETIONS)?)
}
