use std::env;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};
use serde::Deserialize;
use url::Url;

use crate::auth::AuthToken;
use crate::client_logger::ClientLogger;
use crate::error::{Error, Result};
use crate::observability::{
    AUTH_FAILURES, AUTH_LOGINS, CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS,
};
use crate::types::{
    BotMessageRequest, BotMessageResponse, BotReply, ConversationId, LoginRequest, LoginResponse,
    SignupRequest, SignupResponse,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the Nova backend.
#[derive(Clone)]
pub struct Nova {
    base_url: String,
    client: ReqwestClient,
    timeout: Duration,
    token: Option<AuthToken>,
    logger: Option<Arc<dyn ClientLogger>>,
}

impl Nova {
    /// Create a new Nova client.
    ///
    /// The base URL can be provided directly or read from the
    /// NOVA_BASE_URL environment variable.
    pub fn new(base_url: Option<String>) -> Result<Self> {
        Self::with_options(base_url, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let base_url = match base_url {
            Some(url) => url,
            None => env::var("NOVA_BASE_URL").map_err(|_| {
                Error::validation(
                    "base URL not provided and NOVA_BASE_URL environment variable not set",
                    Some("base_url".to_string()),
                )
            })?,
        };
        Url::parse(&base_url)?;
        let base_url = base_url.trim_end_matches('/').to_string();

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            base_url,
            client,
            timeout,
            token: None,
            logger: None,
        })
    }

    /// Install a logger that observes every exchange.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Set or clear the session token presented on backend calls.
    pub fn set_token(&mut self, token: Option<AuthToken>) {
        self.token = token;
    }

    /// Returns true while a session token is held.
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Create and return default headers for backend requests.
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = &self.token
            && let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
        {
            headers.insert(header::AUTHORIZATION, value);
        }
        headers
    }

    /// Map a transport-level reqwest error onto our error type.
    fn transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::timeout(
                format!("Request timed out: {}", e),
                Some(self.timeout.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
        } else {
            Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
        }
    }

    /// Process backend response errors and convert to our Error type.
    async fn process_error_response(response: Response) -> Error {
        let status = response.status();
        let status_code = status.as_u16();

        // The backend reports errors as {"message": "..."}.
        #[derive(Deserialize)]
        struct ErrorResponse {
            message: Option<String>,
        }

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };

        let message = serde_json::from_str::<ErrorResponse>(&error_body)
            .ok()
            .and_then(|e| e.message)
            .unwrap_or(error_body);

        match status_code {
            401 | 403 => Error::authentication(message),
            408 => Error::timeout(message, None),
            _ => Error::api(status_code, message),
        }
    }

    /// Send one user message and return the validated reply.
    ///
    /// This is a single attempt: any transport failure, non-success
    /// status, or response without a non-empty `botMessage` is returned
    /// as an error. The caller decides how to surface it.
    pub async fn send_message(
        &self,
        text: &str,
        conversation_id: Option<&ConversationId>,
    ) -> Result<BotReply> {
        if let Some(logger) = &self.logger {
            logger.log_request(text, conversation_id);
        }
        let body = BotMessageRequest::new(text, conversation_id.cloned());
        let url = format!("{}/bot/v1/message", self.base_url);

        let result = self.post_json(&url, &body).await;
        let reply = match result {
            Ok(response) => response
                .json::<BotMessageResponse>()
                .await
                .map_err(|e| {
                    Error::serialization(
                        format!("Failed to parse response: {}", e),
                        Some(Box::new(e)),
                    )
                })
                .and_then(BotReply::try_from),
            Err(err) => Err(err),
        };

        match &reply {
            Ok(reply) => {
                if let Some(logger) = &self.logger {
                    logger.log_reply(reply);
                }
            }
            Err(err) => {
                if let Some(logger) = &self.logger {
                    logger.log_failure(err);
                }
            }
        }
        reply
    }

    /// Exchange credentials for a session token.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthToken> {
        let body = LoginRequest::new(email, password);
        let url = format!("{}/api/auth/login", self.base_url);

        let result = match self.post_json(&url, &body).await {
            Ok(response) => response
                .json::<LoginResponse>()
                .await
                .map_err(|e| {
                    Error::serialization(
                        format!("Failed to parse login response: {}", e),
                        Some(Box::new(e)),
                    )
                })
                .map(|login| AuthToken::new(login.token)),
            Err(err) => Err(err),
        };

        match &result {
            Ok(_) => AUTH_LOGINS.click(),
            Err(_) => AUTH_FAILURES.click(),
        }
        result
    }

    /// Register a new account. Returns the backend's confirmation
    /// message; the caller logs in separately afterwards.
    pub async fn signup(&self, request: &SignupRequest) -> Result<String> {
        request.validate()?;
        let url = format!("{}/api/auth/signup", self.base_url);

        let response = self.post_json(&url, request).await?;
        let signup: SignupResponse = response.json().await.map_err(|e| {
            Error::serialization(
                format!("Failed to parse signup response: {}", e),
                Some(Box::new(e)),
            )
        })?;
        Ok(signup.message)
    }

    /// POST a JSON body and return the response if it has a success
    /// status; all error handling funnels through here.
    async fn post_json<B: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<Response> {
        CLIENT_REQUESTS.click();
        let started = Instant::now();

        let result = self
            .client
            .post(url)
            .headers(self.default_headers())
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e));
        CLIENT_REQUEST_DURATION.add(started.elapsed().as_secs_f64());

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                CLIENT_REQUEST_ERRORS.click();
                return Err(err);
            }
        };

        if !response.status().is_success() {
            CLIENT_REQUEST_ERRORS.click();
            return Err(Self::process_error_response(response).await);
        }
        Ok(response)
    }
}

impl std::fmt::Debug for Nova {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Nova")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}
