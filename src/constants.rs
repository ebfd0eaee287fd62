/// Upstream completion API
pub const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";
pub const API_KEY_ENV: &str = "OPENAI_KEY";

/// Default completion parameters
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f64 = 0.4;

/// Fixed persona carried in the system-role message of every completion request
pub const SYSTEM_PERSONA: &str = "You are an experienced vietnamese male chef that wants to help your wife easily cook from her home. You explain recipes with ease and without complicating them much so anyone can cook. You always format your recipes using Markdown in Vietnamese language so your wife can read them easily. Always say hi to your wife and end the message with the sentence to tell how much you love your wife";

/// Response headers
pub const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";
pub const CONTENT_TYPE_TEXT: &str = "text/plain; charset=utf-8";
pub const HEADER_CACHE_CONTROL: &str = "no-cache";
pub const HEADER_CONNECTION: &str = "keep-alive";
pub const HEADER_ACCESS_CONTROL_ALLOW_ORIGIN: &str = "*";
pub const HEADER_ACCESS_CONTROL_ALLOW_METHODS: &str = "GET, POST, OPTIONS";
pub const HEADER_ACCESS_CONTROL_ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// Error messages
pub const ERROR_MISSING_CREDENTIAL: &str =
    "no upstream API credential configured (set the OPENAI_KEY environment variable)";
pub const ERROR_NO_INGREDIENTS: &str = "ingredient list must not be empty";
pub const ERROR_TIMEOUT: &str = "recipe stream timed out";
pub const ERROR_CANCELLED: &str = "request cancelled by client";
pub const ERROR_UPSTREAM_UNREACHABLE: &str = "completion API not reachable";
pub const ERROR_INTERNAL: &str = "internal server error";

/// SSE parsing constants (upstream wire format)
pub const SSE_DATA_PREFIX: &str = "data: ";
pub const SSE_DONE_MESSAGE: &str = "[DONE]";
pub const SSE_MESSAGE_BOUNDARY: &str = "\n\n";

/// Logging prefixes
pub const LOG_PREFIX_SUCCESS: &str = "✅";
pub const LOG_PREFIX_ERROR: &str = "❌";
pub const LOG_PREFIX_WARNING: &str = "⚠️";
pub const LOG_PREFIX_CONN: &str = "↔️";

/// Maximum accepted JSON body size (bytes)
pub const MAX_JSON_BODY_SIZE_BYTES: u64 = 64 * 1024;
