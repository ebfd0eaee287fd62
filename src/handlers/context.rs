use crate::streaming::RelayLimits;

#[derive(Clone)]
pub struct RequestContext<'a> {
    pub client: &'a reqwest::Client,
    pub upstream_url: &'a str,
    /// Resolved from the environment per request; absence is a functional
    /// error, not a startup failure.
    pub api_key: Option<&'a str>,
    pub model: &'a str,
    pub temperature: f64,
    pub limits: RelayLimits,
}
