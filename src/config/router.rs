use {
    crate::{CorsPolicy, Result},
    serde::Deserialize,
};

///
/// Router-wide behaviour.
///
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// When true, TRACE requests to a known resource without a registered
    /// TRACE handler echo the request body back as `message/http`.
    /// Disabled by default; TRACE then answers 405.
    pub allow_trace: bool,

    /// Global CORS policy. When absent, CORS handling is disabled and
    /// per-resource policies have no effect.
    pub cors: Option<CorsPolicy>,
}

impl RouterConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some(cors) = &self.cors {
            cors.validate()?;
        }
        Ok(())
    }
}
