//! Secret Resolver - three-tier credential lookup.
//!
//! Order is fixed and total:
//! 1. truthy value at the request's dotted path in the descriptor
//! 2. non-empty environment variable
//! 3. interactive prompt, re-asked until the trimmed answer is non-empty

use tracing::{debug, instrument, warn};

use crate::{
    application::ports::{Environment, Prompter},
    domain::{
        ConfigMapping, ConfigValue, DomainValidator as validator, ResolvedSecret, SecretRequest,
        SecretSource,
    },
    error::NetgenResult,
};

/// Resolves credentials through the descriptor → environment → prompt chain.
pub struct SecretResolver {
    environment: Box<dyn Environment>,
    prompter: Box<dyn Prompter>,
}

impl SecretResolver {
    pub fn new(environment: Box<dyn Environment>, prompter: Box<dyn Prompter>) -> Self {
        Self {
            environment,
            prompter,
        }
    }

    /// Resolve one secret against `source`.
    ///
    /// The only failure is the prompt port reporting that no operator can
    /// be asked.
    #[instrument(skip_all, fields(path = %request.path))]
    pub fn resolve(
        &self,
        request: &SecretRequest,
        source: &ConfigMapping,
    ) -> NetgenResult<ResolvedSecret> {
        if let Some(value) = request.inline_value(source) {
            return Ok(ResolvedSecret::new(value, SecretSource::Descriptor));
        }

        if let Some(value) = self
            .environment
            .var(&request.env_var)
            .filter(|v| !v.is_empty())
        {
            debug!(env_var = %request.env_var, "Secret taken from environment");
            return Ok(ResolvedSecret::new(value, SecretSource::Environment));
        }

        loop {
            let answer = self.prompter.ask_secret(&request.prompt)?;
            match validator::require_non_empty(&answer, &request.prompt) {
                Ok(value) => return Ok(ResolvedSecret::new(value, SecretSource::Prompt)),
                Err(e) => warn!("{e}; asking again"),
            }
        }
    }

    /// Resolve every request that `data` does not already carry and write
    /// the results back at their paths.
    ///
    /// Requests already supplied inline are left alone: no environment
    /// lookup, no prompt. Returns the tier used for each filled path.
    pub fn fill_missing(
        &self,
        requests: &[SecretRequest],
        data: &mut ConfigMapping,
    ) -> NetgenResult<Vec<(String, SecretSource)>> {
        let mut filled = Vec::new();
        for request in requests {
            if request.is_supplied(data) {
                continue;
            }
            let secret = self.resolve(request, data)?;
            let source = secret.source();
            request
                .path
                .insert(data, ConfigValue::String(secret.into_value()));
            filled.push((request.path.to_string(), source));
        }
        Ok(filled)
    }
}
