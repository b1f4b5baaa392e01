use std::sync::Arc;
use std::time::{Duration, Instant};

use opentelemetry::KeyValue;
use tracing::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

use super::{GenerateRequest, GenerateResponse, Provider};
use crate::telemetry::metrics::{
    GEN_AI_ERROR_COUNT, GEN_AI_FALLBACK_COUNT, GEN_AI_OPERATION_DURATION, GEN_AI_RETRY_COUNT,
    GEN_AI_TOKEN_USAGE,
};

/// Attempts per provider and the exponential backoff between them.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Delay before the attempt following `attempt` (zero-based), with up to
    /// 25% jitter.
    fn delay(&self, attempt: u32) -> Duration {
        let base = self
            .base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(self.max_delay);
        let jitter_ms = fastrand::u64(0..=base.as_millis() as u64 / 4);
        base + Duration::from_millis(jitter_ms)
    }

    /// Delay before the next attempt, or `None` when `attempt` (zero-based)
    /// was the last one.
    fn retry_after(&self, attempt: u32) -> Option<Duration> {
        (attempt + 1 < self.attempts.max(1)).then(|| self.delay(attempt))
    }
}

pub struct LlmClient {
    pub primary: Arc<dyn Provider>,
    pub fallback: Option<Arc<dyn Provider>>,
    pub primary_provider: String,
    pub primary_model: String,
    pub fallback_provider: String,
    pub fallback_model: String,
    pub retry: RetryPolicy,
}

fn server_of(provider_name: &str) -> (&'static str, i64) {
    match provider_name {
        "openai" => ("api.openai.com", 443),
        "anthropic" => ("api.anthropic.com", 443),
        _ => ("unknown", 443),
    }
}

impl LlmClient {
    pub async fn generate_once(
        &self,
        provider: &dyn Provider,
        provider_name: &str,
        req: &GenerateRequest,
    ) -> anyhow::Result<GenerateResponse> {
        let span_display_name = format!("gen_ai.chat {}", req.model);
        let start = Instant::now();
        let (server_addr, server_port) = server_of(provider_name);

        let span = tracing::info_span!(
            "gen_ai.chat",
            otel.name = %span_display_name,
            gen_ai.operation.name = "chat",
            gen_ai.provider.name = %provider_name,
            gen_ai.request.model = %req.model,
            server.address = %server_addr,
            server.port = server_port,
            gen_ai.request.temperature = req.temperature,
            gen_ai.request.max_tokens = req.max_tokens as i64,
            gen_ai.response.model = tracing::field::Empty,
            gen_ai.usage.input_tokens = tracing::field::Empty,
            gen_ai.usage.output_tokens = tracing::field::Empty,
            gen_ai.response.finish_reasons = tracing::field::Empty,
            report.stage = %req.stage,
            otel.status_code = tracing::field::Empty,
            error.type = tracing::field::Empty,
        );

        {
            let mut user_event_attrs =
                vec![KeyValue::new("gen_ai.prompt", truncate(&req.prompt, 1000))];
            if !req.system.is_empty() {
                user_event_attrs.push(KeyValue::new(
                    "gen_ai.system_instructions",
                    truncate(&req.system, 500),
                ));
            }
            span.add_event("gen_ai.user.message", user_event_attrs);
        }

        let result = provider.generate(req).instrument(span.clone()).await;

        let duration = start.elapsed().as_secs_f64();

        match result {
            Ok(mut resp) => {
                resp.provider = provider_name.to_string();

                span.record("gen_ai.response.model", resp.model.as_str());
                span.record("gen_ai.usage.input_tokens", resp.input_tokens as i64);
                span.record("gen_ai.usage.output_tokens", resp.output_tokens as i64);
                if !resp.finish_reason.is_empty() {
                    span.record(
                        "gen_ai.response.finish_reasons",
                        resp.finish_reason.as_str(),
                    );
                }

                span.add_event(
                    "gen_ai.assistant.message",
                    vec![KeyValue::new(
                        "gen_ai.completion",
                        truncate(&resp.content, 2000),
                    )],
                );

                let op_kv = KeyValue::new("gen_ai.operation.name", "chat");
                let provider_kv = KeyValue::new("gen_ai.provider.name", provider_name.to_string());
                let model_kv = KeyValue::new("gen_ai.request.model", resp.model.clone());

                for (kind, tokens) in [("input", resp.input_tokens), ("output", resp.output_tokens)] {
                    GEN_AI_TOKEN_USAGE.record(
                        f64::from(tokens),
                        &[
                            KeyValue::new("gen_ai.token.type", kind),
                            op_kv.clone(),
                            provider_kv.clone(),
                            model_kv.clone(),
                        ],
                    );
                }
                GEN_AI_OPERATION_DURATION.record(duration, &[op_kv, provider_kv, model_kv]);

                Ok(resp)
            }
            Err(err) => {
                span.record("otel.status_code", "ERROR");
                span.record("error.type", classify_error(&err));

                GEN_AI_ERROR_COUNT.add(
                    1,
                    &[
                        KeyValue::new("gen_ai.provider.name", provider_name.to_string()),
                        KeyValue::new("gen_ai.request.model", req.model.clone()),
                    ],
                );

                Err(err)
            }
        }
    }

    pub async fn generate_with_retry(
        &self,
        provider: &dyn Provider,
        provider_name: &str,
        req: &GenerateRequest,
    ) -> anyhow::Result<GenerateResponse> {
        let max_attempts = self.retry.attempts.max(1);
        let mut last_err = None;

        for attempt in 0..max_attempts {
            match self.generate_once(provider, provider_name, req).await {
                Ok(resp) => return Ok(resp),
                Err(err) => {
                    let Some(delay) = self.retry.retry_after(attempt) else {
                        tracing::warn!(
                            attempt = attempt + 1,
                            max_attempts,
                            provider = provider_name,
                            model = %req.model,
                            error = %err,
                            "LLM call failed, no attempts left"
                        );
                        last_err = Some(err);
                        break;
                    };

                    tracing::warn!(
                        attempt = attempt + 1,
                        max_attempts,
                        provider = provider_name,
                        model = %req.model,
                        error = %err,
                        "LLM call failed, retrying"
                    );
                    GEN_AI_RETRY_COUNT.add(
                        1,
                        &[
                            KeyValue::new("gen_ai.provider.name", provider_name.to_string()),
                            KeyValue::new("gen_ai.request.model", req.model.clone()),
                        ],
                    );

                    last_err = Some(err);
                    tokio::time::sleep(delay).await;
                }
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow::anyhow!("all retries exhausted")))
    }

    pub async fn generate(&self, req: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        let result = self
            .generate_with_retry(self.primary.as_ref(), &self.primary_provider, req)
            .await;

        match result {
            Ok(resp) => Ok(resp),
            Err(primary_err) => {
                if let Some(ref fallback) = self.fallback {
                    tracing::warn!(
                        primary_provider = %self.primary_provider,
                        fallback_provider = %self.fallback_provider,
                        error = %primary_err,
                        "Primary provider failed, falling back"
                    );

                    GEN_AI_FALLBACK_COUNT.add(1, &[]);

                    let fallback_req = GenerateRequest {
                        model: self.fallback_model.clone(),
                        ..req.clone()
                    };

                    self.generate_with_retry(
                        fallback.as_ref(),
                        &self.fallback_provider,
                        &fallback_req,
                    )
                    .await
                } else {
                    Err(anyhow::anyhow!(
                        "primary provider {} failed after retries: {}",
                        self.primary_provider,
                        primary_err
                    ))
                }
            }
        }
    }
}

fn classify_error(err: &anyhow::Error) -> &'static str {
    let msg = err.to_string().to_lowercase();
    if msg.contains("rate limit") || msg.contains("429") {
        "rate_limit"
    } else if msg.contains("timeout") || msg.contains("timed out") || msg.contains("deadline") {
        "timeout"
    } else if msg.contains("401")
        || msg.contains("403")
        || msg.contains("auth")
        || msg.contains("api key")
    {
        "auth_error"
    } else if msg.contains("400") || msg.contains("422") || msg.contains("invalid") {
        "invalid_request"
    } else if msg.contains("500")
        || msg.contains("502")
        || msg.contains("503")
        || msg.contains("server")
    {
        "server_error"
    } else if msg.contains("connect")
        || msg.contains("dns")
        || msg.contains("network")
        || msg.contains("reset")
    {
        "network_error"
    } else {
        "unknown_error"
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        s.char_indices()
            .take_while(|&(i, _)| i < max)
            .map(|(_, c)| c)
            .collect()
    }
}
