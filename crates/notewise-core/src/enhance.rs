//! Delta-aware text enhancement.
//!
//! [`TextEnhancer`] is the only component that talks to the rewrite
//! service. Plain content is rewritten as-is; delta content is flattened,
//! rewritten once, and rebuilt through the list-preserving path or the
//! offset-based reconstructor depending on whether it is a list.

use std::time::Instant;

use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::delta::{
    analyze, is_list_like, preserve_list_formatting, reconstruct_with_analysis, Delta,
};
use crate::error::{Error, Result};
use crate::models::{ContentFormat, DocumentContent, EnhanceResult};
use crate::traits::RewriteService;

/// Orchestrates one rewrite call per enhancement request.
///
/// Holds no per-request state, so a single instance can serve concurrent
/// requests.
pub struct TextEnhancer<R> {
    rewriter: R,
}

impl<R: RewriteService> TextEnhancer<R> {
    pub fn new(rewriter: R) -> Self {
        Self { rewriter }
    }

    pub fn rewriter(&self) -> &R {
        &self.rewriter
    }

    /// Enhance `content` given in `format`.
    ///
    /// Plain content must be a non-blank JSON string. Delta content may be a
    /// delta object or a string holding a serialized delta.
    #[instrument(skip(self, content, format), fields(subsystem = "core", component = "enhancer", op = "enhance", format = %format))]
    pub async fn enhance(&self, content: &Value, format: ContentFormat) -> Result<EnhanceResult> {
        match format {
            ContentFormat::Plain => {
                let text = content
                    .as_str()
                    .ok_or_else(|| invalid_content("Content must be a string"))?;
                self.enhance_plain(text).await
            }
            ContentFormat::Delta => {
                let doc = match content {
                    Value::String(serialized) => Delta::parse(serialized)?,
                    other => Delta::from_value(other)?,
                };
                self.enhance_delta(doc).await
            }
        }
    }

    /// Rewrite plain text, returning the service output verbatim.
    pub async fn enhance_plain(&self, text: &str) -> Result<EnhanceResult> {
        if text.trim().is_empty() {
            return Err(invalid_content("Content is empty or invalid"));
        }

        let enhanced = self.rewrite(text).await?;

        Ok(EnhanceResult {
            enhanced: DocumentContent::Plain(enhanced),
            original: DocumentContent::Plain(text.to_string()),
            format: ContentFormat::Plain,
        })
    }

    /// Rewrite the text of a delta and rebuild its formatting.
    pub async fn enhance_delta(&self, doc: Delta) -> Result<EnhanceResult> {
        if doc.is_empty() {
            return Err(Error::InvalidDocument("Empty ops array".to_string()));
        }

        let analysis = analyze(&doc);
        if analysis.is_blank() {
            return Err(Error::NoEnhanceableText);
        }

        let enhanced_text = self.rewrite(&analysis.plain_text).await?;

        let list_like = is_list_like(&doc);
        debug!(
            list_like,
            line_count = enhanced_text.lines().count(),
            spans = analysis.format_spans.len(),
            line_breaks = analysis.line_breaks.len(),
            "Rebuilding delta from enhanced text"
        );

        let enhanced = if list_like {
            preserve_list_formatting(&doc, &enhanced_text)
        } else {
            reconstruct_with_analysis(&enhanced_text, &analysis)
        };

        Ok(EnhanceResult {
            enhanced: DocumentContent::Delta(enhanced),
            original: DocumentContent::Delta(doc),
            format: ContentFormat::Delta,
        })
    }

    async fn rewrite(&self, text: &str) -> Result<String> {
        let start = Instant::now();
        match self.rewriter.rewrite(text).await {
            Ok(enhanced) => {
                debug!(
                    prompt_len = text.len(),
                    response_len = enhanced.len(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Rewrite complete"
                );
                Ok(enhanced)
            }
            Err(e) => {
                warn!(error = %e, duration_ms = start.elapsed().as_millis() as u64, "Rewrite failed");
                Err(match e {
                    Error::RewriteService(_) => e,
                    other => Error::RewriteService(other.to_string()),
                })
            }
        }
    }
}

fn invalid_content(message: &str) -> Error {
    Error::InvalidContent(message.to_string())
}
