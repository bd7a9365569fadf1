//! Headline translation via the Google Translate web endpoint.
//!
//! The translator consumes only the `title` field of each [`Article`] and
//! annotates the record in place. Requests are issued strictly one at a
//! time: the request for article i+1 is not started until article i's has
//! resolved. Failure is batch-level: the first error aborts the remaining
//! titles and the accumulator returned for analysis is emptied, while
//! articles annotated before the failure keep their `translated_title`.
//! That asymmetry is reference behavior and is pinned by tests.
//!
//! # Endpoint
//!
//! `https://translate.googleapis.com/translate_a/single?client=gtx&dt=t`
//! returns a nested JSON array; the translation is the concatenation of the
//! first element of each segment in the first array.

use crate::models::Article;
use crate::utils::truncate_for_log;
use serde_json::Value;
use std::error::Error;
use std::time::Instant;
use thiserror::Error as ThisError;
use tracing::{debug, error, info, instrument};

const GTX_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Errors specific to the translation endpoint's response shape.
#[derive(Debug, ThisError)]
pub enum TranslationError {
    /// The endpoint answered 200 but the payload was not the expected
    /// nested-array shape, or carried no text segments.
    #[error("malformed translation response")]
    MalformedResponse,
}

/// Trait for async headline translation.
///
/// The production implementation is [`GtxClient`]; tests drive the
/// sequential loop with scripted implementations.
pub trait Translate {
    /// Translate `text` from the configured source language to the target
    /// language.
    async fn translate(&self, text: &str) -> Result<String, Box<dyn Error>>;
}

/// Client for the unofficial Google Translate web endpoint.
#[derive(Debug)]
pub struct GtxClient {
    http: reqwest::Client,
    source: String,
    target: String,
}

impl GtxClient {
    /// Build a client translating from `source` to `target` (ISO 639-1
    /// codes, e.g. `"es"` → `"en"`).
    pub fn new(source: &str, target: &str) -> Result<Self, Box<dyn Error>> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            source: source.to_string(),
            target: target.to_string(),
        })
    }
}

impl Translate for GtxClient {
    #[instrument(level = "info", skip_all)]
    async fn translate(&self, text: &str) -> Result<String, Box<dyn Error>> {
        let t0 = Instant::now();
        let response = self
            .http
            .get(GTX_ENDPOINT)
            .query(&[
                ("client", "gtx"),
                ("dt", "t"),
                ("sl", self.source.as_str()),
                ("tl", self.target.as_str()),
                ("q", text),
            ])
            .send()
            .await?
            .error_for_status()?;

        let payload: Value = response.json().await?;
        let translated = parse_gtx_response(&payload)?;
        debug!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            text = %truncate_for_log(text, 120),
            translated = %truncate_for_log(&translated, 120),
            "Translated headline"
        );
        Ok(translated)
    }
}

/// Pull the translated text out of the endpoint's nested-array payload.
fn parse_gtx_response(payload: &Value) -> Result<String, TranslationError> {
    let segments = payload
        .get(0)
        .and_then(Value::as_array)
        .ok_or(TranslationError::MalformedResponse)?;

    let mut out = String::new();
    for segment in segments {
        if let Some(text) = segment.get(0).and_then(Value::as_str) {
            out.push_str(text);
        }
    }
    if out.is_empty() {
        return Err(TranslationError::MalformedResponse);
    }
    Ok(out)
}

/// Translate every article title in extraction order, annotating each
/// article in place and accumulating the translated text.
///
/// The loop is strictly sequential, one request in flight at a time, in
/// slice order. On the first error the remaining titles are abandoned, the
/// error is logged, and an empty accumulator is returned; articles already
/// annotated keep their `translated_title`.
#[instrument(level = "info", skip_all, fields(count = articles.len()))]
pub async fn translate_titles<T: Translate>(
    translator: &T,
    articles: &mut [Article],
) -> Vec<String> {
    let mut translated_titles = Vec::with_capacity(articles.len());

    for (i, article) in articles.iter_mut().enumerate() {
        match translator.translate(&article.title).await {
            Ok(text) => {
                article.translated_title = Some(text.clone());
                translated_titles.push(text);
            }
            Err(e) => {
                error!(
                    index = i + 1,
                    error = %e,
                    "Error in translation; aborting remaining titles"
                );
                return Vec::new();
            }
        }
    }

    info!(count = translated_titles.len(), "Translated all titles");
    translated_titles
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Scripted translator that records call order and replays canned
    /// responses. `Err(msg)` entries simulate endpoint failures.
    struct ScriptedTranslator {
        responses: RefCell<VecDeque<Result<String, String>>>,
        calls: RefCell<Vec<String>>,
    }

    impl ScriptedTranslator {
        fn new(responses: Vec<Result<&str, &str>>) -> Self {
            Self {
                responses: RefCell::new(
                    responses
                        .into_iter()
                        .map(|r| r.map(str::to_string).map_err(str::to_string))
                        .collect(),
                ),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl Translate for ScriptedTranslator {
        async fn translate(&self, text: &str) -> Result<String, Box<dyn Error>> {
            self.calls.borrow_mut().push(text.to_string());
            match self.responses.borrow_mut().pop_front().expect("script ran dry") {
                Ok(s) => Ok(s),
                Err(e) => Err(e.into()),
            }
        }
    }

    fn batch(titles: &[&str]) -> Vec<Article> {
        titles
            .iter()
            .map(|t| Article::new(t.to_string(), "snippet".to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_all_titles_translated_in_order() {
        let translator = ScriptedTranslator::new(vec![Ok("one"), Ok("two"), Ok("three")]);
        let mut articles = batch(&["uno", "dos", "tres"]);

        let translated = translate_titles(&translator, &mut articles).await;

        assert_eq!(translated, vec!["one", "two", "three"]);
        assert_eq!(
            *translator.calls.borrow(),
            vec!["uno".to_string(), "dos".to_string(), "tres".to_string()]
        );
        for (article, expected) in articles.iter().zip(["one", "two", "three"]) {
            assert_eq!(article.translated_title.as_deref(), Some(expected));
        }
    }

    #[tokio::test]
    async fn test_failure_mid_batch_aborts_and_empties_accumulator() {
        let translator = ScriptedTranslator::new(vec![
            Ok("one"),
            Ok("two"),
            Err("service unavailable"),
        ]);
        let mut articles = batch(&["uno", "dos", "tres", "cuatro", "cinco"]);

        let translated = translate_titles(&translator, &mut articles).await;

        // Accumulator is emptied for downstream analysis...
        assert!(translated.is_empty());
        // ...but per-article annotations made before the failure survive.
        assert_eq!(articles[0].translated_title.as_deref(), Some("one"));
        assert_eq!(articles[1].translated_title.as_deref(), Some("two"));
        assert!(articles[2].translated_title.is_none());
        assert!(articles[3].translated_title.is_none());
        assert!(articles[4].translated_title.is_none());
        // No request was issued past the failing one.
        assert_eq!(translator.calls.borrow().len(), 3);
    }

    #[tokio::test]
    async fn test_empty_batch_is_a_noop() {
        let translator = ScriptedTranslator::new(vec![]);
        let mut articles: Vec<Article> = Vec::new();
        let translated = translate_titles(&translator, &mut articles).await;
        assert!(translated.is_empty());
        assert!(translator.calls.borrow().is_empty());
    }

    #[test]
    fn test_parse_gtx_response_single_segment() {
        let payload = json!([[["The new plan", "El nuevo plan", null, null, 10]], null, "es"]);
        assert_eq!(parse_gtx_response(&payload).unwrap(), "The new plan");
    }

    #[test]
    fn test_parse_gtx_response_concatenates_segments() {
        let payload = json!([
            [
                ["The new plan ", "El nuevo plan ", null, null, 10],
                ["for the budget", "para el presupuesto", null, null, 10]
            ],
            null,
            "es"
        ]);
        assert_eq!(
            parse_gtx_response(&payload).unwrap(),
            "The new plan for the budget"
        );
    }

    #[test]
    fn test_parse_gtx_response_rejects_malformed_payloads() {
        assert!(parse_gtx_response(&json!({"error": "nope"})).is_err());
        assert!(parse_gtx_response(&json!([])).is_err());
        assert!(parse_gtx_response(&json!([[]])).is_err());
        assert!(parse_gtx_response(&json!([[[42]]])).is_err());
    }
}
