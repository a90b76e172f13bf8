//! Per-service extraction rules: the response half of the dispatch tables.

use serde_json::{Value, json};

use super::fields::{
    as_number, as_text, field_text, nested_field, nested_text, render, side_field, side_text,
};
use super::sources;
use crate::domain::{NormalizedResponse, ServiceId};

const NO_ANSWER: &str = "No answer was returned.";
const NO_STORE_INFO: &str = "No information was found in the knowledge store.";
const NO_RESULTS: &str = "No matching passages were found.";
const NO_SENTIMENT: &str = "Sentiment analysis completed without a result.";
const NO_IMAGE_URL: &str = "Image generation finished, but no image URL was returned.";
const NO_ANALYSIS: &str = "No analysis was returned for the image.";
const NO_EXTRACTED_TEXT: &str = "No text could be extracted from the document.";
const DOCUMENT_PROCESSED: &str = "Document processed successfully.";
const STORE_CREATED: &str = "Knowledge store created.";
const NO_HEALTH_STATUS: &str = "The health check returned no status.";
pub(super) const NO_CONTENT: &str = "The backend response contained no displayable content.";

/// Apply the extraction rule registered for `id`.
pub(super) fn apply(id: ServiceId, raw: &Value) -> NormalizedResponse {
    match id {
        ServiceId::ChatAnswer | ServiceId::ChatAnswerMemory | ServiceId::RagLoadDocument => {
            answer(raw)
        }
        ServiceId::EmbeddingGetInfo => retrieval(raw, "answer", NO_STORE_INFO),
        ServiceId::EmbeddingQuery => retrieval(raw, "results", NO_RESULTS),
        ServiceId::SentimentAnalyze => sentiment(raw),
        ServiceId::ImageGenerate => image_generate(raw),
        ServiceId::ImageRead => image_read(raw),
        ServiceId::ImageReadScanned => scanned(raw),
        ServiceId::EmbeddingAddDocument | ServiceId::EmbeddingAddFolder => ingestion(raw),
        ServiceId::EmbeddingNewStore => new_store(raw),
        ServiceId::HealthCheck => health(raw),
    }
}

fn answer(raw: &Value) -> NormalizedResponse {
    let content = nested_text(raw, "answer")
        .or_else(|| field_text(raw, "response"))
        .unwrap_or_else(|| NO_ANSWER.to_string());
    NormalizedResponse::new(content)
}

/// `key` holds the answer text and, when it is an object, the source list.
fn retrieval(raw: &Value, key: &str, fallback: &str) -> NormalizedResponse {
    let mut content = nested_text(raw, key)
        .or_else(|| field_text(raw, "response"))
        .unwrap_or_else(|| fallback.to_string());

    let list = nested_field(raw, key, "sources").or_else(|| raw.get("sources"));
    let found = sources::collect(list);
    sources::append(&mut content, &found);

    let mut response = NormalizedResponse::new(content);
    if let Some(list) = list.filter(|_| !found.is_empty()) {
        response = response.with_metadata("sources", list.clone());
    }
    response
}

fn sentiment(raw: &Value) -> NormalizedResponse {
    let label = nested_text(raw, "sentiment");
    let score = raw
        .get("score")
        .or_else(|| nested_field(raw, "sentiment", "score"))
        .and_then(as_number);

    let mut content = label.as_ref().map_or_else(
        || NO_SENTIMENT.to_string(),
        |label| format!("Sentiment: {label}"),
    );
    if let (Some(_), Some(score)) = (&label, score) {
        content.push_str(&format!(" (score: {score})"));
    }

    let original = side_text(raw, "text").or_else(|| side_text(raw, "originalText"));
    if let Some(text) = &original {
        content.push_str(&format!("\nAnalyzed text: \"{text}\""));
    }

    let mut response = NormalizedResponse::new(content);
    if let Some(label) = label {
        response = response.with_metadata("sentiment", Value::String(label));
    }
    if let Some(score) = score {
        response = response.with_metadata("score", json!(score));
    }
    if let Some(text) = original {
        response = response.with_metadata("text", Value::String(text));
    }
    response
}

fn image_generate(raw: &Value) -> NormalizedResponse {
    let Some(url) = nested_text(raw, "imageUrl") else {
        return NormalizedResponse::new(NO_IMAGE_URL);
    };
    let prompt = side_text(raw, "prompt");
    let content = prompt.as_ref().map_or_else(
        || "Image generated.".to_string(),
        |prompt| format!("Image generated for \"{prompt}\"."),
    );

    let mut response = NormalizedResponse::new(content)
        .with_metadata("type", Value::String("image".to_string()))
        .with_metadata("imageUrl", Value::String(url));
    if let Some(prompt) = prompt {
        response = response.with_metadata("description", Value::String(prompt));
    }
    response
}

fn with_file_path(mut response: NormalizedResponse, raw: &Value) -> NormalizedResponse {
    if let Some(path) = side_field(raw, "filePath") {
        response = response.with_metadata("filePath", path.clone());
    }
    response
}

fn image_read(raw: &Value) -> NormalizedResponse {
    let content = nested_text(raw, "analysis")
        .or_else(|| field_text(raw, "response"))
        .unwrap_or_else(|| NO_ANALYSIS.to_string());
    with_file_path(NormalizedResponse::new(content), raw)
}

fn page_text(page: &Value) -> Option<String> {
    as_text(page).or_else(|| {
        ["text", "content", "extractedText"]
            .iter()
            .find_map(|key| field_text(page, key))
    })
}

fn page_number(page: &Value, index: usize) -> u64 {
    ["pageNumber", "page"]
        .iter()
        .find_map(|key| page.get(*key).and_then(Value::as_u64))
        .unwrap_or(index as u64 + 1)
}

fn scanned(raw: &Value) -> NormalizedResponse {
    let pages = nested_field(raw, "extractedText", "pages")
        .or_else(|| raw.get("pages"))
        .and_then(Value::as_array);

    let paged = pages.and_then(|pages| match pages.len() {
        0 => None,
        1 => page_text(&pages[0]),
        _ => {
            let labeled: Vec<String> = pages
                .iter()
                .enumerate()
                .filter_map(|(index, page)| {
                    page_text(page)
                        .map(|text| format!("Page {}:\n{text}", page_number(page, index)))
                })
                .collect();
            (!labeled.is_empty()).then(|| labeled.join("\n\n"))
        }
    });

    let content = paged
        .or_else(|| nested_text(raw, "extractedText"))
        .or_else(|| field_text(raw, "response"))
        .unwrap_or_else(|| NO_EXTRACTED_TEXT.to_string());

    let mut response = NormalizedResponse::new(content);
    if let Some(pages) = pages.filter(|p| p.len() > 1) {
        response = response.with_metadata("pageCount", json!(pages.len()));
    }
    with_file_path(response, raw)
}

fn ingestion(raw: &Value) -> NormalizedResponse {
    let mut content = nested_text(raw, "message").unwrap_or_else(|| DOCUMENT_PROCESSED.to_string());
    let store = side_text(raw, "store");
    let path = side_text(raw, "contextPath");

    if let Some(store) = &store {
        content.push_str(&format!("\nStore: {store}"));
    }
    if let Some(path) = &path {
        content.push_str(&format!("\nPath: {path}"));
    }

    let mut response = NormalizedResponse::new(content);
    if let Some(store) = store {
        response = response.with_metadata("store", Value::String(store));
    }
    if let Some(path) = path {
        response = response.with_metadata("contextPath", Value::String(path));
    }
    response
}

fn new_store(raw: &Value) -> NormalizedResponse {
    let message = nested_text(raw, "message").unwrap_or_else(|| STORE_CREATED.to_string());
    match side_text(raw, "storeName") {
        Some(name) => NormalizedResponse::new(format!("{message}\nStore: {name}"))
            .with_metadata("storeName", Value::String(name)),
        None => NormalizedResponse::new(message),
    }
}

fn health(raw: &Value) -> NormalizedResponse {
    let status = field_text(raw, "status").or_else(|| {
        raw.get("success")
            .and_then(Value::as_bool)
            .map(|ok| if ok { "healthy" } else { "unhealthy" }.to_string())
    });
    let service = field_text(raw, "service").or_else(|| field_text(raw, "name"));

    let Some(status) = status else {
        return NormalizedResponse::new(NO_HEALTH_STATUS);
    };
    let content = service.as_ref().map_or_else(
        || format!("Backend status: {status}"),
        |service| format!("{service}: {status}"),
    );

    let mut response =
        NormalizedResponse::new(content).with_metadata("status", Value::String(status));
    if let Some(service) = service {
        response = response.with_metadata("service", Value::String(service));
    }
    response
}

/// Rule for service ids outside the registry.
pub(super) fn generic(raw: &Value) -> NormalizedResponse {
    let content = ["answer", "result", "message", "response"]
        .iter()
        .find_map(|key| raw.get(*key).and_then(render))
        .unwrap_or_else(|| NO_CONTENT.to_string());
    NormalizedResponse::new(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_fallback_chain() {
        assert_eq!(
            apply(ServiceId::ChatAnswer, &json!({"answer": {"response": "a"}})).content,
            "a"
        );
        assert_eq!(
            apply(ServiceId::ChatAnswer, &json!({"response": "r"})).content,
            "r"
        );
        assert_eq!(apply(ServiceId::ChatAnswer, &json!({})).content, NO_ANSWER);
    }

    #[test]
    fn test_sentiment_with_score_and_original_text() {
        let raw = json!({
            "sentiment": {"response": "POSITIVE"},
            "score": 0.93,
            "metadata": {"text": "The technicians are satisfied"}
        });
        let response = apply(ServiceId::SentimentAnalyze, &raw);
        assert!(response.content.starts_with("Sentiment: POSITIVE (score: 0.93)"));
        assert!(response.content.contains("Analyzed text: \"The technicians are satisfied\""));
        assert_eq!(response.metadata["sentiment"], "POSITIVE");
    }

    #[test]
    fn test_image_generate_copies_url() {
        let raw = json!({"imageUrl": "http://img/1.png", "metadata": {"prompt": "pump"}});
        let response = apply(ServiceId::ImageGenerate, &raw);
        assert_eq!(response.metadata["imageUrl"], "http://img/1.png");
        assert_eq!(response.metadata["type"], "image");
        assert!(response.content.contains("pump"));

        let nested = json!({"imageUrl": {"response": "http://img/2.png"}});
        assert_eq!(
            apply(ServiceId::ImageGenerate, &nested).metadata["imageUrl"],
            "http://img/2.png"
        );

        let missing = apply(ServiceId::ImageGenerate, &json!({}));
        assert_eq!(missing.content, NO_IMAGE_URL);
        assert!(missing.metadata.is_empty());
    }

    #[test]
    fn test_scanned_labels_multiple_pages() {
        let raw = json!({
            "extractedText": {
                "response": "ignored",
                "pages": [{"text": "first"}, {"pageNumber": 7, "content": "second"}]
            }
        });
        let response = apply(ServiceId::ImageReadScanned, &raw);
        assert_eq!(response.content, "Page 1:\nfirst\n\nPage 7:\nsecond");
        assert_eq!(response.metadata["pageCount"], 2);
    }

    #[test]
    fn test_scanned_single_page_is_unlabeled() {
        let raw = json!({"pages": ["only page"], "filePath": "/scan.png"});
        let response = apply(ServiceId::ImageReadScanned, &raw);
        assert_eq!(response.content, "only page");
        assert_eq!(response.metadata["filePath"], "/scan.png");

        let flat = json!({"extractedText": "plain"});
        assert_eq!(apply(ServiceId::ImageReadScanned, &flat).content, "plain");
    }

    #[test]
    fn test_ingestion_appends_store_and_path() {
        let raw = json!({
            "message": "Indexed 12 segments",
            "metadata": {"store": "brake-systems", "contextPath": "/docs/brakes.pdf"}
        });
        let response = apply(ServiceId::EmbeddingAddDocument, &raw);
        assert_eq!(
            response.content,
            "Indexed 12 segments\nStore: brake-systems\nPath: /docs/brakes.pdf"
        );
        assert_eq!(response.metadata["store"], "brake-systems");
    }

    #[test]
    fn test_new_store_message() {
        let raw = json!({"message": "Store created", "storeName": "pantographs"});
        let response = apply(ServiceId::EmbeddingNewStore, &raw);
        assert_eq!(response.content, "Store created\nStore: pantographs");
        assert_eq!(response.metadata["storeName"], "pantographs");
    }

    #[test]
    fn test_health_variants() {
        let up = apply(ServiceId::HealthCheck, &json!({"status": "UP", "service": "ai-chain"}));
        assert_eq!(up.content, "ai-chain: UP");

        let flag = apply(ServiceId::HealthCheck, &json!({"success": true}));
        assert_eq!(flag.content, "Backend status: healthy");

        let empty = apply(ServiceId::HealthCheck, &json!({}));
        assert_eq!(empty.content, NO_HEALTH_STATUS);
    }

    #[test]
    fn test_generic_renders_objects() {
        let text = generic(&json!({"result": "done", "message": "ignored"}));
        assert_eq!(text.content, "done");

        let object = generic(&json!({"result": {"rows": 3}}));
        assert!(object.content.contains("\"rows\": 3"));

        assert_eq!(generic(&json!({"other": 1})).content, NO_CONTENT);
    }

    #[test]
    fn test_generic_skips_blank_fields() {
        let text = generic(&json!({"answer": "", "result": "  ", "message": "queued"}));
        assert_eq!(text.content, "queued");
    }
}
