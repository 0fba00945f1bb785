use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use image::{ImageFormat, Rgba, RgbaImage};

use easysocial::classifier::AuthCause;
use easysocial::commands::{render_with_backend, RenderShotsRequest};
use easysocial::palette::{palette_from_bytes, FALLBACK_PALETTE};
use easysocial::studio::gemini::{extract_image, GenerateContentResponse};
use easysocial::studio::{
    EncodedImage, GeminiImageBackend, ImageBackend, Language, RenderRequest,
};
use easysocial::{classify, ErrorKind, RawFailure, StudioConfig, StudioError};

/// Counts calls and fails the request whose prompt contains `fail_on`.
#[derive(Clone, Default)]
struct CountingBackend {
    calls: Arc<AtomicUsize>,
    fail_on: Option<(&'static str, u16, &'static str)>,
}

#[async_trait]
impl ImageBackend for CountingBackend {
    async fn render(&self, request: &RenderRequest) -> Result<EncodedImage, StudioError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some((needle, status, message)) = self.fail_on {
            if request.angle_prompt.contains(needle) {
                return Err(StudioError::Backend {
                    status,
                    message: message.to_string(),
                    reason: None,
                });
            }
        }
        // Echo the source so callers can see which photo each angle used.
        EncodedImage::new("image/png", request.source.data())
    }
}

fn shots(back: Option<&str>) -> RenderShotsRequest {
    RenderShotsRequest {
        front_image: "data:image/jpeg;base64,RlJPTlQ=".to_string(),
        back_image: back.map(|b| format!("data:image/jpeg;base64,{}", b)),
        background_color: Some("#f0f0f0".to_string()),
        transparent: false,
        language: None,
    }
}

fn png_bytes(img: &RgbaImage) -> Vec<u8> {
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).expect("encode png");
    out.into_inner()
}

#[tokio::test]
async fn test_front_only_renders_single_angle_set() {
    let backend = CountingBackend::default();
    let resp = render_with_backend(backend.clone(), Language::En, shots(None))
        .await
        .expect("render");

    assert_eq!(backend.calls.load(Ordering::SeqCst), 4);
    let ids: Vec<_> = resp.images.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["front", "perspective", "side", "top"]);
    for image in &resp.images {
        assert_eq!(image.image_data, "data:image/png;base64,RlJPTlQ=");
    }
}

#[tokio::test]
async fn test_front_and_back_route_sources() {
    let backend = CountingBackend::default();
    let resp = render_with_backend(backend.clone(), Language::En, shots(Some("QkFDSw==")))
        .await
        .expect("render");

    assert_eq!(backend.calls.load(Ordering::SeqCst), 4);
    let by_id = |id: &str| {
        resp.images
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.image_data.clone())
            .unwrap()
    };
    assert!(by_id("front").ends_with("RlJPTlQ="));
    assert!(by_id("front_p").ends_with("RlJPTlQ="));
    assert!(by_id("back").ends_with("QkFDSw=="));
    assert!(by_id("back_p").ends_with("QkFDSw=="));
}

#[tokio::test]
async fn test_single_failure_yields_no_partial_results() {
    let backend = CountingBackend {
        fail_on: Some(("top-down", 429, "Resource has been exhausted (e.g. check quota).")),
        ..Default::default()
    };
    let err = render_with_backend(backend.clone(), Language::En, shots(None))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::QuotaExceeded);
    assert!(!err.is_retryable());
    assert_eq!(backend.calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_entity_not_found_needs_new_credential() {
    let backend = CountingBackend {
        fail_on: Some(("hero", 404, "Requested entity was not found.")),
        ..Default::default()
    };
    let err = render_with_backend(backend, Language::Bn, shots(None))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::CredentialInvalid);
    assert!(err.needs_new_credential());
}

#[test]
fn test_missing_credential_fails_before_any_request() {
    let config = StudioConfig::from_toml_str("model = \"gemini-test\"").expect("parse");
    let err = GeminiImageBackend::from_config(&config).err().expect("no key");
    assert_eq!(err.code(), "configuration_missing");

    let classified = classify(&RawFailure::from(&err));
    assert_eq!(classified.kind, ErrorKind::ConfigurationMissing);
    assert!(classified.needs_new_credential());
}

#[test]
fn test_text_only_response_is_no_image() {
    let response: GenerateContentResponse = serde_json::from_str(
        r#"{"candidates":[{"content":{"parts":[{"text":"I can't help with that."}]},"finishReason":"STOP"}]}"#,
    )
    .expect("parse");

    match extract_image(response) {
        Err(StudioError::NoImageReturned { text }) => {
            assert_eq!(text.as_deref(), Some("I can't help with that."));
        }
        other => panic!("expected NoImageReturned, got {:?}", other),
    }
}

#[test]
fn test_classifier_precedence_over_raw_json() {
    let permission = classify(&RawFailure::from_json(&serde_json::json!({
        "error": {"code": 403, "message": "The caller does not have permission", "status": "PERMISSION_DENIED"}
    })));
    assert_eq!(permission.kind, ErrorKind::AuthorizationDenied(AuthCause::Permission));

    let generic = classify(&RawFailure::from_message("socket hang up"));
    assert_eq!(generic.kind, ErrorKind::GenericFailure);
    assert_eq!(generic.detail.as_deref(), Some("socket hang up"));
}

#[test]
fn test_palette_ranks_dominant_color_first() {
    let mut img = RgbaImage::from_pixel(40, 40, Rgba([200, 40, 40, 255]));
    for x in 0..40 {
        for y in 0..10 {
            img.put_pixel(x, y, Rgba([20, 120, 200, 255]));
        }
    }

    let palette = palette_from_bytes(&png_bytes(&img)).expect("decode");
    assert_eq!(palette.len(), 4);
    assert_eq!(palette[0], "#C82828");
    assert_eq!(palette[1], "#1478C8");
    assert_eq!(palette[2], FALLBACK_PALETTE[0]);
}

#[test]
fn test_palette_of_white_image_is_fallback() {
    let img = RgbaImage::from_pixel(16, 16, Rgba([255, 255, 255, 255]));
    let palette = palette_from_bytes(&png_bytes(&img)).expect("decode");
    assert_eq!(palette, FALLBACK_PALETTE);
}
