use kritik::diagram::{DiagramArtifact, DiagramRenderer, DiagramTheme, KrokiRenderer, RenderError};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string_contains, header, method, path},
};

const DEFINITION: &str = "graph TB\n    A[Reason] -->|limits| B{Experience}";
const SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg"><text>Reason</text></svg>"#;

// ============================================================================
// Success
// ============================================================================

#[tokio::test]
async fn test_kroki_writes_svg_to_output_dir() {
    let mock_server = MockServer::start().await;
    let out = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/mermaid/svg"))
        .and(header("content-type", "text/plain"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SVG))
        .expect(1)
        .mount(&mock_server)
        .await;

    let renderer = KrokiRenderer::new(
        mock_server.uri(),
        out.path().join("diagrams"),
        DiagramTheme::default(),
    );
    let artifact = renderer.render(DEFINITION).await.unwrap();

    let DiagramArtifact::Svg { path, bytes } = artifact else {
        panic!("expected an SVG artifact, got {artifact:?}");
    };
    assert!(path.starts_with(out.path().join("diagrams")));
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("svg"));
    assert_eq!(bytes, SVG.len());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), SVG);
}

#[tokio::test]
async fn test_kroki_request_carries_theme_directive_and_definition() {
    let mock_server = MockServer::start().await;
    let out = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/mermaid/svg"))
        .and(body_string_contains("%%{init"))
        .and(body_string_contains("#9333ea"))
        .and(body_string_contains("A[Reason] -->|limits| B{Experience}"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SVG))
        .expect(1)
        .mount(&mock_server)
        .await;

    let renderer = KrokiRenderer::new(mock_server.uri(), out.path(), DiagramTheme::default());
    assert!(renderer.render(DEFINITION).await.is_ok());
}

#[tokio::test]
async fn test_kroki_same_definition_reuses_file_name() {
    let mock_server = MockServer::start().await;
    let out = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/mermaid/svg"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SVG))
        .mount(&mock_server)
        .await;

    let renderer = KrokiRenderer::new(
        format!("{}/", mock_server.uri()),
        out.path(),
        DiagramTheme::default(),
    );
    let first = renderer.render(DEFINITION).await.unwrap();
    let second = renderer.render(DEFINITION).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 1);
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_kroki_server_error_is_api_error() {
    let mock_server = MockServer::start().await;
    let out = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/mermaid/svg"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Syntax error in graph"))
        .mount(&mock_server)
        .await;

    let renderer = KrokiRenderer::new(mock_server.uri(), out.path(), DiagramTheme::default());
    let err = renderer.render(DEFINITION).await.unwrap_err();

    assert_eq!(
        err,
        RenderError::Api {
            status: 400,
            message: "Syntax error in graph".to_string()
        }
    );
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_kroki_non_svg_body_is_invalid_response() {
    let mock_server = MockServer::start().await;
    let out = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/mermaid/svg"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let renderer = KrokiRenderer::new(mock_server.uri(), out.path(), DiagramTheme::default());
    let err = renderer.render(DEFINITION).await.unwrap_err();
    assert!(matches!(err, RenderError::InvalidResponse(_)), "{err:?}");
}

#[tokio::test]
async fn test_kroki_unreachable_server_is_network_error() {
    // Nothing listens on the discard port
    let out = tempfile::tempdir().unwrap();
    let renderer = KrokiRenderer::new("http://127.0.0.1:9", out.path(), DiagramTheme::default());
    let err = renderer.render(DEFINITION).await.unwrap_err();
    assert!(matches!(err, RenderError::Network(_)), "{err:?}");
}
