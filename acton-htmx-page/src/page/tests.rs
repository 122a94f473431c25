use super::*;
use crate::integrity::{hash, DEFAULT_ALGORITHM};
use crate::storage::MockFileStorage;
use axum::http::header::X_FRAME_OPTIONS;
use tempfile::TempDir;

const VENDORED: &[u8] = b"(function(){/* htmx */})();";

struct Fixture {
    _temp: TempDir,
    root: PathBuf,
    assembler: PageAssembler,
    env: PageEnv,
}

fn fixture() -> Fixture {
    let temp = TempDir::new().unwrap();
    let root = temp.path().to_path_buf();
    std::fs::create_dir_all(root.join("vendor")).unwrap();
    std::fs::write(root.join("vendor").join("htmx.min.js"), VENDORED).unwrap();

    let assets = AssetSettings {
        vendored_script: root.join("vendor").join("htmx.min.js"),
        ..AssetSettings::default()
    };
    let assembler = PageAssembler::new(
        Arc::new(LocalFileStorage::new()),
        assets,
        ComponentSettings::default(),
    );
    let env = PageEnv::new(PagePaths {
        static_dir: root.join("static"),
        public_dir: root.join("public"),
        components_dir: root.join("components"),
    });

    Fixture {
        _temp: temp,
        root,
        assembler,
        env,
    }
}

fn write_shell(root: &Path, shell: &str) {
    std::fs::create_dir_all(root.join("static")).unwrap();
    std::fs::write(root.join("static").join("index.html"), shell).unwrap();
}

fn write_component(root: &Path, name: &str, content: &str) {
    std::fs::create_dir_all(root.join("components")).unwrap();
    std::fs::write(root.join("components").join(name), content).unwrap();
}

fn csp(response: &PageResponse) -> &str {
    response
        .options
        .headers
        .get(CONTENT_SECURITY_POLICY)
        .unwrap()
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn test_provisions_public_dir_and_script() {
    let fx = fixture();
    let template = Template::literal("<p>hi</p>");

    fx.assembler
        .build_page(&fx.env, &template, &[], &HeaderMap::new())
        .await
        .unwrap();

    let served = fx.root.join("public").join("htmx.js");
    assert!(fx.root.join("public").is_dir());
    assert_eq!(std::fs::read(served).unwrap(), VENDORED);
}

#[tokio::test]
async fn test_existing_script_is_not_overwritten() {
    let fx = fixture();
    std::fs::create_dir_all(fx.root.join("public")).unwrap();
    std::fs::write(fx.root.join("public").join("htmx.js"), b"patched").unwrap();

    let response = fx
        .assembler
        .build_page(&fx.env, &Template::literal(""), &[], &HeaderMap::new())
        .await
        .unwrap();

    let expected = format!("sha384-{}", hash(b"patched", DEFAULT_ALGORITHM).unwrap());
    assert!(response.body.contains(&expected));
    assert_eq!(std::fs::read(fx.root.join("public").join("htmx.js")).unwrap(), b"patched");
}

#[tokio::test]
async fn test_assembles_project_shell_with_component() {
    let fx = fixture();
    write_shell(&fx.root, "<head></head><body></body>");
    write_component(&fx.root, "greeting.html", "<b>\nHi\n</b>");

    let response = fx
        .assembler
        .build_page(&fx.env, &Template::literal("${greeting}"), &[], &HeaderMap::new())
        .await
        .unwrap();

    let token = format!("sha384-{}", hash(VENDORED, DEFAULT_ALGORITHM).unwrap());
    assert_eq!(
        response.body,
        format!(
            r#"<head><script src="/htmx.js" integrity="{token}"></script></head><body><b>Hi</b></body>"#
        )
    );
}

#[tokio::test]
async fn test_falls_back_to_default_shell() {
    let fx = fixture();
    let (template, values) = Template::builder()
        .text("<h1>")
        .value("Hello")
        .text("</h1>")
        .build();

    let response = fx
        .assembler
        .build_page(&fx.env, &template, &values, &HeaderMap::new())
        .await
        .unwrap();

    assert!(response.body.contains("<title>acton-htmx</title>"));
    assert!(response.body.contains(r#"<script src="/htmx.js" integrity="sha384-"#));
    assert!(response.body.contains("<body><h1>Hello</h1>"));
}

#[tokio::test]
async fn test_headers_are_merged() {
    let fx = fixture();
    let mut incoming = HeaderMap::new();
    incoming.insert(CONTENT_SECURITY_POLICY, HeaderValue::from_static("default-src 'none';"));
    incoming.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    incoming.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));

    let response = fx
        .assembler
        .build_page(&fx.env, &Template::literal(""), &[], &incoming)
        .await
        .unwrap();

    let token = format!("sha384-{}", hash(VENDORED, DEFAULT_ALGORITHM).unwrap());
    assert_eq!(response.options.status, StatusCode::OK);
    assert_eq!(response.options.headers.get(CONTENT_TYPE).unwrap(), "text/html");
    assert_eq!(response.options.headers.get(X_FRAME_OPTIONS).unwrap(), "DENY");
    assert_eq!(
        csp(&response),
        format!("default-src 'none';script-src 'self' '{token}';style-src 'unsafe-inline';")
    );
}

#[tokio::test]
async fn test_csp_without_incoming_policy() {
    let fx = fixture();

    let response = fx
        .assembler
        .build_page(&fx.env, &Template::literal(""), &[], &HeaderMap::new())
        .await
        .unwrap();

    assert!(csp(&response).starts_with("script-src 'self' 'sha384-"));
    assert!(csp(&response).ends_with("style-src 'unsafe-inline';"));
}

#[tokio::test]
async fn test_resolution_errors_propagate() {
    let fx = fixture();

    let unknown = fx
        .assembler
        .build_page(&fx.env, &Template::literal("${nav}"), &[], &HeaderMap::new())
        .await;
    assert!(matches!(unknown, Err(PageError::UnknownComponent(name)) if name == "nav"));

    let template = Template::new(["<p>", "</p>"]).unwrap();
    let missing = fx
        .assembler
        .build_page(&fx.env, &template, &[], &HeaderMap::new())
        .await;
    assert!(matches!(missing, Err(PageError::MissingValue { index: 0, .. })));
}

#[tokio::test]
async fn test_unsupported_algorithm_is_reported() {
    let fx = fixture();
    let assets = AssetSettings {
        integrity_algorithm: "md5".to_string(),
        ..fx.assembler.assets().clone()
    };
    let assembler = PageAssembler::new(
        Arc::new(LocalFileStorage::new()),
        assets,
        ComponentSettings::default(),
    );

    let result = assembler
        .build_page(&fx.env, &Template::literal(""), &[], &HeaderMap::new())
        .await;
    assert!(matches!(result, Err(PageError::UnsupportedAlgorithm(_))));
}

#[tokio::test]
async fn test_directory_creation_failure_is_fatal() {
    let mut storage = MockFileStorage::new();
    storage.expect_exists().returning(|_| Ok(false));
    storage
        .expect_create_dir()
        .returning(|_| Err(StorageError::Io(std::io::Error::other("read-only filesystem"))));
    storage.expect_copy().never();

    let assembler = PageAssembler::new(
        Arc::new(storage),
        AssetSettings::default(),
        ComponentSettings::default(),
    );
    let result = assembler
        .build_page(&PageEnv::default(), &Template::literal(""), &[], &HeaderMap::new())
        .await;

    assert!(matches!(result, Err(PageError::AssetDirectory { .. })));
}

#[tokio::test]
async fn test_copy_failure_is_fatal() {
    let mut storage = MockFileStorage::new();
    storage
        .expect_exists()
        .returning(|path| Ok(!path.ends_with("htmx.js")));
    storage
        .expect_copy()
        .times(1)
        .returning(|from, _| Err(StorageError::NotFound(from.display().to_string())));
    storage.expect_read().never();

    let assembler = PageAssembler::new(
        Arc::new(storage),
        AssetSettings::default(),
        ComponentSettings::default(),
    );
    let result = assembler
        .build_page(&PageEnv::default(), &Template::literal(""), &[], &HeaderMap::new())
        .await;

    match result {
        Err(PageError::AssetCopy { from, to, .. }) => {
            assert!(from.ends_with("htmx.min.js"));
            assert!(to.ends_with("htmx.js"));
        }
        other => panic!("expected AssetCopy, got {other:?}"),
    }
}

#[tokio::test]
async fn test_page_renders_into_response() {
    let fx = fixture();
    write_shell(&fx.root, "<html><head></head><body></body></html>");
    let page = Page::from(
        Template::builder()
            .text("<ul>")
            .value(vec!["<li>a</li>", "<li>b</li>"])
            .text("</ul>")
            .build(),
    );

    let rendered = page
        .render(&fx.assembler, &fx.env, &HeaderMap::new())
        .await
        .unwrap();
    assert!(rendered.body.contains("<body><ul><li>a</li><li>b</li></ul></body>"));

    let response = rendered.into_response();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(CONTENT_TYPE).unwrap(), "text/html");
}

#[tokio::test]
async fn test_non_utf8_incoming_policy_is_extended() {
    let fx = fixture();
    let incoming_policy: &[u8] = b"default-src 'self' https://caf\xe9.example;";
    let mut incoming = HeaderMap::new();
    incoming.insert(
        CONTENT_SECURITY_POLICY,
        HeaderValue::from_bytes(incoming_policy).unwrap(),
    );

    let response = fx
        .assembler
        .build_page(&fx.env, &Template::literal(""), &[], &incoming)
        .await
        .unwrap();

    let token = format!("sha384-{}", hash(VENDORED, DEFAULT_ALGORITHM).unwrap());
    let expected = [
        incoming_policy,
        format!("script-src 'self' '{token}';style-src 'unsafe-inline';").as_bytes(),
    ]
    .concat();
    let policy = response.options.headers.get(CONTENT_SECURITY_POLICY).unwrap();
    assert_eq!(policy.as_bytes(), expected.as_slice());
}

#[test]
fn test_policy_appends_to_raw_bytes() {
    let token = IntegrityToken::compute(b"htmx", DEFAULT_ALGORITHM).unwrap();

    let extended = content_security_policy(b"img-src \xff;", &token);
    assert!(extended.starts_with(b"img-src \xff;script-src 'self' 'sha384-"));
    assert!(extended.ends_with(b"';style-src 'unsafe-inline';"));

    let fresh = content_security_policy(&[], &token);
    assert_eq!(
        fresh,
        format!("script-src 'self' '{token}';style-src 'unsafe-inline';").into_bytes()
    );
}

#[tokio::test]
async fn test_asset_read_failure_is_fatal() {
    let mut storage = MockFileStorage::new();
    storage.expect_exists().returning(|_| Ok(true));
    storage
        .expect_read()
        .times(1)
        .returning(|_| Err(StorageError::Io(std::io::Error::other("input/output error"))));
    storage.expect_read_to_string().never();

    let assembler = PageAssembler::new(
        Arc::new(storage),
        AssetSettings::default(),
        ComponentSettings::default(),
    );
    let result = assembler
        .build_page(&PageEnv::default(), &Template::literal(""), &[], &HeaderMap::new())
        .await;

    match result {
        Err(PageError::AssetRead { path, .. }) => assert!(path.ends_with("htmx.js")),
        other => panic!("expected AssetRead, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreadable_shell_falls_back_to_default() {
    let mut storage = MockFileStorage::new();
    storage
        .expect_exists()
        .returning(|path| Ok(!path.ends_with("components")));
    storage.expect_read().returning(|_| Ok(b"/* htmx */".to_vec()));
    storage
        .expect_read_to_string()
        .withf(|path| path.ends_with("static/index.html"))
        .times(1)
        .returning(|_| Err(StorageError::Io(std::io::Error::other("permission denied"))));

    let assembler = PageAssembler::new(
        Arc::new(storage),
        AssetSettings::default(),
        ComponentSettings::default(),
    );
    let response = assembler
        .build_page(&PageEnv::default(), &Template::literal("<p>ok</p>"), &[], &HeaderMap::new())
        .await
        .unwrap();

    let head = DefaultShell::get().split("</head>").next().unwrap();
    assert!(response.body.starts_with(head));
    assert!(response.body.contains("<p>ok</p>"));
}

#[tokio::test]
async fn test_relative_url_path_is_rooted_in_script_tag() {
    let fx = fixture();
    let assets = AssetSettings {
        url_path: "htmx.js".to_string(),
        ..fx.assembler.assets().clone()
    };
    let assembler = PageAssembler::new(
        Arc::new(LocalFileStorage::new()),
        assets,
        ComponentSettings::default(),
    );

    let response = assembler
        .build_page(&fx.env, &Template::literal(""), &[], &HeaderMap::new())
        .await
        .unwrap();

    assert!(response.body.contains(r#"<script src="/htmx.js" integrity="#));
}

#[tokio::test]
async fn test_page_exposes_its_parts() {
    let fx = fixture();
    let page = Page::from(Template::builder().text("<p>").value("x").text("</p>").build());

    assert_eq!(page.template().slot_count(), 1);
    assert_eq!(page.template().segments(), ["<p>", "</p>"]);
    assert_eq!(page.values(), [Node::from("x")]);

    let rendered = page
        .render(&fx.assembler, &fx.env, &HeaderMap::new())
        .await
        .unwrap();
    assert!(rendered.body.contains("<p>x</p>"));
    assert!(fx
        .assembler
        .storage()
        .exists(&fx.root.join("public").join("htmx.js"))
        .await
        .unwrap());
}
