use http::{header, Method, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper_static_assets::{hash_content, StaticAssets};
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use std::{fs, str};
use tempdir::TempDir;

struct Harness {
    _dir: TempDir,
    root: PathBuf,
    assets: StaticAssets,
}

impl Harness {
    /// Write fixtures relative to `<tmp>/static`, and serve from there.
    fn new(files: Vec<(&str, &str)>) -> Harness {
        let dir = TempDir::new("hyper-static-assets-tests").unwrap();
        let root = dir.path().join("static");
        fs::create_dir_all(&root).unwrap();
        for (subpath, contents) in files {
            let fullpath = root.join(subpath);
            fs::create_dir_all(fullpath.parent().unwrap())
                .and_then(|_| fs::write(&fullpath, contents))
                .expect("failed to write fixtures");
        }

        let assets = StaticAssets::new(root.clone()).unwrap();
        Harness {
            _dir: dir,
            root,
            assets,
        }
    }

    async fn request<B>(&self, req: Request<B>) -> Response<Full<Bytes>> {
        self.assets.serve(&req).await.unwrap()
    }

    async fn get(&self, path: &str) -> Response<Full<Bytes>> {
        let req = Request::builder()
            .uri(path)
            .body(())
            .expect("unable to build request");
        self.request(req).await
    }

    async fn get_with(&self, path: &str, name: header::HeaderName, value: &str) -> Response<Full<Bytes>> {
        let req = Request::builder()
            .uri(path)
            .header(name, value)
            .body(())
            .expect("unable to build request");
        self.request(req).await
    }

    fn modified(&self, subpath: &str) -> SystemTime {
        fs::metadata(self.root.join(subpath))
            .and_then(|m| m.modified())
            .unwrap()
    }
}

async fn read_body(res: Response<Full<Bytes>>) -> String {
    let body = res.into_body().collect().await.unwrap().to_bytes();
    str::from_utf8(&body).unwrap().to_owned()
}

fn header_str<'a>(res: &'a Response<Full<Bytes>>, name: header::HeaderName) -> &'a str {
    res.headers().get(name).unwrap().to_str().unwrap()
}

#[tokio::test]
async fn serves_file() {
    let harness = Harness::new(vec![("file1.html", "this is file1")]);
    let res = harness.get("/file1.html").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(read_body(res).await, "this is file1");
}

#[tokio::test]
async fn serves_file_in_subdirectory() {
    let harness = Harness::new(vec![("css/site.css", "body {}")]);
    let res = harness.get("/css/site.css").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(read_body(res).await, "body {}");
}

#[tokio::test]
async fn sends_headers() {
    let harness = Harness::new(vec![("file1.html", "this is file1")]);
    let res = harness.get("/file1.html").await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(header_str(&res, header::CONTENT_TYPE), "text/html");
    assert_eq!(header_str(&res, header::CONTENT_LENGTH), "13");
    assert_eq!(
        header_str(&res, header::CACHE_CONTROL),
        "public, max-age=31536000"
    );
    assert_eq!(
        header_str(&res, header::ETAG),
        format!("\"{}\"", hash_content(b"this is file1"))
    );

    let last_modified = httpdate::parse_http_date(header_str(&res, header::LAST_MODIFIED)).unwrap();
    let modified = harness.modified("file1.html");
    assert!(last_modified <= modified);
    assert!(modified < last_modified + Duration::from_secs(1));

    let expires = httpdate::parse_http_date(header_str(&res, header::EXPIRES)).unwrap();
    let year = SystemTime::now() + Duration::from_secs(31_536_000);
    assert!(expires <= year);
    assert!(expires + Duration::from_secs(60) > year);
}

#[tokio::test]
async fn uses_configured_max_age() {
    let mut harness = Harness::new(vec![("file1.html", "this is file1")]);
    harness.assets.max_age(3600);
    let res = harness.get("/file1.html").await;
    assert_eq!(header_str(&res, header::CACHE_CONTROL), "public, max-age=3600");
}

#[tokio::test]
async fn repeated_requests_are_identical() {
    let harness = Harness::new(vec![("app.js", "console.log(1)")]);
    let first = harness.get("/app.js").await;
    let second = harness.get("/app.js").await;

    assert_eq!(
        first.headers().get(header::ETAG),
        second.headers().get(header::ETAG)
    );
    assert_eq!(read_body(first).await, read_body(second).await);
}

#[tokio::test]
async fn returns_404_if_file_not_found() {
    let harness = Harness::new(vec![("css/site.css", "body {}")]);
    let res = harness.get("/css/missing.css").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_body(res).await, "File not found");
}

#[tokio::test]
async fn returns_404_for_directory() {
    let harness = Harness::new(vec![("css/site.css", "body {}")]);
    assert_eq!(harness.get("/css").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(harness.get("/css/").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(harness.get("/").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn decodes_percent_notation() {
    let harness = Harness::new(vec![("has space.html", "file with funky chars")]);
    let res = harness.get("/has%20space.html").await;
    assert_eq!(read_body(res).await, "file with funky chars");
}

#[tokio::test]
async fn follows_parent_segments_inside_root() {
    let harness = Harness::new(vec![("file1.html", "this is file1"), ("sub/x.txt", "x")]);
    let res = harness.get("/sub/../file1.html").await;
    assert_eq!(read_body(res).await, "this is file1");
}

#[tokio::test]
async fn prevents_from_escaping_root() {
    let harness = Harness::new(vec![("file1.html", "this is file1"), ("../secret.txt", "secret")]);

    for path in [
        "/../secret.txt",
        "/..%2fsecret.txt",
        "/xxx/..%2f..%2fsecret.txt",
        "/../../../../etc/passwd",
        "/../missing.txt",
    ] {
        let res = harness.get(path).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN, "{}", path);
        assert_eq!(read_body(res).await, "Forbidden");
    }
}

#[tokio::test]
async fn rejects_sibling_with_shared_prefix() {
    let harness = Harness::new(vec![("../static-evil/x.txt", "evil")]);
    for path in ["/../static-evil/x.txt", "/../static-evil/missing.txt"] {
        assert_eq!(harness.get(path).await.status(), StatusCode::FORBIDDEN, "{}", path);
    }
}

#[cfg(unix)]
#[tokio::test]
async fn rejects_symlink_out_of_root() {
    let harness = Harness::new(vec![("../outside.txt", "outside")]);
    std::os::unix::fs::symlink(
        harness.root.join("../outside.txt"),
        harness.root.join("link.txt"),
    )
    .unwrap();
    assert_eq!(harness.get("/link.txt").await.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn changes_content_type_on_extension() {
    let harness = Harness::new(vec![
        ("logo.svg", "<svg/>"),
        ("data.xyz", "?"),
        ("SITE.CSS", "body {}"),
    ]);
    let cases = [
        ("/logo.svg", "image/svg+xml"),
        ("/data.xyz", "application/octet-stream"),
        ("/SITE.CSS", "text/css"),
    ];
    for (path, content_type) in cases {
        let res = harness.get(path).await;
        assert_eq!(header_str(&res, header::CONTENT_TYPE), content_type, "{}", path);
    }
}

#[tokio::test]
async fn serves_file_with_old_if_modified_since() {
    let harness = Harness::new(vec![("file1.html", "this is file1")]);
    let if_modified = harness.modified("file1.html") - Duration::from_secs(1);
    let res = harness
        .get_with("/file1.html", header::IF_MODIFIED_SINCE, &httpdate::fmt_http_date(if_modified))
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(read_body(res).await, "this is file1");
}

#[tokio::test]
async fn not_modified_with_current_or_new_if_modified_since() {
    let harness = Harness::new(vec![("file1.html", "this is file1")]);
    let modified = harness.modified("file1.html");

    for if_modified in [modified, modified + Duration::from_secs(3600)] {
        let res = harness
            .get_with("/file1.html", header::IF_MODIFIED_SINCE, &httpdate::fmt_http_date(if_modified))
            .await;
        assert_eq!(res.status(), StatusCode::NOT_MODIFIED);
        assert!(res.headers().get(header::ETAG).is_some());
        assert!(res.headers().get(header::CONTENT_TYPE).is_none());
        assert_eq!(read_body(res).await, "");
    }
}

#[tokio::test]
async fn ignores_invalid_if_modified_since() {
    let harness = Harness::new(vec![("file1.html", "this is file1")]);
    let res = harness
        .get_with("/file1.html", header::IF_MODIFIED_SINCE, "not a date")
        .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn not_modified_with_matching_if_none_match() {
    let harness = Harness::new(vec![("file1.html", "this is file1")]);
    let hash = hash_content(b"this is file1");

    for value in [hash.clone(), format!("\"{}\"", hash)] {
        let res = harness
            .get_with("/file1.html", header::IF_NONE_MATCH, &value)
            .await;
        assert_eq!(res.status(), StatusCode::NOT_MODIFIED, "{}", value);
        assert_eq!(read_body(res).await, "");
    }
}

#[tokio::test]
async fn serves_file_with_other_if_none_match() {
    let harness = Harness::new(vec![("file1.html", "this is file1")]);
    for value in ["\"d41d8cd98f00b204e9800998ecf8427e\"", "*", ""] {
        let res = harness
            .get_with("/file1.html", header::IF_NONE_MATCH, value)
            .await;
        assert_eq!(res.status(), StatusCode::OK, "{:?}", value);
    }
}

#[tokio::test]
async fn either_conditional_is_sufficient() {
    let harness = Harness::new(vec![("file1.html", "this is file1")]);
    let modified = harness.modified("file1.html");

    // Modified since, but the hash matches.
    let req = Request::builder()
        .uri("/file1.html")
        .header(
            header::IF_MODIFIED_SINCE,
            httpdate::fmt_http_date(modified - Duration::from_secs(3600)),
        )
        .header(header::IF_NONE_MATCH, hash_content(b"this is file1"))
        .body(())
        .unwrap();
    assert_eq!(harness.request(req).await.status(), StatusCode::NOT_MODIFIED);

    // Not modified since, even though the hash differs.
    let req = Request::builder()
        .uri("/file1.html")
        .header(header::IF_MODIFIED_SINCE, httpdate::fmt_http_date(modified))
        .header(header::IF_NONE_MATCH, "\"other\"")
        .body(())
        .unwrap();
    assert_eq!(harness.request(req).await.status(), StatusCode::NOT_MODIFIED);
}

#[tokio::test]
async fn head_sends_headers_without_body() {
    let harness = Harness::new(vec![("file1.html", "this is file1")]);
    let req = Request::builder()
        .method(Method::HEAD)
        .uri("/file1.html")
        .body(())
        .unwrap();
    let res = harness.request(req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(header_str(&res, header::CONTENT_LENGTH), "13");
    assert_eq!(read_body(res).await, "");
}

#[tokio::test]
async fn rejects_other_methods() {
    let harness = Harness::new(vec![("file1.html", "this is file1")]);
    let req = Request::builder()
        .method(Method::POST)
        .uri("/file1.html")
        .body(())
        .unwrap();
    let res = harness.request(req).await;
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(header_str(&res, header::ALLOW), "GET, HEAD");
}

#[tokio::test]
async fn strips_mount_prefix() {
    let mut harness = Harness::new(vec![("file1.html", "this is file1")]);
    harness.assets.prefix("/static/");

    let res = harness.get("/static/file1.html").await;
    assert_eq!(read_body(res).await, "this is file1");

    for path in ["/staticfile1.html", "/file1.html", "/other/file1.html"] {
        assert_eq!(harness.get(path).await.status(), StatusCode::NOT_FOUND, "{}", path);
    }
}

#[tokio::test]
async fn rejects_missing_root() {
    let dir = TempDir::new("hyper-static-assets-tests").unwrap();
    let err = StaticAssets::new(dir.path().join("missing")).unwrap_err();
    assert!(matches!(err, hyper_static_assets::Error::Root { .. }));
}

// `/proc/self/mem` stats as a regular file, but reading it from offset 0 fails.
#[cfg(target_os = "linux")]
#[tokio::test]
async fn read_failure_is_an_error_not_a_response() {
    let assets = StaticAssets::new("/proc/self").unwrap();
    let req = Request::builder().uri("/mem").body(()).unwrap();
    let result = assets.serve(&req).await;
    assert!(
        matches!(result, Err(hyper_static_assets::Error::Read { .. })),
        "{:?}",
        result.map(|res| res.status())
    );
}
