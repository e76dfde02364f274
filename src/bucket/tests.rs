use super::*;

fn config_bucket(assets: Vec<Asset>) -> AssetBucket {
    AssetBucket::with_assets("https://host", "/slug", "./assets", assets)
}

fn asset_a() -> Asset {
    Asset::new("a", b"contents of \"a\"".to_vec(), "/slug/a", "application/test-content")
}

fn asset_b() -> Asset {
    Asset::new("b.png", b"image!".to_vec(), "/slug/b-1234.png", "image/png")
}

#[test]
fn test_empty_bucket_settings() {
    let bucket = AssetBucket::new("https://host", "/slug", "./assets");
    assert_eq!(bucket.host(), "https://host");
    assert_eq!(bucket.base_href(), "/slug");
    assert_eq!(bucket.base_path(), Path::new("./assets"));
    assert!(bucket.is_empty());
}

#[test]
fn test_empty_bucket_lookups_fail() {
    let bucket = AssetBucket::new("https://host", "", ".");
    assert!(bucket.href_to("a").is_err());
    assert!(bucket.url_to("a").is_err());
    assert!(bucket.data_for("a").is_err());
    assert!(bucket.data_uri_for("a").is_err());

    let err = bucket.href_to("a").unwrap_err();
    assert_eq!(err.key, "a");
    assert!(err.valid_keys.is_empty());
}

#[test]
fn test_href_to() {
    let bucket = config_bucket(vec![asset_a(), asset_b()]);
    assert_eq!(bucket.href_to("a").unwrap(), "/slug/a");
    assert!(bucket.href_to("/a").is_err());
}

#[test]
fn test_url_to() {
    let bucket = config_bucket(vec![asset_a(), asset_b()]);
    assert_eq!(
        bucket.url_to("b.png").unwrap(),
        "https://host/slug/b-1234.png"
    );
    assert!(bucket.url_to("/a").is_err());
}

#[test]
fn test_data_for() {
    let bucket = config_bucket(vec![asset_a(), asset_b()]);
    assert_eq!(bucket.data_for("a").unwrap(), b"contents of \"a\"");
    assert!(bucket.data_for("/a").is_err());
}

#[test]
fn test_data_uri_for() {
    let bucket = config_bucket(vec![asset_a(), asset_b()]);
    assert_eq!(
        bucket.data_uri_for("a").unwrap(),
        "data:application/test-content;base64,Y29udGVudHMgb2YgImEi"
    );
    assert!(bucket.data_uri_for("/a").is_err());
}

#[test]
fn test_unknown_key_lists_sorted_keys() {
    let bucket = config_bucket(vec![asset_b(), asset_a()]);
    let err = bucket.href_to("c").unwrap_err();
    assert_eq!(err.valid_keys, vec!["a".to_string(), "b.png".to_string()]);
    assert!(err.to_string().ends_with("Valid keys are: a b.png"));
}

#[test]
fn test_with_additional_assets_leaves_original_untouched() {
    let first = config_bucket(vec![asset_a()]);
    let second = first.with_additional_assets(vec![asset_b()]);

    assert_eq!(first.len(), 1);
    assert!(first.href_to("b.png").is_err());
    assert_eq!(second.len(), 2);
    assert_eq!(second.href_to("a").unwrap(), "/slug/a");
    assert_eq!(second.host(), first.host());
    assert_eq!(second.base_path(), first.base_path());
}

#[test]
fn test_fold_order_is_associative() {
    let c = Asset::new("c.txt", b"c".to_vec(), "/slug/c.txt", "text/plain");

    let stepwise = config_bucket(vec![])
        .with_additional_assets(vec![asset_a()])
        .with_additional_assets(vec![asset_b(), c.clone()]);
    let direct = config_bucket(vec![asset_a(), asset_b(), c]);

    let keys = |b: &AssetBucket| b.assets().map(|a| a.key.clone()).collect::<Vec<_>>();
    assert_eq!(keys(&stepwise), keys(&direct));
    for key in ["a", "b.png", "c.txt"] {
        assert_eq!(stepwise.get(key).unwrap(), direct.get(key).unwrap());
    }
}

#[test]
fn test_later_duplicate_key_shadows_earlier() {
    let early = Asset::new("app.js", b"1".to_vec(), "/slug/app-1.js", "application/javascript");
    let late = Asset::new("app.js", b"2".to_vec(), "/slug/app-2.js", "application/javascript");

    let bucket = config_bucket(vec![early]).with_additional_assets(vec![late]);

    assert_eq!(bucket.href_to("app.js").unwrap(), "/slug/app-2.js");
    assert_eq!(bucket.data_for("app.js").unwrap(), b"2");
    // Both stay published
    assert_eq!(bucket.len(), 2);
    let website = bucket.to_website();
    assert_eq!(website.endpoints[0].path, "/slug/app-1.js");
    assert_eq!(website.endpoints[1].path, "/slug/app-2.js");
    // Valid keys are unique
    let err = bucket.href_to("nope").unwrap_err();
    assert_eq!(err.valid_keys, vec!["app.js".to_string()]);
}

#[test]
fn test_to_website() {
    let bucket = config_bucket(vec![asset_a(), asset_b()]);
    let website = bucket.to_website();

    assert_eq!(website.len(), 2);
    assert_eq!(
        website.endpoints[0],
        Endpoint {
            path: "/slug/a",
            headers: [
                ("Content-Type", "application/test-content"),
                ("Cache-Control", "public; max-age=31536000"),
            ],
            body: b"contents of \"a\"",
        }
    );
    assert_eq!(website.endpoints[1].path, "/slug/b-1234.png");
    assert_eq!(website.endpoints[1].header("content-type"), Some("image/png"));
    assert_eq!(
        website.endpoints[1].header("Cache-Control"),
        Some(CACHE_CONTROL)
    );
    assert_eq!(website.get("/slug/a").map(|e| e.body), Some(&b"contents of \"a\""[..]));
}

#[test]
fn test_href_for_path() {
    let bucket = config_bucket(vec![]);
    assert_eq!(bucket.href_for_path("images/logo.png"), "/slug/images/logo.png");

    let bare = AssetBucket::new("https://host", "", ".");
    assert_eq!(bare.href_for_path("robots.txt"), "/robots.txt");
}
