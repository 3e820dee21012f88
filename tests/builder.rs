//! Directory builder integration tests

#![allow(clippy::expect_used, clippy::unwrap_used)]

use asset_bundle::builder::{build_dirs, BundleBuilder};
use asset_bundle::config::{BuilderConfig, BundleConfig, CodecConfig};
use asset_bundle::{load_bundle, BundleError, BundleKind};
use std::fs;
use std::path::Path;

fn site(root: &Path) {
    fs::create_dir_all(root.join("img/icons")).unwrap();
    fs::create_dir_all(root.join(".git")).unwrap();
    fs::write(root.join("index.html"), "<h1>bundle</h1>").unwrap();
    fs::write(root.join("img/logo.png"), [0x89u8, b'P', b'N', b'G']).unwrap();
    fs::write(root.join("img/icons/fav.ico"), [0u8, 0, 1, 0]).unwrap();
    fs::write(root.join(".git/HEAD"), "ref: refs/heads/main").unwrap();
}

#[test]
fn test_walks_tree_recursively() {
    let dir = tempfile::tempdir().unwrap();
    site(dir.path());

    let mut builder = BundleBuilder::new(BuilderConfig::default());
    let added = builder.add_dir(dir.path()).unwrap();
    assert_eq!(added, 4);

    let bundle = builder.build();
    for name in ["index.html", "logo.png", "fav.ico", "HEAD"] {
        assert!(bundle.contains(name), "missing {name}");
    }
    assert_eq!(&*bundle.asset("index.html").unwrap(), b"<h1>bundle</h1>");
}

#[test]
fn test_skip_hidden() {
    let dir = tempfile::tempdir().unwrap();
    site(dir.path());

    let config = BuilderConfig {
        skip_hidden: true,
        ..BuilderConfig::default()
    };
    let mut builder = BundleBuilder::new(config);
    assert_eq!(builder.add_dir(dir.path()).unwrap(), 3);
    assert!(!builder.bundle().contains("HEAD"));
}

#[test]
fn test_same_file_name_last_wins() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("a")).unwrap();
    fs::create_dir_all(dir.path().join("b")).unwrap();
    fs::write(dir.path().join("a/style.css"), "a").unwrap();
    fs::write(dir.path().join("b/style.css"), "b").unwrap();

    let mut builder = BundleBuilder::new(BuilderConfig::default());
    builder.add_dir(dir.path()).unwrap();
    let bundle = builder.build();
    assert_eq!(bundle.len(), 1);
    assert_eq!(&*bundle.asset("style.css").unwrap(), b"b");
}

#[test]
fn test_write_compressed_bundle() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("site");
    site(&src);
    let output = dir.path().join("web.bundle");

    let config = BuilderConfig {
        output: output.clone(),
        ..BuilderConfig::default()
    };
    let written = build_dirs(config, &[src]).unwrap();
    assert_eq!(written, output);

    let bundle = load_bundle(&output, &[]).unwrap();
    assert_eq!(bundle.info, BundleKind::Compressed);
    assert_eq!(bundle.len(), 4);
}

#[test]
fn test_write_encrypted_bundle() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("site");
    site(&src);
    let output = dir.path().join("secret.bundle");

    let config = BuilderConfig {
        output: output.clone(),
        key: Some("12345678901234".into()),
        ..BuilderConfig::default()
    };
    build_dirs(config, &[src]).unwrap();

    let bundle = load_bundle(&output, b"12345678901234").unwrap();
    assert_eq!(bundle.info, BundleKind::Encrypted);
    assert_eq!(&*bundle.asset("fav.ico").unwrap(), &[0, 0, 1, 0]);
    assert!(matches!(
        load_bundle(&output, b"nope"),
        Err(BundleError::AuthenticationFailed)
    ));
}

#[test]
fn test_development_bundle_reads_live_files() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("site");
    site(&src);
    let output = dir.path().join("dev.bundle");

    let config = BuilderConfig {
        output: output.clone(),
        development: true,
        ..BuilderConfig::default()
    };
    build_dirs(config, &[src.clone()]).unwrap();

    let bundle = load_bundle(&output, &[]).unwrap();
    assert_eq!(bundle.info, BundleKind::Development);
    assert_eq!(&*bundle.asset("index.html").unwrap(), b"<h1>bundle</h1>");

    // Edits show up without re-packing
    fs::write(src.join("index.html"), "<h1>edited</h1>").unwrap();
    assert_eq!(&*bundle.asset("index.html").unwrap(), b"<h1>edited</h1>");
}

#[test]
fn test_invalid_config_refuses_to_write() {
    let dir = tempfile::tempdir().unwrap();
    let config = BuilderConfig {
        output: dir.path().join("never.bundle"),
        key: Some("k".repeat(40)),
        ..BuilderConfig::default()
    };
    let builder = BundleBuilder::new(config);
    assert!(matches!(builder.write(), Err(BundleError::ConfigError(_))));
    assert!(!dir.path().join("never.bundle").exists());
}

#[test]
fn test_missing_dir() {
    let mut builder = BundleBuilder::new(BuilderConfig::default());
    assert!(matches!(
        builder.add_dir(Path::new("/no/such/dir")),
        Err(BundleError::Io(_))
    ));
}

#[test]
fn test_codec_mode_used_when_no_key() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("site");
    site(&src);
    let output = dir.path().join("plain.bundle");

    let config = BundleConfig::from_toml(&format!(
        "[codec]\nmode = \"none\"\nserialization = \"messagepack\"\ncompression_level = 6\nmax_payload_size = 1048576\n\n[builder]\noutput = {:?}\n",
        output.to_str().unwrap()
    ))
    .unwrap();

    let mut builder = BundleBuilder::with_codec(config.builder, config.codec);
    assert_eq!(builder.mode(), BundleKind::None);
    builder.add_dir(&src).unwrap();
    builder.write().unwrap();

    let raw = fs::read(&output).unwrap();
    assert_eq!(raw[3], BundleKind::None.flag_byte());
    let bundle = load_bundle(&output, &[]).unwrap();
    assert_eq!(bundle.info, BundleKind::None);
    assert_eq!(bundle.len(), 4);
}

#[test]
fn test_encrypted_codec_mode_without_key_refuses_to_write() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("never.bundle");
    let builder = BundleBuilder::with_codec(
        BuilderConfig {
            output: output.clone(),
            ..BuilderConfig::default()
        },
        CodecConfig {
            mode: BundleKind::Encrypted,
            ..CodecConfig::default()
        },
    );
    assert!(matches!(builder.write(), Err(BundleError::ConfigError(_))));
    assert!(!output.exists());
}

#[cfg(unix)]
#[test]
fn test_follows_symlinked_directories() {
    use std::os::unix::fs::symlink;

    let dir = tempfile::tempdir().unwrap();
    let real = dir.path().join("real");
    let src = dir.path().join("site");
    fs::create_dir_all(&real).unwrap();
    fs::create_dir_all(&src).unwrap();
    fs::write(real.join("shared.css"), "body{}").unwrap();
    fs::write(src.join("index.html"), "<h1>bundle</h1>").unwrap();
    symlink(&real, src.join("linked")).unwrap();
    // A link back to the root and a dangling link
    symlink(&src, src.join("loop")).unwrap();
    symlink(dir.path().join("nowhere"), src.join("dangling")).unwrap();

    let mut builder = BundleBuilder::new(BuilderConfig::default());
    assert_eq!(builder.add_dir(&src).unwrap(), 2);

    let bundle = builder.build();
    assert_eq!(&*bundle.asset("shared.css").unwrap(), b"body{}");
    assert_eq!(&*bundle.asset("index.html").unwrap(), b"<h1>bundle</h1>");
    assert!(!bundle.contains("dangling"));
}
