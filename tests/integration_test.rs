// tests/integration_test.rs

//! Integration tests for repocheck
//!
//! These tests write real repodata archives into temporary repositories and
//! run the checks end to end.

use repocheck::check::{self, Finding};
use repocheck::config::CheckConfig;
use repocheck::package::PackageRecord;
use repocheck::report::TextReport;
use repocheck::repository::{self, RepodataLoader, Registry};
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const ARCH: &str = "x86_64";

#[derive(Clone, Copy)]
enum Compression {
    Zstd,
    Gzip,
    Xz,
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn string_array(out: &mut String, key: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    out.push_str(&format!("\t\t<key>{}</key>\n\t\t<array>\n", key));
    for item in items {
        out.push_str(&format!("\t\t\t<string>{}</string>\n", escape(item)));
    }
    out.push_str("\t\t</array>\n");
}

fn index_plist(entries: &[(&str, &PackageRecord)]) -> String {
    let mut out = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\" \"http://www.apple.com/DTDs/PropertyList-1.0.dtd\">\n\
         <plist version=\"1.0\">\n<dict>\n",
    );
    for (name, record) in entries {
        out.push_str(&format!("\t<key>{}</key>\n\t<dict>\n", escape(name)));
        out.push_str(&format!(
            "\t\t<key>architecture</key>\n\t\t<string>{}</string>\n",
            ARCH
        ));
        out.push_str("\t\t<key>installed_size</key>\n\t\t<integer>4096</integer>\n");
        out.push_str(&format!(
            "\t\t<key>pkgver</key>\n\t\t<string>{}</string>\n",
            escape(&record.pkgver)
        ));
        string_array(&mut out, "provides", &record.provides);
        string_array(&mut out, "run_depends", &record.run_depends);
        string_array(&mut out, "shlib-provides", &record.shlib_provides);
        string_array(&mut out, "shlib-requires", &record.shlib_requires);
        out.push_str("\t</dict>\n");
    }
    out.push_str("</dict>\n</plist>\n");
    out
}

fn tarball(index: &str) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (name, content) in [
        ("index.plist", index),
        ("index-meta.plist", "<plist version=\"1.0\"><dict/></plist>"),
    ] {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        builder
            .append_data(&mut header, name, content.as_bytes())
            .unwrap();
    }
    builder.into_inner().unwrap()
}

fn compress(data: &[u8], compression: Compression) -> Vec<u8> {
    match compression {
        Compression::Zstd => zstd::encode_all(data, 3).unwrap(),
        Compression::Gzip => {
            let mut encoder =
                flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
            encoder.write_all(data).unwrap();
            encoder.finish().unwrap()
        }
        Compression::Xz => {
            let mut encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
            encoder.write_all(data).unwrap();
            encoder.finish().unwrap()
        }
    }
}

fn write_index(dir: &Path, file_name: &str, records: &[PackageRecord], compression: Compression) {
    let entries: Vec<(&str, &PackageRecord)> = records.iter().map(|r| (r.name(), r)).collect();
    let archive = compress(&tarball(&index_plist(&entries)), compression);
    fs::write(dir.join(file_name), archive).unwrap();
}

/// Write repodata keyed by explicit package names
fn write_named_repodata(dir: &Path, entries: &[(&str, PackageRecord)]) {
    let entries: Vec<(&str, &PackageRecord)> = entries.iter().map(|(n, r)| (*n, r)).collect();
    let archive = compress(&tarball(&index_plist(&entries)), Compression::Zstd);
    fs::write(dir.join(format!("{}-repodata", ARCH)), archive).unwrap();
}

fn write_repodata(dir: &Path, arch: &str, records: &[PackageRecord]) {
    write_index(dir, &format!("{}-repodata", arch), records, Compression::Zstd);
}

fn repo_dir(root: &TempDir, name: &str) -> PathBuf {
    let path = root.path().join(name);
    fs::create_dir_all(&path).unwrap();
    path
}

fn load(paths: &[&PathBuf]) -> Registry {
    let config = CheckConfig::new(paths.iter().map(|p| p.to_path_buf()).collect())
        .with_arch(Some(ARCH.to_string()));
    repository::load_registry(&RepodataLoader::new(), &config).unwrap()
}

fn all_findings(registry: &Registry) -> Vec<Finding> {
    let mut findings = check::check_dependencies(registry);
    findings.extend(check::check_shlibs(registry));
    findings
}

#[test]
fn test_single_missing_dependency() {
    let root = tempfile::tempdir().unwrap();
    let repo = repo_dir(&root, "current");
    write_repodata(
        &repo,
        ARCH,
        &[PackageRecord::new("foo-1.0_1").with_run_depends(["bar"])],
    );

    let registry = load(&[&repo]);
    assert_eq!(
        all_findings(&registry),
        vec![Finding::MissingDependency {
            name: "bar".to_string(),
            required_by: "foo-1.0_1".to_string(),
        }]
    );
}

#[test]
fn test_duplicate_virtual_provider_across_repositories() {
    let root = tempfile::tempdir().unwrap();
    let first = repo_dir(&root, "first");
    let second = repo_dir(&root, "second");
    write_repodata(
        &first,
        ARCH,
        &[PackageRecord::new("foo-1.0_1").with_provides(["libfoo-1.0_1"])],
    );
    write_repodata(
        &second,
        ARCH,
        &[PackageRecord::new("baz-2.0_1").with_provides(["libfoo-2.0_1"])],
    );

    // Repositories are walked most recently added first
    let registry = load(&[&second, &first]);
    let (providers, findings) = check::build_provider_index(&registry);

    assert_eq!(
        findings,
        vec![Finding::DuplicateProvider {
            name: "libfoo".to_string(),
            previous: "foo-1.0_1".to_string(),
            pkgver: "baz-2.0_1".to_string(),
        }]
    );
    assert_eq!(providers.resolve("libfoo"), Some("baz-2.0_1"));
}

#[test]
fn test_shlib_satisfied_by_other_repository() {
    let root = tempfile::tempdir().unwrap();
    let apps = repo_dir(&root, "apps");
    let libs = repo_dir(&root, "libs");
    write_repodata(
        &apps,
        ARCH,
        &[PackageRecord::new("app-1.0_1")
            .with_run_depends(["openssl>=3.0_1"])
            .with_shlib_requires(["libssl.so.3"])],
    );
    write_repodata(
        &libs,
        ARCH,
        &[PackageRecord::new("openssl-3.1.4_1").with_shlib_provides(["libssl.so.3"])],
    );

    let registry = load(&[&apps, &libs]);
    assert!(all_findings(&registry).is_empty());
}

#[test]
fn test_foreign_architecture_repository_is_skipped() {
    let root = tempfile::tempdir().unwrap();
    let armv7 = repo_dir(&root, "armv7");
    let native = repo_dir(&root, "native");
    write_repodata(
        &armv7,
        "armv7",
        &[PackageRecord::new("broken-1.0_1").with_run_depends(["nowhere"])],
    );
    write_repodata(
        &native,
        ARCH,
        &[PackageRecord::new("foo-1.0_1").with_run_depends(["bar"])],
    );

    let alone = load(&[&armv7]);
    assert_eq!(alone.len(), 1);
    assert!(alone.repositories()[0].selected().is_none());
    assert!(all_findings(&alone).is_empty());

    let both = load(&[&armv7, &native]);
    assert_eq!(all_findings(&both).len(), 1);
}

#[test]
fn test_unrevisioned_pkgvers_resolve_by_index_key() {
    let root = tempfile::tempdir().unwrap();
    let first = repo_dir(&root, "first");
    let second = repo_dir(&root, "second");
    write_named_repodata(
        &first,
        &[
            ("bar", PackageRecord::new("bar-2.0")),
            (
                "foo",
                PackageRecord::new("foo-1.0")
                    .with_run_depends(["bar", "qux"])
                    .with_provides(["libfoo"]),
            ),
        ],
    );
    write_named_repodata(
        &second,
        &[
            (
                "app",
                PackageRecord::new("app-1.0").with_shlib_requires(["libssl.so.3"]),
            ),
            ("baz", PackageRecord::new("baz-2.0").with_provides(["libfoo"])),
            (
                "openssl",
                PackageRecord::new("openssl-3.1").with_shlib_provides(["libssl.so.3"]),
            ),
        ],
    );

    let registry = load(&[&second, &first]);
    let (providers, _) = check::build_provider_index(&registry);
    assert_eq!(providers.resolve("bar"), Some("bar-2.0"));
    assert_eq!(providers.resolve("libfoo"), Some("baz-2.0"));

    assert_eq!(
        all_findings(&registry),
        vec![
            Finding::DuplicateProvider {
                name: "libfoo".to_string(),
                previous: "foo-1.0".to_string(),
                pkgver: "baz-2.0".to_string(),
            },
            Finding::MissingDependency {
                name: "qux".to_string(),
                required_by: "foo-1.0".to_string(),
            },
        ]
    );
}

#[test]
fn test_stray_index_without_arch_is_ignored() {
    let root = tempfile::tempdir().unwrap();
    let repo = repo_dir(&root, "repo");
    write_repodata(&repo, ARCH, &[PackageRecord::new("foo-1.0_1")]);
    fs::write(repo.join("-repodata"), b"junk").unwrap();

    let registry = load(&[&repo]);
    assert!(registry.repositories()[0].index().unwrap().get("foo").is_some());
    assert!(all_findings(&registry).is_empty());
}

#[test]
fn test_every_compression_is_readable() {
    let root = tempfile::tempdir().unwrap();
    let repo = repo_dir(&root, "repo");
    let records = [PackageRecord::new("foo-1.0_1").with_run_depends(["bar"])];

    for compression in [Compression::Zstd, Compression::Gzip, Compression::Xz] {
        write_index(&repo, &format!("{}-repodata", ARCH), &records, compression);
        let registry = load(&[&repo]);
        let index = registry.repositories()[0].index().unwrap();
        assert_eq!(index.get("foo").unwrap().run_depends, vec!["bar"]);
    }
}

#[test]
fn test_staged_index_is_loaded_but_not_checked() {
    let root = tempfile::tempdir().unwrap();
    let repo = repo_dir(&root, "repo");
    write_repodata(&repo, ARCH, &[PackageRecord::new("foo-1.0_1")]);
    write_index(
        &repo,
        &format!("{}-stagedata", ARCH),
        &[PackageRecord::new("foo-1.1_1").with_run_depends(["unpublished"])],
        Compression::Gzip,
    );

    let registry = load(&[&repo]);
    let selected = registry.repositories()[0].selected().unwrap();
    assert_eq!(
        selected.stage.as_ref().unwrap().get("foo").unwrap().pkgver,
        "foo-1.1_1"
    );
    assert!(all_findings(&registry).is_empty());
}

#[test]
fn test_corrupt_repodata_is_fatal() {
    let root = tempfile::tempdir().unwrap();
    let repo = repo_dir(&root, "repo");
    fs::write(repo.join(format!("{}-repodata", ARCH)), b"not an archive").unwrap();

    let config = CheckConfig::new(vec![repo.clone()]).with_arch(Some(ARCH.to_string()));
    let err = repository::load_registry(&RepodataLoader::new(), &config).unwrap_err();
    assert!(err.to_string().contains(&repo.display().to_string()));
}

#[test]
fn test_corrupt_stagedata_is_fatal() {
    let root = tempfile::tempdir().unwrap();
    let repo = repo_dir(&root, "repo");
    write_repodata(&repo, ARCH, &[PackageRecord::new("foo-1.0_1")]);
    fs::write(
        repo.join(format!("{}-stagedata", ARCH)),
        compress(b"garbage", Compression::Zstd),
    )
    .unwrap();

    let config = CheckConfig::new(vec![repo]).with_arch(Some(ARCH.to_string()));
    let err = repository::load_registry(&RepodataLoader::new(), &config).unwrap_err();
    assert!(matches!(err, repocheck::Error::Stagedata { .. }));
}

#[test]
fn test_missing_directory_is_fatal() {
    let root = tempfile::tempdir().unwrap();
    let config = CheckConfig::new(vec![root.path().join("missing")]).with_arch(Some(ARCH.to_string()));
    assert!(repository::load_registry(&RepodataLoader::new(), &config).is_err());
}

#[test]
fn test_check_is_idempotent() {
    let root = tempfile::tempdir().unwrap();
    let a = repo_dir(&root, "a");
    let b = repo_dir(&root, "b");
    write_repodata(
        &a,
        ARCH,
        &[
            PackageRecord::new("foo-1.0_1")
                .with_run_depends(["bar", "baz>=1_1"])
                .with_provides(["sh-0_1"]),
            PackageRecord::new("qux-1.0_1").with_shlib_requires(["libqux.so.1"]),
        ],
    );
    write_repodata(
        &b,
        ARCH,
        &[
            PackageRecord::new("baz-1.0_1").with_provides(["sh-0_1"]),
            PackageRecord::new("app-1.0_1").with_run_depends(["bar"]),
        ],
    );

    let first: HashSet<Finding> = all_findings(&load(&[&a, &b])).into_iter().collect();
    let second: HashSet<Finding> = all_findings(&load(&[&a, &b])).into_iter().collect();

    assert_eq!(first, second);
    assert_eq!(first.len(), 4);
}

#[test]
fn test_text_report_end_to_end() {
    let root = tempfile::tempdir().unwrap();
    let repo = repo_dir(&root, "repo");
    write_repodata(
        &repo,
        ARCH,
        &[PackageRecord::new("foo-1.0_1")
            .with_run_depends(["bar"])
            .with_shlib_requires(["libbar.so.1"])],
    );

    let registry = load(&[&repo]);
    let mut report = TextReport::new(Vec::new());
    let summary = check::run(&registry, &mut report).unwrap();
    let text = String::from_utf8(report.into_inner()).unwrap();

    assert_eq!(summary.total(), 2);
    assert!(text.contains("Runtime dependencies:\nbar: missing (required by foo-1.0_1)\n"));
    assert!(text.contains("Shared libraries:\nlibbar.so.1: missing (required by foo-1.0_1)\n"));
}

#[test]
fn test_binary_exit_status() {
    let root = tempfile::tempdir().unwrap();
    let repo = repo_dir(&root, "repo");
    write_repodata(
        &repo,
        ARCH,
        &[PackageRecord::new("foo-1.0_1").with_run_depends(["bar"])],
    );

    // Findings are diagnostics, not failures
    let output = Command::new(env!("CARGO_BIN_EXE_repocheck"))
        .args(["--arch", ARCH])
        .arg(&repo)
        .env_remove("RUST_LOG")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("bar: missing (required by foo-1.0_1)"));

    // An unreadable repository aborts without a report
    let broken = repo_dir(&root, "broken");
    fs::write(broken.join(format!("{}-repodata", ARCH)), b"junk").unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_repocheck"))
        .args(["--arch", ARCH])
        .arg(&repo)
        .arg(&broken)
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}
