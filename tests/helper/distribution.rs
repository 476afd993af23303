//! Fake Maven distribution and release index

use std::io::{Cursor, Write};
use std::path::Path;

use mockito::{Mock, ServerGuard};
use zip::write::SimpleFileOptions;

use mvn_bootstrap::config::BootstrapConfig;

/// Stub entry script: prints its arguments, one warning on stderr
pub const STUB_SCRIPT: &str = "#!/bin/sh\necho \"[INFO] mvn $1 $2\"\necho \"[INFO] BUILD SUCCESS\"\necho \"[WARNING] stub\" >&2\n";

/// Apache-style listing with the given version folders
pub fn listing(versions: &[&str]) -> String {
    let mut body = String::from(
        "<html><body><pre><img src=\"/icons/back.gif\" alt=\"[PARENTDIR]\"> <a href=\"/maven/\">Parent Directory</a>\n",
    );
    for version in versions {
        body.push_str(&format!(
            "<img src=\"/icons/folder.gif\" alt=\"[DIR]\"> <a href=\"{0}/\">{0}/</a>   2024-10-08 12:12    -\n",
            version
        ));
    }
    body.push_str("</pre></body></html>\n");
    body
}

/// Binary distribution zip for `version` with an executable `bin/mvn`
pub fn distribution_zip(version: &str) -> Vec<u8> {
    let root = format!("apache-maven-{}", version);
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let executable = || SimpleFileOptions::default().unix_permissions(0o755);
    let regular = || SimpleFileOptions::default().unix_permissions(0o644);

    writer
        .add_directory(format!("{}/bin/", root), executable())
        .unwrap();
    writer
        .start_file(format!("{}/bin/mvn", root), executable())
        .unwrap();
    writer.write_all(STUB_SCRIPT.as_bytes()).unwrap();
    writer
        .start_file(format!("{}/bin/mvn.cmd", root), regular())
        .unwrap();
    writer.write_all(b"@echo off\r\n").unwrap();
    writer
        .start_file(format!("{}/conf/settings.xml", root), regular())
        .unwrap();
    writer.write_all(b"<settings/>").unwrap();

    writer.finish().unwrap().into_inner()
}

/// Config pointing both endpoints at the mock server
pub fn config_for(server: &ServerGuard) -> BootstrapConfig {
    BootstrapConfig {
        index_url: format!("{}/maven/maven-3", server.url()),
        download_url_template: format!(
            "{}/maven/maven-{{major}}/{{version}}/binaries/apache-maven-{{version}}-bin.zip",
            server.url()
        ),
        ..BootstrapConfig::default()
    }
}

pub async fn mock_index(server: &mut ServerGuard, versions: &[&str], hits: usize) -> Mock {
    server
        .mock("GET", "/maven/maven-3")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(listing(versions))
        .expect(hits)
        .create_async()
        .await
}

pub async fn mock_distribution(server: &mut ServerGuard, version: &str, hits: usize) -> Mock {
    let major = version.split('.').next().unwrap_or(version);
    server
        .mock(
            "GET",
            format!(
                "/maven/maven-{}/{}/binaries/apache-maven-{}-bin.zip",
                major, version, version
            )
            .as_str(),
        )
        .with_status(200)
        .with_header("content-type", "application/zip")
        .with_body(distribution_zip(version))
        .expect(hits)
        .create_async()
        .await
}

pub fn write_pom(work_dir: &Path) {
    std::fs::write(work_dir.join("pom.xml"), "<project/>").unwrap();
}
