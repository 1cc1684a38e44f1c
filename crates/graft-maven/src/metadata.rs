//! `maven-metadata.xml` parsing: artifact-level version listing, and the
//! version-level `snapshotVersions/snapshotVersion` entries used to resolve
//! a SNAPSHOT to its concrete dated filename.

use graft_util::errors::{GraftError, GraftResult};
use quick_xml::events::Event;
use quick_xml::reader::Reader;

/// Artifact-level metadata (`<root>/<group>/<artifact>/maven-metadata.xml`):
/// the version list and Maven's notion of `latest`/`release`.
#[derive(Debug, Clone, Default)]
pub struct ArtifactMetadata {
    pub group_id: String,
    pub artifact_id: String,
    pub latest: Option<String>,
    pub release: Option<String>,
    pub versions: Vec<String>,
}

/// A single `snapshotVersion` entry: the per-extension substituted value
/// for a SNAPSHOT version, e.g. `1.0-20240101.120000-3` for `extension=pom`.
#[derive(Debug, Clone)]
pub struct SnapshotVersionEntry {
    pub extension: String,
    pub value: String,
    pub classifier: Option<String>,
}

/// Version-level metadata (`<root>/<group>/<artifact>/<version>/maven-metadata.xml`)
/// for a SNAPSHOT version.
#[derive(Debug, Clone, Default)]
pub struct SnapshotMetadata {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub snapshot_versions: Vec<SnapshotVersionEntry>,
}

impl SnapshotMetadata {
    /// The value for the `pom` extension, if present — substituted into
    /// the fetched filename `<artifactId>-<value>.pom`.
    pub fn pom_value(&self) -> Option<&str> {
        self.snapshot_versions
            .iter()
            .find(|entry| entry.extension == "pom" && entry.classifier.is_none())
            .map(|entry| entry.value.as_str())
    }
}

pub fn parse_artifact_metadata(xml: &str) -> GraftResult<ArtifactMetadata> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut path: Vec<String> = Vec::new();
    let mut text = String::new();
    let mut metadata = ArtifactMetadata::default();

    loop {
        match reader.read_event().map_err(|e| GraftError::XmlParse {
            message: format!("{e}"),
        })? {
            Event::Start(e) => {
                path.push(String::from_utf8_lossy(e.name().as_ref()).to_string());
                text.clear();
            }
            Event::Text(e) => {
                text.push_str(&e.unescape().map_err(|err| GraftError::XmlParse {
                    message: format!("{err}"),
                })?);
            }
            Event::End(_) => {
                let ctx = path.join("/");
                let value = text.trim().to_string();
                text.clear();
                match ctx.as_str() {
                    "metadata/groupId" => metadata.group_id = value,
                    "metadata/artifactId" => metadata.artifact_id = value,
                    "metadata/versioning/latest" => metadata.latest = Some(value),
                    "metadata/versioning/release" => metadata.release = Some(value),
                    "metadata/versioning/versions/version" => metadata.versions.push(value),
                    _ => {}
                }
                path.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(metadata)
}

pub fn parse_snapshot_metadata(xml: &str) -> GraftResult<SnapshotMetadata> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut path: Vec<String> = Vec::new();
    let mut text = String::new();
    let mut metadata = SnapshotMetadata::default();

    let mut extension: Option<String> = None;
    let mut value: Option<String> = None;
    let mut classifier: Option<String> = None;

    loop {
        match reader.read_event().map_err(|e| GraftError::XmlParse {
            message: format!("{e}"),
        })? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                path.push(name);
                let ctx = path.join("/");
                text.clear();
                if ctx == "metadata/versioning/snapshotVersions/snapshotVersion" {
                    extension = None;
                    value = None;
                    classifier = None;
                }
            }
            Event::Text(e) => {
                text.push_str(&e.unescape().map_err(|err| GraftError::XmlParse {
                    message: format!("{err}"),
                })?);
            }
            Event::End(_) => {
                let ctx = path.join("/");
                let field_value = text.trim().to_string();
                text.clear();
                match ctx.as_str() {
                    "metadata/groupId" => metadata.group_id = field_value,
                    "metadata/artifactId" => metadata.artifact_id = field_value,
                    "metadata/version" => metadata.version = field_value,
                    "metadata/versioning/snapshotVersions/snapshotVersion/extension" => {
                        extension = Some(field_value)
                    }
                    "metadata/versioning/snapshotVersions/snapshotVersion/value" => value = Some(field_value),
                    "metadata/versioning/snapshotVersions/snapshotVersion/classifier" => {
                        if !field_value.is_empty() {
                            classifier = Some(field_value);
                        }
                    }
                    "metadata/versioning/snapshotVersions/snapshotVersion" => {
                        if let (Some(ext), Some(val)) = (extension.take(), value.take()) {
                            metadata.snapshot_versions.push(SnapshotVersionEntry {
                                extension: ext,
                                value: val,
                                classifier: classifier.take(),
                            });
                        }
                    }
                    _ => {}
                }
                path.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(metadata)
}
