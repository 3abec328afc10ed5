use crate::AciError;
use aciforge_schema::{FullName, ImageManifest};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Name of the manifest entry at the root of every ACI.
pub const MANIFEST_ENTRY: &str = "manifest";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Compression {
    Gzip,
    Bzip2,
    Xz,
    None,
}

fn detect_compression(magic: &[u8]) -> Compression {
    if magic.starts_with(&[0x1f, 0x8b]) {
        Compression::Gzip
    } else if magic.starts_with(b"BZh") {
        Compression::Bzip2
    } else if magic.starts_with(&[0xfd, b'7', b'z', b'X', b'Z', 0x00]) {
        Compression::Xz
    } else {
        Compression::None
    }
}

/// Offset of the POSIX `ustar` magic inside a tar header block.
const USTAR_MAGIC_OFFSET: usize = 257;

fn is_ustar(header: &[u8]) -> bool {
    header
        .get(USTAR_MAGIC_OFFSET..)
        .is_some_and(|magic| magic.starts_with(b"ustar"))
}

/// Wrap `reader` in the decoder matching its leading magic bytes.
/// Uncompressed input is only accepted as a ustar/GNU tar stream.
fn decompressing_reader<'a, R: BufRead + 'a>(mut reader: R) -> io::Result<Box<dyn Read + 'a>> {
    let head = reader.fill_buf()?;
    let compression = detect_compression(head);
    if compression == Compression::None && !is_ustar(head) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "unsupported archive format",
        ));
    }
    debug!("archive compression: {compression:?}");
    Ok(match compression {
        Compression::Gzip => Box::new(flate2::read::GzDecoder::new(reader)),
        Compression::Bzip2 => Box::new(bzip2::read::BzDecoder::new(reader)),
        Compression::Xz => Box::new(xz2::read::XzDecoder::new(reader)),
        Compression::None => Box::new(reader),
    })
}

/// Lexically clean a tar entry path: drop `.` components and empty
/// segments, resolve `..` against preceding components.
fn clean_path(path: &Path) -> String {
    let mut rooted = false;
    let mut parts: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::RootDir => rooted = true,
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.last().is_some_and(|p| p != "..") {
                    parts.pop();
                } else if !rooted {
                    parts.push("..".to_owned());
                }
            }
            Component::Normal(s) => parts.push(s.to_string_lossy().into_owned()),
            Component::Prefix(p) => parts.push(p.as_os_str().to_string_lossy().into_owned()),
        }
    }
    let joined = parts.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_owned(),
        (false, false) => joined,
    }
}

/// Return the raw bytes of the manifest entry of the ACI at `aci_path`.
///
/// Entries are scanned in order and the first one whose cleaned path is
/// [`MANIFEST_ENTRY`] wins. The file is closed on every return path.
pub fn extract_manifest_content(aci_path: &Path) -> Result<Vec<u8>, AciError> {
    let file = File::open(aci_path).map_err(|e| AciError::io(aci_path, e))?;
    let reader =
        decompressing_reader(BufReader::new(file)).map_err(|e| AciError::format(aci_path, e))?;

    let mut archive = tar::Archive::new(reader);
    let entries = archive
        .entries()
        .map_err(|e| AciError::format(aci_path, e))?;

    for entry in entries {
        let mut entry = entry.map_err(|e| AciError::format(aci_path, e))?;
        let is_manifest = {
            let entry_path = entry.path().map_err(|e| AciError::format(aci_path, e))?;
            clean_path(&entry_path) == MANIFEST_ENTRY
        };
        if !is_manifest {
            continue;
        }

        let declared = entry.size();
        let mut content = Vec::new();
        entry
            .read_to_end(&mut content)
            .map_err(|e| AciError::format(aci_path, e))?;
        if content.len() as u64 != declared {
            return Err(AciError::format(
                aci_path,
                io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!(
                        "manifest entry declares {declared} bytes, archive holds {}",
                        content.len()
                    ),
                ),
            ));
        }
        debug!(
            "read {} byte manifest from {}",
            content.len(),
            aci_path.display()
        );
        return Ok(content);
    }

    Err(AciError::ManifestNotFound {
        path: PathBuf::from(aci_path),
    })
}

/// Read and decode the manifest of the ACI at `aci_path`.
pub fn extract_manifest(aci_path: &Path) -> Result<ImageManifest, AciError> {
    let content = extract_manifest_content(aci_path)?;
    ImageManifest::from_slice(&content).map_err(|source| AciError::Parse {
        path: PathBuf::from(aci_path),
        content: String::from_utf8_lossy(&content).into_owned(),
        source,
    })
}

/// `name` or `name:version` of a manifest, from its identity and `version` label.
pub fn full_name(manifest: &ImageManifest) -> FullName {
    FullName::from_manifest(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_compression_from_magic() {
        assert_eq!(detect_compression(&[0x1f, 0x8b, 0x08]), Compression::Gzip);
        assert_eq!(detect_compression(b"BZh91AY"), Compression::Bzip2);
        assert_eq!(
            detect_compression(&[0xfd, b'7', b'z', b'X', b'Z', 0x00, 0x00]),
            Compression::Xz
        );
        assert_eq!(detect_compression(b"manifest\0\0"), Compression::None);
        assert_eq!(detect_compression(&[]), Compression::None);
    }

    #[test]
    fn ustar_magic_is_required_for_plain_input() {
        let mut block = vec![0u8; 512];
        assert!(!is_ustar(&block));
        block[257..262].copy_from_slice(b"ustar");
        assert!(is_ustar(&block));
        assert!(!is_ustar(b"ustar"));
        assert!(!is_ustar(&[]));
    }

    #[test]
    fn clean_path_normalizes_relative_entries() {
        assert_eq!(clean_path(Path::new("manifest")), "manifest");
        assert_eq!(clean_path(Path::new("./manifest")), "manifest");
        assert_eq!(clean_path(Path::new("rootfs/../manifest")), "manifest");
        assert_eq!(clean_path(Path::new("rootfs//etc/./hosts")), "rootfs/etc/hosts");
        assert_eq!(clean_path(Path::new("./")), ".");
    }

    #[test]
    fn clean_path_keeps_root_and_leading_parents() {
        assert_eq!(clean_path(Path::new("/manifest")), "/manifest");
        assert_eq!(clean_path(Path::new("/../manifest")), "/manifest");
        assert_eq!(clean_path(Path::new("../manifest")), "../manifest");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = extract_manifest_content(Path::new("/nonexistent/image.aci")).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Io);
        assert!(err.to_string().contains("/nonexistent/image.aci"));
    }
}
