//! Opening and vetting log files
//!
//! Server logs are often rotated through gzip or zstd; both are detected by
//! magic bytes and decompressed on the fly.

use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Chain, Cursor, Read};
use std::path::Path;

use crate::error::InputError;

/// Number of leading bytes inspected when deciding whether a file is text
pub const SNIFF_LEN: usize = 512;

/// Path accepted as "read standard input"
pub const STDIN_PATH: &str = "-";

/// Compression formats recognised by magic bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Plain,
    /// Magic bytes 1F 8B 08
    Gzip,
    /// Magic bytes 28 B5 2F FD
    Zstd,
}

impl Compression {
    pub fn detect(head: &[u8]) -> Self {
        if head.len() >= 3 && head[0] == 0x1F && head[1] == 0x8B && head[2] == 0x08 {
            Compression::Gzip
        } else if head.len() >= 4
            && head[0] == 0x28
            && head[1] == 0xB5
            && head[2] == 0x2F
            && head[3] == 0xFD
        {
            Compression::Zstd
        } else {
            Compression::Plain
        }
    }
}

/// Wrap `reader` in a decompressor if its first bytes carry a known magic number
pub fn decompress<R: Read + 'static>(mut reader: R) -> io::Result<Box<dyn BufRead>> {
    let mut head = [0u8; 4];
    let n = read_up_to(&mut reader, &mut head)?;

    // Put the read bytes back in front using a cursor chain
    let prefix = Cursor::new(head[..n].to_vec());
    let chained: Chain<Cursor<Vec<u8>>, R> = prefix.chain(reader);

    Ok(match Compression::detect(&head[..n]) {
        Compression::Gzip => Box::new(BufReader::new(MultiGzDecoder::new(chained))),
        Compression::Zstd => Box::new(BufReader::new(zstd::Decoder::new(chained)?)),
        Compression::Plain => Box::new(BufReader::new(chained)),
    })
}

/// Open a log for reading, or standard input for `-`
pub fn open_log(path: &Path) -> Result<Box<dyn BufRead>, InputError> {
    if path.as_os_str() == STDIN_PATH {
        return decompress(io::stdin()).map_err(|source| InputError::Open {
            path: path.to_path_buf(),
            source,
        });
    }

    let file = File::open(path).map_err(|source| InputError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    decompress(file).map_err(|source| InputError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Reject files that are not plain-text `.log` files.
///
/// A trailing `.gz`, `.zst` or `.zstd` is ignored when checking the
/// extension, and the text check runs on the decompressed content.
pub fn validate_log_file(path: &Path) -> Result<(), InputError> {
    if !has_log_extension(path) {
        return Err(InputError::NotALogFile {
            path: path.to_path_buf(),
        });
    }

    let mut reader = open_log(path)?;
    let mut head = vec![0u8; SNIFF_LEN];
    let n = read_up_to(&mut reader, &mut head).map_err(|source| InputError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    if looks_like_text(&head[..n]) {
        Ok(())
    } else {
        Err(InputError::NotText {
            path: path.to_path_buf(),
        })
    }
}

pub fn has_log_extension(path: &Path) -> bool {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name.to_ascii_lowercase(),
        None => return false,
    };
    let name = [".gz", ".zst", ".zstd"]
        .iter()
        .find_map(|suffix| name.strip_suffix(*suffix))
        .unwrap_or(name.as_str());
    name.len() > ".log".len() && name.ends_with(".log")
}

/// True when `head` contains no binary control bytes.
/// Tab, newline, form feed, carriage return and escape are allowed.
pub fn looks_like_text(head: &[u8]) -> bool {
    !head
        .iter()
        .any(|&b| matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F))
}

/// Fill `buf` as far as the reader allows, stopping early only at end of stream
fn read_up_to<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const SAMPLE: &str = "  0:00 InitGame: \\sv_hostname\\Code Miner Server\n\
                          20:54 Kill: 1022 2 22: <world> killed Isgalamido by MOD_TRIGGER_HURT\n";

    fn write_file(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    fn read_all(path: &Path) -> String {
        let mut content = String::new();
        open_log(path).unwrap().read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn test_detect_compression() {
        assert_eq!(Compression::detect(&[0x1F, 0x8B, 0x08, 0x00]), Compression::Gzip);
        assert_eq!(Compression::detect(&[0x28, 0xB5, 0x2F, 0xFD]), Compression::Zstd);
        assert_eq!(Compression::detect(b"Init"), Compression::Plain);
        assert_eq!(Compression::detect(&[0x1F]), Compression::Plain);
        assert_eq!(Compression::detect(&[]), Compression::Plain);
    }

    #[test]
    fn test_plain_file_passthrough() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "games.log", SAMPLE.as_bytes());
        assert_eq!(read_all(&path), SAMPLE);
    }

    #[test]
    fn test_gzip_file_is_decompressed() {
        let dir = TempDir::new().unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(SAMPLE.as_bytes()).unwrap();
        let path = write_file(&dir, "games.log.gz", &encoder.finish().unwrap());

        assert_eq!(read_all(&path), SAMPLE);
        assert!(validate_log_file(&path).is_ok());
    }

    #[test]
    fn test_zstd_file_is_decompressed() {
        let dir = TempDir::new().unwrap();
        let compressed = zstd::encode_all(SAMPLE.as_bytes(), 0).unwrap();
        let path = write_file(&dir, "games.log.zst", &compressed);

        assert_eq!(read_all(&path), SAMPLE);
    }

    #[test]
    fn test_tiny_file_shorter_than_magic() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "tiny.log", b"ab");
        assert_eq!(read_all(&path), "ab");
    }

    #[test]
    fn test_missing_file_reports_open_error() {
        let err = open_log(Path::new("/definitely/not/here.log")).err().unwrap();
        assert!(matches!(err, InputError::Open { .. }));
    }

    #[test]
    fn test_log_extension_rules() {
        assert!(has_log_extension(Path::new("qgames.log")));
        assert!(has_log_extension(Path::new("/var/log/Games.LOG")));
        assert!(has_log_extension(Path::new("qgames.log.gz")));
        assert!(has_log_extension(Path::new("qgames.log.zst")));
        assert!(!has_log_extension(Path::new("qgames.txt")));
        assert!(!has_log_extension(Path::new("qgames.gz")));
        assert!(!has_log_extension(Path::new(".log")));
        assert!(!has_log_extension(Path::new("screenshot.png")));
    }

    #[test]
    fn test_binary_content_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "fake.log", &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00]);
        assert!(matches!(
            validate_log_file(&path),
            Err(InputError::NotText { .. })
        ));
    }

    #[test]
    fn test_wrong_extension_rejected_before_reading() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "games.txt", SAMPLE.as_bytes());
        assert!(matches!(
            validate_log_file(&path),
            Err(InputError::NotALogFile { .. })
        ));
    }

    #[test]
    fn test_text_sniffing() {
        assert!(looks_like_text(SAMPLE.as_bytes()));
        assert!(looks_like_text(b""));
        assert!(looks_like_text("\tJoão\r\n\x1b[0m".as_bytes()));
        assert!(!looks_like_text(b"abc\x00def"));
    }
}
