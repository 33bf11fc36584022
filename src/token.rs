//! Transport encoding of download URLs.
//!
//! A listing hands download URLs back with `&` replaced by `|`, so one URL
//! survives being embedded as a single query-style value. A download request
//! sends that token back; [`decode_download_token`] splits it into the real
//! URL and the file name carried in its `filename=` field.

use std::path::Path;

use reqwest::Url;

use crate::error::{Result, ShareError};

const FIELD_SEPARATOR: char = '|';
const FILENAME_FIELD: &str = "filename";

/// A decoded download request: where to fetch from and what to call the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    pub download_url: String,
    pub file_name: String,
}

/// Replace every `&` with `|`.
pub fn encode_download_url(url: &str) -> String {
    url.replace('&', "|")
}

/// Split a compound token back into a download URL and file name.
///
/// # Examples
///
/// ```
/// use disk_share::token::decode_download_token;
///
/// let task = decode_download_token("https://dl.example/get?id=7|filename=a.txt").unwrap();
/// assert_eq!(task.download_url, "https://dl.example/get?id=7&filename=a.txt");
/// assert_eq!(task.file_name, "a.txt");
/// ```
pub fn decode_download_token(token: &str) -> Result<DownloadTask> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return Err(ShareError::InvalidToken(token.to_string()));
    }

    let download_url = trimmed
        .split(FIELD_SEPARATOR)
        .collect::<Vec<_>>()
        .join("&");

    let parsed =
        Url::parse(&download_url).map_err(|_| ShareError::InvalidToken(token.to_string()))?;

    let file_name = parsed
        .query_pairs()
        .find(|(key, _)| key == FILENAME_FIELD)
        .map(|(_, value)| value.into_owned())
        .and_then(|name| base_name(&name))
        .ok_or_else(|| ShareError::InvalidToken(format!("no file name in {}", token)))?;

    Ok(DownloadTask {
        download_url,
        file_name,
    })
}

/// Last path component of `name`, rejecting `.`, `..` and empty names.
fn base_name(name: &str) -> Option<String> {
    let last = name.rsplit(['/', '\\']).next()?;
    if last.is_empty() || last == "." || last == ".." {
        return None;
    }
    Path::new(last)
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_replaces_every_ampersand() {
        assert_eq!(
            encode_download_url("https://d.example/x?a=1&b=2&filename=f.txt"),
            "https://d.example/x?a=1|b=2|filename=f.txt"
        );
    }

    #[test]
    fn test_round_trip() {
        let url = "https://downloader.disk.example/disk/abc?uid=0&filename=photo.jpg&disposition=attachment";
        let task = decode_download_token(&encode_download_url(url)).unwrap();
        assert_eq!(task.download_url, url);
        assert_eq!(task.file_name, "photo.jpg");
    }

    #[test]
    fn test_percent_encoded_file_name() {
        let task = decode_download_token("https://d.example/x?filename=%D0%BE%D1%82%D1%87%D0%B5%D1%82.pdf").unwrap();
        assert_eq!(task.file_name, "отчет.pdf");
    }

    #[test]
    fn test_file_name_is_reduced_to_base_name() {
        let task = decode_download_token("https://d.example/x?filename=..%2F..%2Fetc%2Fpasswd").unwrap();
        assert_eq!(task.file_name, "passwd");
    }

    #[test]
    fn test_missing_file_name() {
        assert!(decode_download_token("https://d.example/x?a=1|b=2").is_err());
        assert!(decode_download_token("https://d.example/x?filename=..").is_err());
    }

    #[test]
    fn test_not_a_url() {
        assert!(decode_download_token("").is_err());
        assert!(decode_download_token("filename=a.txt").is_err());
    }
}
