use bytes::Bytes;
use http::Request;
use http_body_util::Full;
use micro_form::{FormConfig, FormError, read_request_form};
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

const CONTENT_TYPE: &str = "multipart/form-data; boundary=upload-boundary";

fn request(file_content: &[u8]) -> Request<Full<Bytes>> {
    let mut body = Vec::new();
    body.extend_from_slice(b"--upload-boundary\r\n");
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"note\"\r\n\r\n");
    body.extend_from_slice(b"monthly report\r\n");
    body.extend_from_slice(b"--upload-boundary\r\n");
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"report\"; filename=\"report.csv\"\r\n");
    body.extend_from_slice(b"Content-Type: text/csv\r\n\r\n");
    body.extend_from_slice(file_content);
    body.extend_from_slice(b"\r\n--upload-boundary--\r\n");

    Request::builder()
        .header(http::header::CONTENT_TYPE, CONTENT_TYPE)
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}

fn csv(rows: usize) -> Vec<u8> {
    (0..rows).flat_map(|i| format!("{i},value {i}\r\n").into_bytes()).collect()
}

#[tokio::test]
async fn test_large_upload_spills_and_cleans_up() {
    let content = csv(2000);
    let config = FormConfig::new().file_memory_limit(1024);

    let mut form = read_request_form(request(&content), &config).await.unwrap();
    assert_eq!(form.get_text("note"), Some("monthly report"));

    let report = form.get_file_mut("report").unwrap();
    assert!(report.is_spilled());
    assert_eq!(report.content_type(), "text/csv");
    assert_eq!(report.size().unwrap(), content.len() as u64);
    assert_eq!(report.read_all().unwrap(), content);

    let path = report.temp_path().unwrap().to_path_buf();
    assert!(path.exists());
    drop(form);
    assert!(!path.exists());
}

#[tokio::test]
async fn test_small_upload_stays_in_memory() {
    let content = csv(3);
    let mut form = read_request_form(request(&content), &FormConfig::default()).await.unwrap();

    let report = form.get_file_mut("report").unwrap();
    assert!(!report.is_spilled());
    assert!(report.temp_path().is_none());
    assert_eq!(report.read_all().unwrap(), content);
}

#[tokio::test]
async fn test_upload_to_receives_the_client_filename() {
    let dir = std::env::temp_dir().join(format!("micro-form-uploads-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();

    let requested = Arc::new(Mutex::new(Vec::<String>::new()));
    let config = {
        let dir = dir.clone();
        let requested = Arc::clone(&requested);
        FormConfig::new().upload_to(move |filename| {
            requested.lock().unwrap().push(filename.to_owned());
            OpenOptions::new().read(true).write(true).create(true).truncate(true).open(dir.join(filename))
        })
    };

    let content = csv(50);
    let mut form = read_request_form(request(&content), &config).await.unwrap();
    assert_eq!(*requested.lock().unwrap(), ["report.csv"]);

    let report = form.get_file_mut("report").unwrap();
    assert!(report.is_spilled());
    // caller owned files are never removed by the parser
    assert!(report.temp_path().is_none());
    assert_eq!(report.read_all().unwrap(), content);

    drop(form);
    let stored: PathBuf = dir.join("report.csv");
    assert_eq!(fs::read(&stored).unwrap(), content);
    fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_upload_to_failure_is_reported() {
    let config = FormConfig::new().upload_to(|_| Err(std::io::Error::other("disk full")));

    let err = read_request_form(request(b"a,b"), &config).await.unwrap_err();
    assert!(matches!(err, FormError::Io { .. }));
    assert!(!err.is_invalid_encoding());
}
