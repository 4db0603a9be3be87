//! Form bodies shared by the benchmarks.
//!
//! Bodies are generated rather than read from fixtures so that the size of a
//! case can be tuned in one place.

#[derive(Debug, Clone)]
pub struct TestCase {
    name: &'static str,
    group: TestGroup,
    body: TestBody,
}

impl TestCase {
    pub fn new(name: &'static str, group: TestGroup, body: TestBody) -> Self {
        Self { name, group, body }
    }

    pub fn small(name: &'static str, body: TestBody) -> Self {
        Self::new(name, TestGroup::Small, body)
    }

    pub fn normal(name: &'static str, body: TestBody) -> Self {
        Self::new(name, TestGroup::Normal, body)
    }

    pub fn large(name: &'static str, body: TestBody) -> Self {
        Self::new(name, TestGroup::Large, body)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn group(&self) -> TestGroup {
        self.group
    }

    pub fn body(&self) -> &TestBody {
        &self.body
    }
}

#[derive(Debug, Clone)]
pub struct TestBody {
    content_type: &'static str,
    content: Vec<u8>,
}

pub const BOUNDARY: &str = "----BencherFormBoundary7MA4YWxkTrZu0gW";
const MULTIPART_CONTENT_TYPE: &str = "multipart/form-data; boundary=----BencherFormBoundary7MA4YWxkTrZu0gW";

impl TestBody {
    pub fn new(content_type: &'static str, content: Vec<u8>) -> Self {
        Self { content_type, content }
    }

    /// `fields` urlencoded pairs, each value at least `value_len` bytes long
    /// with some escapes mixed in.
    pub fn urlencoded(fields: usize, value_len: usize) -> Self {
        const UNIT: &str = "ab%20c+d";
        let value = UNIT.repeat(value_len.div_ceil(UNIT.len()));
        let body = (0..fields).map(|i| format!("field{i}={value}")).collect::<Vec<_>>().join("&");
        Self::new("application/x-www-form-urlencoded", body.into_bytes())
    }

    /// A multipart body with `fields` short text parts and one file part of
    /// `file_len` bytes.
    ///
    /// The file content is sprinkled with CR, LF and hyphens so the delimiter
    /// search keeps hitting candidates that turn out to be data.
    pub fn multipart(fields: usize, file_len: usize) -> Self {
        let mut body = Vec::with_capacity(file_len + fields * 128);

        for i in 0..fields {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            body.extend_from_slice(format!("Content-Disposition: form-data; name=\"field{i}\"\r\n\r\n").as_bytes());
            body.extend_from_slice(format!("value of field {i}\r\n").as_bytes());
        }

        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"upload\"; filename=\"data.bin\"\r\n");
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend(b"lorem ipsum dolor sit amet\r\n--".iter().copied().cycle().take(file_len));
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Self::new(MULTIPART_CONTENT_TYPE, body)
    }

    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

#[derive(Clone, Copy, Debug)]
pub enum TestGroup {
    Small,
    Normal,
    Large,
}
