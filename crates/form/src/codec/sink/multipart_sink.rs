use std::collections::HashMap;
use std::io::{Seek, Write};

use tracing::{debug, trace};

use crate::codec::sink::header_params::parse_options_header;
use crate::codec::sink::{Charset, FormSink};
use crate::config::{FormConfig, UploadTo};
use crate::protocol::{FormData, FormError, UploadFile};

const DEFAULT_FILE_CONTENT_TYPE: &str = "application/octet-stream";

/// Assembles `multipart/form-data` parts into form entries.
///
/// Parts without a `filename` in their `Content-Disposition` are buffered and
/// decoded as text. Parts with one are streamed into an [`UploadFile`], either
/// one produced by the configured `upload_to` factory or an in-memory buffer
/// that spills to disk past the file memory limit.
pub struct MultipartSink {
    charset: Charset,
    upload_to: Option<UploadTo>,
    file_memory_limit: usize,

    header_name: Vec<u8>,
    header_value: Vec<u8>,
    /// Headers of the current part, keyed by lower-cased name
    headers: HashMap<String, Vec<u8>>,
    part: Option<OpenPart>,

    form: FormData,
}

/// The part whose body is currently being received.
struct OpenPart {
    name: String,
    body: PartBody,
}

enum PartBody {
    Text(Vec<u8>),
    File(UploadFile),
}

impl MultipartSink {
    pub fn new(charset: Charset, config: &FormConfig) -> Self {
        Self {
            charset,
            upload_to: config.get_upload_to().cloned(),
            file_memory_limit: config.get_file_memory_limit(),
            header_name: Vec::new(),
            header_value: Vec::new(),
            headers: HashMap::new(),
            part: None,
            form: FormData::new(),
        }
    }

    /// Returns the parts completed so far; a part that never saw its closing
    /// boundary is not included.
    pub fn into_form(self) -> FormData {
        self.form
    }

    fn header_text(&self, name: &str) -> Result<Option<String>, FormError> {
        self.headers.get(name).map(|value| self.charset.decode(value.clone())).transpose()
    }

    fn open_file(&self, filename: &str, content_type: String) -> Result<UploadFile, FormError> {
        match &self.upload_to {
            Some(upload_to) => {
                debug!(filename, "opening upload destination");
                let file = upload_to(filename)?;
                Ok(UploadFile::with_file(file, filename, content_type))
            }
            None => Ok(UploadFile::in_memory(filename, content_type, self.file_memory_limit)),
        }
    }
}

impl std::fmt::Debug for MultipartSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultipartSink")
            .field("charset", &self.charset)
            .field("file_memory_limit", &self.file_memory_limit)
            .field("open_part", &self.part.as_ref().map(|part| part.name.as_str()))
            .field("form", &self.form)
            .finish_non_exhaustive()
    }
}

impl FormSink for MultipartSink {
    fn on_part_begin(&mut self) -> Result<(), FormError> {
        self.headers.clear();
        self.header_name.clear();
        self.header_value.clear();
        self.part = None;
        Ok(())
    }

    fn on_header_field(&mut self, data: &[u8]) -> Result<(), FormError> {
        self.header_name.extend_from_slice(data);
        Ok(())
    }

    fn on_header_value(&mut self, data: &[u8]) -> Result<(), FormError> {
        self.header_value.extend_from_slice(data);
        Ok(())
    }

    fn on_header_end(&mut self) -> Result<(), FormError> {
        let name = String::from_utf8_lossy(&self.header_name).to_ascii_lowercase();
        self.headers.insert(name, std::mem::take(&mut self.header_value));
        self.header_name.clear();
        Ok(())
    }

    fn on_headers_finished(&mut self) -> Result<(), FormError> {
        let disposition = self
            .header_text("content-disposition")?
            .ok_or_else(|| FormError::malformed_header("part without Content-Disposition header"))?;

        let params = parse_options_header(&disposition);
        let name = params
            .get("name")
            .ok_or_else(|| FormError::malformed_header("Content-Disposition without a name parameter"))?
            .to_owned();

        let body = match params.get("filename") {
            Some(filename) => {
                let content_type =
                    self.header_text("content-type")?.unwrap_or_else(|| DEFAULT_FILE_CONTENT_TYPE.to_owned());
                trace!(name = %name, filename, content_type = %content_type, "file part started");
                PartBody::File(self.open_file(filename, content_type)?)
            }
            None => {
                trace!(name = %name, "text part started");
                PartBody::Text(Vec::new())
            }
        };

        self.part = Some(OpenPart { name, body });
        Ok(())
    }

    fn on_part_data(&mut self, data: &[u8]) -> Result<(), FormError> {
        let part = self.part.as_mut().ok_or_else(|| FormError::unknown_state("part data outside of a part"))?;
        match &mut part.body {
            PartBody::Text(buf) => buf.extend_from_slice(data),
            PartBody::File(file) => file.write_all(data)?,
        }
        Ok(())
    }

    fn on_part_end(&mut self) -> Result<(), FormError> {
        let OpenPart { name, body } =
            self.part.take().ok_or_else(|| FormError::unknown_state("part end without an open part"))?;

        match body {
            PartBody::Text(buf) => {
                let value = self.charset.decode(buf)?;
                self.form.append(name, value);
            }
            PartBody::File(mut file) => {
                file.flush()?;
                file.rewind()?;
                self.form.append(name, file);
            }
        }

        self.headers.clear();
        Ok(())
    }
}
