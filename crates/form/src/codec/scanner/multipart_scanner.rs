//! Streaming scanner for `multipart/form-data` bodies.
//!
//! The scanner walks the body byte by byte through the part header states and
//! switches to a Boyer-Moore-Horspool style skip search inside part bodies, so
//! large uploads are not inspected at every byte.
//!
//! Bytes that look like the start of a delimiter are held back in a small
//! lookbehind buffer until the delimiter is either confirmed or refuted. A
//! refuted candidate is replayed as part data, and scanning resumes right after
//! the candidate's first byte so overlapping candidates are still found. The
//! lookbehind survives across [`MultipartScanner::write`] calls, which makes the
//! output independent of how the body is chunked.

use memchr::memchr;
use tracing::trace;

use crate::codec::scanner::limit::SizeLimit;
use crate::codec::sink::{FormSink, dispatch};
use crate::protocol::{Event, FormError};
use crate::utils::ensure;
use MultipartState::*;

const CR: u8 = b'\r';
const LF: u8 = b'\n';
const HYPHEN: u8 = b'-';
const COLON: u8 = b':';
const SPACE: u8 = b' ';
const HTAB: u8 = b'\t';

/// Longest boundary token allowed by RFC 2046
pub const MAX_BOUNDARY_LEN: usize = 70;

/// Room in the lookbehind buffer beyond the boundary token itself, enough for
/// the `CRLF--` prefix and the `--` or CRLF suffix.
const LOOKBEHIND_SLACK: usize = 8;

/// Set when a full delimiter was followed by CR
const SEEN_PART_BOUNDARY_CR: u8 = 1;
/// Set when a full delimiter was followed by a hyphen
const SEEN_LAST_BOUNDARY_HYPHEN: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MultipartState {
    /// Skip CR and LF before the first boundary
    Start,
    /// Match `--boundary` and the CRLF after it
    StartBoundary,
    /// Either the first byte of a header name or the CR of the blank line
    HeaderFieldStart,
    /// Inside a header name, up to the colon
    HeaderField,
    /// Skip whitespace after the colon
    HeaderValueStart,
    /// Inside a header value, up to CR
    HeaderValue,
    /// Expect LF after a header value
    HeaderValueAlmostDone,
    /// Expect LF of the blank line ending the headers
    HeadersAlmostDone,
    /// First byte of the part body
    PartDataStart,
    /// Inside the part body, searching for the delimiter
    PartData,
    /// A full delimiter was matched, check what follows it
    PartDataEnd,
    /// The closing delimiter was seen, the epilogue is ignored
    End,
}

/// Incremental `multipart/form-data` scanner.
///
/// Feed the body with [`write`](Self::write) in as many chunks as it arrives
/// in, then call [`finalize`](Self::finalize) once. Every parsing fact is
/// reported to the given [`FormSink`].
#[derive(Debug)]
pub struct MultipartScanner {
    state: MultipartState,
    /// `CRLF--` followed by the boundary token
    boundary: Vec<u8>,
    /// Membership table of the bytes occurring in `boundary`
    boundary_chars: [bool; 256],
    /// Number of delimiter bytes matched so far, always equal to `lookbehind.len()`
    /// while in `PartData` or `PartDataEnd`
    index: usize,
    flags: u8,
    lookbehind: Vec<u8>,

    header_field_pos: Option<usize>,
    header_value_pos: Option<usize>,
    part_data_pos: Option<usize>,

    limit: SizeLimit,
}

impl MultipartScanner {
    /// Creates a scanner for parts delimited by `boundary`.
    ///
    /// The boundary must be between 1 and 70 bytes long.
    pub fn new(boundary: &[u8], max_size: usize) -> Result<Self, FormError> {
        ensure!(!boundary.is_empty(), FormError::malformed_boundary("boundary is empty"));
        ensure!(
            boundary.len() <= MAX_BOUNDARY_LEN,
            FormError::malformed_boundary(format!(
                "boundary is {} bytes long, at most {MAX_BOUNDARY_LEN} are allowed",
                boundary.len()
            ))
        );

        let mut delimiter = Vec::with_capacity(boundary.len() + 4);
        delimiter.extend_from_slice(b"\r\n--");
        delimiter.extend_from_slice(boundary);

        let mut boundary_chars = [false; 256];
        for &b in &delimiter {
            boundary_chars[usize::from(b)] = true;
        }

        Ok(Self {
            state: Start,
            boundary: delimiter,
            boundary_chars,
            index: 0,
            flags: 0,
            lookbehind: Vec::with_capacity(boundary.len() + LOOKBEHIND_SLACK),
            header_field_pos: None,
            header_value_pos: None,
            part_data_pos: None,
            limit: SizeLimit::new(max_size),
        })
    }

    /// Whether `max_size` clipped any of the written input
    pub fn is_truncated(&self) -> bool {
        self.limit.is_truncated()
    }

    /// Scans one chunk of the body.
    ///
    /// Data events borrow from `data` or from the lookbehind buffer. Any
    /// header name, header value or part body still open when the chunk ends
    /// is reported up to the end of the chunk and continues with the next one.
    pub fn write<S: FormSink + ?Sized>(&mut self, data: &[u8], sink: &mut S) -> Result<(), FormError> {
        let len = self.limit.admit(data.len());
        let data = &data[..len];
        trace!(len, state = ?self.state, index = self.index, "scanning multipart chunk");

        let blen = self.boundary.len();
        let mut i = 0;

        while i < len {
            let b = data[i];

            match self.state {
                Start => {
                    if b != CR && b != LF {
                        self.index = 0;
                        self.state = StartBoundary;
                        continue;
                    }
                }

                StartBoundary => {
                    // `--boundary` without the leading CRLF of the delimiter
                    let token_end = blen - 2;
                    if self.index < token_end {
                        ensure!(
                            b == self.boundary[self.index + 2],
                            FormError::malformed_boundary(format!("unexpected byte {b:#04x} in the first boundary"))
                        );
                        self.index += 1;
                    } else if self.index == token_end {
                        match b {
                            CR => self.flags |= SEEN_PART_BOUNDARY_CR,
                            HYPHEN => self.flags |= SEEN_LAST_BOUNDARY_HYPHEN,
                            _ => return Err(FormError::malformed_boundary("expected CR after the first boundary")),
                        }
                        self.index += 1;
                    } else if self.flags & SEEN_PART_BOUNDARY_CR != 0 {
                        ensure!(b == LF, FormError::malformed_boundary("expected LF after the first boundary"));
                        self.reset_match();
                        self.state = HeaderFieldStart;
                        dispatch(sink, Event::PartBegin)?;
                    } else {
                        // a closing delimiter right away, the form has no parts
                        ensure!(b == HYPHEN, FormError::malformed_boundary("expected '--' after the closing boundary"));
                        self.reset_match();
                        self.state = End;
                        dispatch(sink, Event::End)?;
                    }
                }

                HeaderFieldStart => {
                    if b == CR {
                        self.state = HeadersAlmostDone;
                    } else {
                        self.header_field_pos = Some(i);
                        self.index = 0;
                        self.state = HeaderField;
                        continue;
                    }
                }

                HeaderField => match b {
                    COLON => {
                        ensure!(self.index > 0, FormError::malformed_header("empty header name"));
                        let start = take_pos(&mut self.header_field_pos)?;
                        dispatch(sink, Event::HeaderField(&data[start..i]))?;
                        self.state = HeaderValueStart;
                    }
                    CR | LF => return Err(FormError::malformed_header("header line without a colon")),
                    _ => self.index += 1,
                },

                HeaderValueStart => {
                    if b != SPACE && b != HTAB {
                        self.header_value_pos = Some(i);
                        self.state = HeaderValue;
                        continue;
                    }
                }

                HeaderValue => match memchr(CR, &data[i..]) {
                    Some(offset) => {
                        i += offset;
                        let start = take_pos(&mut self.header_value_pos)?;
                        dispatch(sink, Event::HeaderValue(&data[start..i]))?;
                        dispatch(sink, Event::HeaderEnd)?;
                        self.state = HeaderValueAlmostDone;
                    }
                    None => {
                        i = len;
                        continue;
                    }
                },

                HeaderValueAlmostDone => {
                    ensure!(b == LF, FormError::malformed_header("expected LF after header value"));
                    self.state = HeaderFieldStart;
                }

                HeadersAlmostDone => {
                    ensure!(b == LF, FormError::malformed_header("expected LF after the part headers"));
                    self.state = PartDataStart;
                    dispatch(sink, Event::HeadersFinished)?;
                }

                PartDataStart => {
                    self.part_data_pos = Some(i);
                    self.reset_match();
                    self.state = PartData;
                    continue;
                }

                PartData if self.index == 0 => {
                    // skip forward while the last byte of the window cannot be
                    // part of a delimiter
                    let mut last = i + blen - 1;
                    while last < len && !self.boundary_chars[usize::from(data[last])] {
                        last += blen;
                    }
                    i = last + 1 - blen;
                    if i >= len {
                        break;
                    }

                    if data[i] == self.boundary[0] {
                        if let Some(start) = self.part_data_pos.take() {
                            dispatch(sink, Event::PartData(&data[start..i]))?;
                        }
                        self.lookbehind.push(data[i]);
                        self.index = 1;
                    }
                }

                PartData => {
                    if b != self.boundary[self.index] {
                        self.uncommit(i, sink)?;
                        continue;
                    }

                    self.lookbehind.push(b);
                    self.index += 1;
                    if self.index == blen {
                        self.state = PartDataEnd;
                    }
                }

                PartDataEnd if self.index == blen => {
                    match b {
                        CR => self.flags |= SEEN_PART_BOUNDARY_CR,
                        HYPHEN => self.flags |= SEEN_LAST_BOUNDARY_HYPHEN,
                        _ => {
                            self.uncommit(i, sink)?;
                            continue;
                        }
                    }
                    self.lookbehind.push(b);
                    self.index += 1;
                }

                PartDataEnd => {
                    if self.flags & SEEN_PART_BOUNDARY_CR != 0 && b == LF {
                        trace!("found part boundary");
                        self.reset_match();
                        self.state = HeaderFieldStart;
                        dispatch(sink, Event::PartEnd)?;
                        dispatch(sink, Event::PartBegin)?;
                    } else if self.flags & SEEN_LAST_BOUNDARY_HYPHEN != 0 && b == HYPHEN {
                        trace!("found closing boundary");
                        self.reset_match();
                        self.state = End;
                        dispatch(sink, Event::PartEnd)?;
                        dispatch(sink, Event::End)?;
                    } else {
                        self.uncommit(i, sink)?;
                        continue;
                    }
                }

                End => break,
            }

            i += 1;
        }

        if let Some(start) = self.header_field_pos.take() {
            dispatch(sink, Event::HeaderField(&data[start..]))?;
            self.header_field_pos = Some(0);
        }
        if let Some(start) = self.header_value_pos.take() {
            dispatch(sink, Event::HeaderValue(&data[start..]))?;
            self.header_value_pos = Some(0);
        }
        if let Some(start) = self.part_data_pos.take() {
            dispatch(sink, Event::PartData(&data[start..]))?;
            self.part_data_pos = Some(0);
        }

        Ok(())
    }

    /// Finishes the scan, consuming the scanner.
    ///
    /// A body must end after its closing delimiter, or be empty. A body cut
    /// short by `max_size` is closed gracefully instead: a part in its body is
    /// completed with whatever was received, a part still in its headers is
    /// dropped.
    pub fn finalize<S: FormSink + ?Sized>(mut self, sink: &mut S) -> Result<(), FormError> {
        trace!(state = ?self.state, truncated = self.is_truncated(), "finalizing multipart scanner");

        match self.state {
            End => Ok(()),
            Start => dispatch(sink, Event::End),
            PartDataStart | PartData | PartDataEnd if self.is_truncated() => {
                let pending = std::mem::take(&mut self.lookbehind);
                dispatch(sink, Event::PartData(&pending))?;
                dispatch(sink, Event::PartEnd)?;
                dispatch(sink, Event::End)
            }
            // clipped inside the headers: the part never opened in the sink, so
            // it gets no PartEnd
            _ if self.is_truncated() => dispatch(sink, Event::End),
            _ => Err(FormError::malformed_boundary("body ended before the closing boundary")),
        }
    }

    /// Replays a refuted delimiter candidate as part data.
    ///
    /// The longest suffix of the lookbehind that is still a delimiter prefix
    /// stays buffered as the new candidate, which is the same as restarting
    /// the search one byte after the candidate start. The byte at `pos` is not
    /// consumed and must be scanned again by the caller.
    fn uncommit<S: FormSink + ?Sized>(&mut self, pos: usize, sink: &mut S) -> Result<(), FormError> {
        let keep = (1..self.lookbehind.len())
            .map(|skip| &self.lookbehind[skip..])
            .find(|suffix| self.boundary.starts_with(suffix))
            .map_or(0, <[u8]>::len);
        let flush = self.lookbehind.len() - keep;

        trace!(flush, keep, "boundary candidate refuted");
        dispatch(sink, Event::PartData(&self.lookbehind[..flush]))?;
        self.lookbehind.drain(..flush);

        self.index = keep;
        self.flags = 0;
        self.state = if keep == self.boundary.len() { PartDataEnd } else { PartData };
        if keep == 0 {
            self.part_data_pos = Some(pos);
        }
        Ok(())
    }

    fn reset_match(&mut self) {
        self.index = 0;
        self.flags = 0;
        self.lookbehind.clear();
    }
}

/// Takes an accumulation start that the current state guarantees to be set.
fn take_pos(pos: &mut Option<usize>) -> Result<usize, FormError> {
    pos.take().ok_or_else(|| FormError::unknown_state("lost the start of a header fragment"))
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use mockall::Sequence;

    use super::*;
    use crate::codec::sink::{EventLog, MockFormSink};

    /// Turns an `indoc!` body into a wire body with CRLF line endings.
    fn crlf(body: &str) -> Vec<u8> {
        body.replace('\n', "\r\n").into_bytes()
    }

    fn two_part_body() -> Vec<u8> {
        crlf(indoc! {r#"
        --X
        Content-Disposition: form-data; name="name"

        value
        --X
        Content-Disposition: form-data; name="file"; filename="x.txt"
        Content-Type: text/plain

        hello
        --X--"#})
    }

    fn two_part_events() -> Vec<String> {
        [
            "part_begin",
            "header_field:Content-Disposition",
            r#"header_value:form-data; name="name""#,
            "header_end",
            "headers_finished",
            "part_data:value",
            "part_end",
            "part_begin",
            "header_field:Content-Disposition",
            r#"header_value:form-data; name="file"; filename="x.txt""#,
            "header_end",
            "header_field:Content-Type",
            "header_value:text/plain",
            "header_end",
            "headers_finished",
            "part_data:hello",
            "part_end",
            "end",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    fn scan_chunks(boundary: &str, chunks: &[&[u8]], max_size: usize) -> Result<Vec<String>, FormError> {
        let mut scanner = MultipartScanner::new(boundary.as_bytes(), max_size)?;
        let mut log = EventLog::default();
        for chunk in chunks {
            scanner.write(chunk, &mut log)?;
        }
        scanner.finalize(&mut log)?;
        Ok(log.rendered())
    }

    fn scan(boundary: &str, body: &[u8]) -> Result<Vec<String>, FormError> {
        scan_chunks(boundary, &[body], 0)
    }

    /// Body of a single text part named `f` carrying `content`
    fn single_part(content: &[u8]) -> Vec<u8> {
        let mut body = b"--boundary\r\nContent-Disposition: form-data; name=\"f\"\r\n\r\n".to_vec();
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n--boundary--\r\n");
        body
    }

    fn part_data(events: &[String]) -> Vec<&str> {
        events.iter().filter_map(|e| e.strip_prefix("part_data:")).collect()
    }

    #[test]
    fn test_whole_body() {
        assert_eq!(scan("X", &two_part_body()).unwrap(), two_part_events());
    }

    #[test]
    fn test_byte_at_a_time() {
        let body = two_part_body();
        let chunks: Vec<&[u8]> = body.chunks(1).collect();
        assert_eq!(scan_chunks("X", &chunks, 0).unwrap(), two_part_events());
    }

    #[test]
    fn test_every_split_point() {
        let body = two_part_body();
        for split in 0..=body.len() {
            let (head, tail) = body.split_at(split);
            assert_eq!(scan_chunks("X", &[head, tail], 0).unwrap(), two_part_events(), "split at {split}");
        }
    }

    #[test]
    fn test_delimiter_split_across_writes() {
        let content = "a".repeat(300);
        let body = single_part(content.as_bytes());
        let delimiter_start = body.len() - b"\r\n--boundary--\r\n".len();

        for split in delimiter_start..body.len() {
            let (head, tail) = body.split_at(split);
            let events = scan_chunks("boundary", &[head, tail], 0).unwrap();
            assert_eq!(part_data(&events), [content.as_str()], "split at {split}");
            assert_eq!(events.last().map(String::as_str), Some("end"));
        }
    }

    #[test]
    fn test_preamble_newlines_and_epilogue() {
        let mut body = b"\r\n\r\n".to_vec();
        body.extend_from_slice(&single_part(b"v"));
        body.extend_from_slice(b"this epilogue is ignored\r\n--boundary\r\n");

        let events = scan("boundary", &body).unwrap();
        assert_eq!(part_data(&events), ["v"]);
        assert_eq!(events.iter().filter(|e| *e == "end").count(), 1);
    }

    #[test]
    fn test_empty_part() {
        let events = scan("boundary", &single_part(b"")).unwrap();
        assert_eq!(
            events,
            [
                "part_begin",
                "header_field:Content-Disposition",
                r#"header_value:form-data; name="f""#,
                "header_end",
                "headers_finished",
                "part_end",
                "end",
            ]
        );
    }

    #[test]
    fn test_near_miss_delimiters_are_data() {
        let contents: [&[u8]; 7] = [
            b"\r\n--boundar",
            b"line\r\n--boundaryX",
            b"\r\n--boundary-x",
            b"\r\n--boundary\rx",
            b"\r\r\n\r\n-",
            b"\r\n--bound\r\n--boundar\r",
            b"tail\r\n--boundary\r",
        ];

        for content in contents {
            let body = single_part(content);
            for split in 0..=body.len() {
                let (head, tail) = body.split_at(split);
                let events = scan_chunks("boundary", &[head, tail], 0).unwrap();
                assert_eq!(part_data(&events).concat().as_bytes(), content, "content {content:?}, split at {split}");
            }
        }
    }

    #[test]
    fn test_overlapping_candidate_after_refuted_match() {
        // the first candidate fails on the second CR, which itself starts the real delimiter
        let body = b"--ab\r\nContent-Disposition: form-data; name=\"f\"\r\n\r\nx\r\n-\r\n--ab--".to_vec();
        let events = scan("ab", &body).unwrap();
        assert_eq!(part_data(&events), ["x\r\n-"]);
        assert_eq!(events.last().map(String::as_str), Some("end"));
    }

    #[test]
    fn test_binary_payload_with_boundary_bytes() {
        let content: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        let body = single_part(&content);
        let chunks: Vec<&[u8]> = body.chunks(7).collect();

        let mut scanner = MultipartScanner::new(b"boundary", 0).unwrap();
        let mut log = EventLog::default();
        for chunk in chunks {
            scanner.write(chunk, &mut log).unwrap();
        }
        scanner.finalize(&mut log).unwrap();

        let data: Vec<u8> = log.events.iter().filter(|(kind, _)| *kind == "part_data").flat_map(|(_, d)| d.clone()).collect();
        assert_eq!(data, content);
    }

    #[test]
    fn test_closing_delimiter_without_parts() {
        assert_eq!(scan("X", b"--X--\r\n").unwrap(), ["end"]);
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(scan("X", b"").unwrap(), ["end"]);
        assert_eq!(scan("X", b"\r\n").unwrap(), ["end"]);
    }

    #[test]
    fn test_header_value_whitespace() {
        let body = crlf("--X\nA:\t  spaced \n\n\n--X--");
        let events = scan("X", &body).unwrap();
        assert_eq!(&events[1..4], ["header_field:A", "header_value:spaced ", "header_end"]);
    }

    #[test]
    fn test_empty_header_value() {
        let body = crlf("--X\nA:\n\n\n--X--");
        let events = scan("X", &body).unwrap();
        assert_eq!(&events[1..3], ["header_field:A", "header_end"]);
    }

    #[test]
    fn test_invalid_boundaries() {
        assert!(matches!(MultipartScanner::new(b"", 0), Err(FormError::MalformedBoundary { .. })));
        assert!(matches!(MultipartScanner::new(&[b'a'; 71], 0), Err(FormError::MalformedBoundary { .. })));
        assert!(MultipartScanner::new(&[b'a'; 70], 0).is_ok());
    }

    #[test]
    fn test_malformed_first_boundary() {
        assert!(matches!(scan("X", b"garbage"), Err(FormError::MalformedBoundary { .. })));
        assert!(matches!(scan("X", b"--X\rz"), Err(FormError::MalformedBoundary { .. })));
        assert!(matches!(scan("X", b"--Xz"), Err(FormError::MalformedBoundary { .. })));
        assert!(matches!(scan("X", b"--X-z"), Err(FormError::MalformedBoundary { .. })));
    }

    #[test]
    fn test_malformed_headers() {
        let cases: [&[u8]; 4] = [b"--X\r\n: empty\r\n", b"--X\r\nNo colon\r\n", b"--X\r\nA: b\rz", b"--X\r\nA: b\r\n\rz"];
        for body in cases {
            assert!(matches!(scan("X", body), Err(FormError::MalformedHeader { .. })), "body {body:?}");
        }
    }

    #[test]
    fn test_missing_closing_boundary() {
        let body = crlf("--X\nA: b\n\ndata");
        assert!(matches!(scan("X", &body), Err(FormError::MalformedBoundary { .. })));
    }

    #[test]
    fn test_max_size_closes_open_part() {
        let body = single_part(b"0123456789");
        let cut = body.len() - b"56789\r\n--boundary--\r\n".len();

        let mut scanner = MultipartScanner::new(b"boundary", cut).unwrap();
        let mut log = EventLog::default();
        scanner.write(&body, &mut log).unwrap();
        assert!(scanner.is_truncated());
        scanner.finalize(&mut log).unwrap();

        let events = log.rendered();
        assert_eq!(part_data(&events), ["01234"]);
        assert_eq!(&events[events.len() - 2..], ["part_end", "end"]);
    }

    #[test]
    fn test_max_size_flushes_pending_candidate() {
        let body = single_part(b"ab\r\n-cd");
        let cut = body.len() - b"cd\r\n--boundary--\r\n".len();
        let events = scan_chunks("boundary", &[body.as_slice()], cut).unwrap();
        assert_eq!(part_data(&events), ["ab\r\n-"]);
    }

    #[test]
    fn test_max_size_inside_headers_drops_part() {
        let body = single_part(b"value");
        let events = scan_chunks("boundary", &[&body[..20], &body[20..]], 20).unwrap();
        assert_eq!(events, ["part_begin", "header_field:Content-", "end"]);
    }

    #[test]
    fn test_event_sequence() {
        let mut sink = MockFormSink::new();
        let mut seq = Sequence::new();

        sink.expect_on_part_begin().times(1).in_sequence(&mut seq).returning(|| Ok(()));
        sink.expect_on_header_field().withf(|data| data == b"N").times(1).in_sequence(&mut seq).returning(|_| Ok(()));
        sink.expect_on_header_value().withf(|data| data == b"v").times(1).in_sequence(&mut seq).returning(|_| Ok(()));
        sink.expect_on_header_end().times(1).in_sequence(&mut seq).returning(|| Ok(()));
        sink.expect_on_headers_finished().times(1).in_sequence(&mut seq).returning(|| Ok(()));
        sink.expect_on_part_data().withf(|data| data == b"body").times(1).in_sequence(&mut seq).returning(|_| Ok(()));
        sink.expect_on_part_end().times(1).in_sequence(&mut seq).returning(|| Ok(()));
        sink.expect_on_end().times(1).in_sequence(&mut seq).returning(|| Ok(()));

        let mut scanner = MultipartScanner::new(b"X", 0).unwrap();
        scanner.write(b"--X\r\nN: v\r\n\r\nbody\r\n--X--\r\n", &mut sink).unwrap();
        scanner.finalize(&mut sink).unwrap();
    }

    #[test]
    fn test_sink_error_aborts_scan() {
        let mut sink = MockFormSink::new();
        sink.expect_on_part_begin().returning(|| Ok(()));
        sink.expect_on_header_field().returning(|_| Ok(()));
        sink.expect_on_header_value().returning(|_| Ok(()));
        sink.expect_on_header_end().returning(|| Ok(()));
        sink.expect_on_headers_finished().returning(|| Err(FormError::malformed_header("no name")));

        let mut scanner = MultipartScanner::new(b"X", 0).unwrap();
        let result = scanner.write(b"--X\r\nN: v\r\n\r\nbody", &mut sink);
        assert!(matches!(result, Err(FormError::MalformedHeader { .. })));
    }
}
