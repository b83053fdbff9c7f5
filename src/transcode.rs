//! Percent-decoding and percent-encoding of URI text.
//!
//! Two directions are supported:
//!
//! - [`decode_uri_component`] / [`encode_uri_component`] work on a single
//!   component and transcode every character that needs it.
//! - [`decode_uri`] / [`encode_uri`] work on a whole URI and leave the
//!   [RFC 3986 reserved characters] alone, converting between the
//!   percent-encoded wire form and the [RFC 3987] Unicode display form.
//!
//! Every operation comes in three output shapes that produce identical text:
//! a returned [`Cow`], appending to a `String`, and appending to any
//! [`fmt::Write`] sink through an optional [`Encoder`].
//!
//! Percent-encoded octets are interpreted as [`ENCODING`](crate::ENCODING).
//!
//! [RFC 3986 reserved characters]: https://datatracker.ietf.org/doc/html/rfc3986#section-2.2
//! [RFC 3987]: https://datatracker.ietf.org/doc/html/rfc3987

use std::borrow::Cow;
use std::convert::Infallible;
use std::fmt;
use std::str;

use crate::error::UriError;
use crate::rfc3986::{self, RESERVED};

/// A transform applied to every unit of output before it reaches the sink.
///
/// Literal characters and substituted escapes both pass through the encoder,
/// so the sink only ever sees encoded text.
pub trait Encoder {
    /// Appends `s` to `out` in encoded form.
    ///
    /// # Errors
    ///
    /// Returns `fmt::Error` if the sink rejects the write.
    fn append_str(&self, s: &str, out: &mut dyn fmt::Write) -> fmt::Result;

    /// Appends a single character to `out` in encoded form.
    ///
    /// # Errors
    ///
    /// Returns `fmt::Error` if the sink rejects the write.
    fn append_char(&self, c: char, out: &mut dyn fmt::Write) -> fmt::Result {
        self.append_str(c.encode_utf8(&mut [0; 4]), out)
    }
}

/// Output sink with an optional encoder in front of it.
struct Sink<'a> {
    out: &'a mut dyn fmt::Write,
    encoder: Option<&'a dyn Encoder>,
    // Holds the escapes of one character while encoding.
    scratch: String,
}

impl<'a> Sink<'a> {
    fn new(out: &'a mut dyn fmt::Write, encoder: Option<&'a dyn Encoder>) -> Self {
        Self {
            out,
            encoder,
            scratch: String::new(),
        }
    }

    fn push_str(&mut self, s: &str) -> fmt::Result {
        if s.is_empty() {
            return Ok(());
        }
        match self.encoder {
            Some(encoder) => encoder.append_str(s, self.out),
            None => self.out.write_str(s),
        }
    }

    fn push_char(&mut self, c: char) -> fmt::Result {
        match self.encoder {
            Some(encoder) => encoder.append_char(c, self.out),
            None => self.out.write_char(c),
        }
    }

    /// Emits the UTF-8 bytes of `c` as one unit of `%XX` escapes.
    fn push_escaped(&mut self, c: char) -> fmt::Result {
        let mut scratch = std::mem::take(&mut self.scratch);
        scratch.clear();
        push_escapes(&mut scratch, c);
        let result = self.push_str(&scratch);
        self.scratch = scratch;
        result
    }
}

/// Appends the UTF-8 bytes of `c` to `out` as `%XX` escapes.
fn push_escapes(out: &mut String, c: char) {
    for &x in c.encode_utf8(&mut [0; 4]).as_bytes() {
        let [hi, lo] = rfc3986::hex_pair(x);
        out.push('%');
        out.push(hi);
        out.push(lo);
    }
}

/// Runs `f` against a `String`, leaving it untouched if `f` fails.
fn append_or_rollback(
    out: &mut String,
    f: impl FnOnce(&mut String) -> Result<(), UriError>,
) -> Result<(), UriError> {
    let start = out.len();
    let result = f(out);
    if result.is_err() {
        out.truncate(start);
    }
    result
}

/// Decodes one run of text that contains no literal reserved characters.
///
/// `offset` is the position of `s` within the whole input, used for error
/// indexes. With `keep_reserved`, an escape that decodes to a reserved
/// character or `%` is emitted unchanged so it cannot be mistaken for a
/// delimiter.
fn decode_segment(
    s: &str,
    offset: usize,
    keep_reserved: bool,
    sink: &mut Sink<'_>,
    octets: &mut Vec<u8>,
) -> Result<(), UriError> {
    let bytes = s.as_bytes();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }
        sink.push_str(&s[literal_start..i])?;

        octets.clear();
        let mut run_start = i;
        while i < bytes.len() && bytes[i] == b'%' {
            let octet = match (bytes.get(i + 1), bytes.get(i + 2)) {
                (Some(&hi), Some(&lo)) => rfc3986::decode_octet(hi, lo),
                _ => None,
            }
            .ok_or(UriError::InvalidPercentEncoding { index: offset + i })?;

            if keep_reserved && (octet == b'%' || RESERVED.allows_ascii(octet)) {
                flush_octets(octets, offset + run_start, sink)?;
                // The escape is '%' and two hex digits, all ASCII.
                sink.push_str(&s[i..i + 3])?;
                run_start = i + 3;
            } else {
                octets.push(octet);
            }
            i += 3;
        }
        flush_octets(octets, offset + run_start, sink)?;
        literal_start = i;
    }

    sink.push_str(&s[literal_start..])?;
    Ok(())
}

fn flush_octets(octets: &mut Vec<u8>, index: usize, sink: &mut Sink<'_>) -> Result<(), UriError> {
    if octets.is_empty() {
        return Ok(());
    }
    let text = str::from_utf8(octets).map_err(|e| UriError::InvalidUtf8 {
        index: index + e.valid_up_to() * 3,
    })?;
    sink.push_str(text)?;
    octets.clear();
    Ok(())
}

fn log_failure(operation: &'static str, err: &UriError) {
    tracing::debug!(operation, error = %err, "URI transcoding failed");
}

/// Decodes every percent-escape in a URI component.
///
/// Equivalent to JavaScript's `decodeURIComponent`: `+` is left as is, and
/// the decoded octets must form valid UTF-8.
///
/// # Errors
///
/// Returns `UriError` if an escape is malformed or the decoded octets are
/// not valid UTF-8.
///
/// # Examples
///
/// ```
/// use netid::decode_uri_component;
///
/// assert_eq!(decode_uri_component("a%2Fb%20c").unwrap(), "a/b c");
/// assert_eq!(decode_uri_component("caf%C3%A9").unwrap(), "café");
/// assert!(decode_uri_component("%G0").is_err());
/// ```
pub fn decode_uri_component(s: &str) -> Result<Cow<'_, str>, UriError> {
    if !s.contains('%') {
        return Ok(Cow::Borrowed(s));
    }
    let mut out = String::with_capacity(s.len());
    decode_uri_component_to(s, &mut out)?;
    Ok(Cow::Owned(out))
}

/// Decodes a URI component, appending the result to `out`.
///
/// On error `out` is left as it was.
///
/// # Errors
///
/// See [`decode_uri_component`].
pub fn decode_uri_component_to(s: &str, out: &mut String) -> Result<(), UriError> {
    append_or_rollback(out, |out| decode_uri_component_with(s, out, None))
}

/// Decodes a URI component into a sink, through an optional encoder.
///
/// On error, output already written to the sink should be discarded.
///
/// # Errors
///
/// See [`decode_uri_component`]; also `UriError::Sink` if the sink fails.
pub fn decode_uri_component_with(
    s: &str,
    out: &mut dyn fmt::Write,
    encoder: Option<&dyn Encoder>,
) -> Result<(), UriError> {
    let mut sink = Sink::new(out, encoder);
    decode_segment(s, 0, false, &mut sink, &mut Vec::new())
        .inspect_err(|e| log_failure("decode_uri_component", e))
}

/// Decodes an optional URI component; absence propagates.
///
/// # Errors
///
/// See [`decode_uri_component`].
pub fn decode_uri_component_opt(s: Option<&str>) -> Result<Option<Cow<'_, str>>, UriError> {
    s.map(decode_uri_component).transpose()
}

/// Decodes a URI to its RFC 3987 Unicode form.
///
/// Reserved characters that appear literally stay literal. Escapes are
/// decoded, except those that decode to a reserved character or `%`: they
/// stay percent-encoded so the meaning of the URI does not change. When
/// nothing was decoded, the input itself is returned.
///
/// Like JavaScript's `decodeURI`, except that the whole RFC 3986 reserved
/// set is preserved, including `!'()*[]`.
///
/// # Errors
///
/// Returns `UriError` if an escape is malformed or the decoded octets are
/// not valid UTF-8.
///
/// # Examples
///
/// ```
/// use std::borrow::Cow;
/// use netid::decode_uri;
///
/// assert_eq!(decode_uri("/a%2Fb").unwrap(), "/a%2Fb");
/// assert_eq!(decode_uri("/caf%C3%A9?q=%20x").unwrap(), "/café?q= x");
/// assert!(matches!(decode_uri("/plain").unwrap(), Cow::Borrowed("/plain")));
/// ```
pub fn decode_uri(uri: &str) -> Result<Cow<'_, str>, UriError> {
    if !uri.contains('%') {
        return Ok(Cow::Borrowed(uri));
    }
    let mut out = String::with_capacity(uri.len());
    decode_uri_to(uri, &mut out)?;
    // Decoding only ever shortens the text, so equal length means no change.
    if out.len() == uri.len() {
        debug_assert_eq!(out, uri);
        Ok(Cow::Borrowed(uri))
    } else {
        Ok(Cow::Owned(out))
    }
}

/// Decodes a URI, appending the result to `out`.
///
/// On error `out` is left as it was.
///
/// # Errors
///
/// See [`decode_uri`].
pub fn decode_uri_to(uri: &str, out: &mut String) -> Result<(), UriError> {
    append_or_rollback(out, |out| decode_uri_with(uri, out, None))
}

/// Decodes a URI into a sink, through an optional encoder.
///
/// On error, output already written to the sink should be discarded.
///
/// # Errors
///
/// See [`decode_uri`]; also `UriError::Sink` if the sink fails.
pub fn decode_uri_with(
    uri: &str,
    out: &mut dyn fmt::Write,
    encoder: Option<&dyn Encoder>,
) -> Result<(), UriError> {
    let mut sink = Sink::new(out, encoder);
    decode_reserved_aware(uri, &mut sink).inspect_err(|e| log_failure("decode_uri", e))
}

/// Splits `uri` at literal reserved characters and decodes each run between them.
fn decode_reserved_aware(uri: &str, sink: &mut Sink<'_>) -> Result<(), UriError> {
    let mut octets = Vec::new();
    let mut pos = 0;
    for (i, &x) in uri.as_bytes().iter().enumerate() {
        if RESERVED.allows_ascii(x) {
            decode_segment(&uri[pos..i], pos, true, sink, &mut octets)?;
            sink.push_char(char::from(x))?;
            pos = i + 1;
        }
    }
    decode_segment(&uri[pos..], pos, true, sink, &mut octets)
}

/// Decodes an optional URI; absence propagates.
///
/// # Errors
///
/// See [`decode_uri`].
pub fn decode_uri_opt(uri: Option<&str>) -> Result<Option<Cow<'_, str>>, UriError> {
    uri.map(decode_uri).transpose()
}

/// Decides whether a character is copied as is. The second argument is the
/// input from that character on.
type Keep = fn(char, &[u8]) -> bool;

/// A run of input copied as is, or a single character to escape.
enum Piece<'a> {
    Literal(&'a str),
    Escape(char),
}

fn for_each_piece<E>(
    s: &str,
    keep: Keep,
    mut emit: impl FnMut(Piece<'_>) -> Result<(), E>,
) -> Result<(), E> {
    let mut literal_start = 0;
    for (i, c) in s.char_indices() {
        if keep(c, &s.as_bytes()[i..]) {
            continue;
        }
        if literal_start < i {
            emit(Piece::Literal(&s[literal_start..i]))?;
        }
        emit(Piece::Escape(c))?;
        literal_start = i + c.len_utf8();
    }
    if literal_start < s.len() {
        emit(Piece::Literal(&s[literal_start..]))?;
    }
    Ok(())
}

fn needs_encoding(s: &str, keep: Keep) -> bool {
    s.char_indices().any(|(i, c)| !keep(c, &s.as_bytes()[i..]))
}

fn encode_with(
    s: &str,
    keep: Keep,
    out: &mut dyn fmt::Write,
    encoder: Option<&dyn Encoder>,
) -> Result<(), UriError> {
    let mut sink = Sink::new(out, encoder);
    for_each_piece(s, keep, |piece| match piece {
        Piece::Literal(text) => sink.push_str(text),
        Piece::Escape(c) => sink.push_escaped(c),
    })?;
    Ok(())
}

fn encode_into(s: &str, keep: Keep, out: &mut String) {
    let Ok(()) = for_each_piece::<Infallible>(s, keep, |piece| {
        match piece {
            Piece::Literal(text) => out.push_str(text),
            Piece::Escape(c) => push_escapes(out, c),
        }
        Ok(())
    });
}

fn keep_in_component(c: char, _rest: &[u8]) -> bool {
    rfc3986::is_unreserved(c)
}

/// Keeps unreserved and reserved characters, and `%` when it starts a
/// well-formed escape.
fn keep_in_uri(c: char, rest: &[u8]) -> bool {
    match c {
        '%' => matches!(rest, [b'%', hi, lo, ..] if rfc3986::decode_octet(*hi, *lo).is_some()),
        _ => rfc3986::is_unreserved(c) || rfc3986::is_reserved(c),
    }
}

/// Percent-encodes every character of a component that is not unreserved.
///
/// # Examples
///
/// ```
/// use netid::encode_uri_component;
///
/// assert_eq!(encode_uri_component("a/b c"), "a%2Fb%20c");
/// assert_eq!(encode_uri_component("café"), "caf%C3%A9");
/// ```
#[must_use]
pub fn encode_uri_component(s: &str) -> Cow<'_, str> {
    if !needs_encoding(s, keep_in_component) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() * 3);
    encode_uri_component_to(s, &mut out);
    Cow::Owned(out)
}

/// Percent-encodes a component, appending the result to `out`.
pub fn encode_uri_component_to(s: &str, out: &mut String) {
    encode_into(s, keep_in_component, out);
}

/// Percent-encodes a component into a sink, through an optional encoder.
///
/// # Errors
///
/// Returns `UriError::Sink` if the sink fails.
pub fn encode_uri_component_with(
    s: &str,
    out: &mut dyn fmt::Write,
    encoder: Option<&dyn Encoder>,
) -> Result<(), UriError> {
    encode_with(s, keep_in_component, out, encoder)
}

/// Percent-encodes a URI from its RFC 3987 Unicode form.
///
/// Unreserved and reserved characters are kept, and so are existing `%XX`
/// escapes. A `%` that does not start an escape becomes `%25`. Everything
/// else is encoded as UTF-8 escapes, so the result always decodes.
///
/// # Examples
///
/// ```
/// use netid::{decode_uri, encode_uri};
///
/// assert_eq!(encode_uri("/café?q= x"), "/caf%C3%A9?q=%20x");
/// assert_eq!(encode_uri("50%"), "50%25");
///
/// let wire = "/a%2Fb/caf%C3%A9";
/// assert_eq!(encode_uri(&decode_uri(wire).unwrap()), wire);
/// ```
#[must_use]
pub fn encode_uri(uri: &str) -> Cow<'_, str> {
    if !needs_encoding(uri, keep_in_uri) {
        return Cow::Borrowed(uri);
    }
    let mut out = String::with_capacity(uri.len() * 3);
    encode_uri_to(uri, &mut out);
    Cow::Owned(out)
}

/// Percent-encodes a URI, appending the result to `out`.
pub fn encode_uri_to(uri: &str, out: &mut String) {
    encode_into(uri, keep_in_uri, out);
}

/// Percent-encodes a URI into a sink, through an optional encoder.
///
/// # Errors
///
/// Returns `UriError::Sink` if the sink fails.
pub fn encode_uri_with(
    uri: &str,
    out: &mut dyn fmt::Write,
    encoder: Option<&dyn Encoder>,
) -> Result<(), UriError> {
    encode_with(uri, keep_in_uri, out, encoder)
}
