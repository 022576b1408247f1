//! Interval log parsing and writing.
//!
//! Interval logs, as handled by the Java implementation's `HistogramLogWriter`,
//! `HistogramLogReader`, and `HistogramLogProcessor`, are a way to record a sequence of histograms
//! over time. Suppose you were running a load test for an hour: you might want to record a
//! histogram per second or minute so that you could correlate measurements with behavior you might
//! see in logs, etc.
//!
//! An interval log contains some initial metadata, then a sequence of histograms, each with some
//! additional metadata (timestamps, etc).
//!
//! To parse a log, see `IntervalLogIterator`. To write a log, see `IntervalLogWriterBuilder`.

use std::fmt::Write;
use std::{io, ops, str, time};

use nom::branch::alt;
use nom::bytes::complete::{tag, take_until};
use nom::character::complete::{char, digit1, line_ending, not_line_ending};
use nom::combinator::{map, map_res, opt};
use nom::number::complete::double;
use nom::sequence::{preceded, terminated};
use nom::IResult;

use crate::serialization::Serializer;
use crate::{Counter, Histogram};

/// Log format version emitted by `IntervalLogWriterBuilder`. Readers accept any minor version
/// of major version 1.
const LOG_FORMAT_VERSION: &str = "1.3";

/// Highest major version of the `#[Histogram log format version X.Y]` header this reader
/// understands. Logs with a higher major version may use an incompatible format.
const MAX_SUPPORTED_LOG_FORMAT_MAJOR_VERSION: u32 = 1;

/// Accumulates header configuration (comments, `StartTime`, `BaseTime`, a max-value scaling
/// factor) before any interval histograms are written.
///
/// Header fields set more than once keep only the last value, and are always written in a fixed
/// order (`StartTime`, then `BaseTime`, then `MaxValueDivisor`) after all comments, regardless of
/// the order they were configured in.
#[derive(Debug, Default)]
pub struct IntervalLogWriterBuilder {
    start_time: Option<time::SystemTime>,
    base_time: Option<time::SystemTime>,
    max_value_divisor: Option<f64>,
    comments: Vec<String>,
}

impl IntervalLogWriterBuilder {
    /// Create a new builder with no header configured.
    pub fn new() -> IntervalLogWriterBuilder {
        IntervalLogWriterBuilder::default()
    }

    /// Add a comment line to the header. May be called more than once; comments are written in
    /// the order added.
    pub fn add_comment(mut self, s: &str) -> Self {
        self.comments.push(s.to_string());
        self
    }

    /// Record a `StartTime` for the log.
    pub fn with_start_time(mut self, time: time::SystemTime) -> Self {
        self.start_time = Some(time);
        self
    }

    /// Record a `BaseTime` for the log.
    pub fn with_base_time(mut self, time: time::SystemTime) -> Self {
        self.base_time = Some(time);
        self
    }

    /// Each interval histogram's max value is divided by this before being written; it is purely
    /// informational for human readers and has no bearing on the encoded histogram itself.
    pub fn with_max_value_divisor(mut self, divisor: f64) -> Self {
        self.max_value_divisor = Some(divisor);
        self
    }

    /// Write the accumulated header to `writer` and return an `IntervalLogWriter` ready to write
    /// interval histograms serialized with `serializer`.
    pub fn begin_log_with<'a, 'b, W: io::Write, S: Serializer>(
        self,
        writer: &'a mut W,
        serializer: &'b mut S,
    ) -> io::Result<IntervalLogWriter<'a, 'b, W, S>> {
        let mut internal_writer = InternalLogWriter {
            writer,
            serializer,
            text_buf: String::new(),
            serialize_buf: Vec::new(),
            max_value_divisor: self.max_value_divisor.unwrap_or(1.0),
        };

        write!(
            internal_writer.writer,
            "#[Histogram log format version {}]\n",
            LOG_FORMAT_VERSION
        )?;

        for comment in &self.comments {
            internal_writer.write_comment(comment)?;
        }

        if let Some(t) = self.start_time {
            let secs = duration_since_epoch(t);
            write!(
                internal_writer.writer,
                "#[StartTime: {:.3} (seconds since epoch)]\n",
                duration_as_fp_seconds(secs)
            )?;
        }

        if let Some(t) = self.base_time {
            let secs = duration_since_epoch(t);
            write!(
                internal_writer.writer,
                "#[BaseTime: {:.3} (seconds since epoch)]\n",
                duration_as_fp_seconds(secs)
            )?;
        }

        if let Some(d) = self.max_value_divisor {
            write!(internal_writer.writer, "#[MaxValueDivisor: {:.3}]\n", d)?;
        }

        Ok(IntervalLogWriter { internal_writer })
    }
}

fn duration_since_epoch(t: time::SystemTime) -> time::Duration {
    t.duration_since(time::UNIX_EPOCH)
        .expect("system time predates the epoch")
}

/// Writes interval histograms in an interval log.
///
/// This isn't created directly; start with an `IntervalLogWriterBuilder`.
pub struct IntervalLogWriter<'a, 'b, W: 'a + io::Write, S: 'b + Serializer> {
    internal_writer: InternalLogWriter<'a, 'b, W, S>,
}

impl<'a, 'b, W: 'a + io::Write, S: 'b + Serializer> IntervalLogWriter<'a, 'b, W, S> {
    /// Add a comment line.
    pub fn write_comment(&mut self, s: &str) -> io::Result<()> {
        self.internal_writer.write_comment(s)
    }

    /// Write an interval histogram.
    ///
    /// `start_timestamp` is the time since the epoch. If you're using a StartTime or BaseTime
    /// offset, you should instead use a delta since that time.
    /// `duration` is the duration of the interval.
    /// `tag` is an optional tag for this histogram.
    ///
    /// The max value written alongside the histogram is scaled by whatever divisor was
    /// configured on the `IntervalLogWriterBuilder` (1.0 if none was configured).
    pub fn write_histogram<T: Counter>(
        &mut self,
        h: &Histogram<T>,
        start_timestamp: time::Duration,
        duration: time::Duration,
        tag: Option<Tag>,
    ) -> Result<(), IntervalLogWriterError<S::SerializeError>> {
        self.internal_writer
            .write_histogram(h, start_timestamp, duration, tag)
    }
}

/// Errors that can occur while writing a log.
#[derive(Debug)]
pub enum IntervalLogWriterError<E> {
    /// Histogram serialization failed.
    SerializeError(E),
    /// An i/o error occurred.
    IoError(io::ErrorKind),
}

impl<E> From<io::Error> for IntervalLogWriterError<E> {
    fn from(e: io::Error) -> Self {
        IntervalLogWriterError::IoError(e.kind())
    }
}

/// Write interval logs.
struct InternalLogWriter<'a, 'b, W: 'a + io::Write, S: 'b + Serializer> {
    writer: &'a mut W,
    serializer: &'b mut S,
    text_buf: String,
    serialize_buf: Vec<u8>,
    max_value_divisor: f64,
}

impl<'a, 'b, W: 'a + io::Write, S: 'b + Serializer> InternalLogWriter<'a, 'b, W, S> {
    fn write_comment(&mut self, s: &str) -> io::Result<()> {
        for line in s.split('\n') {
            write!(self.writer, "#{}\n", line)?;
        }
        Ok(())
    }

    fn write_histogram<T: Counter>(
        &mut self,
        h: &Histogram<T>,
        start_timestamp: time::Duration,
        duration: time::Duration,
        tag: Option<Tag>,
    ) -> Result<(), IntervalLogWriterError<S::SerializeError>> {
        self.serialize_buf.clear();
        self.text_buf.clear();

        if let Some(Tag(s)) = tag {
            write!(self.text_buf, "Tag={},", &s).expect("Writes to a String can't fail");
        }

        write!(
            self.writer,
            "{}{:.3},{:.3},{:.3},",
            self.text_buf,
            duration_as_fp_seconds(start_timestamp),
            duration_as_fp_seconds(duration),
            h.max() as f64 / self.max_value_divisor // because the Java impl does it this way
        )?;

        self.text_buf.clear();
        let _len = self
            .serializer
            .serialize(h, &mut self.serialize_buf)
            .map_err(IntervalLogWriterError::SerializeError)?;
        base64::encode_config_buf(&self.serialize_buf, base64::STANDARD, &mut self.text_buf);

        self.writer.write_all(self.text_buf.as_bytes())?;
        self.writer.write_all(b"\n")?;

        Ok(())
    }
}

fn duration_as_fp_seconds(d: time::Duration) -> f64 {
    d.as_secs() as f64 + f64::from(d.subsec_nanos()) / 1.0e9
}

/// A tag for an interval histogram.
///
/// Tags are just `str`s that do not contain a few disallowed characters: ',', '\r', '\n', and ' '.
///
/// To get the wrapped `str` back out, use `as_str()` or the `Deref<str>` implementation
/// (`&some_tag`).
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Tag<'a>(pub &'a str);

impl<'a> Tag<'a> {
    /// Create a new Tag.
    ///
    /// If a disallowed character is present, this will return `None`.
    pub fn new(s: &'a str) -> Option<Tag<'a>> {
        if s.chars()
            .any(|c| c == ',' || c == '\r' || c == '\n' || c == ' ')
        {
            None
        } else {
            Some(Tag(s))
        }
    }

    /// Returns the tag contents as a str.
    pub fn as_str(&self) -> &'a str {
        self.0
    }
}

impl<'a> ops::Deref for Tag<'a> {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

/// An individual interval histogram parsed from an interval log.
#[derive(PartialEq, Debug)]
pub struct IntervalLogHistogram<'a> {
    tag: Option<Tag<'a>>,
    start_timestamp: time::Duration,
    duration: time::Duration,
    max: f64,
    encoded_histogram: &'a str,
}

impl<'a> IntervalLogHistogram<'a> {
    /// Tag, if any is present.
    pub fn tag(&self) -> Option<Tag<'a>> {
        self.tag
    }

    /// Timestamp of the start of the interval.
    ///
    /// The timestamp may be absolute vs the epoch, or there may be a `StartTime` or `BaseTime` for
    /// the log, in which case you may wish to consider this as a delta vs those timestamps.
    pub fn start_timestamp(&self) -> time::Duration {
        self.start_timestamp
    }

    /// Duration of the interval.
    pub fn duration(&self) -> time::Duration {
        self.duration
    }

    /// Max value in the encoded histogram.
    ///
    /// This max value is the max of the histogram divided by some scaling factor (which may be
    /// 1.0).
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Base64-encoded serialized histogram.
    ///
    /// If you need the deserialized histogram, base64-decode and use a `Deserializer` on the
    /// resulting bytes.
    pub fn encoded_histogram(&self) -> &'a str {
        self.encoded_histogram
    }
}

#[derive(PartialEq, Debug)]
/// Represents one non-comment line in an interval log.
///
/// One thing to note is that the way your interval timestamps work can vary. If your log was
/// written with a StartTime or BaseTime, that metadata will appear in header comments, and that
/// will be represented by the iterator providing the corresponding variants here. The presence
/// of those timestamps will affect how you should interpret the timestamps for individual
/// intervals.
pub enum LogEntry<'a> {
    /// Logs may include a StartTime. If present, it represents time since the epoch.
    StartTime(time::Duration),
    /// Logs may include a BaseTime. If present, it represents time since the epoch.
    BaseTime(time::Duration),
    /// An individual interval histogram.
    Interval(IntervalLogHistogram<'a>),
}

/// Errors that occur when parsing an interval log.
#[derive(Debug, PartialEq)]
pub enum LogIteratorError {
    /// Parsing failed
    ParseError {
        /// Offset in the input where the failed parse started
        offset: usize,
    },
    /// The log declares a `#[Histogram log format version X.Y]` header whose major version this
    /// reader does not know how to parse.
    UnsupportedVersion {
        /// The unsupported major version found in the header.
        major: u32,
        /// The minor version found alongside it.
        minor: u32,
    },
}

/// Parse interval logs.
///
/// This iterator exposes each item (excluding comments and other information-free lines). See
/// `LogEntry`.
///
/// Because histogram deserialization is deferred, parsing logs is fast. (See the `interval_log`
/// benchmark if you wish to see how it does on your hardware. As a baseline, parsing a log of 1000
/// random histograms of 10,000 values each takes 8ms total on an E5-1650v3.)
///
/// Deferring deserialization is handy because it allows you to cheaply navigate the log to find
/// the records you care about (e.g. ones in a certain time range, or with a certain tag) without
/// doing all the allocation, etc, of deserialization.
///
/// This parses from a slice representing the complete file because it made implementation easier
/// (and also supports mmap'd files for maximum parsing speed). If parsing from a `Read` is
/// important for your use case, open an issue about it.
///
/// # Examples
///
/// Parse a single interval from a log.
///
/// ```
/// use hdrhistogram::serialization::interval_log;
/// use std::time::Duration;
/// // two newline-separated log lines: a comment, then an interval
/// let log = b"#I'm a comment\nTag=t,0.127,1.007,2.769,base64EncodedHisto\n";
///
/// let mut iter = interval_log::IntervalLogIterator::new(&log[..]);
///
/// match iter.next().unwrap().unwrap() {
///     interval_log::LogEntry::Interval(h) => {
///         assert_eq!(Duration::new(0, 127_000_000), h.start_timestamp());
///     }
///     _ => panic!()
/// }
///
/// assert_eq!(None, iter.next());
/// ```
///
/// Skip logs that started before 3 seconds.
///
/// ```
/// use hdrhistogram::serialization::interval_log;
/// use std::time::Duration;
/// let mut log = Vec::new();
/// log.extend_from_slice(b"#I'm a comment\n");
/// log.extend_from_slice(b"Tag=a,0.123,1.007,2.769,base64EncodedHisto\n");
/// log.extend_from_slice(b"1.456,1.007,2.769,base64EncodedHisto\n");
/// log.extend_from_slice(b"3.789,1.007,2.769,base64EncodedHisto\n");
/// log.extend_from_slice(b"Tag=b,4.123,1.007,2.769,base64EncodedHisto\n");
/// log.extend_from_slice(b"5.456,1.007,2.769,base64EncodedHisto\n");
/// log.extend_from_slice(b"#Another comment\n");
///
/// let iter = interval_log::IntervalLogIterator::new(&log);
///
/// let count = iter.map(|r| r.unwrap())
///     .filter_map(|e| match e {
///         interval_log::LogEntry::Interval(ilh) => Some(ilh),
///          _ => None
///     })
///     .filter(|ilh| ilh.start_timestamp() >= Duration::new(3, 0))
///     .count();
///
/// assert_eq!(3, count);
/// ```
pub struct IntervalLogIterator<'a> {
    orig_len: usize,
    input: &'a [u8],
}

impl<'a> IntervalLogIterator<'a> {
    /// Create a new iterator from the UTF-8 bytes of an interval log.
    pub fn new(input: &'a [u8]) -> IntervalLogIterator<'a> {
        IntervalLogIterator {
            orig_len: input.len(),
            input,
        }
    }
}

impl<'a> Iterator for IntervalLogIterator<'a> {
    type Item = Result<LogEntry<'a>, LogIteratorError>;

    fn next(&mut self) -> Option<Self::Item> {
        // Look for magic comments first otherwise they will get matched by the simple comment
        // parser
        loop {
            if self.input.is_empty() {
                return None;
            }

            if let Ok((rest, (major, minor))) = log_format_version(self.input) {
                if major > MAX_SUPPORTED_LOG_FORMAT_MAJOR_VERSION {
                    return Some(Err(LogIteratorError::UnsupportedVersion { major, minor }));
                }
                self.input = rest;
                continue;
            }

            if let Ok((rest, e)) = log_entry(self.input) {
                self.input = rest;
                return Some(Ok(e));
            }

            // it wasn't a log entry; try parsing a comment

            match ignored_line(self.input) {
                Ok((rest, _)) => {
                    self.input = rest;
                    continue;
                }
                Err(_) => {
                    return Some(Err(LogIteratorError::ParseError {
                        offset: self.orig_len - self.input.len(),
                    }));
                }
            }
        }
    }
}

/// Parses a `seconds.fractional_seconds` field into a `Duration`. Any fractional digits beyond
/// nanosecond precision are consumed but ignored; fewer than 9 fractional digits are scaled up.
fn fract_sec_duration(input: &[u8]) -> IResult<&[u8], time::Duration> {
    let (input, whole) = digit1(input)?;
    let (input, _) = char('.')(input)?;
    let (input, frac) = digit1(input)?;

    // both are ascii digit-only byte slices, so utf8 + integer parsing cannot fail
    let secs: u64 = str::from_utf8(whole).unwrap().parse().unwrap();
    let frac_str = str::from_utf8(frac).unwrap();
    let nanos: u32 = if frac_str.len() >= 9 {
        frac_str[0..9].parse().unwrap()
    } else {
        let n: u32 = frac_str.parse().unwrap();
        n * 10_u32.pow((9 - frac_str.len()) as u32)
    };

    Ok((input, time::Duration::new(secs, nanos)))
}

fn start_time(input: &[u8]) -> IResult<&[u8], LogEntry> {
    let (input, _) = tag("#[StartTime: ")(input)?;
    let (input, d) = fract_sec_duration(input)?;
    let (input, _) = char(' ')(input)?;
    let (input, _) = not_line_ending(input)?;
    let (input, _) = line_ending(input)?;
    Ok((input, LogEntry::StartTime(d)))
}

fn base_time(input: &[u8]) -> IResult<&[u8], LogEntry> {
    let (input, _) = tag("#[BaseTime: ")(input)?;
    let (input, d) = fract_sec_duration(input)?;
    let (input, _) = char(' ')(input)?;
    let (input, _) = not_line_ending(input)?;
    let (input, _) = line_ending(input)?;
    Ok((input, LogEntry::BaseTime(d)))
}

fn tag_field(input: &[u8]) -> IResult<&[u8], Tag> {
    map(
        map_res(
            terminated(preceded(tag("Tag="), take_until(",")), tag(",")),
            str::from_utf8,
        ),
        Tag,
    )(input)
}

fn interval_hist(input: &[u8]) -> IResult<&[u8], LogEntry> {
    let (input, tag) = opt(tag_field)(input)?;
    let (input, start_timestamp) = fract_sec_duration(input)?;
    let (input, _) = char(',')(input)?;
    let (input, duration) = fract_sec_duration(input)?;
    let (input, _) = char(',')(input)?;
    let (input, max) = double(input)?;
    let (input, _) = char(',')(input)?;
    let (input, encoded_histogram) = map_res(not_line_ending, str::from_utf8)(input)?;
    let (input, _) = line_ending(input)?;
    Ok((
        input,
        LogEntry::Interval(IntervalLogHistogram {
            tag,
            start_timestamp,
            duration,
            max,
            encoded_histogram,
        }),
    ))
}

fn log_entry(input: &[u8]) -> IResult<&[u8], LogEntry> {
    alt((start_time, base_time, interval_hist))(input)
}

/// Parses the `#[Histogram log format version X.Y]` header line, returning `(major, minor)`.
fn log_format_version(input: &[u8]) -> IResult<&[u8], (u32, u32)> {
    let (input, _) = tag("#[Histogram log format version ")(input)?;
    let (input, major) = map_res(digit1, |b: &[u8]| str::from_utf8(b).unwrap().parse::<u32>())(input)?;
    let (input, _) = char('.')(input)?;
    let (input, minor) = map_res(digit1, |b: &[u8]| str::from_utf8(b).unwrap().parse::<u32>())(input)?;
    let (input, _) = char(']')(input)?;
    let (input, _) = line_ending(input)?;
    Ok((input, (major, minor)))
}

fn comment_line(input: &[u8]) -> IResult<&[u8], ()> {
    let (input, _) = tag("#")(input)?;
    let (input, _) = not_line_ending(input)?;
    let (input, _) = line_ending(input)?;
    Ok((input, ()))
}

fn legend(input: &[u8]) -> IResult<&[u8], ()> {
    let (input, _) = tag("\"StartTimestamp\"")(input)?;
    let (input, _) = not_line_ending(input)?;
    let (input, _) = line_ending(input)?;
    Ok((input, ()))
}

fn ignored_line(input: &[u8]) -> IResult<&[u8], ()> {
    alt((comment_line, legend))(input)
}
