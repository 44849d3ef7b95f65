//! PSEQ v2 uncompressed sequence container.
//!
//! Layout (little-endian): a fixed 28-byte header followed by `channel_count * frame_count`
//! bytes of frame-major channel data.
//!
//! | offset | field |
//! |--------|-------|
//! | 0..4   | magic `"PSEQ"` |
//! | 4..6   | header length (u16), also the payload offset |
//! | 6      | minor version |
//! | 7      | major version |
//! | 8..12  | channel count (u32) |
//! | 12..16 | frame count (u32) |
//! | 16..18 | step time in ms (u16) |
//! | 18     | flags |
//! | 19     | compression type |
//! | 20     | compression block count |
//! | 21     | sparse range count |
//! | 22     | reserved |
//! | 23..28 | padding |

use std::io::{self, Cursor, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::{
    encode::sink::{FrameSink, SinkConfig},
    foundation::{
        core::FrameIndex,
        error::{LightshowError, LightshowResult, ShapeMismatch},
    },
};

/// File magic.
pub const PSEQ_MAGIC: &[u8; 4] = b"PSEQ";
/// Size of the fixed header, and the offset of the first payload byte.
pub const PSEQ_HEADER_LEN: u16 = 28;
/// Major format version written.
pub const PSEQ_MAJOR_VERSION: u8 = 2;
/// Minor format version written.
pub const PSEQ_MINOR_VERSION: u8 = 0;

const PADDING: [u8; 5] = [0; 5];

/// Decoded or to-be-written PSEQ header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PseqHeader {
    /// Header length and payload offset.
    pub header_len: u16,
    /// Minor version.
    pub minor_version: u8,
    /// Major version.
    pub major_version: u8,
    /// Bytes per frame.
    pub channel_count: u32,
    /// Number of frames.
    pub frame_count: u32,
    /// Milliseconds per frame.
    pub step_time_ms: u16,
    /// Compression type; `0` means uncompressed.
    pub compression: u8,
}

impl PseqHeader {
    /// Header for an uncompressed v2.0 sequence.
    pub fn new(channel_count: u32, frame_count: u32, step_time_ms: u16) -> Self {
        Self {
            header_len: PSEQ_HEADER_LEN,
            minor_version: PSEQ_MINOR_VERSION,
            major_version: PSEQ_MAJOR_VERSION,
            channel_count,
            frame_count,
            step_time_ms,
            compression: 0,
        }
    }

    /// Declared payload size in bytes.
    pub fn payload_len(&self) -> u64 {
        u64::from(self.channel_count) * u64::from(self.frame_count)
    }

    /// Write the 28 header bytes.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(PSEQ_MAGIC)?;
        writer.write_u16::<LittleEndian>(self.header_len)?;
        writer.write_u8(self.minor_version)?;
        writer.write_u8(self.major_version)?;
        writer.write_u32::<LittleEndian>(self.channel_count)?;
        writer.write_u32::<LittleEndian>(self.frame_count)?;
        writer.write_u16::<LittleEndian>(self.step_time_ms)?;
        writer.write_u8(0)?; // flags
        writer.write_u8(self.compression)?;
        writer.write_u8(0)?; // compression blocks
        writer.write_u8(0)?; // sparse ranges
        writer.write_u8(0)?; // reserved
        writer.write_all(&PADDING)?;
        Ok(())
    }

    /// Read a header from the start of `bytes`.
    ///
    /// Fails on a short buffer, a wrong magic, a header length below 28, or a major version
    /// other than 2.
    pub fn parse(bytes: &[u8]) -> LightshowResult<Self> {
        if bytes.len() < usize::from(PSEQ_HEADER_LEN) {
            return Err(LightshowError::decode(format!(
                "sequence is {} bytes, shorter than the {PSEQ_HEADER_LEN}-byte header",
                bytes.len()
            )));
        }
        let mut cur = Cursor::new(bytes);
        let mut magic = [0u8; 4];
        cur.read_exact(&mut magic).map_err(decode_io)?;
        if &magic != PSEQ_MAGIC {
            return Err(LightshowError::decode(format!(
                "bad magic {:?}, expected \"PSEQ\"",
                String::from_utf8_lossy(&magic)
            )));
        }

        let header_len = cur.read_u16::<LittleEndian>().map_err(decode_io)?;
        let minor_version = cur.read_u8().map_err(decode_io)?;
        let major_version = cur.read_u8().map_err(decode_io)?;
        let channel_count = cur.read_u32::<LittleEndian>().map_err(decode_io)?;
        let frame_count = cur.read_u32::<LittleEndian>().map_err(decode_io)?;
        let step_time_ms = cur.read_u16::<LittleEndian>().map_err(decode_io)?;
        let _flags = cur.read_u8().map_err(decode_io)?;
        let compression = cur.read_u8().map_err(decode_io)?;

        if header_len < PSEQ_HEADER_LEN {
            return Err(LightshowError::decode(format!(
                "header length {header_len} is below {PSEQ_HEADER_LEN}"
            )));
        }
        if major_version != PSEQ_MAJOR_VERSION {
            return Err(LightshowError::decode(format!(
                "unsupported major version {major_version}"
            )));
        }

        Ok(Self {
            header_len,
            minor_version,
            major_version,
            channel_count,
            frame_count,
            step_time_ms,
            compression,
        })
    }
}

fn decode_io(e: io::Error) -> LightshowError {
    LightshowError::decode(format!("truncated header: {e}"))
}

/// Borrowed view of an encoded sequence: header plus frame payload.
#[derive(Clone, Copy, Debug)]
pub struct PseqFile<'a> {
    /// Decoded header.
    pub header: PseqHeader,
    payload: &'a [u8],
}

impl<'a> PseqFile<'a> {
    /// Split `bytes` into header and payload, checking the payload size.
    pub fn parse(bytes: &'a [u8]) -> LightshowResult<Self> {
        let header = PseqHeader::parse(bytes)?;
        if header.compression != 0 {
            return Err(LightshowError::decode(format!(
                "compression type {} is not supported",
                header.compression
            )));
        }
        let payload = bytes
            .get(usize::from(header.header_len)..)
            .ok_or_else(|| LightshowError::decode("header length runs past end of data"))?;
        if payload.len() as u64 != header.payload_len() {
            return Err(LightshowError::decode(format!(
                "payload is {} bytes, header declares {}",
                payload.len(),
                header.payload_len()
            )));
        }
        Ok(Self { header, payload })
    }

    /// Raw frame-major payload.
    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }

    /// Channel bytes of frame `index`.
    pub fn frame(&self, index: u32) -> Option<&'a [u8]> {
        if index >= self.header.frame_count {
            return None;
        }
        let width = self.header.channel_count as usize;
        let start = index as usize * width;
        self.payload.get(start..start + width)
    }

    /// Iterate frames in time order.
    pub fn frames(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
        (0..self.header.frame_count).filter_map(|i| self.frame(i))
    }
}

/// Streaming PSEQ encoder.
///
/// The header is written on `begin`; each pushed frame must match the declared channel count,
/// and `end` fails unless exactly the declared number of frames arrived.
#[derive(Debug)]
pub struct PseqWriter<W: Write> {
    inner: W,
    cfg: Option<SinkConfig>,
    written: u64,
}

impl<W: Write> PseqWriter<W> {
    /// Wrap `inner`. Nothing is written until `begin`.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            cfg: None,
            written: 0,
        }
    }

    /// Frames accepted so far.
    pub fn frames_written(&self) -> u64 {
        self.written
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write + Send> FrameSink for PseqWriter<W> {
    fn begin(&mut self, cfg: SinkConfig) -> LightshowResult<()> {
        if self.cfg.is_some() {
            return Err(LightshowError::validation("PseqWriter::begin called twice"));
        }
        PseqHeader::new(cfg.channel_count, cfg.frame_count, cfg.step_time_ms)
            .write_to(&mut self.inner)?;
        self.cfg = Some(cfg);
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &[u8]) -> LightshowResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| LightshowError::validation("push_frame called before begin"))?;
        if idx.0 != self.written {
            return Err(LightshowError::validation(format!(
                "frames must arrive in order: expected {}, got {}",
                self.written, idx.0
            )));
        }
        if self.written >= u64::from(cfg.frame_count) {
            return Err(ShapeMismatch::FrameCount {
                expected: u64::from(cfg.frame_count),
                actual: self.written + 1,
            }
            .into());
        }
        if frame.len() as u64 != u64::from(cfg.channel_count) {
            return Err(ShapeMismatch::ChannelCount {
                frame: idx.0,
                expected: u64::from(cfg.channel_count),
                actual: frame.len() as u64,
            }
            .into());
        }
        self.inner.write_all(frame)?;
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> LightshowResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| LightshowError::validation("end called before begin"))?;
        if self.written != u64::from(cfg.frame_count) {
            return Err(ShapeMismatch::FrameCount {
                expected: u64::from(cfg.frame_count),
                actual: self.written,
            }
            .into());
        }
        self.inner.flush()?;
        Ok(())
    }
}

/// Encode a frame buffer as an uncompressed PSEQ v2 sequence.
///
/// The shape is checked before any byte is produced: `frames.len()` must equal
/// `frame_count` and every frame must be exactly `channel_count` bytes long.
#[tracing::instrument(skip(frames), fields(n_frames = frames.len()))]
pub fn encode<F: AsRef<[u8]>>(
    frames: &[F],
    channel_count: u32,
    frame_count: u32,
    step_time_ms: u16,
) -> LightshowResult<Vec<u8>> {
    check_shape(frames, channel_count, frame_count)?;

    let total = u64::from(PSEQ_HEADER_LEN) + u64::from(channel_count) * u64::from(frame_count);
    let mut writer = PseqWriter::new(Vec::with_capacity(usize::try_from(total).unwrap_or(0)));
    write_frames(
        &mut writer,
        frames,
        SinkConfig {
            channel_count,
            frame_count,
            step_time_ms,
        },
    )?;
    let out = writer.into_inner();
    tracing::debug!(bytes = out.len(), "encoded");
    Ok(out)
}

/// Push `frames` through `sink` between `begin` and `end`.
pub fn write_frames<F: AsRef<[u8]>>(
    sink: &mut dyn FrameSink,
    frames: &[F],
    cfg: SinkConfig,
) -> LightshowResult<()> {
    sink.begin(cfg)?;
    for (i, frame) in frames.iter().enumerate() {
        sink.push_frame(FrameIndex(i as u64), frame.as_ref())?;
    }
    sink.end()
}

fn check_shape<F: AsRef<[u8]>>(
    frames: &[F],
    channel_count: u32,
    frame_count: u32,
) -> Result<(), ShapeMismatch> {
    if frames.len() as u64 != u64::from(frame_count) {
        return Err(ShapeMismatch::FrameCount {
            expected: u64::from(frame_count),
            actual: frames.len() as u64,
        });
    }
    for (i, frame) in frames.iter().enumerate() {
        let len = frame.as_ref().len() as u64;
        if len != u64::from(channel_count) {
            return Err(ShapeMismatch::ChannelCount {
                frame: i as u64,
                expected: u64::from(channel_count),
                actual: len,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/pseq.rs"]
mod tests;
