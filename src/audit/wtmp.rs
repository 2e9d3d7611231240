//! Binary login accounting records.
//!
//! Login history is kept in `wtmp`, current sessions in `utmp` and failures
//! in `btmp`. All three share the glibc `struct utmp` layout: fixed 384 byte
//! little endian records.
//!
//! References:
//!  - `man 5 utmp`
//!  - `https://github.com/libyal/dtformats/blob/main/documentation/Utmp%20login%20records%20format.asciidoc`

use super::{RawEntry, RecordSource};
use log::{debug, warn};
use nom::{
    bytes::complete::take,
    error::{Error, ErrorKind},
    number::complete::{le_i16, le_i32},
};

/// Size of one `struct utmp` on Linux
pub const UTMP_RECORD_SIZE: usize = 384;

const LINE_SIZE: usize = 32;
const ID_SIZE: usize = 4;
const USER_SIZE: usize = 32;
const HOST_SIZE: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    Empty,
    RunLevel,
    BootTime,
    NewTime,
    OldTime,
    InitProcess,
    LoginProcess,
    UserProcess,
    DeadProcess,
    Accounting,
}

impl RecordType {
    fn from_raw(value: i16) -> Option<Self> {
        let record_type = match value {
            0 => Self::Empty,
            1 => Self::RunLevel,
            2 => Self::BootTime,
            3 => Self::NewTime,
            4 => Self::OldTime,
            5 => Self::InitProcess,
            6 => Self::LoginProcess,
            7 => Self::UserProcess,
            8 => Self::DeadProcess,
            9 => Self::Accounting,
            _ => return None,
        };
        Some(record_type)
    }

    pub fn as_raw(self) -> i16 {
        self as i16
    }
}

/// One decoded `struct utmp`
#[derive(Debug, Clone, PartialEq)]
pub struct UtmpRecord {
    pub record_type: RecordType,
    pub pid: i32,
    pub line: String,
    pub user: String,
    pub host: String,
    pub seconds: i32,
    pub microseconds: i32,
}

impl UtmpRecord {
    /// `seconds + microseconds * 1e-6`
    pub fn entry_time(&self) -> f64 {
        f64::from(self.seconds) + f64::from(self.microseconds) * 0.000_001
    }

    /// Only user sessions count as logins; boot, runlevel and shutdown
    /// markers carry pseudo users such as `reboot`.
    pub fn to_raw_entry(&self) -> RawEntry {
        if self.record_type == RecordType::UserProcess && !self.user.is_empty() {
            RawEntry::new(self.entry_time(), self.user.clone())
        } else {
            RawEntry::anonymous(self.entry_time())
        }
    }
}

/// Parse one record. Unknown record types are rejected.
fn parse_record(data: &[u8]) -> nom::IResult<&[u8], UtmpRecord> {
    let (remaining, raw_type) = le_i16(data)?;
    let record_type = RecordType::from_raw(raw_type)
        .ok_or_else(|| nom::Err::Error(Error::new(data, ErrorKind::Verify)))?;
    // Padding after the 16 bit type
    let (remaining, _) = take(2usize)(remaining)?;
    let (remaining, pid) = le_i32(remaining)?;
    let (remaining, line_data) = take(LINE_SIZE)(remaining)?;
    let (remaining, _id) = take(ID_SIZE)(remaining)?;
    let (remaining, user_data) = take(USER_SIZE)(remaining)?;
    let (remaining, host_data) = take(HOST_SIZE)(remaining)?;
    let (remaining, _termination_status) = le_i16(remaining)?;
    let (remaining, _exit_status) = le_i16(remaining)?;
    let (remaining, _session) = le_i32(remaining)?;
    let (remaining, seconds) = le_i32(remaining)?;
    let (remaining, microseconds) = le_i32(remaining)?;
    let (remaining, _addr_v6) = take(16usize)(remaining)?;
    let (remaining, _unused) = take(20usize)(remaining)?;

    let record = UtmpRecord {
        record_type,
        pid,
        line: extract_string(line_data),
        user: extract_string(user_data),
        host: extract_string(host_data),
        seconds,
        microseconds,
    };

    Ok((remaining, record))
}

/// Fixed width, NUL padded field
fn extract_string(data: &[u8]) -> String {
    let end = data.iter().position(|b| *b == 0).unwrap_or(data.len());
    String::from_utf8_lossy(&data[..end]).into_owned()
}

/// Iterator over the records of a `wtmp` buffer.
///
/// Malformed records are skipped and decoding resumes at the next record
/// boundary. A trailing partial record ends the iteration.
pub struct UtmpRecords<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> UtmpRecords<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }
}

impl Iterator for UtmpRecords<'_> {
    type Item = UtmpRecord;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let remaining = &self.data[self.offset..];
            if remaining.len() < UTMP_RECORD_SIZE {
                if !remaining.is_empty() {
                    warn!(
                        "[wtmp] Ignoring {} trailing bytes at offset {}",
                        remaining.len(),
                        self.offset
                    );
                    self.offset = self.data.len();
                }
                return None;
            }

            let record_data = &remaining[..UTMP_RECORD_SIZE];
            let record_offset = self.offset;
            self.offset += UTMP_RECORD_SIZE;

            match parse_record(record_data) {
                Ok((_, record)) => return Some(record),
                Err(err) => {
                    debug!("[wtmp] Skipping malformed record at offset {record_offset}: {err:?}");
                }
            }
        }
    }
}

/// The `wtmp` generations of one query.
///
/// Each generation is decoded from its own offset 0, so a truncated rotated
/// file cannot shift the record boundaries of the next one.
#[derive(Debug, Clone, Default)]
pub struct WtmpLog {
    generations: Vec<Vec<u8>>,
}

impl WtmpLog {
    /// A single generation
    pub fn new(buffer: Vec<u8>) -> Self {
        Self::from_generations(vec![buffer])
    }

    pub fn from_generations(generations: Vec<Vec<u8>>) -> Self {
        Self { generations }
    }

    pub fn records(&self) -> impl Iterator<Item = UtmpRecord> + '_ {
        self.generations
            .iter()
            .flat_map(|generation| UtmpRecords::new(generation))
    }
}

impl RecordSource for WtmpLog {
    fn entries(&self) -> Box<dyn Iterator<Item = RawEntry> + '_> {
        Box::new(self.records().map(|record| record.to_raw_entry()))
    }
}

/// Encode a record in the on-disk layout. Used to build fixtures.
pub fn encode_record(
    record_type: RecordType,
    user: &str,
    line: &str,
    seconds: i32,
    microseconds: i32,
) -> Vec<u8> {
    fn fixed(value: &str, size: usize) -> Vec<u8> {
        let mut field = value.as_bytes().to_vec();
        field.resize(size, 0);
        field
    }

    let mut data = Vec::with_capacity(UTMP_RECORD_SIZE);
    data.extend_from_slice(&record_type.as_raw().to_le_bytes());
    data.extend_from_slice(&[0, 0]);
    data.extend_from_slice(&1234i32.to_le_bytes());
    data.extend(fixed(line, LINE_SIZE));
    data.extend(fixed("", ID_SIZE));
    data.extend(fixed(user, USER_SIZE));
    data.extend(fixed("", HOST_SIZE));
    data.extend_from_slice(&[0; 4]);
    data.extend_from_slice(&0i32.to_le_bytes());
    data.extend_from_slice(&seconds.to_le_bytes());
    data.extend_from_slice(&microseconds.to_le_bytes());
    data.extend_from_slice(&[0; 36]);
    data
}
