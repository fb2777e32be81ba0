use crate::error::{PersistenceError, Result};
use byteorder::{ByteOrder, LittleEndian};
use crc64fast::Digest;
use predusk_kernel::frame::{decode_proof_entry, encode_proof_entry};
use predusk_kernel::DataTimeProof;
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const MAGIC: &[u8; 4] = b"PDTP";
pub const VERSION: u32 = 1;
pub const FILE_HEADER_SIZE: u64 = 8;

/// Log file holding the proofs of one identity inside `dir`.
pub fn log_path_for(dir: impl AsRef<Path>, identity: &[u8]) -> PathBuf {
    dir.as_ref().join(format!("{}.dtp", hex::encode(identity)))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordHeader {
    pub increment: u32,
    pub payload_len: u32,
    pub checksum: u64,
}

impl RecordHeader {
    pub const SIZE: usize = 4 + 4 + 8; // 16 bytes

    pub fn from_bytes(buf: &[u8; Self::SIZE]) -> Self {
        Self {
            increment: LittleEndian::read_u32(&buf[0..4]),
            payload_len: LittleEndian::read_u32(&buf[4..8]),
            checksum: LittleEndian::read_u64(&buf[8..16]),
        }
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        LittleEndian::write_u32(&mut buf[0..4], self.increment);
        LittleEndian::write_u32(&mut buf[4..8], self.payload_len);
        LittleEndian::write_u64(&mut buf[8..16], self.checksum);
        buf
    }
}

fn checksum(increment: u32, payload: &[u8]) -> u64 {
    let mut digest = Digest::new();
    digest.write(&increment.to_le_bytes());
    digest.write(&(payload.len() as u32).to_le_bytes());
    digest.write(payload);
    digest.sum64()
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    offset: u64,
    len: u32,
    checksum: u64,
}

/// Append-only proof log indexed by increment.
///
/// ```text
/// [magic "PDTP"][version u32 LE]
/// [increment u32 LE][payload_len u32 LE][crc64 u64 LE][payload] ...
/// ```
///
/// The payload is the framed proof entry, the same bytes that go on the wire.
pub struct ProofLog {
    path: PathBuf,
    file: Mutex<File>,
    index: BTreeMap<u32, Slot>,
    end: u64,
}

impl ProofLog {
    /// Opens or creates the log at `path` and indexes every record in it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&path)?;

        let file_len = file.metadata()?.len();
        if file_len == 0 {
            let mut header = [0u8; FILE_HEADER_SIZE as usize];
            header[0..4].copy_from_slice(MAGIC);
            LittleEndian::write_u32(&mut header[4..8], VERSION);
            file.write_all(&header)?;
            file.sync_data()?;
            return Ok(Self {
                path,
                file: Mutex::new(file),
                index: BTreeMap::new(),
                end: FILE_HEADER_SIZE,
            });
        }

        let index = Self::scan(&mut file, file_len)?;
        Ok(Self { path, file: Mutex::new(file), index, end: file_len })
    }

    fn scan(file: &mut File, file_len: u64) -> Result<BTreeMap<u32, Slot>> {
        if file_len < FILE_HEADER_SIZE {
            return Err(PersistenceError::InvalidFormat("truncated file header".to_string()));
        }
        file.seek(SeekFrom::Start(0))?;
        let mut reader = BufReader::new(file);

        let mut header = [0u8; FILE_HEADER_SIZE as usize];
        reader.read_exact(&mut header)?;
        if &header[0..4] != MAGIC {
            return Err(PersistenceError::InvalidMagic);
        }
        let version = LittleEndian::read_u32(&header[4..8]);
        if version != VERSION {
            return Err(PersistenceError::UnsupportedVersion(version));
        }

        let mut index = BTreeMap::new();
        let mut offset = FILE_HEADER_SIZE;
        while offset < file_len {
            if file_len - offset < RecordHeader::SIZE as u64 {
                return Err(PersistenceError::InvalidFormat(format!(
                    "truncated record header at offset {}",
                    offset
                )));
            }
            let mut buf = [0u8; RecordHeader::SIZE];
            reader.read_exact(&mut buf)?;
            let header = RecordHeader::from_bytes(&buf);
            let payload_offset = offset + RecordHeader::SIZE as u64;

            if file_len - payload_offset < header.payload_len as u64 {
                return Err(PersistenceError::InvalidFormat(format!(
                    "truncated payload for increment {}",
                    header.increment
                )));
            }
            let mut payload = vec![0u8; header.payload_len as usize];
            reader.read_exact(&mut payload)?;

            verify(&header, &payload)?;
            if index.contains_key(&header.increment) {
                return Err(PersistenceError::DuplicateIncrement(header.increment));
            }

            index.insert(
                header.increment,
                Slot { offset: payload_offset, len: header.payload_len, checksum: header.checksum },
            );
            offset = payload_offset + header.payload_len as u64;
        }

        Ok(index)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn latest_increment(&self) -> Option<u32> {
        self.index.keys().next_back().copied()
    }

    pub fn contains(&self, increment: u32) -> bool {
        self.index.contains_key(&increment)
    }

    pub fn append(&mut self, proof: &DataTimeProof) -> Result<()> {
        if self.index.contains_key(&proof.increment) {
            return Err(PersistenceError::DuplicateIncrement(proof.increment));
        }

        let payload = encode_proof_entry(proof);
        let payload_len = u32::try_from(payload.len()).map_err(|_| {
            PersistenceError::InvalidFormat(format!("proof {} too large", proof.increment))
        })?;
        let header = RecordHeader {
            increment: proof.increment,
            payload_len,
            checksum: checksum(proof.increment, &payload),
        };

        let mut file = self.lock()?;
        // A torn record from an earlier failed append is dropped first.
        if file.metadata()?.len() != self.end {
            file.set_len(self.end)?;
        }
        if let Err(e) = write_record(&mut file, &header, &payload) {
            let _ = file.set_len(self.end);
            return Err(e.into());
        }
        drop(file);

        let payload_offset = self.end + RecordHeader::SIZE as u64;
        self.index.insert(
            proof.increment,
            Slot { offset: payload_offset, len: payload_len, checksum: header.checksum },
        );
        self.end = payload_offset + payload_len as u64;
        Ok(())
    }

    /// Reads the proof at `increment`, re-verifying its checksum.
    pub fn get(&self, increment: u32) -> Result<Option<DataTimeProof>> {
        let slot = match self.index.get(&increment) {
            Some(slot) => *slot,
            None => return Ok(None),
        };

        let mut payload = vec![0u8; slot.len as usize];
        {
            let mut file = self.lock()?;
            file.seek(SeekFrom::Start(slot.offset))?;
            file.read_exact(&mut payload)?;
        }

        let header = RecordHeader { increment, payload_len: slot.len, checksum: slot.checksum };
        verify(&header, &payload).map(Some)
    }

    pub fn latest(&self) -> Result<Option<DataTimeProof>> {
        match self.latest_increment() {
            Some(increment) => self.get(increment),
            None => Ok(None),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, File>> {
        self.file
            .lock()
            .map_err(|_| PersistenceError::InvalidFormat("proof log lock poisoned".to_string()))
    }
}

fn write_record(file: &mut File, header: &RecordHeader, payload: &[u8]) -> std::io::Result<()> {
    file.write_all(&header.to_bytes())?;
    file.write_all(payload)?;
    file.sync_data()
}

fn verify(header: &RecordHeader, payload: &[u8]) -> Result<DataTimeProof> {
    let found = checksum(header.increment, payload);
    if found != header.checksum {
        return Err(PersistenceError::ChecksumMismatch {
            increment: header.increment,
            expected: header.checksum,
            found,
        });
    }

    let proof = decode_proof_entry(payload)?;
    if proof.increment != header.increment {
        return Err(PersistenceError::InvalidFormat(format!(
            "record header says increment {}, payload says {}",
            header.increment, proof.increment
        )));
    }
    Ok(proof)
}
