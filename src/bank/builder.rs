// Writes synthetic banks for the reader tests. Only the pieces the reader
// walks are laid out faithfully, everything else is filler.
use crate::bank::chunk::TONE_MAGIC;
use crate::bank::header::{BANK_MAGIC, NUS3_MAGIC, TOC_MAGIC};
use crate::bank::tone::FLAG_EXTENDED;
use crate::bank::volume::VOLUME_TAG;

// Filler for bytes the reader must never look at
const FILL: u8 = 0xCD;

// Tag used for records that have no volume sub-record
pub const SFX_TAG: u32 = 0x0000_1A2B;

pub struct ToneEntry {
    pub name: &'static str,
    pub extended: bool,
    pub volume: Option<f32>,
}

impl ToneEntry {
    pub fn music(name: &'static str, volume: f32) -> Self {
        ToneEntry {
            name,
            extended: false,
            volume: Some(volume),
        }
    }

    pub fn sfx(name: &'static str) -> Self {
        ToneEntry {
            name,
            extended: false,
            volume: None,
        }
    }

    pub fn extended(mut self) -> Self {
        self.extended = true;
        self
    }

    fn record(&self) -> Vec<u8> {
        let mut rec = vec![FILL; 7];
        rec.push(if self.extended { FLAG_EXTENDED } else { 0x00 });
        if self.extended {
            rec.extend_from_slice(&[FILL; 4]);
        }

        let name = self.name.as_bytes();
        rec.push(name.len() as u8);
        rec.extend_from_slice(name);

        // Length byte + name is padded out to a multiple of 4
        let padded = (name.len() + 1).div_ceil(4) * 4;
        rec.resize(rec.len() + padded - (name.len() + 1), 0x00);
        rec.extend_from_slice(&[FILL; 0xC]);

        match self.volume {
            Some(volume) => {
                rec.extend_from_slice(&VOLUME_TAG.to_le_bytes());
                rec.extend_from_slice(&volume.to_le_bytes());
            }
            None => {
                rec.extend_from_slice(&SFX_TAG.to_le_bytes());
                rec.extend_from_slice(&[FILL; 4]);
            }
        }

        // Trailing record data
        rec.extend_from_slice(&[FILL; 8]);
        rec
    }
}

/// Payload of a `TONE` chunk holding `entries`.
pub fn tone_payload(entries: &[ToneEntry]) -> Vec<u8> {
    let records: Vec<Vec<u8>> = entries.iter().map(|e| e.record()).collect();

    let mut data = Vec::new();
    data.extend_from_slice(&(entries.len() as u32).to_le_bytes());

    // Records start right after the descriptor array
    let mut rel = 4 + 8 * records.len();
    for rec in records.iter() {
        data.extend_from_slice(&(rel as u32).to_le_bytes());
        data.extend_from_slice(&(rec.len() as u32).to_le_bytes());
        rel += rec.len();
    }
    for rec in records.iter() {
        data.extend_from_slice(rec);
    }
    data
}

pub struct BankBuilder {
    chunks: Vec<([u8; 4], Vec<u8>)>,
}

impl BankBuilder {
    pub fn new() -> Self {
        BankBuilder { chunks: Vec::new() }
    }

    pub fn chunk(mut self, tag: &[u8; 4], data: Vec<u8>) -> Self {
        self.chunks.push((*tag, data));
        self
    }

    pub fn tone(self, entries: &[ToneEntry]) -> Self {
        self.chunk(&TONE_MAGIC, tone_payload(entries))
    }

    pub fn build(self) -> Vec<u8> {
        // TOC region: chunk count + one (tag, size) per chunk
        let toc_size = 4 + 8 * self.chunks.len();

        let mut body = Vec::new();
        body.extend_from_slice(&BANK_MAGIC);
        body.extend_from_slice(&TOC_MAGIC);
        body.extend_from_slice(&(toc_size as u32).to_le_bytes());
        body.extend_from_slice(&(self.chunks.len() as u32).to_le_bytes());
        for (tag, data) in self.chunks.iter() {
            body.extend_from_slice(tag);
            body.extend_from_slice(&(data.len() as u32).to_le_bytes());
        }
        for (tag, data) in self.chunks.iter() {
            body.extend_from_slice(tag);
            body.extend_from_slice(&(data.len() as u32).to_le_bytes());
            body.extend_from_slice(data);
        }

        let mut buf = Vec::new();
        buf.extend_from_slice(&NUS3_MAGIC);
        buf.extend_from_slice(&(body.len() as u32).to_le_bytes());
        buf.extend_from_slice(&body);
        buf
    }
}

/// Smallest bank with one music entry at `volume`.
pub fn single_entry(volume: f32) -> Vec<u8> {
    BankBuilder::new()
        .tone(&[ToneEntry::music("bgm_test", volume)])
        .build()
}
